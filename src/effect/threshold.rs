//! Threshold effect: reduce the image to black and white around a luminance
//! cut point.

use crate::backend::ImageHandle;
use crate::config::{EffectConfig, OptionDefault, OptionSpec, Validator};
use crate::effect::{Effect, EffectError};
use crate::ops::EffectOp;
use serde_json::{Map, Value};

const SCHEMA: &[OptionSpec] = &[OptionSpec {
    name: "threshold",
    default: OptionDefault::Float(0.5),
    validator: Validator::UnitInterval,
}];

#[derive(Debug)]
pub struct ThresholdEffect {
    config: EffectConfig,
}

impl ThresholdEffect {
    pub fn new() -> Self {
        Self {
            config: EffectConfig::new(SCHEMA),
        }
    }

    /// Cut point as a fraction of full luminance.
    pub fn threshold(&self) -> f64 {
        self.config.float("threshold")
    }
}

impl Default for ThresholdEffect {
    fn default() -> Self {
        Self::new()
    }
}

impl Effect for ThresholdEffect {
    fn name(&self) -> &'static str {
        "threshold"
    }

    fn config(&self) -> &EffectConfig {
        &self.config
    }

    fn config_mut(&mut self) -> &mut EffectConfig {
        &mut self.config
    }

    fn process(
        &mut self,
        image: &mut dyn ImageHandle,
        data: Option<&Map<String, Value>>,
    ) -> Result<(), EffectError> {
        if let Some(data) = data {
            self.config.apply_bulk(data, &*image)?;
        }
        let value = self.threshold();
        tracing::debug!(value, "applying threshold");
        image.apply(&EffectOp::Threshold { value })?;
        Ok(())
    }
}

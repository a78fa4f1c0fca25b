//! Rotate effect: turn the image by an angle, filling revealed corners with
//! a background color.

use crate::backend::ImageHandle;
use crate::config::{EffectConfig, OptionDefault, OptionSpec, Validator};
use crate::effect::{DEFAULT_BACKGROUND, Effect, EffectError};
use crate::ops::EffectOp;
use serde_json::{Map, Value};

const SCHEMA: &[OptionSpec] = &[
    OptionSpec {
        name: "angle",
        default: OptionDefault::Float(0.0),
        validator: Validator::Any,
    },
    OptionSpec {
        name: "background_color",
        default: OptionDefault::Str(DEFAULT_BACKGROUND),
        validator: Validator::Any,
    },
];

#[derive(Debug)]
pub struct RotateEffect {
    config: EffectConfig,
}

impl RotateEffect {
    pub fn new() -> Self {
        Self {
            config: EffectConfig::new(SCHEMA),
        }
    }

    /// Rotation angle in degrees, clockwise.
    pub fn angle(&self) -> f64 {
        self.config.float("angle")
    }

    pub fn background_color(&self) -> String {
        self.config.string("background_color")
    }
}

impl Default for RotateEffect {
    fn default() -> Self {
        Self::new()
    }
}

impl Effect for RotateEffect {
    fn name(&self) -> &'static str {
        "rotate"
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
        let angle = self.angle();
        tracing::debug!(angle, "applying rotation");
        image.apply(&EffectOp::Rotate {
            angle,
            background_color: self.background_color(),
        })?;
        Ok(())
    }
}

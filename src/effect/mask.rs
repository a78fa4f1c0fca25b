//! Mask effect: composite a grayscale mask onto the image's alpha channel,
//! anchored by gravity with optional pixel offsets.

use crate::backend::ImageHandle;
use crate::config::{EffectConfig, OptionDefault, OptionSpec, Validator};
use crate::effect::{Effect, EffectError};
use crate::ops::EffectOp;
use serde_json::{Map, Value};
use std::path::PathBuf;

const SCHEMA: &[OptionSpec] = &[
    OptionSpec {
        name: "mask",
        default: OptionDefault::Str(""),
        validator: Validator::Any,
    },
    OptionSpec {
        name: "opacity",
        default: OptionDefault::Float(1.0),
        validator: Validator::UnitInterval,
    },
    OptionSpec {
        name: "gravity",
        default: OptionDefault::Str("nw"),
        validator: Validator::Gravity,
    },
    OptionSpec {
        name: "x",
        default: OptionDefault::Int(0),
        validator: Validator::Any,
    },
    OptionSpec {
        name: "y",
        default: OptionDefault::Int(0),
        validator: Validator::Any,
    },
];

#[derive(Debug)]
pub struct MaskEffect {
    config: EffectConfig,
}

impl MaskEffect {
    pub fn new() -> Self {
        Self {
            config: EffectConfig::new(SCHEMA),
        }
    }

    /// Path of the mask image; required before processing.
    pub fn mask(&self) -> String {
        self.config.string("mask")
    }

    pub fn opacity(&self) -> f64 {
        self.config.float("opacity")
    }

    pub fn gravity(&self) -> String {
        self.config.string("gravity")
    }

    pub fn x(&self) -> i64 {
        self.config.int("x")
    }

    pub fn y(&self) -> i64 {
        self.config.int("y")
    }
}

impl Default for MaskEffect {
    fn default() -> Self {
        Self::new()
    }
}

impl Effect for MaskEffect {
    fn name(&self) -> &'static str {
        "mask"
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
        let mask = self.mask();
        if mask.is_empty() {
            return Err(EffectError::InvalidParameter {
                option: "mask".to_string(),
                reason: "a mask image path is required".to_string(),
            });
        }
        tracing::debug!(mask = %mask, "applying mask");
        image.apply(&EffectOp::Mask {
            mask: PathBuf::from(mask),
            opacity: self.opacity(),
            gravity: self.gravity(),
            x: self.x(),
            y: self.y(),
        })?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::tests::MockImage;
    use serde_json::json;
    use std::path::Path;

    #[test]
    fn defaults() {
        let effect = MaskEffect::new();
        assert_eq!(effect.mask(), "");
        assert_eq!(effect.opacity(), 1.0);
        assert_eq!(effect.gravity(), "nw");
        assert_eq!(effect.x(), 0);
        assert_eq!(effect.y(), 0);
    }

    #[test]
    fn bulk_configuration_accepts_negative_offsets() {
        let mut image = MockImage::new(100, 100);
        let mut effect = MaskEffect::new();
        let data = json!({
            "mask": "foo/bar.png",
            "opacity": 0.5,
            "gravity": "se",
            "x": -10,
            "y": 20,
        });
        effect
            .process(&mut image, Some(data.as_object().unwrap()))
            .unwrap();

        assert_eq!(image.operations.len(), 1);
        assert!(matches!(
            &image.operations[0],
            EffectOp::Mask { mask, opacity, gravity, x, y }
                if mask == Path::new("foo/bar.png")
                    && *opacity == 0.5
                    && gravity == "se"
                    && *x == -10
                    && *y == 20
        ));
    }

    #[test]
    fn missing_mask_path_fails() {
        let mut image = MockImage::new(100, 100);
        let mut effect = MaskEffect::new();
        let err = effect.process(&mut image, None).unwrap_err();
        assert!(matches!(err, EffectError::InvalidParameter { option, .. } if option == "mask"));
        assert!(image.operations.is_empty());
    }
}

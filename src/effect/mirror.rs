//! Mirror effect: flip the image across one axis.

use crate::backend::ImageHandle;
use crate::config::{EffectConfig, OptionDefault, OptionSpec, Validator};
use crate::effect::{Effect, EffectError};
use crate::ops::{Axis, EffectOp};
use serde_json::{Map, Value};

const SCHEMA: &[OptionSpec] = &[OptionSpec {
    name: "axis",
    default: OptionDefault::Str("y"),
    validator: Validator::OneOf(&["x", "y"]),
}];

#[derive(Debug)]
pub struct MirrorEffect {
    config: EffectConfig,
}

impl MirrorEffect {
    pub fn new() -> Self {
        Self {
            config: EffectConfig::new(SCHEMA),
        }
    }

    pub fn axis(&self) -> Axis {
        // Restricted to "x"/"y" by the schema.
        Axis::parse(&self.config.string("axis")).unwrap_or(Axis::Y)
    }
}

impl Default for MirrorEffect {
    fn default() -> Self {
        Self::new()
    }
}

impl Effect for MirrorEffect {
    fn name(&self) -> &'static str {
        "mirror"
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
        let axis = self.axis();
        tracing::debug!(%axis, "applying mirror");
        image.apply(&EffectOp::Mirror { axis })?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::tests::MockImage;
    use crate::config::OptionValue;
    use serde_json::json;

    #[test]
    fn default_axis_is_y() {
        assert_eq!(MirrorEffect::new().axis(), Axis::Y);
    }

    #[test]
    fn process_emits_mirror_op() {
        let mut image = MockImage::new(100, 100);
        let mut effect = MirrorEffect::new();
        let data = json!({ "axis": "x" });
        effect
            .process(&mut image, Some(data.as_object().unwrap()))
            .unwrap();

        assert_eq!(
            image.operations,
            vec![EffectOp::Mirror { axis: Axis::X }]
        );
    }

    #[test]
    fn axis_restricted_to_x_or_y() {
        let image = MockImage::new(100, 100);
        let mut effect = MirrorEffect::new();
        let err = effect
            .config_mut()
            .set("axis", OptionValue::Str("z".to_string()), &image)
            .unwrap_err();
        assert!(matches!(err, EffectError::InvalidParameter { option, .. } if option == "axis"));
        assert_eq!(effect.axis(), Axis::Y);
    }
}

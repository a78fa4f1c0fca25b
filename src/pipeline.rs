//! Declarative multi-effect application.
//!
//! A pipeline is built from a JSON array of effect declarations, each an
//! object with a `type` key naming the effect and the remaining keys its
//! configuration:
//!
//! ```
//! use darkroom::{GeometrySource, Pipeline, RasterImage};
//! use serde_json::json;
//!
//! let declaration = json!([
//!     { "type": "resize", "max_width": 800 },
//!     { "type": "mirror", "axis": "x" },
//! ]);
//! let mut pipeline = Pipeline::from_value(&declaration).unwrap();
//!
//! let base = image::DynamicImage::new_rgba8(1200, 900);
//! let mut image = RasterImage::new(base);
//! pipeline.run(&mut image).unwrap();
//! assert_eq!((image.width(), image.height()), (800, 600));
//! ```
//!
//! Effects run in declaration order. The first error aborts the run; effects
//! already applied stay applied, since each effect is independent.

use crate::backend::ImageHandle;
use crate::effect::{Effect, EffectError, create_effect};
use serde_json::{Map, Value};

#[derive(Debug)]
struct Step {
    effect: Box<dyn Effect>,
    params: Map<String, Value>,
}

/// An ordered sequence of configured effects.
#[derive(Debug, Default)]
pub struct Pipeline {
    steps: Vec<Step>,
}

impl Pipeline {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a pipeline from a declarative JSON array.
    pub fn from_value(value: &Value) -> Result<Self, EffectError> {
        let items = value.as_array().ok_or_else(|| EffectError::InvalidParameter {
            option: "effects".to_string(),
            reason: "expected an array of effect objects".to_string(),
        })?;

        let mut pipeline = Self::new();
        for item in items {
            let obj = item.as_object().ok_or_else(|| EffectError::InvalidParameter {
                option: "effects".to_string(),
                reason: "each entry must be an object".to_string(),
            })?;
            let kind = obj
                .get("type")
                .and_then(Value::as_str)
                .ok_or_else(|| EffectError::InvalidParameter {
                    option: "type".to_string(),
                    reason: "each effect needs a `type` string".to_string(),
                })?;
            let effect = create_effect(kind)?;
            let mut params = obj.clone();
            params.remove("type");
            pipeline.steps.push(Step { effect, params });
        }
        Ok(pipeline)
    }

    /// Append a pre-built effect; it will run with the configuration it
    /// already carries.
    pub fn push(&mut self, effect: Box<dyn Effect>) {
        self.steps.push(Step {
            effect,
            params: Map::new(),
        });
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Apply all effects to `image` in order, aborting on the first error.
    pub fn run(&mut self, image: &mut dyn ImageHandle) -> Result<(), EffectError> {
        for step in &mut self.steps {
            tracing::debug!(effect = step.effect.name(), "applying effect");
            let params = (!step.params.is_empty()).then_some(&step.params);
            step.effect.process(image, params)?;
        }
        Ok(())
    }
}

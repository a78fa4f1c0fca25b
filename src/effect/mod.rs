//! Effects: named, configurable image transformation steps.
//!
//! Every effect follows the same lifecycle: construct, configure (typed `set`
//! calls or a single bulk-apply from an untyped JSON map), then [`process`]
//! against an [`ImageHandle`]. Configuration is validated per field at set
//! time; `process` validates the *combination* of fields, resolves it into at
//! most one typed operation, and hands that operation to the image's sink.
//!
//! Any error aborts the effect with nothing applied to the image — there is
//! no partial application of a single effect.
//!
//! [`process`]: Effect::process

use crate::backend::{BackendError, ImageHandle};
use crate::config::EffectConfig;
use serde_json::{Map, Value};
use thiserror::Error;

mod mask;
mod mirror;
mod resize;
mod rotate;
mod threshold;

pub use mask::MaskEffect;
pub use mirror::MirrorEffect;
pub use resize::{ResizeEffect, ResizeMode};
pub use rotate::RotateEffect;
pub use threshold::ThresholdEffect;

/// Default background color, matching ImageMagick's fully transparent white.
pub(crate) const DEFAULT_BACKGROUND: &str = "rgba(100%, 100%, 100%, 0)";

#[derive(Error, Debug)]
pub enum EffectError {
    /// A single configuration value failed its validator. Raised at `set`
    /// time, never deferred to `process`.
    #[error("invalid value for `{option}`: {reason}")]
    InvalidParameter { option: String, reason: String },
    /// The resolved resize mode's required combination of dimensions or
    /// constraints is absent.
    #[error("missing parameters to perform `{0}` resize")]
    InvalidResizeParameters(ResizeMode),
    /// Mode is recognized but intentionally unsupported.
    #[error("`{0}` resize mode is not supported")]
    NotImplemented(ResizeMode),
    /// Pipeline declaration named an effect this crate does not provide.
    #[error("unknown effect type `{0}`")]
    UnknownEffect(String),
    /// Opaque failure bubbled up unmodified from the backend.
    #[error("backend error: {0}")]
    Backend(#[from] BackendError),
}

/// A single named, configurable image transformation step.
pub trait Effect: std::fmt::Debug {
    /// Effect name as used in declarative pipeline specs.
    fn name(&self) -> &'static str;

    fn config(&self) -> &EffectConfig;

    fn config_mut(&mut self) -> &mut EffectConfig;

    /// Bulk-apply `data` (when given), then run the effect against `image`.
    ///
    /// Emits at most one operation to the image's sink; a no-op resolution
    /// emits none.
    fn process(
        &mut self,
        image: &mut dyn ImageHandle,
        data: Option<&Map<String, Value>>,
    ) -> Result<(), EffectError>;
}

/// Instantiate an effect by its pipeline name.
pub fn create_effect(kind: &str) -> Result<Box<dyn Effect>, EffectError> {
    match kind {
        "resize" => Ok(Box::new(ResizeEffect::new())),
        "rotate" => Ok(Box::new(RotateEffect::new())),
        "mirror" => Ok(Box::new(MirrorEffect::new())),
        "threshold" => Ok(Box::new(ThresholdEffect::new())),
        "mask" => Ok(Box::new(MaskEffect::new())),
        other => Err(EffectError::UnknownEffect(other.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registry_knows_every_effect() {
        for kind in ["resize", "rotate", "mirror", "threshold", "mask"] {
            let effect = create_effect(kind).unwrap();
            assert_eq!(effect.name(), kind);
        }
    }

    #[test]
    fn registry_rejects_unknown_kind() {
        let err = create_effect("sepia").unwrap_err();
        assert!(matches!(err, EffectError::UnknownEffect(k) if k == "sepia"));
    }
}

//! # Darkroom
//!
//! A declarative image-effect pipeline. A caller describes a sequence of
//! transformations — resize, rotate, mirror, threshold, mask — with named
//! parameters; each effect validates its configuration and emits typed
//! operations against an abstract image handle. The raster backend that does
//! the pixel work is pluggable behind traits.
//!
//! ```
//! use darkroom::{GeometrySource, Pipeline, RasterImage};
//! use serde_json::json;
//!
//! let photo = image::DynamicImage::new_rgba8(1200, 900);
//! let mut image = RasterImage::new(photo);
//!
//! Pipeline::from_value(&json!([
//!     { "type": "resize", "mode": "constraints", "max_width": 800 },
//!     { "type": "rotate", "angle": 90 },
//! ]))
//! .unwrap()
//! .run(&mut image)
//! .unwrap();
//!
//! assert_eq!((image.width(), image.height()), (600, 800));
//! ```
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`config`] | Schema-driven option bag shared by every effect: typed values, per-option validators, atomic `set`, bulk apply from untyped JSON |
//! | [`effect`] | The effects themselves; [`effect::ResizeEffect`] holds the resize policy engine (mode inference, constraint solving, no-op detection) |
//! | [`ops`] | Typed operation payloads handed from effects to a backend |
//! | [`backend`] | The image handle seam: geometry queries + operation sink |
//! | [`pipeline`] | Declarative multi-effect application from a JSON description |
//! | [`raster`] | Pure-Rust backend over the `image` crate |
//!
//! # Design Decisions
//!
//! ## Validation at Set Time
//!
//! Each configuration field is validated when assigned, not when the effect
//! runs. An invalid value is never stored: a rejected `set` leaves the prior
//! configuration intact. What *is* deferred to processing time is combination
//! validation — e.g. an `exact` resize missing one of its two dimensions —
//! because only then is the full intent known.
//!
//! ## Resolution Before Execution
//!
//! The resize engine separates deciding from doing:
//! [`ResizeEffect::resolve`](effect::ResizeEffect::resolve) is a pure
//! function from intent + geometry to a target (or a no-op), so the whole
//! policy — mode inference precedence, min-over-max constraint ordering,
//! redundant-resize short-circuits — is unit testable without touching a
//! pixel. The backend is invoked at most once per effect, and never for a
//! no-op.
//!
//! ## Backend-Agnostic Effects
//!
//! Effects depend on two narrow traits ([`GeometrySource`] and
//! [`EffectSink`]) rather than a concrete image type. The bundled
//! [`RasterImage`] implements them with the `image` crate; tests use a
//! recording mock. Backend failures propagate unmodified.

pub mod backend;
pub mod config;
pub mod effect;
pub mod ops;
pub mod pipeline;
pub mod raster;

pub use backend::{BackendError, EffectSink, GRAVITIES, GeometrySource, ImageHandle};
pub use config::{EffectConfig, OptionDefault, OptionSpec, OptionValue, Validator};
pub use effect::{
    Effect, EffectError, MaskEffect, MirrorEffect, ResizeEffect, ResizeMode, RotateEffect,
    ThresholdEffect, create_effect,
};
pub use ops::{Axis, EffectOp, ResizeCommand, ResizeTarget};
pub use pipeline::Pipeline;
pub use raster::RasterImage;

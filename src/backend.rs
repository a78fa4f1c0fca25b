//! Image handle traits and shared backend types.
//!
//! An image, as far as the effect layer is concerned, is two capabilities:
//!
//! - [`GeometrySource`] — read-only geometry queries (width, height, ratio)
//!   plus the gravity vocabulary used to validate alignment options.
//! - [`EffectSink`] — the operation sink that executes typed [`EffectOp`]s.
//!
//! [`ImageHandle`] combines both; it is what effects are applied against.
//! The production implementation is [`RasterImage`](crate::raster::RasterImage)
//! — pure Rust, backed by the `image` crate.

use crate::ops::EffectOp;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BackendError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Processing failed: {0}")]
    ProcessingFailed(String),
}

/// The nine ImageMagick-style anchor points. Backends that support a different
/// vocabulary override [`GeometrySource::available_gravities`].
pub const GRAVITIES: &[&str] = &["center", "n", "ne", "e", "se", "s", "sw", "w", "nw"];

/// Read-only geometry of the image an effect targets.
pub trait GeometrySource {
    fn width(&self) -> u32;

    fn height(&self) -> u32;

    /// Width-to-height aspect ratio.
    fn ratio(&self) -> f64 {
        f64::from(self.width()) / f64::from(self.height())
    }

    /// Gravity tokens this image accepts for alignment-sensitive options.
    fn available_gravities(&self) -> &[&str] {
        GRAVITIES
    }
}

/// Operation sink: executes a single typed operation against the image.
///
/// Failures propagate unmodified to the caller of the effect; the sink must
/// not be invoked again for the same effect application.
pub trait EffectSink {
    fn apply(&mut self, op: &EffectOp) -> Result<(), BackendError>;
}

/// An image that effects can be applied to: geometry plus operation sink.
pub trait ImageHandle: GeometrySource + EffectSink {}

impl<T: GeometrySource + EffectSink> ImageHandle for T {}

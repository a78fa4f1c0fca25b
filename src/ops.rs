//! Operation payloads handed to an image backend.
//!
//! These types describe *what* to do to an image, not *how* to do it. They are
//! the interface between the effect layer (which validates configuration and
//! decides what should happen) and the [`backend`](crate::backend) (which does
//! the actual pixel work). This separation allows swapping backends
//! (e.g. for testing with a mock) without changing effect logic.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// Mirror axis. `X` flips the image top-to-bottom (across the horizontal
/// axis), `Y` flops it left-to-right.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Axis {
    X,
    Y,
}

impl Axis {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "x" => Some(Axis::X),
            "y" => Some(Axis::Y),
            _ => None,
        }
    }
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Axis::X => write!(f, "x"),
            Axis::Y => write!(f, "y"),
        }
    }
}

/// Resolved resize geometry produced by the policy engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResizeTarget {
    /// Explicit target dimensions. A zero on one axis delegates that axis to
    /// the backend's native ratio-preserving behavior.
    Dimensions {
        width: u32,
        height: u32,
        preserve_aspect: bool,
    },
    /// Opaque scale expression (e.g. `"50%"`), interpreted by the backend.
    Scale(String),
}

/// Full specification for a resize: resolved target plus the pass-through
/// options the engine itself never interprets.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResizeCommand {
    pub target: ResizeTarget,
    pub gravity: String,
    pub background_color: String,
    pub adaptive: bool,
}

/// A single typed operation applied to an image. Serializable so applied
/// operations can be captured and replayed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EffectOp {
    Resize(ResizeCommand),
    Rotate {
        angle: f64,
        background_color: String,
    },
    Mirror {
        axis: Axis,
    },
    Threshold {
        value: f64,
    },
    Mask {
        mask: PathBuf,
        opacity: f64,
        gravity: String,
        x: i64,
        y: i64,
    },
}

//! Resize effect: declarative intent in, a single resolved resize out.
//!
//! The policy engine is [`ResizeEffect::resolve`]: it turns an intent —
//! explicit dimensions, min/max constraints, a named mode, or `auto` — into
//! one well-defined [`ResizeTarget`] or a no-op, with validation and
//! deterministic mode inference. Pixel work and the interpretation of a zero
//! axis are left to the backend.

use crate::backend::{GeometrySource, ImageHandle};
use crate::config::{EffectConfig, OptionDefault, OptionSpec, Validator};
use crate::effect::{DEFAULT_BACKGROUND, Effect, EffectError};
use crate::ops::{EffectOp, ResizeCommand, ResizeTarget};
use serde_json::{Map, Value};
use std::fmt;

/// Named resize strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResizeMode {
    /// Infer the effective mode from which dimensions are set.
    Auto,
    /// Stretch to exactly `width` x `height`.
    Exact,
    /// Match `width`, letting the backend derive the height.
    Width,
    /// Match `height`, letting the backend derive the width.
    Height,
    /// Fit within `width` x `height`, preserving aspect ratio.
    BestFit,
    /// Resize only as needed to satisfy min/max bounds, preserving ratio.
    Constraints,
    /// Recognized but unsupported.
    Crop,
    /// Recognized but unsupported.
    Fill,
    /// Do nothing.
    None,
}

impl ResizeMode {
    pub const NAMES: &'static [&'static str] = &[
        "auto",
        "exact",
        "width",
        "height",
        "best_fit",
        "constraints",
        "crop",
        "fill",
        "none",
    ];

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "auto" => Some(ResizeMode::Auto),
            "exact" => Some(ResizeMode::Exact),
            "width" => Some(ResizeMode::Width),
            "height" => Some(ResizeMode::Height),
            "best_fit" => Some(ResizeMode::BestFit),
            "constraints" => Some(ResizeMode::Constraints),
            "crop" => Some(ResizeMode::Crop),
            "fill" => Some(ResizeMode::Fill),
            "none" => Some(ResizeMode::None),
            _ => None,
        }
    }
}

impl fmt::Display for ResizeMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ResizeMode::Auto => "auto",
            ResizeMode::Exact => "exact",
            ResizeMode::Width => "width",
            ResizeMode::Height => "height",
            ResizeMode::BestFit => "best_fit",
            ResizeMode::Constraints => "constraints",
            ResizeMode::Crop => "crop",
            ResizeMode::Fill => "fill",
            ResizeMode::None => "none",
        };
        write!(f, "{name}")
    }
}

const SCHEMA: &[OptionSpec] = &[
    OptionSpec {
        name: "mode",
        default: OptionDefault::Str("auto"),
        validator: Validator::OneOf(ResizeMode::NAMES),
    },
    OptionSpec {
        name: "width",
        default: OptionDefault::Uint(0),
        validator: Validator::Any,
    },
    OptionSpec {
        name: "height",
        default: OptionDefault::Uint(0),
        validator: Validator::Any,
    },
    OptionSpec {
        name: "min_width",
        default: OptionDefault::Uint(0),
        validator: Validator::Any,
    },
    OptionSpec {
        name: "min_height",
        default: OptionDefault::Uint(0),
        validator: Validator::Any,
    },
    OptionSpec {
        name: "max_width",
        default: OptionDefault::Uint(0),
        validator: Validator::Any,
    },
    OptionSpec {
        name: "max_height",
        default: OptionDefault::Uint(0),
        validator: Validator::Any,
    },
    OptionSpec {
        name: "gravity",
        default: OptionDefault::Str("center"),
        validator: Validator::Gravity,
    },
    OptionSpec {
        name: "background_color",
        default: OptionDefault::Str(DEFAULT_BACKGROUND),
        validator: Validator::Any,
    },
    OptionSpec {
        name: "adaptive",
        default: OptionDefault::Bool(false),
        validator: Validator::Any,
    },
    OptionSpec {
        name: "size",
        default: OptionDefault::Str(""),
        validator: Validator::Any,
    },
];

/// Resize an image to given dimensions.
#[derive(Debug)]
pub struct ResizeEffect {
    config: EffectConfig,
}

impl ResizeEffect {
    pub fn new() -> Self {
        Self {
            config: EffectConfig::new(SCHEMA),
        }
    }

    pub fn mode(&self) -> ResizeMode {
        // The schema restricts `mode` to NAMES, so parse cannot fail.
        ResizeMode::parse(&self.config.string("mode")).unwrap_or(ResizeMode::Auto)
    }

    pub fn width(&self) -> u32 {
        self.config.uint("width")
    }

    pub fn height(&self) -> u32 {
        self.config.uint("height")
    }

    pub fn min_width(&self) -> u32 {
        self.config.uint("min_width")
    }

    pub fn min_height(&self) -> u32 {
        self.config.uint("min_height")
    }

    pub fn max_width(&self) -> u32 {
        self.config.uint("max_width")
    }

    pub fn max_height(&self) -> u32 {
        self.config.uint("max_height")
    }

    pub fn gravity(&self) -> String {
        self.config.string("gravity")
    }

    pub fn background_color(&self) -> String {
        self.config.string("background_color")
    }

    pub fn adaptive(&self) -> bool {
        self.config.bool("adaptive")
    }

    /// Opaque scale shortcut; non-empty bypasses mode resolution entirely.
    pub fn size(&self) -> String {
        self.config.string("size")
    }

    /// Infer the effective mode when configured as `auto`.
    ///
    /// Precedence: both dimensions, width alone, height alone, any non-zero
    /// constraint, nothing.
    fn auto_mode(&self) -> ResizeMode {
        let width = self.width();
        let height = self.height();

        if width > 0 && height > 0 {
            ResizeMode::Exact
        } else if width > 0 {
            ResizeMode::Width
        } else if height > 0 {
            ResizeMode::Height
        } else if self.min_width() > 0
            || self.min_height() > 0
            || self.max_width() > 0
            || self.max_height() > 0
        {
            ResizeMode::Constraints
        } else {
            ResizeMode::None
        }
    }

    /// Resolve the configured intent against the current geometry.
    ///
    /// `Ok(None)` is the no-op resolution: the image already satisfies the
    /// target and the sink must not be invoked.
    pub fn resolve(
        &self,
        geometry: &dyn GeometrySource,
    ) -> Result<Option<ResizeTarget>, EffectError> {
        let size = self.size();
        if !size.is_empty() {
            return Ok(Some(ResizeTarget::Scale(size)));
        }

        let mode = match self.mode() {
            ResizeMode::Auto => self.auto_mode(),
            explicit => explicit,
        };

        let img_w = geometry.width();
        let img_h = geometry.height();

        match mode {
            // Auto never survives mode determination; fold it into none.
            ResizeMode::None | ResizeMode::Auto => Ok(None),

            ResizeMode::Exact => {
                let (width, height) = (self.width(), self.height());
                if width == 0 || height == 0 {
                    return Err(EffectError::InvalidResizeParameters(ResizeMode::Exact));
                }
                if img_w == width && img_h == height {
                    return Ok(None);
                }
                Ok(Some(ResizeTarget::Dimensions {
                    width,
                    height,
                    preserve_aspect: false,
                }))
            }

            ResizeMode::Width => {
                let width = self.width();
                if width == 0 {
                    return Err(EffectError::InvalidResizeParameters(ResizeMode::Width));
                }
                if img_w == width {
                    return Ok(None);
                }
                Ok(Some(ResizeTarget::Dimensions {
                    width,
                    height: 0,
                    preserve_aspect: false,
                }))
            }

            ResizeMode::Height => {
                let height = self.height();
                if height == 0 {
                    return Err(EffectError::InvalidResizeParameters(ResizeMode::Height));
                }
                if img_h == height {
                    return Ok(None);
                }
                Ok(Some(ResizeTarget::Dimensions {
                    width: 0,
                    height,
                    preserve_aspect: false,
                }))
            }

            ResizeMode::BestFit => {
                let (width, height) = (self.width(), self.height());
                if width == 0 || height == 0 {
                    return Err(EffectError::InvalidResizeParameters(ResizeMode::BestFit));
                }
                if img_w == width && img_h == height {
                    return Ok(None);
                }
                Ok(Some(ResizeTarget::Dimensions {
                    width,
                    height,
                    preserve_aspect: true,
                }))
            }

            ResizeMode::Constraints => {
                let (min_w, min_h) = (self.min_width(), self.min_height());
                let (max_w, max_h) = (self.max_width(), self.max_height());

                if min_w == 0 && min_h == 0 && max_w == 0 && max_h == 0 {
                    return Err(EffectError::InvalidResizeParameters(ResizeMode::Constraints));
                }

                // Min violations win over max violations; at most one branch
                // fires per call.
                if (min_w > 0 && min_w > img_w) || (min_h > 0 && min_h > img_h) {
                    // Scale up, keeping ratio.
                    return Ok(Some(ResizeTarget::Dimensions {
                        width: min_w,
                        height: min_h,
                        preserve_aspect: true,
                    }));
                }
                if (max_w > 0 && max_w < img_w) || (max_h > 0 && max_h < img_h) {
                    // Scale down, keeping ratio.
                    return Ok(Some(ResizeTarget::Dimensions {
                        width: max_w,
                        height: max_h,
                        preserve_aspect: true,
                    }));
                }
                Ok(None)
            }

            ResizeMode::Crop | ResizeMode::Fill => Err(EffectError::NotImplemented(mode)),
        }
    }

    fn command(&self, target: ResizeTarget) -> ResizeCommand {
        ResizeCommand {
            target,
            gravity: self.gravity(),
            background_color: self.background_color(),
            adaptive: self.adaptive(),
        }
    }
}

impl Default for ResizeEffect {
    fn default() -> Self {
        Self::new()
    }
}

impl Effect for ResizeEffect {
    fn name(&self) -> &'static str {
        "resize"
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

        let Some(target) = self.resolve(&*image)? else {
            tracing::debug!("resize resolved as a no-op");
            return Ok(());
        };

        let command = self.command(target);
        tracing::debug!(resolved = ?command.target, "applying resize");
        image.apply(&EffectOp::Resize(command))?;
        Ok(())
    }
}

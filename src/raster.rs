//! Pure Rust raster backend — an [`ImageHandle`] over the `image` crate.
//!
//! Everything is statically linked into the binary; no ImageMagick, no
//! system dependencies.
//!
//! ## Crate mapping
//!
//! | Operation | Crate / function |
//! |---|---|
//! | Decode (JPEG, PNG, TIFF, WebP) | `image` crate (pure Rust decoders) |
//! | Resize | `image::imageops` with `Lanczos3` filter |
//! | Mirror | `DynamicImage::fliph` / `flipv` |
//! | Rotate | `rotate90` / `rotate180` / `rotate270` |
//! | Threshold | luma cut over `to_luma8` |
//! | Mask | grayscale mask composited into the alpha channel |
//!
//! ## Limitations
//!
//! Rotation is limited to multiples of 90 degrees; arbitrary angles (which
//! ImageMagick handles by compositing onto a background canvas) fail with
//! [`BackendError::ProcessingFailed`]. The `background_color`, `gravity` and
//! `adaptive` pass-through options of a resize are accepted and ignored —
//! they only matter to backends implementing crop/fill style operations.

use crate::backend::{BackendError, EffectSink, GeometrySource};
use crate::ops::{Axis, EffectOp, ResizeCommand, ResizeTarget};
use image::imageops::FilterType;
use image::{DynamicImage, GrayImage, ImageReader, Luma};
use std::io::Cursor;
use std::path::Path;

/// In-memory image backed by the `image` crate.
pub struct RasterImage {
    img: DynamicImage,
}

impl RasterImage {
    pub fn new(img: DynamicImage) -> Self {
        Self { img }
    }

    /// Load and decode an image from disk.
    pub fn open(path: &Path) -> Result<Self, BackendError> {
        let img = ImageReader::open(path)
            .map_err(BackendError::Io)?
            .decode()
            .map_err(|e| {
                BackendError::ProcessingFailed(format!(
                    "Failed to decode {}: {}",
                    path.display(),
                    e
                ))
            })?;
        Ok(Self::new(img))
    }

    /// Decode an image from an in-memory buffer, guessing the format.
    pub fn from_bytes(data: &[u8]) -> Result<Self, BackendError> {
        let img = ImageReader::new(Cursor::new(data))
            .with_guessed_format()
            .map_err(BackendError::Io)?
            .decode()
            .map_err(|e| BackendError::ProcessingFailed(format!("Failed to decode image: {e}")))?;
        Ok(Self::new(img))
    }

    /// Encode to disk; format is chosen from the file extension.
    pub fn save(&self, path: &Path) -> Result<(), BackendError> {
        self.img.save(path).map_err(|e| {
            BackendError::ProcessingFailed(format!("Failed to save {}: {}", path.display(), e))
        })
    }

    pub fn image(&self) -> &DynamicImage {
        &self.img
    }

    pub fn into_inner(self) -> DynamicImage {
        self.img
    }

    /// Fill in a zero axis from the current aspect ratio.
    fn fill_axes(&self, width: u32, height: u32) -> Result<(u32, u32), BackendError> {
        if width == 0 && height == 0 {
            return Err(BackendError::ProcessingFailed(
                "resize target has no dimensions".to_string(),
            ));
        }
        let ratio = self.ratio();
        if width == 0 {
            let derived = (f64::from(height) * ratio).round().max(1.0) as u32;
            Ok((derived, height))
        } else if height == 0 {
            let derived = (f64::from(width) / ratio).round().max(1.0) as u32;
            Ok((width, derived))
        } else {
            Ok((width, height))
        }
    }

    fn resize(&mut self, command: &ResizeCommand) -> Result<(), BackendError> {
        match &command.target {
            ResizeTarget::Scale(expr) => {
                let factor = parse_scale(expr)?;
                let width = (f64::from(self.img.width()) * factor).round().max(1.0) as u32;
                let height = (f64::from(self.img.height()) * factor).round().max(1.0) as u32;
                self.img = self.img.resize_exact(width, height, FilterType::Lanczos3);
            }
            ResizeTarget::Dimensions {
                width,
                height,
                preserve_aspect,
            } => {
                let (width, height) = self.fill_axes(*width, *height)?;
                self.img = if *preserve_aspect {
                    self.img.resize(width, height, FilterType::Lanczos3)
                } else {
                    self.img.resize_exact(width, height, FilterType::Lanczos3)
                };
            }
        }
        Ok(())
    }

    fn rotate(&mut self, angle: f64) -> Result<(), BackendError> {
        let rounded = angle.round();
        if (angle - rounded).abs() > f64::EPSILON || rounded as i64 % 90 != 0 {
            return Err(BackendError::ProcessingFailed(format!(
                "unsupported rotation angle {angle}: this backend rotates in 90 degree steps"
            )));
        }
        match (rounded as i64 % 360 + 360) % 360 {
            90 => self.img = self.img.rotate90(),
            180 => self.img = self.img.rotate180(),
            270 => self.img = self.img.rotate270(),
            _ => {}
        }
        Ok(())
    }

    fn threshold(&mut self, value: f64) {
        let cut = (value * 255.0).round() as u8;
        let gray = self.img.to_luma8();
        let (width, height) = gray.dimensions();
        let mut out = GrayImage::new(width, height);
        for (x, y, pixel) in gray.enumerate_pixels() {
            let v = if pixel.0[0] >= cut { 255 } else { 0 };
            out.put_pixel(x, y, Luma([v]));
        }
        self.img = DynamicImage::ImageLuma8(out);
    }

    /// Composite a grayscale mask into the alpha channel: white keeps the
    /// pixel, black removes it, `opacity` attenuates the mask's influence.
    fn mask(
        &mut self,
        mask: &Path,
        opacity: f64,
        gravity: &str,
        x: i64,
        y: i64,
    ) -> Result<(), BackendError> {
        let mask_img = ImageReader::open(mask)
            .map_err(BackendError::Io)?
            .decode()
            .map_err(|e| {
                BackendError::ProcessingFailed(format!(
                    "Failed to decode mask {}: {}",
                    mask.display(),
                    e
                ))
            })?
            .to_luma8();

        let mut base = self.img.to_rgba8();
        let (base_w, base_h) = base.dimensions();
        let (anchor_x, anchor_y) = anchor_offset(gravity, (base_w, base_h), mask_img.dimensions());
        let (off_x, off_y) = (anchor_x + x, anchor_y + y);

        for (mx, my, pixel) in mask_img.enumerate_pixels() {
            let px = off_x + i64::from(mx);
            let py = off_y + i64::from(my);
            if px < 0 || py < 0 || px >= i64::from(base_w) || py >= i64::from(base_h) {
                continue;
            }
            let coverage = f64::from(pixel.0[0]) / 255.0;
            let factor = 1.0 - opacity * (1.0 - coverage);
            let target = base.get_pixel_mut(px as u32, py as u32);
            target.0[3] = (f64::from(target.0[3]) * factor).round() as u8;
        }
        self.img = DynamicImage::ImageRgba8(base);
        Ok(())
    }
}

impl GeometrySource for RasterImage {
    fn width(&self) -> u32 {
        self.img.width()
    }

    fn height(&self) -> u32 {
        self.img.height()
    }
}

impl EffectSink for RasterImage {
    fn apply(&mut self, op: &EffectOp) -> Result<(), BackendError> {
        match op {
            EffectOp::Resize(command) => self.resize(command),
            EffectOp::Rotate { angle, .. } => self.rotate(*angle),
            EffectOp::Mirror { axis } => {
                self.img = match axis {
                    Axis::X => self.img.flipv(),
                    Axis::Y => self.img.fliph(),
                };
                Ok(())
            }
            EffectOp::Threshold { value } => {
                self.threshold(*value);
                Ok(())
            }
            EffectOp::Mask {
                mask,
                opacity,
                gravity,
                x,
                y,
            } => self.mask(mask, *opacity, gravity, *x, *y),
        }
    }
}

/// Parse a scale expression: `"50%"` or a bare factor like `"1.5"`.
fn parse_scale(expr: &str) -> Result<f64, BackendError> {
    let trimmed = expr.trim();
    let factor = if let Some(percent) = trimmed.strip_suffix('%') {
        percent.trim().parse::<f64>().map(|v| v / 100.0)
    } else {
        trimmed.parse::<f64>()
    };
    match factor {
        Ok(f) if f.is_finite() && f > 0.0 => Ok(f),
        _ => Err(BackendError::ProcessingFailed(format!(
            "unsupported scale expression `{expr}`"
        ))),
    }
}

/// Top-left placement of an overlay inside a base image for a gravity token.
fn anchor_offset(gravity: &str, base: (u32, u32), overlay: (u32, u32)) -> (i64, i64) {
    let right = i64::from(base.0) - i64::from(overlay.0);
    let bottom = i64::from(base.1) - i64::from(overlay.1);
    let center_x = right / 2;
    let center_y = bottom / 2;
    match gravity {
        "center" => (center_x, center_y),
        "n" => (center_x, 0),
        "ne" => (right, 0),
        "e" => (right, center_y),
        "se" => (right, bottom),
        "s" => (center_x, bottom),
        "sw" => (0, bottom),
        "w" => (0, center_y),
        _ => (0, 0), // nw and anything unrecognized
    }
}

//! End-to-end tests: declarative pipelines executed against the raster
//! backend.

use darkroom::{
    Effect, EffectError, GeometrySource, Pipeline, RasterImage, ResizeEffect, ResizeMode,
};
use image::{DynamicImage, GrayImage, Luma, Rgba, RgbaImage};
use serde_json::json;

fn gradient_image(width: u32, height: u32) -> RasterImage {
    let buffer = RgbaImage::from_fn(width, height, |x, _| {
        let v = (x * 255 / width.max(1)) as u8;
        Rgba([v, v, v, 255])
    });
    RasterImage::new(DynamicImage::ImageRgba8(buffer))
}

#[test]
fn constraint_resize_then_mirror_and_threshold() {
    let mut image = gradient_image(1200, 900);

    let mut pipeline = Pipeline::from_value(&json!([
        { "type": "resize", "mode": "constraints", "max_width": 800 },
        { "type": "mirror", "axis": "y" },
        { "type": "threshold", "threshold": 0.5 },
    ]))
    .unwrap();
    pipeline.run(&mut image).unwrap();

    assert_eq!((image.width(), image.height()), (800, 600));

    // After the horizontal flop the dark edge of the gradient is on the
    // right; thresholding turns it pure black.
    let gray = image.image().to_luma8();
    assert_eq!(gray.get_pixel(799, 0).0, [0]);
    assert_eq!(gray.get_pixel(0, 0).0, [255]);
}

#[test]
fn exact_resize_against_matching_geometry_leaves_pixels_alone() {
    let mut image = gradient_image(320, 240);
    let before = image.image().to_rgba8();

    let mut effect = ResizeEffect::new();
    let data = json!({ "mode": "exact", "width": 320, "height": 240 });
    effect
        .process(&mut image, Some(data.as_object().unwrap()))
        .unwrap();

    assert_eq!(image.image().to_rgba8(), before);
}

#[test]
fn width_resize_lets_backend_derive_height() {
    let mut image = gradient_image(150, 100);

    let mut pipeline = Pipeline::from_value(&json!([
        { "type": "resize", "mode": "width", "width": 300 },
    ]))
    .unwrap();
    pipeline.run(&mut image).unwrap();

    assert_eq!((image.width(), image.height()), (300, 200));
}

#[test]
fn scale_shortcut_reaches_the_backend() {
    let mut image = gradient_image(400, 200);

    let mut pipeline = Pipeline::from_value(&json!([
        { "type": "resize", "size": "25%" },
    ]))
    .unwrap();
    pipeline.run(&mut image).unwrap();

    assert_eq!((image.width(), image.height()), (100, 50));
}

#[test]
fn crop_mode_fails_without_touching_the_image() {
    let mut image = gradient_image(400, 200);

    let mut pipeline = Pipeline::from_value(&json!([
        { "type": "resize", "mode": "crop", "width": 100, "height": 100 },
    ]))
    .unwrap();
    let err = pipeline.run(&mut image).unwrap_err();

    assert!(matches!(err, EffectError::NotImplemented(ResizeMode::Crop)));
    assert_eq!((image.width(), image.height()), (400, 200));
}

#[test]
fn mask_effect_reads_the_mask_from_disk() {
    let dir = tempfile::tempdir().unwrap();
    let mask_path = dir.path().join("vignette.png");
    GrayImage::from_pixel(4, 4, Luma([0]))
        .save(&mask_path)
        .unwrap();

    let mut image = gradient_image(4, 4);
    let mut pipeline = Pipeline::from_value(&json!([
        { "type": "mask", "mask": mask_path.to_str().unwrap(), "gravity": "center" },
    ]))
    .unwrap();
    pipeline.run(&mut image).unwrap();

    let rgba = image.image().to_rgba8();
    assert!(rgba.pixels().all(|p| p.0[3] == 0));
}

#[test]
fn invalid_pipeline_parameter_aborts_before_any_pixel_work() {
    let mut image = gradient_image(100, 100);
    let before = image.image().to_rgba8();

    let mut pipeline = Pipeline::from_value(&json!([
        { "type": "resize", "width": -1 },
    ]))
    .unwrap();
    let err = pipeline.run(&mut image).unwrap_err();

    assert!(matches!(err, EffectError::InvalidParameter { option, .. } if option == "width"));
    assert_eq!(image.image().to_rgba8(), before);
}

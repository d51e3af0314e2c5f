use image::{imageops::crop_imm, DynamicImage, ImageOutputFormat, Rgb, RgbImage};
use imageproc::drawing;
use panostitch::{Error, StitchError, Stitcher};
use rand::{Rng, SeedableRng};
use rand_xoshiro::Xoshiro256PlusPlus;
use std::io::Cursor;

/// Tests share one process, so only the first call installs the logger.
fn init_logging() {
    let _ = pretty_env_logger::try_init_timed();
}

/// A deterministic scatter of colored blobs, busy enough for the detector
/// to find features on.
fn textured_image(width: u32, height: u32, seed: u64) -> RgbImage {
    let mut rng = Xoshiro256PlusPlus::seed_from_u64(seed);
    let mut image = RgbImage::from_pixel(width, height, Rgb([32, 32, 32]));
    for _ in 0..120 {
        let center = (
            rng.gen_range(0..width) as i32,
            rng.gen_range(0..height) as i32,
        );
        let radius = rng.gen_range(2..12);
        let color = Rgb([rng.gen(), rng.gen(), rng.gen()]);
        drawing::draw_filled_circle_mut(&mut image, center, radius, color);
    }
    image
}

#[test]
fn featureless_disjoint_images_fail_with_insufficient_matches() {
    init_logging();
    let red = RgbImage::from_pixel(64, 64, Rgb([255, 0, 0]));
    let blue = RgbImage::from_pixel(64, 64, Rgb([0, 0, 255]));
    let err = Stitcher::default().stitch_pair(&red, &blue).unwrap_err();
    assert!(matches!(err, StitchError::InsufficientMatches { .. }));
}

#[test]
fn self_stitch_never_panics_and_never_shrinks() {
    init_logging();
    let image = textured_image(320, 240, 1);
    match Stitcher::default().stitch_pair(&image, &image) {
        // The canvas must be at least as large as the input in both axes.
        Ok(canvas) => {
            assert!(canvas.width() >= 320);
            assert!(canvas.height() >= 240);
        }
        // Failing gracefully on a degenerate pair is acceptable too.
        Err(_) => {}
    }
}

#[test]
fn repeated_runs_produce_identical_results() {
    init_logging();
    let base = textured_image(400, 300, 3);
    let left = crop_imm(&base, 0, 0, 300, 300).to_image();
    let right = crop_imm(&base, 80, 0, 300, 300).to_image();
    let images = vec![left, right];

    let stitcher = Stitcher::default();
    let first = stitcher.stitch_all(&images);
    let second = stitcher.stitch_all(&images);
    match (first, second) {
        (Ok(a), Ok(b)) => {
            assert_eq!(a.dimensions(), b.dimensions());
            assert_eq!(a.as_raw(), b.as_raw());
        }
        (Err(a), Err(b)) => assert_eq!(a.to_string(), b.to_string()),
        (first, second) => panic!(
            "runs diverged: {:?} vs {:?}",
            first.map(|i| i.dimensions()),
            second.map(|i| i.dimensions())
        ),
    }
}

#[test]
fn empty_input_is_rejected_and_a_single_image_passes_through() {
    init_logging();
    let stitcher = Stitcher::default();
    assert!(matches!(stitcher.stitch_all(&[]), Err(StitchError::NoImages)));

    let image = textured_image(64, 48, 9);
    let out = stitcher.stitch_all(std::slice::from_ref(&image)).unwrap();
    assert_eq!(out.as_raw(), image.as_raw());
}

#[test]
fn malformed_bytes_yield_a_decode_error() {
    let err = panostitch::decode(b"definitely not an image").unwrap_err();
    assert!(matches!(err, Error::Decode(_)));
}

#[test]
fn valid_png_bytes_decode_to_rgb() {
    let image = textured_image(32, 24, 5);
    let mut bytes = Vec::new();
    DynamicImage::ImageRgb8(image.clone())
        .write_to(&mut Cursor::new(&mut bytes), ImageOutputFormat::Png)
        .unwrap();
    let decoded = panostitch::decode(&bytes).unwrap();
    assert_eq!(decoded.dimensions(), (32, 24));
    assert_eq!(decoded.as_raw(), image.as_raw());
}

use image::{
    imageops::{self, FilterType},
    RgbImage,
};

/// Default letterbox target width, a 16:9 frame.
pub const TARGET_WIDTH: u32 = 1280;
/// Default letterbox target height, a 16:9 frame.
pub const TARGET_HEIGHT: u32 = 720;

/// Letterboxes `image` into a canvas of exactly the target size.
///
/// The image is scaled to fit within the target box preserving its aspect
/// ratio and centered on a black canvas, leaving bars on the top/bottom or
/// left/right as needed. Useful as an optional post-processing step for a
/// finished panorama; the stitching pipeline itself never calls this.
pub fn standardize(image: &RgbImage, target_width: u32, target_height: u32) -> RgbImage {
    let (width, height) = image.dimensions();
    let scale = f64::min(
        target_width as f64 / width as f64,
        target_height as f64 / height as f64,
    );
    let new_width = (width as f64 * scale) as u32;
    let new_height = (height as f64 * scale) as u32;
    let resized = imageops::resize(image, new_width, new_height, FilterType::Triangle);
    let mut canvas = RgbImage::new(target_width, target_height);
    let x_offset = i64::from((target_width - new_width) / 2);
    let y_offset = i64::from((target_height - new_height) / 2);
    imageops::replace(&mut canvas, &resized, x_offset, y_offset);
    canvas
}

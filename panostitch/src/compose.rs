use crate::error::StitchError;
use crate::homography::HomographyMatrix;
use image::{imageops, Rgb, RgbImage};
use imageproc::geometric_transformations::{warp_into, Interpolation, Projection};
use log::*;

/// Warps the train image through `homography` and pastes the query image
/// over it at the canvas origin.
///
/// The canvas follows the right-growing layout: as wide as both inputs
/// together and as tall as the taller one. No seam blending is performed;
/// wherever the warped train image and the query image overlap, the query
/// pixels win outright.
pub fn composite(
    train: &RgbImage,
    query: &RgbImage,
    homography: &HomographyMatrix,
) -> Result<RgbImage, StitchError> {
    let width = train.width() + query.width();
    let height = train.height().max(query.height());
    let projection =
        projection_from(homography).ok_or(StitchError::DegenerateHomography)?;
    trace!("compositing onto a {}x{} canvas", width, height);
    let mut canvas = RgbImage::new(width, height);
    warp_into(
        train,
        &projection,
        Interpolation::Bilinear,
        Rgb([0, 0, 0]),
        &mut canvas,
    );
    imageops::replace(&mut canvas, query, 0, 0);
    Ok(canvas)
}

/// Converts the homography into an invertible `imageproc` projection.
fn projection_from(homography: &HomographyMatrix) -> Option<Projection> {
    let h = homography.0;
    Projection::from_matrix([
        h[(0, 0)] as f32,
        h[(0, 1)] as f32,
        h[(0, 2)] as f32,
        h[(1, 0)] as f32,
        h[(1, 1)] as f32,
        h[(1, 2)] as f32,
        h[(2, 0)] as f32,
        h[(2, 1)] as f32,
        h[(2, 2)] as f32,
    ])
}

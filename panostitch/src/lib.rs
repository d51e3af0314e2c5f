//! Feature-based panorama stitching.
//!
//! The pipeline folds a sequence of photographs into one panorama. Each
//! step extracts AKAZE keypoints from the accumulated panorama (the "train"
//! image) and the next photograph (the "query" image), matches their
//! descriptors with a mutual-nearest-neighbor cross check, robustly
//! estimates the train-to-query homography with ARRSAC over a four-point
//! normalized DLT estimator, warps the panorama through it onto a
//! right-growing canvas, and pastes the query image over the result.
//!
//! The fold is strict: the first pair that cannot be related aborts the
//! whole run, and partial panoramas are discarded rather than returned.
//!
//! ```no_run
//! use panostitch::Stitcher;
//!
//! let images = ["left.jpg", "middle.jpg", "right.jpg"]
//!     .iter()
//!     .map(|path| image::open(path).map(|image| image.to_rgb8()))
//!     .collect::<Result<Vec<_>, _>>()
//!     .unwrap();
//! let panorama = Stitcher::default().stitch_all(&images).unwrap();
//! panorama.save("stitched_image.jpg").unwrap();
//! ```

mod compose;
mod error;
mod feature;
mod homography;
mod matching;
mod standardize;

pub use compose::composite;
pub use error::{Error, StitchError};
pub use feature::{Descriptor, Detector};
pub use homography::{estimate_homography, FourPoint, HomographyMatrix, PixelMatch};
pub use matching::{cross_check_matches, DescriptorMatch};
pub use standardize::{standardize, TARGET_HEIGHT, TARGET_WIDTH};

use image::RgbImage;
use log::*;
use nalgebra::Point2;

/// Minimum number of cross-checked matches required before homography
/// estimation is attempted for a pair.
pub const MIN_MATCHES: usize = 5;

/// The stitching context: detector selection, consensus threshold and RNG
/// seed, resolved once and passed explicitly to every stitch.
#[derive(Debug, Clone, Copy)]
pub struct Stitcher {
    /// The feature extractor to run on both images of every pair.
    pub detector: Detector,
    /// Reprojection error in pixels below which a match counts as a
    /// homography inlier.
    pub reproj_threshold: f64,
    /// Seed for the consensus RNG. It is applied afresh for every pair, so
    /// running the same images twice produces byte-identical panoramas.
    pub seed: u64,
}

impl Default for Stitcher {
    fn default() -> Self {
        Self {
            detector: Detector::default(),
            reproj_threshold: 4.0,
            seed: 0,
        }
    }
}

impl Stitcher {
    pub fn new(detector: Detector) -> Self {
        Self {
            detector,
            ..Default::default()
        }
    }

    /// Stitches the next photograph onto the accumulated panorama.
    ///
    /// Returns the composited canvas, or a [`StitchError`] when the pair
    /// cannot be related. The inputs are left untouched either way.
    pub fn stitch_pair(&self, train: &RgbImage, query: &RgbImage) -> Result<RgbImage, StitchError> {
        let (train_keypoints, train_descriptors) = self.detector.extract(train);
        let (query_keypoints, query_descriptors) = self.detector.extract(query);

        let matches = cross_check_matches(&train_descriptors, &query_descriptors);
        info!(
            "{} cross-checked matches between {} train and {} query features",
            matches.len(),
            train_descriptors.len(),
            query_descriptors.len()
        );
        if matches.len() < MIN_MATCHES {
            return Err(StitchError::InsufficientMatches {
                found: matches.len(),
            });
        }

        let pixel_matches: Vec<PixelMatch> = matches
            .iter()
            .map(|m| {
                PixelMatch(
                    keypoint_position(&train_keypoints[m.train]),
                    keypoint_position(&query_keypoints[m.query]),
                )
            })
            .collect();
        let (homography, inliers) =
            estimate_homography(&pixel_matches, self.reproj_threshold, self.seed)
                .ok_or(StitchError::EstimationFailed)?;
        info!(
            "homography estimated with {} of {} matches as inliers",
            inliers.len(),
            pixel_matches.len()
        );

        composite(train, query, &homography)
    }

    /// Folds the images into a single panorama in their given order.
    ///
    /// The accumulator starts as the first image and is replaced after each
    /// successful stitch. The first failing pair aborts the fold; upstream
    /// partial results are discarded. A single image is returned unchanged.
    pub fn stitch_all(&self, images: &[RgbImage]) -> Result<RgbImage, StitchError> {
        let (first, rest) = images.split_first().ok_or(StitchError::NoImages)?;
        let mut panorama = first.clone();
        for (ix, image) in rest.iter().enumerate() {
            debug!("stitching image {} of {} onto the panorama", ix + 2, images.len());
            panorama = self.stitch_pair(&panorama, image)?;
        }
        Ok(panorama)
    }
}

/// Decodes raw image bytes into an 8-bit RGB raster.
///
/// Any undecodable input yields [`Error::Decode`] before feature detection
/// ever runs.
///
/// This crate depends on `image` without its format decoders, so the caller
/// must enable the `image` features for the formats it expects (for example
/// `png` and `jpeg`); without them every input is undecodable.
pub fn decode(bytes: &[u8]) -> Result<RgbImage, Error> {
    Ok(image::load_from_memory(bytes)?.to_rgb8())
}

fn keypoint_position(keypoint: &akaze::KeyPoint) -> Point2<f64> {
    Point2::new(f64::from(keypoint.point.0), f64::from(keypoint.point.1))
}

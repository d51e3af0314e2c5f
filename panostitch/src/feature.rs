use akaze::{Akaze, KeyPoint};
use bitarray::BitArray;
use image::{DynamicImage, RgbImage};
use log::*;

/// The binary descriptor attached to every extracted keypoint.
pub type Descriptor = BitArray<64>;

/// Feature extractor selection, resolved once at configuration time.
///
/// Extractors are chosen by enum variant rather than by a string tag so
/// an unknown detector cannot exist at runtime. AKAZE detects extrema
/// across a nonlinear multi-scale space and attaches a fixed-length
/// binary descriptor to each keypoint, so its matches are compared under
/// Hamming distance in [`crate::cross_check_matches`].
#[derive(Debug, Clone, Copy)]
pub enum Detector {
    Akaze(Akaze),
}

impl Detector {
    /// AKAZE with an explicit detector threshold.
    ///
    /// 0.01 will be very sparse and 0.0001 will be very dense.
    pub fn akaze(threshold: f64) -> Self {
        Self::Akaze(Akaze::new(threshold))
    }

    /// AKAZE tuned to detect few features.
    pub fn sparse() -> Self {
        Self::Akaze(Akaze::sparse())
    }

    /// AKAZE tuned to detect many features.
    pub fn dense() -> Self {
        Self::Akaze(Akaze::dense())
    }

    /// Extracts keypoints and descriptors from a color image.
    ///
    /// The extractor works on a grayscale intensity map internally; the
    /// color samples are only consulted again at compositing time.
    pub fn extract(&self, image: &RgbImage) -> (Vec<KeyPoint>, Vec<Descriptor>) {
        match *self {
            Detector::Akaze(akaze) => {
                let (keypoints, descriptors) =
                    akaze.extract(&DynamicImage::ImageRgb8(image.clone()));
                debug!(
                    "extracted {} features from a {}x{} image",
                    keypoints.len(),
                    image.width(),
                    image.height()
                );
                (keypoints, descriptors)
            }
        }
    }
}

impl Default for Detector {
    fn default() -> Self {
        Self::Akaze(Akaze::default())
    }
}

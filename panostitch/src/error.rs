use thiserror::Error;

/// Reasons a single pairwise stitch can fail.
///
/// There is deliberately no retry or fallback machinery here: every failure
/// aborts the whole fold and is surfaced to the caller as-is.
#[derive(Debug, Error)]
pub enum StitchError {
    /// Fewer than [`crate::MIN_MATCHES`] cross-checked matches survived, so
    /// no homography can be estimated for this pair.
    #[error("only {found} cross-checked matches between the pair, at least 5 are required")]
    InsufficientMatches { found: usize },
    /// The consensus process failed to produce any homography model.
    #[error("consensus failed to find a homography relating the pair")]
    EstimationFailed,
    /// The estimated homography cannot be inverted, so the accumulated
    /// panorama cannot be warped through it.
    #[error("estimated homography is degenerate and cannot be used for warping")]
    DegenerateHomography,
    /// The fold was handed an empty list of images.
    #[error("no input images to stitch")]
    NoImages,
}

/// Top-level error type covering everything that can go wrong between raw
/// bytes and a finished panorama.
#[derive(Debug, Error)]
pub enum Error {
    /// The input bytes could not be decoded into a raster image. Decoding
    /// happens before any feature detection, so a bad input halts the run
    /// up front.
    #[error("failed to decode image: {0}")]
    Decode(#[from] image::ImageError),
    #[error(transparent)]
    Stitch(#[from] StitchError),
}

use arrsac::Arrsac;
use log::*;
use nalgebra::{Dynamic, Matrix3, OMatrix, OVector, Point2, Vector2, Vector3, U9};
use rand::SeedableRng;
use rand_xoshiro::Xoshiro256PlusPlus;
use sample_consensus::{Consensus, Estimator, Model};

/// A pair of matched pixel locations, train image first, query image second.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct PixelMatch(pub Point2<f64>, pub Point2<f64>);

/// A 3x3 projective transform taking train-image pixel coordinates to
/// query-image pixel coordinates.
#[derive(Debug, Clone, Copy)]
pub struct HomographyMatrix(pub Matrix3<f64>);

impl HomographyMatrix {
    /// Projects a train-image point into the query image plane.
    ///
    /// Returns `None` when the point maps to infinity.
    pub fn transform(&self, point: Point2<f64>) -> Option<Point2<f64>> {
        let projected = self.0 * Vector3::new(point.x, point.y, 1.0);
        let w = projected.z;
        if !w.is_finite() || w.abs() < f64::EPSILON {
            return None;
        }
        Some(Point2::new(projected.x / w, projected.y / w))
    }
}

impl Model<PixelMatch> for HomographyMatrix {
    fn residual(&self, data: &PixelMatch) -> f64 {
        let PixelMatch(train, query) = *data;
        self.transform(train)
            .map(|projected| (projected - query).norm())
            .unwrap_or(f64::INFINITY)
    }
}

/// Estimates a homography from four or more point correspondences using the
/// normalized direct linear transform.
///
/// Each correspondence contributes two rows to a homogeneous linear system
/// whose null vector holds the nine entries of the homography. Both point
/// sets are first normalized with a similarity transform (centroid at the
/// origin, mean distance sqrt(2)) so the system is well conditioned, and the
/// normalization is undone on the resulting matrix.
#[derive(Copy, Clone, Debug)]
pub struct FourPoint {
    pub epsilon: f64,
    pub iterations: usize,
}

impl FourPoint {
    pub fn new() -> Self {
        Default::default()
    }

    pub fn from_matches<I>(&self, data: I) -> Option<HomographyMatrix>
    where
        I: Iterator<Item = PixelMatch> + Clone,
    {
        let matches: Vec<PixelMatch> = data.collect();
        if matches.len() < 4 {
            return None;
        }
        let (train_norm, train_points) =
            normalize(matches.iter().map(|&PixelMatch(train, _)| train))?;
        let (query_norm, query_points) =
            normalize(matches.iter().map(|&PixelMatch(_, query)| query))?;
        let constraints = encode_dlt_equations(&train_points, &query_points);
        let hth = constraints.transpose() * &constraints;
        let eigens = hth.try_symmetric_eigen(self.epsilon, self.iterations)?;
        let eigenvector = eigens
            .eigenvalues
            .iter()
            .enumerate()
            .min_by_key(|&(_, &n)| float_ord::FloatOrd(n))
            .map(|(ix, _)| eigens.eigenvectors.column(ix).into_owned())?;
        // The null vector lists the homography entries row by row, while
        // `from_iterator` fills column by column.
        let normalized_h = Matrix3::from_iterator(eigenvector.iter().copied()).transpose();
        let h = query_norm.try_inverse()? * normalized_h * train_norm;
        if h.iter().any(|v| !v.is_finite()) {
            return None;
        }
        Some(HomographyMatrix(h))
    }
}

impl Default for FourPoint {
    fn default() -> Self {
        Self {
            epsilon: 1e-12,
            iterations: 1000,
        }
    }
}

impl Estimator<PixelMatch> for FourPoint {
    type Model = HomographyMatrix;
    type ModelIter = Option<HomographyMatrix>;
    const MIN_SAMPLES: usize = 4;

    fn estimate<I>(&self, data: I) -> Self::ModelIter
    where
        I: Iterator<Item = PixelMatch> + Clone,
    {
        self.from_matches(data)
    }
}

/// Similarity transform moving the centroid to the origin and scaling the
/// mean distance from it to sqrt(2), plus the transformed points.
///
/// Fails when the points all coincide, since no scale can be chosen.
fn normalize(
    points: impl Iterator<Item = Point2<f64>> + Clone,
) -> Option<(Matrix3<f64>, Vec<Point2<f64>>)> {
    let count = points.clone().count();
    if count == 0 {
        return None;
    }
    let centroid: Vector2<f64> =
        points.clone().fold(Vector2::zeros(), |acc, p| acc + p.coords) / count as f64;
    let mean_distance = points
        .clone()
        .map(|p| (p.coords - centroid).norm())
        .sum::<f64>()
        / count as f64;
    if mean_distance < f64::EPSILON {
        return None;
    }
    let scale = std::f64::consts::SQRT_2 / mean_distance;
    let transform = Matrix3::new(
        scale,
        0.0,
        -scale * centroid.x,
        0.0,
        scale,
        -scale * centroid.y,
        0.0,
        0.0,
        1.0,
    );
    let transformed = points
        .map(|p| Point2::new(scale * (p.x - centroid.x), scale * (p.y - centroid.y)))
        .collect();
    Some((transform, transformed))
}

fn encode_dlt_equations(
    train: &[Point2<f64>],
    query: &[Point2<f64>],
) -> OMatrix<f64, Dynamic, U9> {
    let mut out = OMatrix::<f64, Dynamic, U9>::zeros(2 * train.len());
    for (i, (a, b)) in train.iter().zip(query).enumerate() {
        let (x, y) = (a.x, a.y);
        let (u, v) = (b.x, b.y);
        let row_u = OVector::<f64, U9>::from([x, y, 1.0, 0.0, 0.0, 0.0, -u * x, -u * y, -u]);
        let row_v = OVector::<f64, U9>::from([0.0, 0.0, 0.0, x, y, 1.0, -v * x, -v * y, -v]);
        out.row_mut(2 * i).copy_from(&row_u.transpose());
        out.row_mut(2 * i + 1).copy_from(&row_v.transpose());
    }
    out
}

/// Robustly estimates the train-to-query homography from pixel matches with
/// ARRSAC over the four-point estimator.
///
/// `reproj_threshold` is the reprojection error in pixels below which a
/// match counts as an inlier. The consensus RNG is seeded from `seed` on
/// every call so repeated runs over the same matches produce the same model.
///
/// Returns the best model and the indices of its inliers, or `None` when no
/// model fits the data.
pub fn estimate_homography(
    matches: &[PixelMatch],
    reproj_threshold: f64,
    seed: u64,
) -> Option<(HomographyMatrix, Vec<usize>)> {
    let mut arrsac = Arrsac::new(reproj_threshold, Xoshiro256PlusPlus::seed_from_u64(seed));
    let result = arrsac.model_inliers(&FourPoint::new(), matches.iter().copied());
    if let Some((_, inliers)) = &result {
        debug!(
            "consensus kept {} of {} matches as inliers",
            inliers.len(),
            matches.len()
        );
    }
    result
}

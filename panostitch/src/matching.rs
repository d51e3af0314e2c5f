use crate::feature::Descriptor;
use bitarray::Hamming;
use space::{Knn, LinearKnn, Neighbor};

/// A descriptor correspondence between the train (accumulated panorama)
/// and query (incoming image) keypoint sets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DescriptorMatch {
    /// Index into the train keypoint set.
    pub train: usize,
    /// Index into the query keypoint set.
    pub query: usize,
    /// Hamming distance between the two descriptors.
    pub distance: u32,
}

/// The best match in `to` for every descriptor in `from`.
fn nearest(from: &[Descriptor], to: &[Descriptor]) -> Vec<Option<Neighbor<u32>>> {
    let knn_to = LinearKnn {
        metric: Hamming,
        iter: to.iter(),
    };
    from.iter()
        .map(|descriptor| knn_to.knn(descriptor, 1).into_iter().next())
        .collect()
}

/// Performs mutual-nearest-neighbor matching between the two descriptor sets.
///
/// A correspondence is kept only when each descriptor is the other's nearest
/// neighbor. The cross check suppresses many-to-one ambiguous matches:
/// consider three features on a line `X---Y-Z`. The closest match to `X` is
/// `Y`, but the closest match to `Y` is `Z`, so `X` and `Y` do not match.
/// `Y` and `Z` match mutually and survive.
///
/// The surviving matches are returned sorted ascending by distance. No ratio
/// test or distance cutoff is applied; every cross-checked match passes
/// through to homography estimation, where the consensus process sorts
/// inliers from outliers.
pub fn cross_check_matches(train: &[Descriptor], query: &[Descriptor]) -> Vec<DescriptorMatch> {
    let forward = nearest(train, query);
    let reverse = nearest(query, train);
    let mut matches: Vec<DescriptorMatch> = forward
        .into_iter()
        .enumerate()
        .filter_map(|(train_ix, neighbor)| {
            neighbor
                .filter(|neighbor| {
                    reverse[neighbor.index].map(|reciprocal| reciprocal.index) == Some(train_ix)
                })
                .map(|neighbor| DescriptorMatch {
                    train: train_ix,
                    query: neighbor.index,
                    distance: neighbor.distance,
                })
        })
        .collect();
    // Ties are broken by index so repeated runs order identically.
    matches.sort_unstable_by_key(|m| (m.distance, m.train, m.query));
    matches
}

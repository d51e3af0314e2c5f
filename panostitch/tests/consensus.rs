use approx::assert_relative_eq;
use nalgebra::{Matrix3, Point2, Vector3};
use panostitch::{estimate_homography, PixelMatch};
use rand::{Rng, SeedableRng};
use rand_xoshiro::Xoshiro256PlusPlus;

const INLIERS: usize = 30;
const OUTLIERS: usize = 10;

fn project(h: &Matrix3<f64>, p: Point2<f64>) -> Point2<f64> {
    let v = h * Vector3::new(p.x, p.y, 1.0);
    Point2::new(v.x / v.z, v.y / v.z)
}

#[test]
fn arrsac_recovers_homography_under_outlier_contamination() {
    // A plausible train-to-query transform between two overlapping shots.
    let truth = Matrix3::new(
        0.98, -0.05, 210.0, //
        0.04, 1.02, -8.0, //
        2e-5, -1e-5, 1.0,
    );

    let mut rng = Xoshiro256PlusPlus::seed_from_u64(7);
    let mut matches = Vec::with_capacity(INLIERS + OUTLIERS);
    for _ in 0..INLIERS {
        let p = Point2::new(rng.gen_range(0.0..640.0), rng.gen_range(0.0..480.0));
        matches.push(PixelMatch(p, project(&truth, p)));
    }
    for _ in 0..OUTLIERS {
        // Random correspondences with no geometric relation.
        let a = Point2::new(rng.gen_range(0.0..640.0), rng.gen_range(0.0..480.0));
        let b = Point2::new(
            rng.gen_range(2000.0..3000.0),
            rng.gen_range(2000.0..3000.0),
        );
        matches.push(PixelMatch(a, b));
    }

    let (model, inliers) =
        estimate_homography(&matches, 4.0, 0).expect("consensus should find the planted model");

    // Every planted inlier is exact, so all of them must be recovered, and
    // none of the far-away outliers can sit within the 4 px threshold.
    assert!(inliers.len() >= INLIERS, "only {} inliers", inliers.len());
    assert!(inliers.iter().all(|&ix| ix < INLIERS));

    for &PixelMatch(train, query) in matches.iter().take(INLIERS) {
        let projected = model.transform(train).unwrap();
        assert_relative_eq!(projected.x, query.x, epsilon = 1e-3);
        assert_relative_eq!(projected.y, query.y, epsilon = 1e-3);
    }
}

#[test]
fn repeated_estimation_with_one_seed_is_deterministic() {
    let truth = Matrix3::new(
        1.0, 0.0, 55.0, //
        0.0, 1.0, 3.0, //
        0.0, 0.0, 1.0,
    );
    let mut rng = Xoshiro256PlusPlus::seed_from_u64(11);
    let matches: Vec<PixelMatch> = (0..20)
        .map(|_| {
            let p = Point2::new(rng.gen_range(0.0..320.0), rng.gen_range(0.0..240.0));
            PixelMatch(p, project(&truth, p))
        })
        .collect();

    let (model_a, inliers_a) = estimate_homography(&matches, 4.0, 42).unwrap();
    let (model_b, inliers_b) = estimate_homography(&matches, 4.0, 42).unwrap();
    assert_eq!(inliers_a, inliers_b);
    assert_eq!(model_a.0, model_b.0);
}

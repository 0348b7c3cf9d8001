//! Seeded two-cluster k-means over RGB colors.
//!
//! Initialisation is k-means++ driven by a `ChaCha8Rng`, so a given seed
//! always yields the same centers for the same input. Center 0 is the one
//! drawn first.

use log::{debug, warn};
use offside_core::Rgb;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct TwoMeansParams {
    /// Max Lloyd iterations.
    pub max_iters: usize,
    /// Stop once the summed squared center shift drops to this value.
    pub tolerance: f64,
    /// Seed for the k-means++ draw.
    pub seed: u64,
}

impl Default for TwoMeansParams {
    fn default() -> Self {
        Self {
            max_iters: 300,
            tolerance: 1e-4,
            seed: 0,
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TwoMeansResult {
    /// Centers in insertion order.
    pub centers: [Rgb; 2],
    /// Raw k-means label per input point.
    pub labels: Vec<usize>,
    pub iterations: usize,
    pub converged: bool,
}

/// Index of the nearer center; ties go to center 0.
#[inline]
pub fn nearest_center(centers: &[Rgb; 2], c: &Rgb) -> usize {
    if c.distance_sq(&centers[0]) <= c.distance_sq(&centers[1]) {
        0
    } else {
        1
    }
}

/// Cluster `points` into two groups. Returns `None` for an empty input.
pub fn two_means(points: &[Rgb], params: &TwoMeansParams) -> Option<TwoMeansResult> {
    if points.is_empty() {
        return None;
    }

    let mut rng = ChaCha8Rng::seed_from_u64(params.seed);
    let mut centers = init_plus_plus(points, &mut rng);
    let mut labels: Vec<usize> = points.iter().map(|p| nearest_center(&centers, p)).collect();

    let mut iterations = 0;
    let mut converged = false;
    while iterations < params.max_iters {
        iterations += 1;

        let next = update_centers(points, &labels, &centers);
        let shift = next[0].distance_sq(&centers[0]) + next[1].distance_sq(&centers[1]);
        centers = next;

        let relabeled: Vec<usize> = points.iter().map(|p| nearest_center(&centers, p)).collect();
        let stable = relabeled == labels;
        labels = relabeled;

        if stable || shift <= params.tolerance {
            converged = true;
            break;
        }
    }

    if !converged {
        warn!("two-means hit the iteration cap ({})", params.max_iters);
    }
    debug!(
        "two-means: {} points, {iterations} iterations, centers {:?} / {:?}",
        points.len(),
        centers[0].to_u8(),
        centers[1].to_u8()
    );

    Some(TwoMeansResult {
        centers,
        labels,
        iterations,
        converged,
    })
}

fn init_plus_plus(points: &[Rgb], rng: &mut ChaCha8Rng) -> [Rgb; 2] {
    let first = points[rng.gen_range(0..points.len())];

    let d2: Vec<f64> = points.iter().map(|p| p.distance_sq(&first)).collect();
    let total: f64 = d2.iter().sum();
    if total <= 0.0 {
        // every point coincides with the first center
        return [first, first];
    }

    let mut target = rng.gen::<f64>() * total;
    let mut second = points[points.len() - 1];
    for (p, w) in points.iter().zip(&d2) {
        if *w > 0.0 && target < *w {
            second = *p;
            break;
        }
        target -= w;
    }
    [first, second]
}

fn update_centers(points: &[Rgb], labels: &[usize], prev: &[Rgb; 2]) -> [Rgb; 2] {
    let mut sums = [[0.0f64; 3]; 2];
    let mut counts = [0usize; 2];
    for (p, &k) in points.iter().zip(labels) {
        sums[k][0] += p.r;
        sums[k][1] += p.g;
        sums[k][2] += p.b;
        counts[k] += 1;
    }

    let mut out = *prev;
    for k in 0..2 {
        if counts[k] > 0 {
            let n = counts[k] as f64;
            out[k] = Rgb::new(sums[k][0] / n, sums[k][1] / n, sums[k][2] / n);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn reds_and_blues() -> Vec<Rgb> {
        vec![
            Rgb::new(250.0, 10.0, 10.0),
            Rgb::new(20.0, 20.0, 240.0),
            Rgb::new(240.0, 0.0, 20.0),
            Rgb::new(10.0, 30.0, 250.0),
            Rgb::new(255.0, 20.0, 0.0),
        ]
    }

    #[test]
    fn separates_two_well_spread_groups() {
        let pts = reds_and_blues();
        let res = two_means(&pts, &TwoMeansParams::default()).unwrap();
        assert!(res.converged);

        let red = nearest_center(&res.centers, &Rgb::RED);
        let blue = nearest_center(&res.centers, &Rgb::BLUE);
        assert_ne!(red, blue);
        assert_eq!(res.labels, vec![red, blue, red, blue, red]);

        let c = res.centers[red];
        assert_relative_eq!(c.r, 745.0 / 3.0, epsilon = 1e-9);
        assert_relative_eq!(c.g, 10.0, epsilon = 1e-9);
        assert_relative_eq!(c.b, 10.0, epsilon = 1e-9);
    }

    #[test]
    fn same_seed_same_centers() {
        let pts = reds_and_blues();
        let params = TwoMeansParams {
            seed: 42,
            ..Default::default()
        };
        let a = two_means(&pts, &params).unwrap();
        let b = two_means(&pts, &params).unwrap();
        assert_eq!(a.centers, b.centers);
        assert_eq!(a.labels, b.labels);
    }

    #[test]
    fn identical_colors_give_identical_centers() {
        let c = Rgb::new(12.0, 34.0, 56.0);
        let pts = vec![c; 4];
        let res = two_means(&pts, &TwoMeansParams::default()).unwrap();
        assert_eq!(res.centers, [c, c]);
        assert!(res.labels.iter().all(|&l| l == 0));
    }

    #[test]
    fn empty_input_has_no_clusters() {
        assert!(two_means(&[], &TwoMeansParams::default()).is_none());
    }

    #[test]
    fn tie_goes_to_center_zero() {
        let centers = [Rgb::new(0.0, 0.0, 0.0), Rgb::new(2.0, 0.0, 0.0)];
        assert_eq!(nearest_center(&centers, &Rgb::new(1.0, 0.0, 0.0)), 0);
        assert_eq!(nearest_center(&centers, &Rgb::new(1.5, 0.0, 0.0)), 1);
    }
}

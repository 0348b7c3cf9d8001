use nalgebra::Point2;

#[inline]
fn cross(o: Point2<f64>, a: Point2<f64>, b: Point2<f64>) -> f64 {
    (a.x - o.x) * (b.y - o.y) - (a.y - o.y) * (b.x - o.x)
}

/// Convex hull of a point set (Andrew's monotone chain).
///
/// Returns the hull vertices in counter-clockwise order (for a y-up frame)
/// without repeating the first vertex. Collinear points on hull edges are
/// dropped. Fewer than three distinct points give back the distinct points.
/// Points with a NaN or infinite coordinate are ignored.
pub fn convex_hull(points: &[Point2<f64>]) -> Vec<Point2<f64>> {
    let mut pts: Vec<Point2<f64>> = points
        .iter()
        .copied()
        .filter(|p| p.x.is_finite() && p.y.is_finite())
        .collect();
    pts.sort_by(|a, b| a.x.total_cmp(&b.x).then(a.y.total_cmp(&b.y)));
    pts.dedup();

    if pts.len() < 3 {
        return pts;
    }

    let mut lower: Vec<Point2<f64>> = Vec::with_capacity(pts.len());
    for &p in &pts {
        while lower.len() >= 2 && cross(lower[lower.len() - 2], lower[lower.len() - 1], p) <= 0.0 {
            lower.pop();
        }
        lower.push(p);
    }

    let mut upper: Vec<Point2<f64>> = Vec::with_capacity(pts.len());
    for &p in pts.iter().rev() {
        while upper.len() >= 2 && cross(upper[upper.len() - 2], upper[upper.len() - 1], p) <= 0.0 {
            upper.pop();
        }
        upper.push(p);
    }

    lower.pop();
    upper.pop();
    lower.extend(upper);
    lower
}

/// Area of a simple polygon (shoelace formula). Vertex order may be either
/// orientation; the result is always non-negative.
pub fn polygon_area(vertices: &[Point2<f64>]) -> f64 {
    let n = vertices.len();
    if n < 3 {
        return 0.0;
    }
    let mut twice = 0.0;
    for i in 0..n {
        let j = (i + 1) % n;
        twice += vertices[i].x * vertices[j].y;
        twice -= vertices[j].x * vertices[i].y;
    }
    twice.abs() / 2.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use proptest::prelude::*;

    fn square(side: f64) -> Vec<Point2<f64>> {
        vec![
            Point2::new(0.0, 0.0),
            Point2::new(side, 0.0),
            Point2::new(side, side),
            Point2::new(0.0, side),
        ]
    }

    #[test]
    fn hull_drops_interior_and_collinear_points() {
        let mut pts = square(10.0);
        pts.push(Point2::new(5.0, 5.0));
        pts.push(Point2::new(5.0, 0.0));
        pts.push(Point2::new(0.0, 0.0));
        let hull = convex_hull(&pts);
        assert_eq!(hull.len(), 4);
        assert_abs_diff_eq!(polygon_area(&hull), 100.0, epsilon = 1e-12);
    }

    #[test]
    fn degenerate_inputs_have_zero_area() {
        assert_eq!(polygon_area(&convex_hull(&[])), 0.0);
        assert_eq!(polygon_area(&convex_hull(&[Point2::new(1.0, 1.0)])), 0.0);
        let line = [
            Point2::new(0.0, 0.0),
            Point2::new(1.0, 1.0),
            Point2::new(2.0, 2.0),
        ];
        assert_eq!(polygon_area(&convex_hull(&line)), 0.0);
    }

    #[test]
    fn triangle_area() {
        let tri = [
            Point2::new(0.0, 0.0),
            Point2::new(20.0, 0.0),
            Point2::new(0.0, 10.0),
        ];
        assert_abs_diff_eq!(polygon_area(&convex_hull(&tri)), 100.0, epsilon = 1e-12);
    }

    #[test]
    fn hull_contains_random_clouds() {
        use rand::{Rng, SeedableRng};
        let mut rng = rand_chacha::ChaCha8Rng::seed_from_u64(7);
        for _ in 0..50 {
            let n = rng.gen_range(3..40);
            let pts: Vec<Point2<f64>> = (0..n)
                .map(|_| Point2::new(rng.gen_range(0.0..1050.0), rng.gen_range(0.0..680.0)))
                .collect();
            let hull = convex_hull(&pts);
            assert!(hull.len() >= 3);
            for i in 0..hull.len() {
                let (a, b) = (hull[i], hull[(i + 1) % hull.len()]);
                for &p in &pts {
                    assert!(cross(a, b, p) >= -1e-6, "{p:?} outside edge {a:?}-{b:?}");
                }
            }
            assert!(polygon_area(&hull) <= 1050.0 * 680.0);
        }
    }

    #[test]
    fn non_finite_points_are_ignored() {
        let mut pts = Vec::new();
        for i in 0..64 {
            let x = if i % 5 == 4 { f64::NAN } else { (i % 8) as f64 * 10.0 };
            pts.push(Point2::new(x, (i / 8) as f64 * 10.0));
        }
        pts.push(Point2::new(f64::INFINITY, 0.0));
        pts.push(Point2::new(0.0, f64::NEG_INFINITY));

        let hull = convex_hull(&pts);
        assert!(hull.iter().all(|p| p.x.is_finite() && p.y.is_finite()));
        assert_abs_diff_eq!(polygon_area(&hull), 70.0 * 70.0, epsilon = 1e-9);
        assert!(convex_hull(&[Point2::new(f64::NAN, f64::NAN)]).is_empty());
    }

    proptest! {
        #[test]
        fn square_area_is_rotation_invariant(
            side in 0.1f64..500.0,
            shift in 0usize..4,
            reverse: bool,
        ) {
            let mut verts = square(side);
            verts.rotate_left(shift);
            if reverse {
                verts.reverse();
            }
            let area = polygon_area(&verts);
            prop_assert!((area - side * side).abs() <= 1e-9 * side * side);
        }
    }
}

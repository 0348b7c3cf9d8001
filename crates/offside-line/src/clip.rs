use nalgebra::Point2;
use offside_core::ImageSize;

/// Extend the line through `p1` and `p2` across the whole frame.
///
/// A near-vertical line (`|Δx| < 1e-6`) runs from the top row to the bottom
/// row at `round(x1)`. Any other line is cut at the left and right image
/// columns, with each endpoint's row rounded and clamped to
/// `[0, height - 1]`.
pub fn extend_line_to_image_borders(
    p1: Point2<f64>,
    p2: Point2<f64>,
    frame: ImageSize,
) -> [Point2<i64>; 2] {
    let w = frame.width as i64;
    let h = frame.height as i64;
    let bottom = (h - 1).max(0);

    let dx = p2.x - p1.x;
    if dx.abs() < 1e-6 {
        let x = p1.x.round() as i64;
        return [Point2::new(x, 0), Point2::new(x, bottom)];
    }

    let m = (p2.y - p1.y) / dx;
    let q = p1.y - m * p1.x;
    let right = (w - 1).max(0);

    let clamp_row = |y: f64| (y.round() as i64).clamp(0, bottom);
    let y_left = clamp_row(q);
    let y_right = clamp_row(m * right as f64 + q);

    [Point2::new(0, y_left), Point2::new(right, y_right)]
}

//! Per-team evidence signals, each in `[0, 1]` and indexed by team.

use nalgebra::Point2;
use offside_core::{convex_hull, polygon_area, BoundingBox};

pub fn box_centers(boxes: &[BoundingBox]) -> Vec<Point2<f64>> {
    boxes.iter().map(BoundingBox::center).collect()
}

/// Hull area normalized by the larger of the two; both 0 when neither team
/// spans an area.
pub fn area_signal(areas: [f64; 2]) -> [f64; 2] {
    let max = areas[0].max(areas[1]);
    if max <= 0.0 {
        return [0.0; 2];
    }
    [areas[0] / max, areas[1] / max]
}

/// Convex hull and its area for one team's player centers.
pub fn team_hull(centers: &[Point2<f64>]) -> (Vec<Point2<f64>>, f64) {
    let hull = convex_hull(centers);
    let area = polygon_area(&hull);
    (hull, area)
}

/// `1 - count / max(count0, count1)`; the team with fewer players scores higher.
pub fn count_signal(counts: [usize; 2]) -> [f64; 2] {
    let max = counts[0].max(counts[1]);
    if max == 0 {
        return [0.0; 2];
    }
    let max = max as f64;
    [1.0 - counts[0] as f64 / max, 1.0 - counts[1] as f64 / max]
}

/// Players of both teams sorted by distance to `target`.
///
/// The sort is stable over the Team0-then-Team1 input order, so ties rank
/// Team0 players first.
fn ranked_by_distance(teams: [&[Point2<f64>]; 2], target: Point2<f64>) -> Vec<(usize, f64)> {
    let mut ranked: Vec<(usize, f64)> = teams
        .iter()
        .enumerate()
        .flat_map(|(team, pts)| pts.iter().map(move |p| (team, (p - target).norm())))
        .collect();
    ranked.sort_by(|a, b| a.1.total_cmp(&b.1));
    ranked
}

/// Share of each team among the nearer half of all players to the
/// goalkeeper, inverted.
///
/// `None` when the nearer half is empty (fewer than two players).
pub fn goalkeeper_signal(teams: [&[Point2<f64>]; 2], goalkeeper: Point2<f64>) -> Option<[f64; 2]> {
    let ranked = ranked_by_distance(teams, goalkeeper);
    let half = ranked.len() / 2;
    if half == 0 {
        return None;
    }
    let mut near = [0usize; 2];
    for &(team, _) in &ranked[..half] {
        near[team] += 1;
    }
    let half = half as f64;
    Some([1.0 - near[0] as f64 / half, 1.0 - near[1] as f64 / half])
}

/// 1 for the team owning the player nearest to the ball, 0 for the other.
///
/// `None` when there are no players.
pub fn ball_signal(teams: [&[Point2<f64>]; 2], ball: Point2<f64>) -> Option<[f64; 2]> {
    let (team, _) = *ranked_by_distance(teams, ball).first()?;
    let mut out = [0.0; 2];
    out[team] = 1.0;
    Some(out)
}

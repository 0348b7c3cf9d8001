use crate::signals::{
    area_signal, ball_signal, box_centers, count_signal, goalkeeper_signal, team_hull,
};
use crate::weights::{SignalWeights, WeightTable};
use log::debug;
use nalgebra::Point2;
use offside_core::{Roster, TeamId};
use serde::{Deserialize, Serialize};

#[cfg(feature = "tracing")]
use tracing::instrument;

#[derive(Clone, Debug, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct AttackPredictorParams {
    pub weights: WeightTable,
}

/// Normalized evidence, indexed by [`TeamId::index`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AttackSignals {
    /// Raw hull areas in image pixels².
    pub hull_areas: [f64; 2],
    pub area: [f64; 2],
    pub players: [f64; 2],
    /// Present when a goalkeeper was detected and at least two players exist.
    pub goalkeeper: Option<[f64; 2]>,
    /// Present when a ball was detected and at least one player exists.
    pub ball: Option<[f64; 2]>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AttackPrediction {
    /// Attacking likelihood per team in percent; sums to 100.
    pub percent: [f64; 2],
    pub scores: [f64; 2],
    pub weights: SignalWeights,
    pub signals: AttackSignals,
    /// Convex hull of each team's player centers.
    pub hulls: [Vec<Point2<f64>>; 2],
}

impl AttackPrediction {
    pub fn percent(&self, team: TeamId) -> f64 {
        self.percent[team.index()]
    }

    /// `Team0` only when it scores strictly higher.
    pub fn attacking(&self) -> TeamId {
        if self.percent[0] > self.percent[1] {
            TeamId::Team0
        } else {
            TeamId::Team1
        }
    }

    pub fn defending(&self) -> TeamId {
        self.attacking().other()
    }
}

/// Weighted combination of shape, count, goalkeeper and ball evidence.
#[derive(Clone, Debug, Default)]
pub struct AttackPredictor {
    params: AttackPredictorParams,
}

impl AttackPredictor {
    pub fn new(params: AttackPredictorParams) -> Self {
        Self { params }
    }

    pub fn params(&self) -> &AttackPredictorParams {
        &self.params
    }

    /// Compute the four signals for a roster with `team_a = Team0`.
    pub fn signals(&self, roster: &Roster) -> (AttackSignals, [Vec<Point2<f64>>; 2]) {
        let centers = [box_centers(&roster.team_a), box_centers(&roster.team_b)];
        let (hull0, area0) = team_hull(&centers[0]);
        let (hull1, area1) = team_hull(&centers[1]);
        let hull_areas = [area0, area1];
        let teams = [centers[0].as_slice(), centers[1].as_slice()];

        let goalkeeper = roster
            .goalkeeper
            .and_then(|gk| goalkeeper_signal(teams, gk.center()));
        let ball = roster.ball.and_then(|b| ball_signal(teams, b.center()));

        let signals = AttackSignals {
            hull_areas,
            area: area_signal(hull_areas),
            players: count_signal([roster.team_a.len(), roster.team_b.len()]),
            goalkeeper,
            ball,
        };
        (signals, [hull0, hull1])
    }

    #[cfg_attr(
        feature = "tracing",
        instrument(
            level = "debug",
            skip_all,
            fields(team0 = roster.team_a.len(), team1 = roster.team_b.len())
        )
    )]
    pub fn predict(&self, roster: &Roster) -> AttackPrediction {
        let (signals, hulls) = self.signals(roster);
        let weights = self
            .params
            .weights
            .for_presence(signals.goalkeeper.is_some(), signals.ball.is_some());

        let gk = signals.goalkeeper.unwrap_or([0.0; 2]);
        let ball = signals.ball.unwrap_or([0.0; 2]);
        let score = |k: usize| {
            weights.ball * ball[k]
                + weights.area * signals.area[k]
                + weights.distance * gk[k]
                + weights.players * signals.players[k]
        };
        let scores = [score(0), score(1)];

        let total = scores[0] + scores[1];
        let percent = if total > 0.0 {
            [scores[0] / total * 100.0, scores[1] / total * 100.0]
        } else {
            [50.0, 50.0]
        };

        debug!(
            "attack scores {:.3} / {:.3} -> {:.1}% / {:.1}% (goalkeeper: {}, ball: {})",
            scores[0],
            scores[1],
            percent[0],
            percent[1],
            signals.goalkeeper.is_some(),
            signals.ball.is_some()
        );

        AttackPrediction {
            percent,
            scores,
            weights,
            signals,
            hulls,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use offside_core::BoundingBox;
    use proptest::prelude::*;

    /// 2×2 box centered on `(x, y)`.
    fn at(x: f64, y: f64) -> BoundingBox {
        BoundingBox::new(x - 1.0, y - 1.0, x + 1.0, y + 1.0)
    }

    fn team(xy: &[(f64, f64)]) -> Vec<BoundingBox> {
        xy.iter().map(|&(x, y)| at(x, y)).collect()
    }

    fn compact_and_spread() -> Roster {
        Roster {
            // rectangle 10×5 plus one interior player: area 50, 5 players
            team_a: team(&[(0.0, 0.0), (10.0, 0.0), (10.0, 5.0), (0.0, 5.0), (5.0, 2.5)]),
            // right triangle with legs 20 and 10: area 100, 3 players
            team_b: team(&[(100.0, 0.0), (120.0, 0.0), (100.0, 10.0)]),
            goalkeeper: None,
            ball: None,
        }
    }

    #[test]
    fn no_goalkeeper_no_ball_uses_area_and_count() {
        let p = AttackPredictor::default().predict(&compact_and_spread());
        assert_eq!(p.weights, WeightTable::default().neither);
        assert_relative_eq!(p.signals.area[0], 0.5, epsilon = 1e-12);
        assert_relative_eq!(p.signals.area[1], 1.0, epsilon = 1e-12);
        assert_relative_eq!(p.signals.players[0], 0.0, epsilon = 1e-12);
        assert_relative_eq!(p.signals.players[1], 0.4, epsilon = 1e-12);
        assert_relative_eq!(p.scores[0], 0.35, epsilon = 1e-12);
        assert_relative_eq!(p.scores[1], 0.82, epsilon = 1e-12);
        assert_relative_eq!(p.percent[0], 35.0 / 1.17, epsilon = 1e-9);
        assert_relative_eq!(p.percent[1], 82.0 / 1.17, epsilon = 1e-9);
        assert!((p.percent[0] - 29.9).abs() < 0.05);
        assert_eq!(p.attacking(), TeamId::Team1);
        assert_eq!(p.defending(), TeamId::Team0);
    }

    #[test]
    fn hulls_are_reported_per_team() {
        let p = AttackPredictor::default().predict(&compact_and_spread());
        assert_eq!(p.hulls[0].len(), 4);
        assert_eq!(p.hulls[1].len(), 3);
        assert_relative_eq!(p.signals.hull_areas[0], 50.0, epsilon = 1e-9);
        assert_relative_eq!(p.signals.hull_areas[1], 100.0, epsilon = 1e-9);
    }

    #[test]
    fn ball_and_goalkeeper_switch_weight_rows() {
        let mut roster = compact_and_spread();
        roster.ball = Some(at(99.0, 1.0));
        let p = AttackPredictor::default().predict(&roster);
        assert_eq!(p.weights, WeightTable::default().ball_only);
        assert_eq!(p.signals.ball, Some([0.0, 1.0]));

        roster.goalkeeper = Some(at(-5.0, 2.0));
        let p = AttackPredictor::default().predict(&roster);
        assert_eq!(p.weights, WeightTable::default().goalkeeper_and_ball);
        // the four nearest of eight players to the keeper are all Team0
        assert_eq!(p.signals.goalkeeper, Some([0.0, 1.0]));

        roster.ball = None;
        let p = AttackPredictor::default().predict(&roster);
        assert_eq!(p.weights, WeightTable::default().goalkeeper_only);
    }

    #[test]
    fn goalkeeper_without_enough_players_is_ignored() {
        let roster = Roster {
            team_a: team(&[(0.0, 0.0)]),
            team_b: Vec::new(),
            goalkeeper: Some(at(5.0, 5.0)),
            ball: None,
        };
        let p = AttackPredictor::default().predict(&roster);
        assert!(p.signals.goalkeeper.is_none());
        assert_eq!(p.weights, WeightTable::default().neither);
    }

    #[test]
    fn zero_scores_split_evenly() {
        let roster = Roster {
            team_a: team(&[(0.0, 0.0), (1.0, 0.0)]),
            team_b: team(&[(5.0, 5.0), (9.0, 9.0)]),
            goalkeeper: None,
            ball: None,
        };
        let p = AttackPredictor::default().predict(&roster);
        assert_eq!(p.scores, [0.0, 0.0]);
        assert_eq!(p.percent, [50.0, 50.0]);
        assert_eq!(p.attacking(), TeamId::Team1);

        let empty = AttackPredictor::default().predict(&Roster::default());
        assert_eq!(empty.percent, [50.0, 50.0]);
    }

    #[test]
    fn non_finite_boxes_do_not_break_the_hull() {
        let mut roster = compact_and_spread();
        for i in 0..12 {
            roster.team_a.push(at(f64::NAN, i as f64));
        }
        roster.team_b.push(BoundingBox::new(f64::INFINITY, 0.0, f64::INFINITY, 2.0));
        let p = AttackPredictor::default().predict(&roster);
        assert_relative_eq!(p.signals.hull_areas[0], 50.0, epsilon = 1e-9);
        assert_relative_eq!(p.signals.hull_areas[1], 100.0, epsilon = 1e-9);
        assert_relative_eq!(p.percent[0] + p.percent[1], 100.0, epsilon = 1e-9);
    }

    fn arb_team() -> impl Strategy<Value = Vec<BoundingBox>> {
        prop::collection::vec((0.0f64..1920.0, 0.0f64..1080.0), 0..12)
            .prop_map(|xy| team(&xy))
    }

    proptest! {
        #[test]
        fn percentages_always_sum_to_100(
            team_a in arb_team(),
            team_b in arb_team(),
            gk in prop::option::of((0.0f64..1920.0, 0.0f64..1080.0)),
            ball in prop::option::of((0.0f64..1920.0, 0.0f64..1080.0)),
        ) {
            let roster = Roster {
                team_a,
                team_b,
                goalkeeper: gk.map(|(x, y)| at(x, y)),
                ball: ball.map(|(x, y)| at(x, y)),
            };
            let p = AttackPredictor::default().predict(&roster);
            prop_assert!((p.percent[0] + p.percent[1] - 100.0).abs() < 1e-6);
            prop_assert!((0.0..=100.0).contains(&p.percent[0]));
            prop_assert!((0.0..=100.0).contains(&p.percent[1]));
        }
    }
}

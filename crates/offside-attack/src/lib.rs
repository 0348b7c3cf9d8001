//! Attacking-team estimation for a single classified frame.
//!
//! Four signals are combined per team:
//! - hull area of the player centers, normalized by the larger team;
//! - inverse player count;
//! - share among the players nearest to the goalkeeper (when present);
//! - possession of the player nearest to the ball (when present).
//!
//! Which optional signals are present selects a row of [`WeightTable`].
//! The weighted scores are turned into percentages summing to 100, with an
//! even split when both scores are zero.

mod predictor;
mod signals;
mod weights;

pub use predictor::{AttackPrediction, AttackPredictor, AttackPredictorParams, AttackSignals};
pub use signals::{
    area_signal, ball_signal, box_centers, count_signal, goalkeeper_signal, team_hull,
};
pub use weights::{SignalWeights, WeightTable};

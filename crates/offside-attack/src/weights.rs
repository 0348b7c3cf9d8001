use serde::{Deserialize, Serialize};

/// Weights applied to the four signals.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct SignalWeights {
    pub ball: f64,
    pub area: f64,
    /// Goalkeeper-proximity weight.
    pub distance: f64,
    pub players: f64,
}

impl SignalWeights {
    pub const fn new(ball: f64, area: f64, distance: f64, players: f64) -> Self {
        Self {
            ball,
            area,
            distance,
            players,
        }
    }
}

/// One weight row per combination of optional evidence.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WeightTable {
    pub goalkeeper_and_ball: SignalWeights,
    pub ball_only: SignalWeights,
    pub goalkeeper_only: SignalWeights,
    pub neither: SignalWeights,
}

impl Default for WeightTable {
    fn default() -> Self {
        Self {
            goalkeeper_and_ball: SignalWeights::new(0.40, 0.20, 0.30, 0.10),
            ball_only: SignalWeights::new(0.45, 0.35, 0.00, 0.20),
            goalkeeper_only: SignalWeights::new(0.00, 0.40, 0.40, 0.20),
            neither: SignalWeights::new(0.00, 0.70, 0.00, 0.30),
        }
    }
}

impl WeightTable {
    pub fn for_presence(&self, goalkeeper: bool, ball: bool) -> SignalWeights {
        match (goalkeeper, ball) {
            (true, true) => self.goalkeeper_and_ball,
            (false, true) => self.ball_only,
            (true, false) => self.goalkeeper_only,
            (false, false) => self.neither,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_rows_sum_to_one() {
        let t = WeightTable::default();
        for (gk, ball) in [(true, true), (false, true), (true, false), (false, false)] {
            let w = t.for_presence(gk, ball);
            let sum = w.ball + w.area + w.distance + w.players;
            assert!((sum - 1.0).abs() < 1e-12, "row ({gk}, {ball}) sums to {sum}");
        }
    }

    #[test]
    fn absent_signals_get_no_weight() {
        let t = WeightTable::default();
        assert_eq!(t.for_presence(false, true).distance, 0.0);
        assert_eq!(t.for_presence(true, false).ball, 0.0);
        let none = t.for_presence(false, false);
        assert_eq!((none.ball, none.distance), (0.0, 0.0));
        assert_eq!((none.area, none.players), (0.70, 0.30));
    }

    #[test]
    fn partial_json_keeps_default_rows() {
        let json = r#"{"neither": {"ball": 0, "area": 0.5, "distance": 0, "players": 0.5}}"#;
        let t: WeightTable = serde_json::from_str(json).unwrap();
        assert_eq!(t.neither, SignalWeights::new(0.0, 0.5, 0.0, 0.5));
        assert_eq!(t.ball_only, WeightTable::default().ball_only);
    }
}

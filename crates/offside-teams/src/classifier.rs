use crate::hsv::{Hsv, HsvRange};
use crate::kmeans::{nearest_center, two_means, TwoMeansParams};
use log::{debug, warn};
use offside_core::{BoundingBox, ClassLabel, Detection, Rgb, RgbImageView, Roster, TeamId};
use serde::{Deserialize, Serialize};

#[cfg(feature = "tracing")]
use tracing::instrument;

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum TeamClassifyError {
    #[error("team clustering needs at least 2 players, found {found}")]
    NotEnoughPlayers { found: usize },
}

/// Parameters for jersey color classification.
#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(default)]
pub struct ColorClassifierParams {
    /// Lower corner of the pitch-green HSV band (8-bit scale).
    pub green_lower: Hsv,
    /// Upper corner of the pitch-green HSV band (8-bit scale).
    pub green_upper: Hsv,
    /// Max k-means iterations.
    pub max_iters: usize,
    /// K-means center-shift tolerance.
    pub tolerance: f64,
    /// Seed for the k-means++ initialisation.
    pub seed: u64,
}

impl Default for ColorClassifierParams {
    fn default() -> Self {
        let band = HsvRange::PITCH_GREEN;
        Self {
            green_lower: band.lower,
            green_upper: band.upper,
            max_iters: 300,
            tolerance: 1e-4,
            seed: 0,
        }
    }
}

impl ColorClassifierParams {
    pub fn green_band(&self) -> HsvRange {
        HsvRange {
            lower: self.green_lower,
            upper: self.green_upper,
        }
    }

    fn kmeans(&self) -> TwoMeansParams {
        TwoMeansParams {
            max_iters: self.max_iters,
            tolerance: self.tolerance,
            seed: self.seed,
        }
    }
}

/// Players of one team plus its dominant jersey color.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct TeamCluster {
    pub color: Rgb,
    pub players: Vec<BoundingBox>,
}

/// Outcome of jersey clustering.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TeamAssignment {
    /// Indexed by [`TeamId::index`].
    pub teams: [TeamCluster; 2],
    /// Team per input player, in input order.
    pub labels: Vec<TeamId>,
    /// Sampled jersey color per input player, in input order.
    pub player_colors: Vec<Rgb>,
}

impl TeamAssignment {
    pub fn team(&self, id: TeamId) -> &TeamCluster {
        &self.teams[id.index()]
    }

    pub fn colors(&self) -> [Rgb; 2] {
        [self.teams[0].color, self.teams[1].color]
    }

    /// Roster with `team_a = Team0`, `team_b = Team1`.
    pub fn to_roster(&self, goalkeeper: Option<BoundingBox>, ball: Option<BoundingBox>) -> Roster {
        Roster {
            team_a: self.teams[0].players.clone(),
            team_b: self.teams[1].players.clone(),
            goalkeeper,
            ball,
        }
    }
}

/// Detector output routed by class.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SplitDetections {
    pub players: Vec<BoundingBox>,
    pub goalkeeper: Option<BoundingBox>,
    pub ball: Option<BoundingBox>,
}

/// Route detections to players, goalkeeper and ball.
///
/// Only the first goalkeeper and the first ball are kept.
pub fn split_detections(detections: &[Detection]) -> SplitDetections {
    let mut out = SplitDetections::default();
    for det in detections {
        match det.label {
            ClassLabel::Player => out.players.push(det.bbox),
            ClassLabel::Goalkeeper => {
                if out.goalkeeper.is_some() {
                    warn!("extra goalkeeper detection dropped: {:?}", det.bbox);
                } else {
                    out.goalkeeper = Some(det.bbox);
                }
            }
            ClassLabel::Ball => {
                if out.ball.is_some() {
                    warn!("extra ball detection dropped: {:?}", det.bbox);
                } else {
                    out.ball = Some(det.bbox);
                }
            }
        }
    }
    debug!(
        "split {} detections: {} players, goalkeeper: {}, ball: {}",
        detections.len(),
        out.players.len(),
        out.goalkeeper.is_some(),
        out.ball.is_some()
    );
    out
}

/// Mean color of the non-green pixels inside `bbox`.
///
/// The box is clamped to the image. An empty window, or one where every
/// pixel is pitch green, yields black.
pub fn mean_jersey_color(image: &RgbImageView<'_>, bbox: &BoundingBox, green: &HsvRange) -> Rgb {
    let Some((x0, y0, x1, y1)) = image.crop_window(bbox) else {
        return Rgb::BLACK;
    };

    let mut sum = [0u64; 3];
    let mut n = 0u64;
    for y in y0..y1 {
        for x in x0..x1 {
            let px = image.pixel(x, y);
            if green.contains_rgb(px) {
                continue;
            }
            sum[0] += px[0] as u64;
            sum[1] += px[1] as u64;
            sum[2] += px[2] as u64;
            n += 1;
        }
    }

    if n == 0 {
        return Rgb::BLACK;
    }
    let n = n as f64;
    Rgb::new(sum[0] as f64 / n, sum[1] as f64 / n, sum[2] as f64 / n)
}

/// Two-team jersey classifier.
#[derive(Clone, Debug, Default)]
pub struct ColorClassifier {
    params: ColorClassifierParams,
}

impl ColorClassifier {
    pub fn new(params: ColorClassifierParams) -> Self {
        Self { params }
    }

    pub fn params(&self) -> &ColorClassifierParams {
        &self.params
    }

    pub fn jersey_color(&self, image: &RgbImageView<'_>, bbox: &BoundingBox) -> Rgb {
        mean_jersey_color(image, bbox, &self.params.green_band())
    }

    /// Sample each player's jersey color and split players into two teams.
    #[cfg_attr(
        feature = "tracing",
        instrument(level = "debug", skip_all, fields(players = players.len()))
    )]
    pub fn classify(
        &self,
        image: &RgbImageView<'_>,
        players: &[BoundingBox],
    ) -> Result<TeamAssignment, TeamClassifyError> {
        let colors: Vec<Rgb> = players.iter().map(|b| self.jersey_color(image, b)).collect();
        self.classify_colors(players, &colors)
    }

    /// Cluster precomputed jersey colors, one per player box.
    ///
    /// Team ids follow centroid order. The final team of each player is its
    /// nearest centroid (ties go to `Team0`), not the raw k-means label.
    pub fn classify_colors(
        &self,
        players: &[BoundingBox],
        colors: &[Rgb],
    ) -> Result<TeamAssignment, TeamClassifyError> {
        debug_assert_eq!(players.len(), colors.len());
        let found = players.len().min(colors.len());
        if found < 2 {
            return Err(TeamClassifyError::NotEnoughPlayers { found });
        }

        let clusters = two_means(&colors[..found], &self.params.kmeans())
            .ok_or(TeamClassifyError::NotEnoughPlayers { found })?;
        let centers = clusters.centers;

        let mut teams = [
            TeamCluster {
                color: centers[0],
                players: Vec::new(),
            },
            TeamCluster {
                color: centers[1],
                players: Vec::new(),
            },
        ];
        let mut labels = Vec::with_capacity(found);
        for (bbox, color) in players.iter().zip(colors) {
            let team = match nearest_center(&centers, color) {
                0 => TeamId::Team0,
                _ => TeamId::Team1,
            };
            teams[team.index()].players.push(*bbox);
            labels.push(team);
        }

        if teams[1].players.is_empty() {
            debug!("all {found} players share one jersey color");
        }

        Ok(TeamAssignment {
            teams,
            labels,
            player_colors: colors[..found].to_vec(),
        })
    }

    /// Split raw detections and classify the players into a roster.
    pub fn classify_detections(
        &self,
        image: &RgbImageView<'_>,
        detections: &[Detection],
    ) -> Result<(TeamAssignment, Roster), TeamClassifyError> {
        let split = split_detections(detections);
        let assignment = self.classify(image, &split.players)?;
        let roster = assignment.to_roster(split.goalkeeper, split.ball);
        Ok((assignment, roster))
    }
}

use nalgebra::Point2;
use serde::{Deserialize, Serialize};

/// Frame dimensions in pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageSize {
    pub width: u32,
    pub height: u32,
}

impl ImageSize {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

/// Axis-aligned box in image pixel coordinates, `x1 < x2`, `y1 < y2`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub x1: f64,
    pub y1: f64,
    pub x2: f64,
    pub y2: f64,
}

impl BoundingBox {
    /// Build a box from two opposite corners in any order.
    pub fn new(x1: f64, y1: f64, x2: f64, y2: f64) -> Self {
        Self {
            x1: x1.min(x2),
            y1: y1.min(y2),
            x2: x1.max(x2),
            y2: y1.max(y2),
        }
    }

    pub fn from_xyxy(xyxy: [f64; 4]) -> Self {
        Self::new(xyxy[0], xyxy[1], xyxy[2], xyxy[3])
    }

    pub fn width(&self) -> f64 {
        self.x2 - self.x1
    }

    pub fn height(&self) -> f64 {
        self.y2 - self.y1
    }

    /// Box center, used as a player's position in frame space.
    pub fn center(&self) -> Point2<f64> {
        Point2::new((self.x1 + self.x2) * 0.5, (self.y1 + self.y2) * 0.5)
    }

    /// Bottom-center point: where the player's feet touch the pitch.
    pub fn bottom_center(&self) -> Point2<f64> {
        Point2::new((self.x1 + self.x2) * 0.5, self.y2)
    }
}

/// Detector class label.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClassLabel {
    Player,
    Goalkeeper,
    Ball,
}

impl ClassLabel {
    /// Map a raw detector class id (0/1/2) to a label.
    ///
    /// Detectors report class ids as floats; the id is rounded first.
    /// Any other id (referee, staff, ...) yields `None`.
    pub fn from_class_id(id: f32) -> Option<Self> {
        match id.round() as i64 {
            0 => Some(Self::Player),
            1 => Some(Self::Goalkeeper),
            2 => Some(Self::Ball),
            _ => None,
        }
    }

    pub fn class_id(self) -> u8 {
        match self {
            Self::Player => 0,
            Self::Goalkeeper => 1,
            Self::Ball => 2,
        }
    }
}

/// One detector output: a box plus its class.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Detection {
    pub bbox: BoundingBox,
    pub label: ClassLabel,
}

impl Detection {
    pub fn new(bbox: BoundingBox, label: ClassLabel) -> Self {
        Self { bbox, label }
    }
}

/// Team identifier assigned by color clustering.
///
/// `Team0` is the team of the first cluster centroid.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TeamId {
    Team0,
    Team1,
}

impl TeamId {
    pub const ALL: [TeamId; 2] = [TeamId::Team0, TeamId::Team1];

    #[inline]
    pub fn index(self) -> usize {
        match self {
            TeamId::Team0 => 0,
            TeamId::Team1 => 1,
        }
    }

    #[inline]
    pub fn other(self) -> TeamId {
        match self {
            TeamId::Team0 => TeamId::Team1,
            TeamId::Team1 => TeamId::Team0,
        }
    }
}

/// Per-frame classification of all detections.
///
/// Right after color clustering `team_a` holds `Team0` and `team_b` holds
/// `Team1`. [`Roster::oriented`] relabels it so that `team_a` is the
/// attacking team.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Roster {
    pub team_a: Vec<BoundingBox>,
    pub team_b: Vec<BoundingBox>,
    #[serde(default)]
    pub goalkeeper: Option<BoundingBox>,
    #[serde(default)]
    pub ball: Option<BoundingBox>,
}

impl Roster {
    /// Players of a team, `Team0` → `team_a`, `Team1` → `team_b`.
    pub fn team(&self, id: TeamId) -> &[BoundingBox] {
        match id {
            TeamId::Team0 => &self.team_a,
            TeamId::Team1 => &self.team_b,
        }
    }

    pub fn player_count(&self) -> usize {
        self.team_a.len() + self.team_b.len()
    }

    /// Relabel so that `team_a` holds the `attacking` team.
    pub fn oriented(mut self, attacking: TeamId) -> Self {
        if attacking == TeamId::Team1 {
            std::mem::swap(&mut self.team_a, &mut self.team_b);
        }
        self
    }
}

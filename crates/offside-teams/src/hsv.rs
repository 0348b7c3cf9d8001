use serde::{Deserialize, Serialize};

/// HSV triple on the 8-bit OpenCV scale: `h ∈ [0, 180)`, `s, v ∈ [0, 255]`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Hsv {
    pub h: f64,
    pub s: f64,
    pub v: f64,
}

impl Hsv {
    pub const fn new(h: f64, s: f64, v: f64) -> Self {
        Self { h, s, v }
    }
}

/// Convert an 8-bit RGB pixel to 8-bit-scale HSV.
///
/// Hue is halved so a full turn fits a byte, and every channel is rounded
/// to the nearest integer the way 8-bit conversions store them.
#[inline]
pub fn rgb_to_hsv(px: [u8; 3]) -> Hsv {
    let [r, g, b] = px.map(|c| c as f64);
    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    let delta = max - min;

    let hue_deg = if delta <= 0.0 {
        0.0
    } else if max == r {
        60.0 * ((g - b) / delta)
    } else if max == g {
        60.0 * ((b - r) / delta) + 120.0
    } else {
        60.0 * ((r - g) / delta) + 240.0
    };
    let hue_deg = if hue_deg < 0.0 { hue_deg + 360.0 } else { hue_deg };

    let s = if max <= 0.0 { 0.0 } else { delta * 255.0 / max };

    Hsv::new((hue_deg / 2.0).round() % 180.0, s.round(), max)
}

/// Inclusive HSV box, as used for pitch-green masking.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct HsvRange {
    pub lower: Hsv,
    pub upper: Hsv,
}

impl HsvRange {
    /// Grass band: `H ∈ [36, 70]`, `S ∈ [25, 255]`, `V ∈ [25, 255]`.
    pub const PITCH_GREEN: HsvRange = HsvRange {
        lower: Hsv::new(36.0, 25.0, 25.0),
        upper: Hsv::new(70.0, 255.0, 255.0),
    };

    #[inline]
    pub fn contains(&self, c: Hsv) -> bool {
        (self.lower.h..=self.upper.h).contains(&c.h)
            && (self.lower.s..=self.upper.s).contains(&c.s)
            && (self.lower.v..=self.upper.v).contains(&c.v)
    }

    #[inline]
    pub fn contains_rgb(&self, px: [u8; 3]) -> bool {
        self.contains(rgb_to_hsv(px))
    }
}

impl Default for HsvRange {
    fn default() -> Self {
        Self::PITCH_GREEN
    }
}

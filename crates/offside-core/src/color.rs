use serde::{Deserialize, Serialize};

/// A 3-channel color sample in `[0, 255]` per channel.
///
/// Channels are kept as `f64` because jersey colors are means over many
/// pixels and cluster centroids are means over many jerseys.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Rgb {
    pub r: f64,
    pub g: f64,
    pub b: f64,
}

impl Rgb {
    pub const BLACK: Rgb = Rgb::new(0.0, 0.0, 0.0);
    pub const YELLOW: Rgb = Rgb::new(255.0, 255.0, 0.0);
    pub const RED: Rgb = Rgb::new(255.0, 0.0, 0.0);
    pub const BLUE: Rgb = Rgb::new(0.0, 0.0, 255.0);

    pub const fn new(r: f64, g: f64, b: f64) -> Self {
        Self { r, g, b }
    }

    pub fn from_u8(px: [u8; 3]) -> Self {
        Self::new(px[0] as f64, px[1] as f64, px[2] as f64)
    }

    /// Round and clamp into 8-bit channels.
    pub fn to_u8(self) -> [u8; 3] {
        [self.r, self.g, self.b].map(|c| c.round().clamp(0.0, 255.0) as u8)
    }

    /// Euclidean distance in RGB space.
    #[inline]
    pub fn distance(&self, other: &Rgb) -> f64 {
        self.distance_sq(other).sqrt()
    }

    #[inline]
    pub fn distance_sq(&self, other: &Rgb) -> f64 {
        let dr = self.r - other.r;
        let dg = self.g - other.g;
        let db = self.b - other.b;
        dr * dr + dg * dg + db * db
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn distance_is_euclidean() {
        let a = Rgb::new(0.0, 0.0, 0.0);
        let b = Rgb::new(3.0, 4.0, 12.0);
        assert_eq!(a.distance(&b), 13.0);
        assert_eq!(b.distance(&a), 13.0);
    }

    #[test]
    fn to_u8_rounds_and_clamps() {
        let c = Rgb::new(12.6, -3.0, 300.0);
        assert_eq!(c.to_u8(), [13, 0, 255]);
    }
}

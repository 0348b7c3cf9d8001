//! Planar homography between the broadcast frame and the pitch template.
//!
//! The matrix works on *normalized* coordinates: frame points are mapped to
//! `[-0.5, 0.5]²` using the frame size before multiplication, and the result
//! is remapped from `[-0.5, 0.5]²` onto the `1050 × 680` pitch template.

use crate::ImageSize;
use nalgebra::{Matrix3, Point2, Vector3};
use serde::{Deserialize, Serialize};

/// Width of the canonical top-down pitch template, in template pixels.
pub const PITCH_WIDTH: f64 = 1050.0;
/// Height of the canonical top-down pitch template, in template pixels.
pub const PITCH_HEIGHT: f64 = 680.0;
/// Pitch-space x of the halfway line.
pub const PITCH_MIDLINE_X: f64 = PITCH_WIDTH / 2.0;

/// Smallest magnitude allowed for the homogeneous divisor.
const HOMOGENEOUS_EPS: f64 = 1e-8;
/// Determinants below this (relative to the matrix scale) count as singular.
const SINGULAR_REL_EPS: f64 = 1e-12;

#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum HomographyError {
    #[error("invalid homography: matrix is singular (det={det:e})")]
    Singular { det: f64 },
    #[error("invalid homography: matrix has non-finite entries")]
    NonFinite,
    #[error("invalid frame size {width}x{height}")]
    EmptyFrame { width: u32, height: u32 },
}

/// 3×3 projective transform. Serialized as a row-major `[[f64; 3]; 3]`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(from = "[[f64; 3]; 3]", into = "[[f64; 3]; 3]")]
pub struct Homography {
    pub h: Matrix3<f64>,
}

impl Homography {
    pub fn new(h: Matrix3<f64>) -> Self {
        Self { h }
    }

    pub fn identity() -> Self {
        Self::new(Matrix3::identity())
    }

    pub fn from_array(rows: [[f64; 3]; 3]) -> Self {
        Self::new(Matrix3::from_row_slice(&[
            rows[0][0], rows[0][1], rows[0][2], rows[1][0], rows[1][1], rows[1][2], rows[2][0],
            rows[2][1], rows[2][2],
        ]))
    }

    pub fn to_array(&self) -> [[f64; 3]; 3] {
        [
            [self.h[(0, 0)], self.h[(0, 1)], self.h[(0, 2)]],
            [self.h[(1, 0)], self.h[(1, 1)], self.h[(1, 2)]],
            [self.h[(2, 0)], self.h[(2, 1)], self.h[(2, 2)]],
        ]
    }

    /// Apply the transform with a perspective divide.
    ///
    /// A homogeneous coordinate closer to zero than `1e-8` is pushed out to
    /// `±1e-8` so the divide never blows up.
    #[inline]
    pub fn apply(&self, p: Point2<f64>) -> Point2<f64> {
        let v = self.h * Vector3::new(p.x, p.y, 1.0);
        let w = guard_divisor(v[2]);
        Point2::new(v[0] / w, v[1] / w)
    }

    /// Check that every entry is finite.
    pub fn validate(&self) -> Result<(), HomographyError> {
        if self.h.iter().all(|v| v.is_finite()) {
            Ok(())
        } else {
            Err(HomographyError::NonFinite)
        }
    }

    /// Algebraic inverse, or an error for singular / non-finite matrices.
    pub fn inverse(&self) -> Result<Self, HomographyError> {
        self.validate()?;
        let det = self.h.determinant();
        let scale = self.h.amax().max(f64::MIN_POSITIVE);
        if !det.is_finite() || det.abs() <= SINGULAR_REL_EPS * scale.powi(3) {
            return Err(HomographyError::Singular { det });
        }
        self.h
            .try_inverse()
            .map(Self::new)
            .ok_or(HomographyError::Singular { det })
    }
}

impl From<[[f64; 3]; 3]> for Homography {
    fn from(rows: [[f64; 3]; 3]) -> Self {
        Self::from_array(rows)
    }
}

impl From<Homography> for [[f64; 3]; 3] {
    fn from(h: Homography) -> Self {
        h.to_array()
    }
}

#[inline]
fn guard_divisor(w: f64) -> f64 {
    if w.abs() >= HOMOGENEOUS_EPS {
        w
    } else if w.is_sign_negative() {
        -HOMOGENEOUS_EPS
    } else {
        HOMOGENEOUS_EPS
    }
}

#[inline]
fn normalize(p: Point2<f64>, width: f64, height: f64) -> Point2<f64> {
    Point2::new(p.x / width - 0.5, p.y / height - 0.5)
}

#[inline]
fn denormalize(q: Point2<f64>, width: f64, height: f64) -> Point2<f64> {
    Point2::new((q.x + 0.5) * width, (q.y + 0.5) * height)
}

/// Map a frame pixel onto the pitch template.
pub fn image_to_pitch(h: &Homography, p: Point2<f64>, frame: ImageSize) -> Point2<f64> {
    let n = normalize(p, frame.width as f64, frame.height as f64);
    denormalize(h.apply(n), PITCH_WIDTH, PITCH_HEIGHT)
}

/// Map a pitch-template point back into frame pixels through the inverse of `h`.
pub fn pitch_to_image(
    h: &Homography,
    p: Point2<f64>,
    frame: ImageSize,
) -> Result<Point2<f64>, HomographyError> {
    let inv = h.inverse()?;
    Ok(project_inverse(&inv, p, frame))
}

#[inline]
fn project_inverse(inv: &Homography, p: Point2<f64>, frame: ImageSize) -> Point2<f64> {
    let n = normalize(p, PITCH_WIDTH, PITCH_HEIGHT);
    denormalize(inv.apply(n), frame.width as f64, frame.height as f64)
}

/// Frame ↔ pitch mapper for one frame, with the inverse computed once.
#[derive(Clone, Copy, Debug)]
pub struct HomographyProjector {
    forward: Homography,
    inverse: Homography,
    frame: ImageSize,
}

impl HomographyProjector {
    pub fn new(h: Homography, frame: ImageSize) -> Result<Self, HomographyError> {
        if frame.is_empty() {
            return Err(HomographyError::EmptyFrame {
                width: frame.width,
                height: frame.height,
            });
        }
        let inverse = h.inverse()?;
        Ok(Self {
            forward: h,
            inverse,
            frame,
        })
    }

    #[inline]
    pub fn homography(&self) -> &Homography {
        &self.forward
    }

    #[inline]
    pub fn frame(&self) -> ImageSize {
        self.frame
    }

    pub fn image_to_pitch(&self, p: Point2<f64>) -> Point2<f64> {
        image_to_pitch(&self.forward, p, self.frame)
    }

    pub fn pitch_to_image(&self, p: Point2<f64>) -> Point2<f64> {
        project_inverse(&self.inverse, p, self.frame)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use proptest::prelude::*;

    fn sample_h() -> Homography {
        Homography::new(Matrix3::new(
            1.2, 0.1, 0.05, //
            -0.05, 0.9, 0.02, //
            0.1, 0.3, 1.0,
        ))
    }

    #[test]
    fn identity_maps_frame_corners_to_pitch_corners() {
        let frame = ImageSize::new(1280, 720);
        let h = Homography::identity();
        let tl = image_to_pitch(&h, Point2::new(0.0, 0.0), frame);
        let br = image_to_pitch(&h, Point2::new(1280.0, 720.0), frame);
        assert_abs_diff_eq!(tl.x, 0.0, epsilon = 1e-9);
        assert_abs_diff_eq!(tl.y, 0.0, epsilon = 1e-9);
        assert_abs_diff_eq!(br.x, PITCH_WIDTH, epsilon = 1e-9);
        assert_abs_diff_eq!(br.y, PITCH_HEIGHT, epsilon = 1e-9);
    }

    #[test]
    fn projector_round_trips_points() {
        let frame = ImageSize::new(1920, 1080);
        let proj = HomographyProjector::new(sample_h(), frame).expect("invertible");
        for p in [
            Point2::new(0.0, 0.0),
            Point2::new(960.0, 540.0),
            Point2::new(1500.0, 1000.0),
        ] {
            let back = proj.pitch_to_image(proj.image_to_pitch(p));
            assert_abs_diff_eq!(back.x, p.x, epsilon = 1e-6);
            assert_abs_diff_eq!(back.y, p.y, epsilon = 1e-6);
        }
    }

    #[test]
    fn singular_matrix_is_rejected() {
        let h = Homography::from_array([[1.0, 2.0, 3.0], [2.0, 4.0, 6.0], [0.0, 0.0, 1.0]]);
        assert!(matches!(h.inverse(), Err(HomographyError::Singular { .. })));
        let err = pitch_to_image(&h, Point2::new(10.0, 10.0), ImageSize::new(100, 100));
        assert!(matches!(err, Err(HomographyError::Singular { .. })));
    }

    #[test]
    fn non_finite_matrix_is_rejected() {
        let mut h = Homography::identity();
        h.h[(0, 1)] = f64::NAN;
        assert_eq!(h.inverse(), Err(HomographyError::NonFinite));
    }

    #[test]
    fn empty_frame_is_rejected() {
        let err = HomographyProjector::new(Homography::identity(), ImageSize::new(0, 720));
        assert_eq!(
            err.unwrap_err(),
            HomographyError::EmptyFrame {
                width: 0,
                height: 720
            }
        );
    }

    #[test]
    fn zero_divisor_is_guarded() {
        let h = Homography::from_array([[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 0.0]]);
        let q = h.apply(Point2::new(1e-9, 0.0));
        assert!(q.x.is_finite() && q.y.is_finite());
    }

    #[test]
    fn serializes_row_major() {
        let h = Homography::from_array([[1.0, 2.0, 3.0], [4.0, 5.0, 6.0], [7.0, 8.0, 10.0]]);
        let json = serde_json::to_string(&h).unwrap();
        assert_eq!(json, "[[1.0,2.0,3.0],[4.0,5.0,6.0],[7.0,8.0,10.0]]");
        let back: Homography = serde_json::from_str(&json).unwrap();
        assert_eq!(back, h);
    }

    proptest! {
        #[test]
        fn round_trip_holds_for_invertible_matrices(
            a in 0.5f64..2.0, d in 0.5f64..2.0,
            b in -0.2f64..0.2, c in -0.2f64..0.2,
            tx in -0.3f64..0.3, ty in -0.3f64..0.3,
            g in -0.3f64..0.3, h_ in -0.3f64..0.3,
            px in 0.0f64..1.0, py in 0.0f64..1.0,
            w in 1u32..4000, hgt in 1u32..4000,
        ) {
            let h = Homography::new(Matrix3::new(a, b, tx, c, d, ty, g, h_, 1.0));
            let frame = ImageSize::new(w, hgt);
            let p = Point2::new(px * w as f64, py * hgt as f64);
            let pitch = image_to_pitch(&h, p, frame);
            let back = pitch_to_image(&h, pitch, frame).unwrap();
            let tol = 1e-6 * (w.max(hgt) as f64);
            prop_assert!((back.x - p.x).abs() < tol, "x: {} vs {}", back.x, p.x);
            prop_assert!((back.y - p.y).abs() < tol, "y: {} vs {}", back.y, p.y);
        }
    }
}

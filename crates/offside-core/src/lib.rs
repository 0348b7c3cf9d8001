//! Core types and utilities for single-frame offside analysis.
//!
//! This crate is intentionally small and purely geometric. It does *not*
//! depend on any concrete detector, homography estimator or image type:
//! detections arrive as plain boxes plus class labels, the pitch homography
//! arrives as a 3×3 matrix, and drawing goes through the [`Renderer`] sink.

mod color;
mod geometry;
mod homography;
mod image;
mod logger;
mod render;
mod store;
mod types;

pub use color::Rgb;
pub use geometry::{convex_hull, polygon_area};
pub use homography::{
    image_to_pitch, pitch_to_image, Homography, HomographyError, HomographyProjector,
    PITCH_HEIGHT, PITCH_MIDLINE_X, PITCH_WIDTH,
};
pub use image::{RgbImageView, RgbImageViewError};
pub use render::{Canvas, DrawCommand, OverlayTag, RecordingRenderer, Renderer};
pub use store::{HomographyEstimator, HomographyIoError, HomographyStore};
pub use types::{BoundingBox, ClassLabel, Detection, ImageSize, Roster, TeamId};

#[cfg(feature = "tracing")]
pub use logger::init_tracing;

pub use logger::init_with_level;

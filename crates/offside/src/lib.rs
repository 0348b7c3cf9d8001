//! High-level facade crate for the `offside-*` workspace.
//!
//! This crate provides:
//! - re-exports of the component crates;
//! - [`FrameAnalyzer`], which runs jersey clustering, attack prediction and
//!   offside analysis on one frame and fails at the first stage that cannot
//!   proceed;
//! - JSON config / detections / report helpers in [`io`];
//! - (feature `image`) a raster [`render::RasterRenderer`] for the frame and
//!   pitch overlays.
//!
//! ## Quickstart
//!
//! ```no_run
//! use offside::io::load_detections;
//! use offside::render::{rgb_view, RasterRenderer};
//! use offside::FrameAnalyzer;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let frame = image::open("frame.jpg")?.to_rgb8();
//! let detections = load_detections("detections.json")?;
//! let h = offside::core::HomographyStore::read("homography.json")?;
//!
//! let analyzer = FrameAnalyzer::default();
//! let mut renderer = RasterRenderer::with_blank_pitch(frame.clone());
//! let analysis = analyzer.analyze_and_render(&rgb_view(&frame), &detections, &h, &mut renderer)?;
//! println!("offside: {}", analysis.offside_count());
//! # Ok(())
//! # }
//! ```
//!
//! ## API map
//! - `offside::core`: boxes, labels, colors, homography, geometry, draw primitives.
//! - `offside::teams`: jersey color clustering.
//! - `offside::attack`: attacking-team scoring.
//! - `offside::line`: offside line and verdicts.

pub use offside_attack as attack;
pub use offside_core as core;
pub use offside_line as line;
pub use offside_teams as teams;

pub use offside_core::{BoundingBox, ClassLabel, Detection, Homography, Roster, TeamId};

pub mod io;
mod pipeline;

pub use pipeline::{AnalysisError, FrameAnalysis, FrameAnalyzer, FrameAnalyzerParams};

#[cfg(feature = "image")]
pub mod render;

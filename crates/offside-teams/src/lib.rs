//! Jersey color team classification.
//!
//! Player boxes are sampled for their mean non-grass color, the samples are
//! split into two clusters with a seeded 2-means, and every player is then
//! assigned to the nearer of the two centroids.
//!
//! ```
//! use offside_core::{BoundingBox, Rgb};
//! use offside_teams::ColorClassifier;
//!
//! let players = [
//!     BoundingBox::new(0.0, 0.0, 10.0, 20.0),
//!     BoundingBox::new(20.0, 0.0, 30.0, 20.0),
//!     BoundingBox::new(40.0, 0.0, 50.0, 20.0),
//! ];
//! let colors = [Rgb::RED, Rgb::BLUE, Rgb::RED];
//! let teams = ColorClassifier::default()
//!     .classify_colors(&players, &colors)
//!     .unwrap();
//! assert_eq!(teams.labels[0], teams.labels[2]);
//! assert_ne!(teams.labels[0], teams.labels[1]);
//! ```

mod classifier;
mod hsv;
mod kmeans;

pub use classifier::{
    mean_jersey_color, split_detections, ColorClassifier, ColorClassifierParams,
    SplitDetections, TeamAssignment, TeamClassifyError, TeamCluster,
};
pub use hsv::{rgb_to_hsv, Hsv, HsvRange};
pub use kmeans::{nearest_center, two_means, TwoMeansParams, TwoMeansResult};

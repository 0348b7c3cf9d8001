//! Offside analysis on the pitch template.
//!
//! Players are projected onto the pitch through their feet (the bottom
//! center of the box). The attacking side comes from the goalkeeper's half,
//! or from a player majority when no goalkeeper was detected. The last
//! defender fixes a vertical offside line, which is mapped back into the
//! frame and extended to the image border. Attackers strictly beyond the
//! line are offside.
//!
//! Overlays are emitted as [`offside_core::DrawCommand`]s on both the frame
//! and the pitch canvas.

mod analyzer;
mod clip;

pub use analyzer::{
    decide_side, is_offside, last_defender, AttackSide, OffsideAnalyzer, OffsideError,
    OffsideInput, OffsideLine, OffsideParams, OffsideReport, OffsideVerdict, SideEvidence,
    TeamColors,
};
pub use clip::extend_line_to_image_borders;

use crate::clip::extend_line_to_image_borders;
use log::debug;
use nalgebra::Point2;
use offside_core::{
    BoundingBox, Canvas, DrawCommand, Homography, HomographyError, HomographyProjector, ImageSize,
    OverlayTag, Renderer, Rgb, PITCH_HEIGHT, PITCH_MIDLINE_X,
};
use serde::{Deserialize, Serialize};

#[cfg(feature = "tracing")]
use tracing::instrument;

#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum OffsideError {
    #[error("offside line needs at least one defender")]
    NoDefenders,
    #[error(transparent)]
    Homography(#[from] HomographyError),
}

/// Half of the pitch the attacking team is attacking.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttackSide {
    /// Defending goal at pitch `x = 0`.
    Left,
    /// Defending goal at pitch `x = 1050`.
    Right,
}

/// How the attacking side was decided.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SideEvidence {
    Goalkeeper,
    Majority,
}

/// Parameters for offside analysis and its overlays.
#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(default)]
pub struct OffsideParams {
    /// Pitch `x` splitting the two halves.
    pub midline_x: f64,
    pub line_color: Rgb,
    /// Offside line thickness on the frame, in pixels.
    pub line_thickness_frame: u32,
    /// Offside line thickness on the pitch template, in pixels.
    pub line_thickness_pitch: u32,
    /// Player marker radius on the pitch template.
    pub marker_radius: f64,
    /// Radius of the highlight ring behind offside attackers.
    pub offside_ring_radius: f64,
    /// Offset of the offside tag from the top-center of the attacker box.
    pub tag_offset: [i64; 2],
}

impl Default for OffsideParams {
    fn default() -> Self {
        Self {
            midline_x: PITCH_MIDLINE_X,
            line_color: Rgb::YELLOW,
            line_thickness_frame: 3,
            line_thickness_pitch: 2,
            marker_radius: 10.0,
            offside_ring_radius: 12.0,
            tag_offset: [-65, -30],
        }
    }
}

/// Marker colors for the two teams.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct TeamColors {
    pub attacking: Rgb,
    pub defending: Rgb,
}

impl Default for TeamColors {
    fn default() -> Self {
        Self {
            attacking: Rgb::RED,
            defending: Rgb::BLUE,
        }
    }
}

/// Everything the analyzer reads for one frame.
#[derive(Clone, Copy, Debug)]
pub struct OffsideInput<'a> {
    pub attackers: &'a [BoundingBox],
    pub defenders: &'a [BoundingBox],
    pub goalkeeper: Option<BoundingBox>,
    pub colors: TeamColors,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct OffsideLine {
    /// Pitch `x` of the last defender.
    pub pitch_x: f64,
    /// Index into the defender list.
    pub last_defender: usize,
    /// Pitch segment `(x, 0)–(x, 680)` mapped into the frame, unclipped.
    pub frame_projection: [Point2<f64>; 2],
    /// The same line extended and clipped to the frame border.
    pub frame_segment: [Point2<i64>; 2],
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct OffsideVerdict {
    pub bbox: BoundingBox,
    pub pitch: Point2<f64>,
    pub offside: bool,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct OffsideReport {
    pub side: AttackSide,
    pub side_evidence: SideEvidence,
    pub goalkeeper_pitch: Option<Point2<f64>>,
    pub defenders_pitch: Vec<Point2<f64>>,
    pub line: OffsideLine,
    /// One verdict per attacker, in input order.
    pub verdicts: Vec<OffsideVerdict>,
    pub offside_count: usize,
}

impl OffsideReport {
    pub fn offside_attackers(&self) -> impl Iterator<Item = &OffsideVerdict> {
        self.verdicts.iter().filter(|v| v.offside)
    }
}

/// Attacking side from projected points.
///
/// The goalkeeper's half wins when present. Otherwise the half holding
/// more players wins, with a tie going to [`AttackSide::Left`].
pub fn decide_side(
    goalkeeper: Option<Point2<f64>>,
    players: impl IntoIterator<Item = Point2<f64>>,
    midline_x: f64,
) -> (AttackSide, SideEvidence) {
    if let Some(gk) = goalkeeper {
        let side = if gk.x < midline_x {
            AttackSide::Left
        } else {
            AttackSide::Right
        };
        return (side, SideEvidence::Goalkeeper);
    }

    let (mut left, mut right) = (0usize, 0usize);
    for p in players {
        if p.x < midline_x {
            left += 1;
        } else {
            right += 1;
        }
    }
    debug!("side by majority: {left} left, {right} right");
    let side = if left >= right {
        AttackSide::Left
    } else {
        AttackSide::Right
    };
    (side, SideEvidence::Majority)
}

/// Index and pitch `x` of the defender nearest the defended goal line.
///
/// Ties keep the earliest defender.
pub fn last_defender(defenders: &[Point2<f64>], side: AttackSide) -> Option<(usize, f64)> {
    let mut best: Option<(usize, f64)> = None;
    for (i, p) in defenders.iter().enumerate() {
        let better = match (best, side) {
            (None, _) => true,
            (Some((_, x)), AttackSide::Left) => p.x < x,
            (Some((_, x)), AttackSide::Right) => p.x > x,
        };
        if better {
            best = Some((i, p.x));
        }
    }
    best
}

/// Strictly beyond the line in the attacking direction.
#[inline]
pub fn is_offside(attacker_x: f64, line_x: f64, side: AttackSide) -> bool {
    match side {
        AttackSide::Left => attacker_x < line_x,
        AttackSide::Right => attacker_x > line_x,
    }
}

#[derive(Clone, Debug, Default)]
pub struct OffsideAnalyzer {
    params: OffsideParams,
}

impl OffsideAnalyzer {
    pub fn new(params: OffsideParams) -> Self {
        Self { params }
    }

    pub fn params(&self) -> &OffsideParams {
        &self.params
    }

    /// Build the projector for `frame` and analyze.
    pub fn analyze(
        &self,
        homography: &Homography,
        frame: ImageSize,
        input: &OffsideInput<'_>,
    ) -> Result<OffsideReport, OffsideError> {
        let projector = HomographyProjector::new(*homography, frame)?;
        self.analyze_with(&projector, input)
    }

    #[cfg_attr(
        feature = "tracing",
        instrument(
            level = "debug",
            skip_all,
            fields(attackers = input.attackers.len(), defenders = input.defenders.len())
        )
    )]
    pub fn analyze_with(
        &self,
        projector: &HomographyProjector,
        input: &OffsideInput<'_>,
    ) -> Result<OffsideReport, OffsideError> {
        let to_pitch = |b: &BoundingBox| projector.image_to_pitch(b.bottom_center());

        let attackers: Vec<Point2<f64>> = input.attackers.iter().map(to_pitch).collect();
        let defenders: Vec<Point2<f64>> = input.defenders.iter().map(to_pitch).collect();
        let goalkeeper = input.goalkeeper.as_ref().map(to_pitch);

        let (side, side_evidence) = decide_side(
            goalkeeper,
            defenders.iter().chain(&attackers).copied(),
            self.params.midline_x,
        );

        let (last_index, pitch_x) =
            last_defender(&defenders, side).ok_or(OffsideError::NoDefenders)?;

        let top = projector.pitch_to_image(Point2::new(pitch_x, 0.0));
        let bottom = projector.pitch_to_image(Point2::new(pitch_x, PITCH_HEIGHT));
        let frame_segment = extend_line_to_image_borders(top, bottom, projector.frame());

        let verdicts: Vec<OffsideVerdict> = input
            .attackers
            .iter()
            .zip(&attackers)
            .map(|(bbox, p)| OffsideVerdict {
                bbox: *bbox,
                pitch: *p,
                offside: is_offside(p.x, pitch_x, side),
            })
            .collect();
        let offside_count = verdicts.iter().filter(|v| v.offside).count();

        debug!(
            "side {side:?} ({side_evidence:?}), line at pitch x={pitch_x:.1}, \
             {offside_count}/{} offside",
            verdicts.len()
        );

        Ok(OffsideReport {
            side,
            side_evidence,
            goalkeeper_pitch: goalkeeper,
            defenders_pitch: defenders,
            line: OffsideLine {
                pitch_x,
                last_defender: last_index,
                frame_projection: [top, bottom],
                frame_segment,
            },
            verdicts,
            offside_count,
        })
    }

    /// Top-left corner of the offside tag for an attacker box.
    pub fn tag_position(&self, bbox: &BoundingBox) -> Point2<i64> {
        let mid_x = (bbox.x1 + (bbox.x2 - bbox.x1) / 2.0).round() as i64;
        Point2::new(
            mid_x + self.params.tag_offset[0],
            bbox.y1.round() as i64 + self.params.tag_offset[1],
        )
    }

    /// Emit the frame and pitch overlays for a finished report.
    pub fn render<R: Renderer + ?Sized>(
        &self,
        report: &OffsideReport,
        colors: TeamColors,
        renderer: &mut R,
    ) {
        let p = &self.params;
        let [from, to] = report.line.frame_segment;

        if let Some(gk) = report.goalkeeper_pitch {
            renderer.draw(DrawCommand::FilledCircle {
                canvas: Canvas::Pitch,
                center: gk,
                radius: p.marker_radius,
                color: colors.defending,
            });
        }

        renderer.draw(DrawCommand::Line {
            canvas: Canvas::Pitch,
            from: Point2::new(report.line.pitch_x, 0.0),
            to: Point2::new(report.line.pitch_x, PITCH_HEIGHT),
            color: p.line_color,
            thickness: p.line_thickness_pitch,
        });
        renderer.draw(DrawCommand::Line {
            canvas: Canvas::Frame,
            from: Point2::new(from.x as f64, from.y as f64),
            to: Point2::new(to.x as f64, to.y as f64),
            color: p.line_color,
            thickness: p.line_thickness_frame,
        });

        for v in report.offside_attackers() {
            renderer.draw(DrawCommand::Overlay {
                canvas: Canvas::Frame,
                tag: OverlayTag::Offside,
                top_left: self.tag_position(&v.bbox),
            });
        }

        for v in &report.verdicts {
            if v.offside {
                renderer.draw(DrawCommand::FilledCircle {
                    canvas: Canvas::Pitch,
                    center: v.pitch,
                    radius: p.offside_ring_radius,
                    color: p.line_color,
                });
            }
            renderer.draw(DrawCommand::FilledCircle {
                canvas: Canvas::Pitch,
                center: v.pitch,
                radius: p.marker_radius,
                color: colors.attacking,
            });
        }

        for d in &report.defenders_pitch {
            renderer.draw(DrawCommand::FilledCircle {
                canvas: Canvas::Pitch,
                center: *d,
                radius: p.marker_radius,
                color: colors.defending,
            });
        }
    }

    /// Analyze, emit overlays, and return the offside count.
    pub fn analyze_and_render<R: Renderer + ?Sized>(
        &self,
        homography: &Homography,
        frame: ImageSize,
        input: &OffsideInput<'_>,
        renderer: &mut R,
    ) -> Result<usize, OffsideError> {
        let report = self.analyze(homography, frame, input)?;
        self.render(&report, input.colors, renderer);
        Ok(report.offside_count)
    }
}

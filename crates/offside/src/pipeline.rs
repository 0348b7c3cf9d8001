//! End-to-end analysis of one frame: teams, attack direction, offside line.

use crate::attack::{AttackPrediction, AttackPredictor, AttackPredictorParams};
use crate::core::{
    Canvas, Detection, DrawCommand, Homography, HomographyError, HomographyProjector, Renderer,
    RgbImageView, Roster, TeamId,
};
use crate::line::{
    OffsideAnalyzer, OffsideError, OffsideInput, OffsideParams, OffsideReport, TeamColors,
};
use crate::teams::{
    split_detections, ColorClassifier, ColorClassifierParams, TeamAssignment, TeamClassifyError,
};
use log::info;
use serde::{Deserialize, Serialize};

#[cfg(feature = "tracing")]
use tracing::instrument;

/// Failure of one analysis stage. No partial results are produced.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum AnalysisError {
    #[error("no detections to analyze")]
    EmptyDetections,
    #[error("frame is empty ({width}x{height})")]
    EmptyFrame { width: u32, height: u32 },
    #[error("team classification failed: {0}")]
    Classification(#[source] TeamClassifyError),
    #[error("homography rejected: {0}")]
    Homography(#[source] HomographyError),
    #[error("offside analysis failed: {0}")]
    OffsideAnalysis(#[source] OffsideError),
}

impl From<TeamClassifyError> for AnalysisError {
    fn from(e: TeamClassifyError) -> Self {
        Self::Classification(e)
    }
}

impl From<HomographyError> for AnalysisError {
    fn from(e: HomographyError) -> Self {
        match e {
            HomographyError::EmptyFrame { width, height } => Self::EmptyFrame { width, height },
            other => Self::Homography(other),
        }
    }
}

impl From<OffsideError> for AnalysisError {
    fn from(e: OffsideError) -> Self {
        match e {
            OffsideError::Homography(h) => h.into(),
            other => Self::OffsideAnalysis(other),
        }
    }
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FrameAnalyzerParams {
    pub classifier: ColorClassifierParams,
    pub attack: AttackPredictorParams,
    pub offside: OffsideParams,
}

/// Everything computed for one frame.
#[derive(Clone, Debug, PartialEq)]
pub struct FrameAnalysis {
    pub teams: TeamAssignment,
    pub attack: AttackPrediction,
    pub attacking: TeamId,
    /// `team_a` attacks, `team_b` defends.
    pub roster: Roster,
    pub colors: TeamColors,
    pub offside: OffsideReport,
}

impl FrameAnalysis {
    pub fn offside_count(&self) -> usize {
        self.offside.offside_count
    }
}

/// Classifier, attack predictor and offside analyzer run in sequence.
#[derive(Clone, Debug, Default)]
pub struct FrameAnalyzer {
    classifier: ColorClassifier,
    predictor: AttackPredictor,
    offside: OffsideAnalyzer,
}

impl FrameAnalyzer {
    pub fn new(params: FrameAnalyzerParams) -> Self {
        Self {
            classifier: ColorClassifier::new(params.classifier),
            predictor: AttackPredictor::new(params.attack),
            offside: OffsideAnalyzer::new(params.offside),
        }
    }

    pub fn classifier(&self) -> &ColorClassifier {
        &self.classifier
    }

    pub fn predictor(&self) -> &AttackPredictor {
        &self.predictor
    }

    pub fn offside(&self) -> &OffsideAnalyzer {
        &self.offside
    }

    #[cfg_attr(
        feature = "tracing",
        instrument(
            level = "info",
            skip_all,
            fields(width = image.width, height = image.height, detections = detections.len())
        )
    )]
    pub fn analyze(
        &self,
        image: &RgbImageView<'_>,
        detections: &[Detection],
        homography: &Homography,
    ) -> Result<FrameAnalysis, AnalysisError> {
        if detections.is_empty() {
            return Err(AnalysisError::EmptyDetections);
        }
        let projector = HomographyProjector::new(*homography, image.size())?;

        let split = split_detections(detections);
        let teams = self.classifier.classify(image, &split.players)?;
        let roster = teams.to_roster(split.goalkeeper, split.ball);

        let attack = self.predictor.predict(&roster);
        let attacking = attack.attacking();
        let roster = roster.oriented(attacking);
        let colors = TeamColors {
            attacking: teams.team(attacking).color,
            defending: teams.team(attacking.other()).color,
        };

        let offside = self.offside.analyze_with(
            &projector,
            &OffsideInput {
                attackers: &roster.team_a,
                defenders: &roster.team_b,
                goalkeeper: roster.goalkeeper,
                colors,
            },
        )?;

        info!(
            "{attacking:?} attacking ({:.1}% / {:.1}%), {} offside",
            attack.percent[0], attack.percent[1], offside.offside_count
        );

        Ok(FrameAnalysis {
            teams,
            attack,
            attacking,
            roster,
            colors,
            offside,
        })
    }

    /// Emit team hulls on the frame, then the offside overlays.
    pub fn render<R: Renderer + ?Sized>(&self, analysis: &FrameAnalysis, renderer: &mut R) {
        for team in TeamId::ALL {
            let hull = &analysis.attack.hulls[team.index()];
            if hull.len() < 2 {
                continue;
            }
            renderer.draw(DrawCommand::Polyline {
                canvas: Canvas::Frame,
                points: hull.clone(),
                color: analysis.teams.team(team).color,
                closed: true,
            });
        }
        self.offside.render(&analysis.offside, analysis.colors, renderer);
    }

    /// Analyze and emit overlays.
    pub fn analyze_and_render<R: Renderer + ?Sized>(
        &self,
        image: &RgbImageView<'_>,
        detections: &[Detection],
        homography: &Homography,
        renderer: &mut R,
    ) -> Result<FrameAnalysis, AnalysisError> {
        let analysis = self.analyze(image, detections, homography)?;
        self.render(&analysis, renderer);
        Ok(analysis)
    }
}

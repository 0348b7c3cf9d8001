//! JSON configuration, detector output and report helpers.

use crate::attack::AttackPredictorParams;
use crate::core::{
    BoundingBox, ClassLabel, Detection, Homography, HomographyIoError, HomographyStore, ImageSize,
    Rgb, TeamId,
};
use crate::line::{AttackSide, OffsideLine, OffsideParams, OffsideVerdict, SideEvidence};
use crate::pipeline::{FrameAnalysis, FrameAnalyzer, FrameAnalyzerParams};
use crate::teams::ColorClassifierParams;
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

#[derive(thiserror::Error, Debug)]
pub enum OffsideIoError {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Homography(#[from] HomographyIoError),
    #[error("no homography configured and none cached in {0}")]
    MissingHomography(String),
}

/// One detector output row: `xyxy` box plus a raw class id.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct RawDetection {
    pub bbox: [f64; 4],
    pub class_id: f32,
    #[serde(default)]
    pub confidence: Option<f32>,
}

impl RawDetection {
    /// `None` for class ids outside player/goalkeeper/ball.
    pub fn to_detection(&self) -> Option<Detection> {
        let label = ClassLabel::from_class_id(self.class_id)?;
        Some(Detection::new(BoundingBox::from_xyxy(self.bbox), label))
    }
}

/// Convert raw detector rows, dropping unknown classes.
pub fn convert_detections(raw: &[RawDetection]) -> Vec<Detection> {
    raw.iter()
        .filter_map(|r| {
            let det = r.to_detection();
            if det.is_none() {
                debug!("ignoring detection with class id {}", r.class_id);
            }
            det
        })
        .collect()
}

/// Load a JSON array of [`RawDetection`]s.
pub fn load_detections(path: impl AsRef<Path>) -> Result<Vec<Detection>, OffsideIoError> {
    let raw = fs::read_to_string(path)?;
    let rows: Vec<RawDetection> = serde_json::from_str(&raw)?;
    Ok(convert_detections(&rows))
}

fn default_results_dir() -> String {
    "results".to_string()
}

/// Configuration for the `offside analyze` command.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalyzeConfig {
    pub image_path: String,
    pub detections_path: String,
    /// Explicit homography file; takes precedence over the results-dir cache.
    #[serde(default)]
    pub homography_path: Option<String>,
    #[serde(default = "default_results_dir")]
    pub results_dir: String,
    #[serde(default)]
    pub output_path: Option<String>,
    #[serde(default)]
    pub frame_overlay_path: Option<String>,
    #[serde(default)]
    pub pitch_overlay_path: Option<String>,
    /// Top-down pitch image to draw on; a plain template is drawn when absent.
    #[serde(default)]
    pub pitch_template_path: Option<String>,
    #[serde(default)]
    pub classifier: Option<ColorClassifierParams>,
    #[serde(default)]
    pub attack: Option<AttackPredictorParams>,
    #[serde(default)]
    pub offside: Option<OffsideParams>,
}

impl AnalyzeConfig {
    pub fn new(image_path: impl Into<String>, detections_path: impl Into<String>) -> Self {
        Self {
            image_path: image_path.into(),
            detections_path: detections_path.into(),
            homography_path: None,
            results_dir: default_results_dir(),
            output_path: None,
            frame_overlay_path: None,
            pitch_overlay_path: None,
            pitch_template_path: None,
            classifier: None,
            attack: None,
            offside: None,
        }
    }

    /// Load a JSON config from disk.
    pub fn load_json(path: impl AsRef<Path>) -> Result<Self, OffsideIoError> {
        let raw = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&raw)?)
    }

    /// Write this config to disk as pretty JSON.
    pub fn write_json(&self, path: impl AsRef<Path>) -> Result<(), OffsideIoError> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }

    /// Resolve the report path, `<results_dir>/offside_report.json` by default.
    pub fn output_path(&self) -> PathBuf {
        self.output_path
            .as_ref()
            .map(PathBuf::from)
            .unwrap_or_else(|| Path::new(&self.results_dir).join("offside_report.json"))
    }

    pub fn store(&self) -> HomographyStore {
        HomographyStore::new(&self.results_dir)
    }

    /// Read the explicit homography file, or fall back to the results-dir cache.
    pub fn load_homography(&self) -> Result<Homography, OffsideIoError> {
        if let Some(path) = &self.homography_path {
            let h = HomographyStore::read(path)?;
            info!("loaded homography from {path}");
            return Ok(h);
        }
        self.store()
            .load()?
            .ok_or_else(|| OffsideIoError::MissingHomography(self.results_dir.clone()))
    }

    pub fn build_params(&self) -> FrameAnalyzerParams {
        let mut params = FrameAnalyzerParams::default();
        if let Some(classifier) = self.classifier.clone() {
            params.classifier = classifier;
        }
        if let Some(attack) = self.attack.clone() {
            params.attack = attack;
        }
        if let Some(offside) = self.offside.clone() {
            params.offside = offside;
        }
        params
    }

    pub fn build_analyzer(&self) -> FrameAnalyzer {
        FrameAnalyzer::new(self.build_params())
    }
}

/// Serializable summary of one analyzed frame.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FrameReport {
    pub image_path: String,
    pub frame: ImageSize,
    #[serde(default)]
    pub analysis: Option<FrameSummary>,
    #[serde(default)]
    pub error: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrameSummary {
    /// Dominant jersey color per team, `Team0` first.
    pub team_colors: [Rgb; 2],
    /// Players per team, `Team0` first.
    pub teams: [Vec<BoundingBox>; 2],
    pub goalkeeper: Option<BoundingBox>,
    pub ball: Option<BoundingBox>,
    pub attack_percent: [f64; 2],
    pub attacking_team: TeamId,
    pub side: AttackSide,
    pub side_evidence: SideEvidence,
    pub offside_line: OffsideLine,
    pub verdicts: Vec<OffsideVerdict>,
    pub offside_count: usize,
}

impl From<&FrameAnalysis> for FrameSummary {
    fn from(a: &FrameAnalysis) -> Self {
        Self {
            team_colors: a.teams.colors(),
            teams: [a.teams.teams[0].players.clone(), a.teams.teams[1].players.clone()],
            goalkeeper: a.roster.goalkeeper,
            ball: a.roster.ball,
            attack_percent: a.attack.percent,
            attacking_team: a.attacking,
            side: a.offside.side,
            side_evidence: a.offside.side_evidence,
            offside_line: a.offside.line.clone(),
            verdicts: a.offside.verdicts.clone(),
            offside_count: a.offside.offside_count,
        }
    }
}

impl FrameReport {
    pub fn new(image_path: impl Into<String>, frame: ImageSize) -> Self {
        Self {
            image_path: image_path.into(),
            frame,
            analysis: None,
            error: None,
        }
    }

    pub fn set_analysis(&mut self, analysis: &FrameAnalysis) {
        self.analysis = Some(FrameSummary::from(analysis));
        self.error = None;
    }

    pub fn set_error(&mut self, err: impl std::fmt::Display) {
        self.analysis = None;
        self.error = Some(err.to_string());
    }

    /// Load a report from JSON on disk.
    pub fn load_json(path: impl AsRef<Path>) -> Result<Self, OffsideIoError> {
        let raw = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&raw)?)
    }

    /// Write this report to disk as pretty JSON, creating parent directories.
    pub fn write_json(&self, path: impl AsRef<Path>) -> Result<(), OffsideIoError> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }
}

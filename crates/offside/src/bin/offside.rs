//! offside CLI: run the single-frame offside analysis on detector output.

use clap::{Args, Parser, Subcommand};
use log::{info, warn};
use offside::io::{load_detections, AnalyzeConfig, FrameReport};
use offside::render::{blank_pitch, rgb_view, RasterRenderer};
use std::path::{Path, PathBuf};

type CliError = Box<dyn std::error::Error>;
type CliResult<T> = Result<T, CliError>;

#[derive(Parser)]
#[command(name = "offside")]
#[command(about = "Offside analysis for a single broadcast football frame")]
#[command(version)]
struct Cli {
    /// Log level when running without the `tracing` feature.
    #[arg(long, global = true, default_value = "info")]
    log_level: log::LevelFilter,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Classify teams, predict the attacking side and flag offside attackers.
    Analyze(AnalyzeArgs),

    /// Print a default analysis config as JSON.
    InitConfig {
        /// Where to write the config; stdout when omitted.
        #[arg(long)]
        out: Option<PathBuf>,
    },
}

#[derive(Debug, Clone, Args)]
struct AnalyzeArgs {
    /// JSON config; the flags below are ignored when it is given.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Path to the input frame.
    #[arg(long, required_unless_present = "config")]
    image: Option<PathBuf>,

    /// Detector output: JSON array of `{ "bbox": [x1, y1, x2, y2], "class_id": n }`.
    #[arg(long, required_unless_present = "config")]
    detections: Option<PathBuf>,

    /// Row-major 3×3 homography JSON. Defaults to `<results-dir>/homography.json`.
    #[arg(long)]
    homography: Option<PathBuf>,

    /// Directory holding the cached homography and default outputs.
    #[arg(long, default_value = "results")]
    results_dir: PathBuf,

    /// Path to write the JSON report.
    #[arg(long)]
    out: Option<PathBuf>,

    /// Path to write the annotated frame.
    #[arg(long)]
    frame_out: Option<PathBuf>,

    /// Path to write the annotated pitch view.
    #[arg(long)]
    pitch_out: Option<PathBuf>,

    /// Pitch template image for the pitch view.
    #[arg(long)]
    pitch_template: Option<PathBuf>,

    /// Seed for jersey color clustering.
    #[arg(long)]
    seed: Option<u64>,
}

fn path_string(p: &Path) -> String {
    p.to_string_lossy().into_owned()
}

impl AnalyzeArgs {
    fn to_config(&self) -> CliResult<AnalyzeConfig> {
        if let Some(path) = &self.config {
            return Ok(AnalyzeConfig::load_json(path)?);
        }
        let (Some(image), Some(detections)) = (&self.image, &self.detections) else {
            return Err("--image and --detections are required without --config".into());
        };

        let mut cfg = AnalyzeConfig::new(path_string(image), path_string(detections));
        cfg.homography_path = self.homography.as_deref().map(path_string);
        cfg.results_dir = path_string(&self.results_dir);
        cfg.output_path = self.out.as_deref().map(path_string);
        cfg.frame_overlay_path = self.frame_out.as_deref().map(path_string);
        cfg.pitch_overlay_path = self.pitch_out.as_deref().map(path_string);
        cfg.pitch_template_path = self.pitch_template.as_deref().map(path_string);
        if let Some(seed) = self.seed {
            let mut classifier = cfg.build_params().classifier;
            classifier.seed = seed;
            cfg.classifier = Some(classifier);
        }
        Ok(cfg)
    }
}

fn main() -> CliResult<()> {
    let cli = Cli::parse();

    #[cfg(not(feature = "tracing"))]
    offside::core::init_with_level(cli.log_level)?;

    #[cfg(feature = "tracing")]
    {
        let _ = cli.log_level;
        let _ = tracing_log::LogTracer::init();
        offside::core::init_tracing(false);
    }

    match cli.command {
        Commands::Analyze(args) => run_analyze(&args.to_config()?),
        Commands::InitConfig { out } => run_init_config(out.as_deref()),
    }
}

fn run_init_config(out: Option<&Path>) -> CliResult<()> {
    let mut cfg = AnalyzeConfig::new("frame.jpg", "detections.json");
    let params = cfg.build_params();
    cfg.classifier = Some(params.classifier);
    cfg.attack = Some(params.attack);
    cfg.offside = Some(params.offside);
    match out {
        Some(path) => {
            cfg.write_json(path)?;
            info!("wrote default config to {}", path.display());
        }
        None => println!("{}", serde_json::to_string_pretty(&cfg)?),
    }
    Ok(())
}

#[cfg_attr(feature = "tracing", tracing::instrument(level = "info", skip_all))]
fn run_analyze(cfg: &AnalyzeConfig) -> CliResult<()> {
    let frame = image::open(&cfg.image_path)?.to_rgb8();
    let detections = load_detections(&cfg.detections_path)?;
    info!(
        "{}: {}x{}, {} detections",
        cfg.image_path,
        frame.width(),
        frame.height(),
        detections.len()
    );

    let view = rgb_view(&frame);
    let mut report = FrameReport::new(cfg.image_path.clone(), view.size());
    let report_path = cfg.output_path();

    let homography = match cfg.load_homography() {
        Ok(h) => h,
        Err(err) => {
            warn!("homography unavailable: {err}");
            report.set_error(&err);
            report.write_json(&report_path)?;
            return Err(err.into());
        }
    };

    let pitch = match &cfg.pitch_template_path {
        Some(path) => image::open(path)?.to_rgb8(),
        None => blank_pitch(),
    };
    let mut renderer = RasterRenderer::new(frame.clone(), pitch);

    let analyzer = cfg.build_analyzer();
    match analyzer.analyze_and_render(&view, &detections, &homography, &mut renderer) {
        Ok(analysis) => {
            report.set_analysis(&analysis);
            report.write_json(&report_path)?;
            println!("offside: {}", analysis.offside_count());
        }
        Err(err) => {
            warn!("analysis failed: {err}");
            report.set_error(&err);
            report.write_json(&report_path)?;
            return Err(err.into());
        }
    }
    info!("wrote report to {}", report_path.display());

    let (frame_out, pitch_out) = renderer.into_images();
    if let Some(path) = &cfg.frame_overlay_path {
        frame_out.save(path)?;
        info!("wrote frame overlay to {path}");
    }
    if let Some(path) = &cfg.pitch_overlay_path {
        pitch_out.save(path)?;
        info!("wrote pitch overlay to {path}");
    }
    Ok(())
}

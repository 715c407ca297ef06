use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use log::info;
use std::path::PathBuf;
use tokio_util::sync::CancellationToken;

use screen_emotion_monitor::config::{MonitorConfig, DEFAULT_CONFIG_FILE};
use screen_emotion_monitor::modules::capture::ScreenRegionSource;
use screen_emotion_monitor::modules::emotion::OnnxEmotionAnalyzer;
use screen_emotion_monitor::modules::report::{build_report, load_session_csv, save_report_charts};
use screen_emotion_monitor::monitor::{EmotionMonitor, MonitorOutcome};
use screen_emotion_monitor::utils::SetupUtils;

#[derive(Parser)]
#[command(name = "screen-emotion-monitor", version, about = "Watch a screen region, read the faces in it and log their emotions")]
struct Cli {
    /// TOML configuration; defaults apply when the file does not exist.
    #[arg(long, default_value = DEFAULT_CONFIG_FILE)]
    config: PathBuf,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Capture, analyse and record until `q`, Escape or Ctrl-C (default).
    Monitor,
    /// Summarise a recorded session CSV.
    Report {
        /// Session CSV; defaults to the configured output file.
        #[arg(long)]
        input: Option<PathBuf>,
        /// Also write the timeline and distribution charts here.
        #[arg(long)]
        charts_dir: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let config = MonitorConfig::load_or_default(&cli.config)
        .with_context(|| format!("loading configuration from {}", cli.config.display()))?;

    match cli.command.unwrap_or(Command::Monitor) {
        Command::Monitor => run_monitor(config).await,
        Command::Report { input, charts_dir } => run_report(&config, input, charts_dir),
    }
}

async fn run_monitor(config: MonitorConfig) -> Result<()> {
    let models = SetupUtils::ensure_models(&config.models.dir)
        .await
        .context("preparing the ONNX models")?;
    let analyzer = OnnxEmotionAnalyzer::new(&models.detector, &models.classifier, &config.detection)
        .context("loading the emotion analyzer")?;
    let source = ScreenRegionSource::open(config.capture.clone()).context("opening the screen for capture")?;

    let shutdown = CancellationToken::new();
    let signal_token = shutdown.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("Ctrl-C received, stopping");
            signal_token.cancel();
        }
    });

    let capture = &config.capture;
    println!(
        "Watching region {}x{} at ({}, {}). Press 'q' in the preview window or Ctrl-C to stop.",
        capture.width, capture.height, capture.left, capture.top
    );

    let mut monitor = EmotionMonitor::new(config, source, analyzer)?;
    let MonitorOutcome { stats, session } = monitor.run(&shutdown)?;

    println!(
        "Stopped ({:?}): {} frames, {} analyses completed, {} failed.",
        stats.stop_reason, stats.frames, stats.completed, stats.failed
    );
    match session {
        Some(session) => {
            println!("Saved {} rows to {}", session.rows, session.csv.display());
            for chart in [&session.timeline_chart, &session.balance_chart].into_iter().flatten() {
                println!("Saved chart {}", chart.display());
            }
        }
        None => println!("No faces were analysed; nothing was saved."),
    }
    Ok(())
}

fn run_report(config: &MonitorConfig, input: Option<PathBuf>, charts_dir: Option<PathBuf>) -> Result<()> {
    let input = input.unwrap_or_else(|| config.output.csv.clone());
    let table = load_session_csv(&input)?;
    let report = build_report(&table, &config.report)?;

    println!("{report}");

    if let Some(dir) = charts_dir {
        let (timeline, distribution) =
            save_report_charts(&report, &table, &dir).with_context(|| format!("writing charts to {}", dir.display()))?;
        println!("Charts saved to {} and {}", timeline.display(), distribution.display());
    }
    Ok(())
}

use log::{info, warn};
use serde::Serialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

use super::log::{EmotionBalance, SessionLog};
use crate::config::OutputConfig;
use crate::modules::emotion::Emotion;
use crate::modules::render::{charts, save_bars_png, save_timeline_png, Bar, EmotionLine, RenderError};

#[derive(Error, Debug)]
pub enum SessionError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Chart error: {0}")]
    Render(#[from] RenderError),
}

/// One row of the wide session CSV.
#[derive(Debug, Serialize)]
struct SessionRow {
    timestamp: f64,
    angry: f32,
    disgust: f32,
    fear: f32,
    happy: f32,
    sad: f32,
    surprise: f32,
    neutral: f32,
    time: f64,
}

/// What was persisted at shutdown.
#[derive(Debug, Clone, PartialEq)]
pub struct FinalizedSession {
    pub rows: usize,
    pub balance: EmotionBalance,
    pub csv: PathBuf,
    pub timeline_chart: Option<PathBuf>,
    pub balance_chart: Option<PathBuf>,
}

pub struct SessionFinalizer {
    output: OutputConfig,
}

impl SessionFinalizer {
    pub fn new(output: OutputConfig) -> Self {
        Self { output }
    }

    /// Writes the CSV and both charts. Returns `None` for an empty log, in
    /// which case nothing touches the disk.
    ///
    /// The CSV is written first; a chart that fails to render is logged and
    /// left out of the result instead of failing the whole shutdown.
    pub fn finalize(&self, log: &SessionLog) -> Result<Option<FinalizedSession>, SessionError> {
        if log.is_empty() {
            info!("No faces were analysed; nothing to save");
            return Ok(None);
        }

        let rows = write_session_csv(log, &self.output.csv)?;
        info!("Saved {} rows to {}", rows, self.output.csv.display());

        let timeline_chart = self.try_chart(&self.output.timeline_chart, |path| {
            save_timeline_png(path, "Screen History", &timeline_lines(log))
        });

        let balance = log.balance();
        let balance_chart = self.try_chart(&self.output.balance_chart, |path| {
            save_bars_png(path, "Emotional Balance", &balance_bars(&balance))
        });

        Ok(Some(FinalizedSession {
            rows,
            balance,
            csv: self.output.csv.clone(),
            timeline_chart,
            balance_chart,
        }))
    }

    fn try_chart<F>(&self, path: &Path, render: F) -> Option<PathBuf>
    where
        F: FnOnce(&Path) -> Result<(), RenderError>,
    {
        match render(path) {
            Ok(()) => {
                info!("Saved chart {}", path.display());
                Some(path.to_path_buf())
            }
            Err(err) => {
                warn!("Could not save chart {}: {}", path.display(), err);
                None
            }
        }
    }
}

/// Overwrites `path` with the wide schema. Returns the number of data rows.
pub fn write_session_csv(log: &SessionLog, path: &Path) -> Result<usize, SessionError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }

    let mut writer = csv::Writer::from_path(path)?;
    for (sample, time) in log.samples().iter().zip(log.relative_seconds()) {
        let scores = &sample.scores;
        writer.serialize(SessionRow {
            timestamp: sample.unix_seconds(),
            angry: scores[Emotion::Angry],
            disgust: scores[Emotion::Disgust],
            fear: scores[Emotion::Fear],
            happy: scores[Emotion::Happy],
            sad: scores[Emotion::Sad],
            surprise: scores[Emotion::Surprise],
            neutral: scores[Emotion::Neutral],
            time,
        })?;
    }
    writer.flush()?;

    Ok(log.len())
}

pub fn timeline_lines(log: &SessionLog) -> Vec<EmotionLine> {
    let times = log.relative_seconds();
    Emotion::ALL
        .into_iter()
        .map(|emotion| EmotionLine {
            emotion,
            label: emotion.as_str(),
            points: log
                .samples()
                .iter()
                .zip(&times)
                .map(|(sample, t)| (*t, sample.scores[emotion] as f64))
                .collect(),
        })
        .collect()
}

pub fn balance_bars(balance: &EmotionBalance) -> Vec<Bar> {
    let colors = [charts::emotion_color(Emotion::Happy), charts::emotion_color(Emotion::Angry), charts::emotion_color(Emotion::Neutral)];
    balance
        .as_bars()
        .into_iter()
        .zip(colors)
        .map(|((label, value), color)| Bar {
            label: label.to_string(),
            value,
            color,
        })
        .collect()
}

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

pub const DEFAULT_CONFIG_FILE: &str = "emotion_monitor.toml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CaptureConfig {
    #[serde(default = "default_top")]
    pub top: u32,
    #[serde(default)]
    pub left: u32,
    #[serde(default = "default_capture_width")]
    pub width: u32,
    #[serde(default = "default_capture_height")]
    pub height: u32,
    #[serde(default)]
    pub monitor_index: usize,
}

impl CaptureConfig {
    pub fn new(left: u32, top: u32, width: u32, height: u32) -> Self {
        Self {
            top,
            left,
            width,
            height,
            monitor_index: 0,
        }
    }
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self::new(0, default_top(), default_capture_width(), default_capture_height())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SamplingConfig {
    #[serde(default = "default_interval_ms")]
    pub interval_ms: u64,
    #[serde(default = "default_history_size")]
    pub history_size: usize,
}

impl SamplingConfig {
    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }
}

impl Default for SamplingConfig {
    fn default() -> Self {
        Self {
            interval_ms: default_interval_ms(),
            history_size: default_history_size(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PreviewConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default = "default_window_title")]
    pub title: String,
    #[serde(default = "default_preview_x")]
    pub x: isize,
    #[serde(default = "default_preview_y")]
    pub y: isize,
    #[serde(default = "default_chart_width")]
    pub chart_width: u32,
    #[serde(default = "default_chart_height")]
    pub chart_height: u32,
    #[serde(default = "default_target_fps")]
    pub target_fps: u32,
}

impl PreviewConfig {
    pub fn frame_period(&self) -> Duration {
        Duration::from_millis(1000 / u64::from(self.target_fps.max(1)))
    }
}

impl Default for PreviewConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            title: default_window_title(),
            x: default_preview_x(),
            y: default_preview_y(),
            chart_width: default_chart_width(),
            chart_height: default_chart_height(),
            target_fps: default_target_fps(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetectionConfig {
    #[serde(default = "default_score_threshold")]
    pub score_threshold: f32,
    #[serde(default = "default_iou_threshold")]
    pub iou_threshold: f32,
}

impl Default for DetectionConfig {
    fn default() -> Self {
        Self {
            score_threshold: default_score_threshold(),
            iou_threshold: default_iou_threshold(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelsConfig {
    #[serde(default = "default_models_dir")]
    pub dir: PathBuf,
}

impl Default for ModelsConfig {
    fn default() -> Self {
        Self { dir: default_models_dir() }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputConfig {
    #[serde(default = "default_csv_path")]
    pub csv: PathBuf,
    #[serde(default = "default_timeline_chart")]
    pub timeline_chart: PathBuf,
    #[serde(default = "default_balance_chart")]
    pub balance_chart: PathBuf,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            csv: default_csv_path(),
            timeline_chart: default_timeline_chart(),
            balance_chart: default_balance_chart(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportConfig {
    #[serde(default = "default_timeline_minutes")]
    pub timeline_minutes: f32,
    #[serde(default = "default_tension_threshold")]
    pub tension_threshold: f32,
    #[serde(default = "default_surprise_threshold")]
    pub surprise_threshold: f32,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            timeline_minutes: default_timeline_minutes(),
            tension_threshold: default_tension_threshold(),
            surprise_threshold: default_surprise_threshold(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MonitorConfig {
    #[serde(default)]
    pub capture: CaptureConfig,
    #[serde(default)]
    pub sampling: SamplingConfig,
    #[serde(default)]
    pub preview: PreviewConfig,
    #[serde(default)]
    pub detection: DetectionConfig,
    #[serde(default)]
    pub models: ModelsConfig,
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default)]
    pub report: ReportConfig,
}

impl MonitorConfig {
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: MonitorConfig = toml::from_str(content)?;
        config.validate().map_err(ConfigError::Invalid)?;
        Ok(config)
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Reads `path` when it exists, otherwise falls back to the built-in defaults.
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if path.exists() {
            log::info!("Loading configuration from {}", path.display());
            Self::from_file(path)
        } else {
            log::info!("No configuration at {}, using defaults", path.display());
            Ok(Self::default())
        }
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.capture.width == 0 || self.capture.height == 0 {
            return Err(format!(
                "Capture region must not be empty, got {}x{}",
                self.capture.width, self.capture.height
            ));
        }

        if self.sampling.interval_ms == 0 {
            return Err("Sampling interval must be greater than 0 ms".to_string());
        }

        if self.sampling.history_size == 0 {
            return Err("History size must be greater than 0".to_string());
        }

        let thresholds = [
            ("score_threshold", self.detection.score_threshold),
            ("iou_threshold", self.detection.iou_threshold),
        ];
        for (name, value) in thresholds {
            if !(0.0..=1.0).contains(&value) {
                return Err(format!(
                    "Detection '{}' has value {}, but must be between 0.0 and 1.0",
                    name, value
                ));
            }
        }

        if self.report.timeline_minutes <= 0.0 {
            return Err(format!(
                "Report timeline must be positive, got {} minutes",
                self.report.timeline_minutes
            ));
        }

        Ok(())
    }
}

fn default_top() -> u32 { 50 }
fn default_capture_width() -> u32 { 800 }
fn default_capture_height() -> u32 { 600 }
fn default_interval_ms() -> u64 { 500 }
fn default_history_size() -> usize { 50 }
fn default_true() -> bool { true }
fn default_window_title() -> String { "PREVIEW - Drag away from capture area".to_string() }
fn default_preview_x() -> isize { 900 }
fn default_preview_y() -> isize { 50 }
fn default_chart_width() -> u32 { 600 }
fn default_chart_height() -> u32 { 400 }
fn default_target_fps() -> u32 { 30 }
fn default_score_threshold() -> f32 { 0.7 }
fn default_iou_threshold() -> f32 { 0.3 }
fn default_models_dir() -> PathBuf { PathBuf::from("models") }
fn default_csv_path() -> PathBuf { PathBuf::from("dados_reuniao.csv") }
fn default_timeline_chart() -> PathBuf { PathBuf::from("final_timeline.png") }
fn default_balance_chart() -> PathBuf { PathBuf::from("final_balance.png") }
fn default_timeline_minutes() -> f32 { 30.0 }
fn default_tension_threshold() -> f32 { 20.0 }
fn default_surprise_threshold() -> f32 { 50.0 }

#[cfg(test)]
mod tests {
    use super::{CaptureConfig, MonitorConfig, SamplingConfig};
    use std::time::Duration;

    #[test]
    fn test_monitor_config_default() {
        let config = MonitorConfig::default();
        assert_eq!(config.capture, CaptureConfig::new(0, 50, 800, 600));
        assert_eq!(config.sampling.interval(), Duration::from_millis(500));
        assert_eq!(config.sampling.history_size, 50);
        assert!(config.preview.enabled);
        assert_eq!(config.output.csv.to_str(), Some("dados_reuniao.csv"));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = MonitorConfig::from_toml_str(
            r#"
            [capture]
            left = 100

            [sampling]
            interval_ms = 250
            "#,
        )
        .unwrap();

        assert_eq!(config.capture.left, 100);
        assert_eq!(config.capture.top, 50);
        assert_eq!(config.sampling.interval_ms, 250);
        assert_eq!(config.sampling.history_size, 50);
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut config = MonitorConfig::default();
        config.sampling = SamplingConfig { interval_ms: 0, history_size: 50 };
        assert!(config.validate().is_err());

        let mut config = MonitorConfig::default();
        config.detection.iou_threshold = 1.5;
        assert!(config.validate().unwrap_err().contains("iou_threshold"));

        let mut config = MonitorConfig::default();
        config.capture.width = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_invalid_toml_is_rejected() {
        assert!(MonitorConfig::from_toml_str("[sampling]\nhistory_size = 0\n").is_err());
        assert!(MonitorConfig::from_toml_str("not = [valid").is_err());
    }
}

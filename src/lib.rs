pub mod config;
pub mod modules;
pub mod monitor;
pub mod utils;

pub use config::{MonitorConfig, ConfigError};
pub use modules::capture::{CaptureError, Frame, FrameSource, ScreenRegionSource};
pub use modules::emotion::{AnalyzerError, Emotion, EmotionAnalyzer, EmotionScores, FaceDetection, FaceRegion, OnnxEmotionAnalyzer};
pub use modules::session::{Aggregator, SessionFinalizer, SessionLog};
pub use monitor::{EmotionMonitor, MonitorError, MonitorOutcome};

#[cfg(test)]
mod _test_mock;

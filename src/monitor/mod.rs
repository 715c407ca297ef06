pub mod runner;
pub mod types;

pub use runner::{EmotionMonitor, SHUTDOWN_GRACE};
pub use types::{LoopStats, MonitorError, MonitorOutcome, StopReason};

use thiserror::Error;

use crate::modules::capture::CaptureError;
use crate::modules::render::RenderError;
use crate::modules::session::{FinalizedSession, SessionError};

#[derive(Error, Debug)]
pub enum MonitorError {
    #[error("Capture failed: {0}")]
    Capture(#[from] CaptureError),

    #[error("Preview failed: {0}")]
    Render(#[from] RenderError),

    #[error("Saving the session failed: {0}")]
    Session(#[from] SessionError),

    #[error("Invalid configuration: {0}")]
    Config(String),
}

/// Why the loop stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StopReason {
    #[default]
    Interrupted,
    QuitKey,
    CaptureFailed,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct LoopStats {
    pub frames: u64,
    pub dispatched: u64,
    pub completed: u64,
    pub failed: u64,
    pub stop_reason: StopReason,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MonitorOutcome {
    pub stats: LoopStats,
    pub session: Option<FinalizedSession>,
}

use screen_emotion_monitor::modules::capture::{CaptureError, Frame, FrameSource};
use tokio_util::sync::CancellationToken;

/// Hands out the same blank frame, cancelling `shutdown` after `stop_after`
/// captures or failing from capture number `fail_after` on.
pub struct ScriptedSource {
    frame: Frame,
    captured: usize,
    stop_after: usize,
    fail_after: Option<usize>,
    shutdown: CancellationToken,
}

impl ScriptedSource {
    pub fn new(shutdown: CancellationToken, stop_after: usize) -> Self {
        Self {
            frame: Frame::blank(64, 48),
            captured: 0,
            stop_after,
            fail_after: None,
            shutdown,
        }
    }

    pub fn failing_after(mut self, captures: usize) -> Self {
        self.fail_after = Some(captures);
        self
    }
}

impl FrameSource for ScriptedSource {
    fn capture(&mut self) -> Result<Frame, CaptureError> {
        if self.fail_after.is_some_and(|limit| self.captured >= limit) {
            return Err(CaptureError::EmptyCapture);
        }

        self.captured += 1;
        if self.captured >= self.stop_after {
            self.shutdown.cancel();
        }
        Ok(self.frame.clone())
    }
}

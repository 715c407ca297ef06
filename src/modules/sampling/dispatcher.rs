use log::{debug, error};
use std::panic::{self, AssertUnwindSafe};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, TryRecvError};
use std::thread;
use std::time::{Duration, Instant};

use crate::modules::capture::Frame;
use crate::modules::emotion::{AnalyzerError, EmotionAnalyzer, FaceDetection};
use crate::utils::panic_message;

pub type AnalysisResult = Result<Vec<FaceDetection>, AnalyzerError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchOutcome {
    Dispatched,
    /// An analysis is still running; the tick is dropped.
    Busy,
    /// The sampling interval has not elapsed since the last dispatch.
    TooSoon,
}

/// Runs at most one analysis at a time off the render thread.
///
/// The dispatcher owns the analyzer while idle. Dispatching moves it, with a
/// copy of the frame, into a short-lived worker thread that sends it back
/// together with the result through a single-slot channel, so "in flight"
/// simply means the analyzer is away.
///
/// The sampling clock starts at construction, so the first analysis runs one
/// interval after the dispatcher is created.
pub struct AnalysisDispatcher<A: EmotionAnalyzer + 'static> {
    analyzer: Option<A>,
    pending: Option<Receiver<(A, AnalysisResult)>>,
    interval: Duration,
    last_dispatch: Instant,
}

impl<A: EmotionAnalyzer + 'static> AnalysisDispatcher<A> {
    pub fn new(analyzer: A, interval: Duration) -> Self {
        Self {
            analyzer: Some(analyzer),
            pending: None,
            interval,
            last_dispatch: Instant::now(),
        }
    }

    pub fn is_busy(&self) -> bool {
        self.pending.is_some()
    }

    /// False once the analyzer has been lost to a worker that could not
    /// report back.
    pub fn is_available(&self) -> bool {
        self.analyzer.is_some() || self.pending.is_some()
    }

    pub fn try_dispatch(&mut self, frame: &Frame, now: Instant) -> DispatchOutcome {
        if self.is_busy() || self.analyzer.is_none() {
            return DispatchOutcome::Busy;
        }

        if now.saturating_duration_since(self.last_dispatch) < self.interval {
            return DispatchOutcome::TooSoon;
        }

        let Some(mut analyzer) = self.analyzer.take() else {
            return DispatchOutcome::Busy;
        };

        let (tx, rx) = mpsc::sync_channel(1);
        let (width, height) = frame.dimensions();
        let frame = frame.clone();

        let spawned = thread::Builder::new()
            .name("emotion-analysis".to_string())
            .spawn(move || {
                let result = panic::catch_unwind(AssertUnwindSafe(|| analyzer.analyze(&frame)))
                    .unwrap_or_else(|payload| Err(AnalyzerError::Panicked(panic_message(payload.as_ref()))));
                let _ = tx.send((analyzer, result));
            });

        if let Err(err) = spawned {
            error!("failed to spawn analysis thread, analyzer dropped: {err}");
            return DispatchOutcome::Busy;
        }

        debug!("analysis dispatched for {width}x{height} frame");
        self.pending = Some(rx);
        self.last_dispatch = now;
        DispatchOutcome::Dispatched
    }

    /// Non-blocking: the finished analysis, if one has landed since the last call.
    pub fn poll(&mut self) -> Option<AnalysisResult> {
        let received = match self.pending.as_ref()?.try_recv() {
            Ok(delivery) => Ok(delivery),
            Err(TryRecvError::Empty) => return None,
            Err(TryRecvError::Disconnected) => Err(()),
        };
        Some(self.accept(received))
    }

    /// Blocks up to `timeout` for the in-flight analysis, if any.
    pub fn wait_idle(&mut self, timeout: Duration) -> Option<AnalysisResult> {
        let received = match self.pending.as_ref()?.recv_timeout(timeout) {
            Ok(delivery) => Ok(delivery),
            Err(RecvTimeoutError::Timeout) => return None,
            Err(RecvTimeoutError::Disconnected) => Err(()),
        };
        Some(self.accept(received))
    }

    fn accept(&mut self, received: Result<(A, AnalysisResult), ()>) -> AnalysisResult {
        self.pending = None;
        match received {
            Ok((analyzer, result)) => {
                self.analyzer = Some(analyzer);
                result
            }
            Err(()) => {
                error!("analysis thread exited without returning the analyzer");
                Err(AnalyzerError::Panicked("analysis thread exited without a result".to_string()))
            }
        }
    }
}

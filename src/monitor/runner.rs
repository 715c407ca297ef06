use chrono::Utc;
use log::{debug, error, info, warn};
use std::thread;
use std::time::{Duration, Instant};
use tokio_util::sync::CancellationToken;

use super::types::{LoopStats, MonitorError, MonitorOutcome, StopReason};
use crate::config::MonitorConfig;
use crate::modules::capture::{Frame, FrameSource};
use crate::modules::emotion::EmotionAnalyzer;
use crate::modules::render::{render_frame, PreviewWindows};
use crate::modules::sampling::{AnalysisDispatcher, AnalysisResult, DispatchOutcome};
use crate::modules::session::{Aggregator, FinalizedSession, SessionError, SessionFinalizer};

/// How long shutdown waits for an analysis that is still running.
pub const SHUTDOWN_GRACE: Duration = Duration::from_secs(2);

/// The capture/render loop with background analysis.
///
/// Dropping the monitor without calling [`EmotionMonitor::run`] to completion
/// still persists whatever the session log holds.
pub struct EmotionMonitor<S: FrameSource, A: EmotionAnalyzer + 'static> {
    config: MonitorConfig,
    source: S,
    dispatcher: AnalysisDispatcher<A>,
    aggregator: Aggregator,
    finalizer: SessionFinalizer,
    stats: LoopStats,
    finalized: bool,
}

impl<S: FrameSource, A: EmotionAnalyzer + 'static> EmotionMonitor<S, A> {
    pub fn new(config: MonitorConfig, source: S, analyzer: A) -> Result<Self, MonitorError> {
        config.validate().map_err(MonitorError::Config)?;

        Ok(Self {
            dispatcher: AnalysisDispatcher::new(analyzer, config.sampling.interval()),
            aggregator: Aggregator::new(config.sampling.history_size),
            finalizer: SessionFinalizer::new(config.output.clone()),
            stats: LoopStats::default(),
            finalized: false,
            source,
            config,
        })
    }

    pub fn aggregator(&self) -> &Aggregator {
        &self.aggregator
    }

    pub fn stats(&self) -> &LoopStats {
        &self.stats
    }

    /// Runs until `shutdown` is cancelled, the preview window asks to quit,
    /// or capture fails. The session is persisted in every case.
    pub fn run(&mut self, shutdown: &CancellationToken) -> Result<MonitorOutcome, MonitorError> {
        let loop_result = if self.config.preview.enabled {
            let (width, height) = (self.config.capture.width, self.config.capture.height);
            match PreviewWindows::open(&self.config.preview, width, height) {
                Ok(mut windows) => self.run_loop(Some(&mut windows), shutdown),
                Err(err) => Err(err.into()),
            }
        } else {
            info!("Preview disabled, running headless");
            self.run_loop(None, shutdown)
        };

        let saved = self.shutdown();

        match (loop_result, saved) {
            (Ok(()), Ok(session)) => Ok(MonitorOutcome {
                stats: self.stats.clone(),
                session,
            }),
            (Ok(()), Err(err)) => Err(err.into()),
            (Err(err), Ok(_)) => Err(err),
            (Err(err), Err(save_err)) => {
                error!("Saving the session failed: {save_err}");
                Err(err)
            }
        }
    }

    fn run_loop(&mut self, mut windows: Option<&mut PreviewWindows>, shutdown: &CancellationToken) -> Result<(), MonitorError> {
        let period = self.config.preview.frame_period();
        let mut chart_dirty = true;

        while !shutdown.is_cancelled() {
            let tick = Instant::now();

            let mut frame = match self.source.capture() {
                Ok(frame) => frame,
                Err(err) => {
                    error!("Capture failed, stopping: {err}");
                    self.stats.stop_reason = StopReason::CaptureFailed;
                    return Err(err.into());
                }
            };
            self.stats.frames += 1;

            if let Some(result) = self.dispatcher.poll() {
                chart_dirty |= self.ingest(result);
            }
            if self.dispatcher.try_dispatch(&frame, tick) == DispatchOutcome::Dispatched {
                self.stats.dispatched += 1;
            }

            match windows.as_deref_mut() {
                Some(windows) => {
                    self.present(windows, &mut frame, &mut chart_dirty)?;
                    if windows.quit_requested() {
                        info!("Quit requested from the preview window");
                        self.stats.stop_reason = StopReason::QuitKey;
                        return Ok(());
                    }
                }
                None => {
                    let elapsed = tick.elapsed();
                    if elapsed < period {
                        thread::sleep(period - elapsed);
                    }
                }
            }
        }

        info!("Stop signal received");
        self.stats.stop_reason = StopReason::Interrupted;
        Ok(())
    }

    /// Returns whether the rolling history changed.
    fn ingest(&mut self, result: AnalysisResult) -> bool {
        match result {
            Ok(detections) => {
                let summary = self.aggregator.ingest(&detections, Utc::now());
                debug!("{} face(s), dominant {:?}", summary.faces.len(), summary.dominant);
                self.stats.completed += 1;
                true
            }
            Err(err) => {
                debug!("Analysis failed: {err}");
                self.stats.failed += 1;
                false
            }
        }
    }

    fn present(&self, windows: &mut PreviewWindows, frame: &mut Frame, chart_dirty: &mut bool) -> Result<(), MonitorError> {
        let chart_size = (*chart_dirty).then(|| windows.chart_size());
        let chart = render_frame(&self.aggregator, frame, chart_size);

        windows.show_frame(frame, self.aggregator.latest().dominant)?;
        match chart {
            Some(argb) => {
                windows.show_chart(&argb)?;
                *chart_dirty = false;
            }
            None => windows.pump_chart(),
        }
        Ok(())
    }

    /// Collects a still-running analysis (bounded wait) and persists the
    /// session. Runs at most once.
    fn shutdown(&mut self) -> Result<Option<FinalizedSession>, SessionError> {
        if self.finalized {
            return Ok(None);
        }
        self.finalized = true;

        if self.dispatcher.is_busy() {
            info!("Waiting for the running analysis to finish...");
            match self.dispatcher.wait_idle(SHUTDOWN_GRACE) {
                Some(result) => {
                    self.ingest(result);
                }
                None => warn!("Analysis still running after {:?}; leaving it behind", SHUTDOWN_GRACE),
            }
        }

        self.finalizer.finalize(self.aggregator.log())
    }
}

impl<S: FrameSource, A: EmotionAnalyzer + 'static> Drop for EmotionMonitor<S, A> {
    fn drop(&mut self) {
        if let Err(err) = self.shutdown() {
            error!("Failed to save the session during cleanup: {err}");
        }
    }
}

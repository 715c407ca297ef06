use chrono::{DateTime, Utc};

use super::history::RollingHistory;
use super::log::{EmotionSample, SessionLog};
use crate::modules::emotion::{Emotion, EmotionScores, FaceDetection, FaceRegion};

/// What the overlay shows until the next analysis lands.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FrameSummary {
    pub faces: Vec<FaceRegion>,
    pub means: Option<EmotionScores>,
    pub dominant: Option<Emotion>,
}

/// Per-emotion mean across the detected faces, `None` when no face was found.
pub fn average_faces(detections: &[FaceDetection]) -> Option<EmotionScores> {
    let faces: Vec<&FaceDetection> = detections.iter().filter(|d| d.is_face()).collect();
    if faces.is_empty() {
        return None;
    }

    let mut sums = EmotionScores::zero();
    for face in &faces {
        for (emotion, value) in face.scores.iter() {
            sums[emotion] += value;
        }
    }

    let count = faces.len() as f32;
    let mut means = EmotionScores::zero();
    for emotion in Emotion::ALL {
        means[emotion] = sums[emotion] / count;
    }
    Some(means)
}

/// Folds analysis results into the rolling history and the session log.
#[derive(Debug, Clone)]
pub struct Aggregator {
    history: RollingHistory,
    log: SessionLog,
    latest: FrameSummary,
}

impl Aggregator {
    pub fn new(history_size: usize) -> Self {
        Self {
            history: RollingHistory::new(history_size),
            log: SessionLog::new(),
            latest: FrameSummary::default(),
        }
    }

    pub fn ingest(&mut self, detections: &[FaceDetection], timestamp: DateTime<Utc>) -> &FrameSummary {
        let faces: Vec<FaceRegion> = detections
            .iter()
            .filter(|d| d.is_face())
            .map(|d| d.region)
            .collect();

        match average_faces(detections) {
            Some(means) => {
                self.history.push(&means);
                self.log.push(EmotionSample::new(timestamp, means));
                self.latest = FrameSummary {
                    faces,
                    means: Some(means),
                    dominant: Some(means.dominant()),
                };
            }
            None => {
                self.history.push_zeros();
                self.latest = FrameSummary::default();
            }
        }

        &self.latest
    }

    pub fn history(&self) -> &RollingHistory {
        &self.history
    }

    pub fn log(&self) -> &SessionLog {
        &self.log
    }

    pub fn latest(&self) -> &FrameSummary {
        &self.latest
    }
}

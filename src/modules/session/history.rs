use std::collections::VecDeque;

use crate::modules::emotion::{Emotion, EmotionScores, EMOTION_COUNT};

/// Last `capacity` intensities per emotion, oldest first. Starts filled with
/// zeros so the live chart always spans the full window.
#[derive(Debug, Clone)]
pub struct RollingHistory {
    capacity: usize,
    series: [VecDeque<f32>; EMOTION_COUNT],
}

impl RollingHistory {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            capacity,
            series: std::array::from_fn(|_| std::iter::repeat(0.0).take(capacity).collect()),
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn push(&mut self, scores: &EmotionScores) {
        for (emotion, value) in scores.iter() {
            let series = &mut self.series[emotion.index()];
            if series.len() == self.capacity {
                series.pop_front();
            }
            series.push_back(value);
        }
    }

    pub fn push_zeros(&mut self) {
        self.push(&EmotionScores::zero());
    }

    pub fn series(&self, emotion: Emotion) -> &VecDeque<f32> {
        &self.series[emotion.index()]
    }

    pub fn latest(&self) -> EmotionScores {
        let mut scores = EmotionScores::zero();
        for emotion in Emotion::ALL {
            scores[emotion] = self.series(emotion).back().copied().unwrap_or(0.0);
        }
        scores
    }
}

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::modules::emotion::{Emotion, EmotionScores};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmotionSample {
    pub timestamp: DateTime<Utc>,
    pub scores: EmotionScores,
}

impl EmotionSample {
    pub fn new(timestamp: DateTime<Utc>, scores: EmotionScores) -> Self {
        Self { timestamp, scores }
    }

    /// Unix seconds with sub-second precision.
    pub fn unix_seconds(&self) -> f64 {
        self.timestamp.timestamp_micros() as f64 / 1_000_000.0
    }
}

/// Positive / negative / neutral split of a whole session.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct EmotionBalance {
    pub positive: f64,
    pub negative: f64,
    pub neutral: f64,
}

impl EmotionBalance {
    pub fn bucket(emotion: Emotion) -> BalanceBucket {
        match emotion {
            Emotion::Happy => BalanceBucket::Positive,
            Emotion::Angry | Emotion::Fear | Emotion::Sad | Emotion::Disgust => BalanceBucket::Negative,
            Emotion::Neutral | Emotion::Surprise => BalanceBucket::Neutral,
        }
    }

    pub fn total(&self) -> f64 {
        self.positive + self.negative + self.neutral
    }

    pub fn as_bars(&self) -> [(&'static str, f64); 3] {
        [
            ("Positive", self.positive),
            ("Negative", self.negative),
            ("Neutral", self.neutral),
        ]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BalanceBucket {
    Positive,
    Negative,
    Neutral,
}

/// Every aggregated sample of one run, in arrival order.
#[derive(Debug, Clone, Default)]
pub struct SessionLog {
    samples: Vec<EmotionSample>,
}

impl SessionLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, sample: EmotionSample) {
        self.samples.push(sample);
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn samples(&self) -> &[EmotionSample] {
        &self.samples
    }

    /// Seconds since the first sample, one entry per sample.
    pub fn relative_seconds(&self) -> Vec<f64> {
        let Some(first) = self.samples.first() else {
            return Vec::new();
        };
        let origin = first.unix_seconds();
        self.samples.iter().map(|s| s.unix_seconds() - origin).collect()
    }

    pub fn column_total(&self, emotion: Emotion) -> f64 {
        self.samples.iter().map(|s| s.scores[emotion] as f64).sum()
    }

    pub fn balance(&self) -> EmotionBalance {
        let mut balance = EmotionBalance::default();
        for emotion in Emotion::ALL {
            let total = self.column_total(emotion);
            match EmotionBalance::bucket(emotion) {
                BalanceBucket::Positive => balance.positive += total,
                BalanceBucket::Negative => balance.negative += total,
                BalanceBucket::Neutral => balance.neutral += total,
            }
        }
        balance
    }
}

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Index, IndexMut};

pub const EMOTION_COUNT: usize = 7;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Emotion {
    Angry,
    Disgust,
    Fear,
    Happy,
    Sad,
    Surprise,
    Neutral,
}

impl Emotion {
    /// Vocabulary order. Every per-emotion table, CSV column list and
    /// argmax tie-break follows it.
    pub const ALL: [Emotion; EMOTION_COUNT] = [
        Emotion::Angry,
        Emotion::Disgust,
        Emotion::Fear,
        Emotion::Happy,
        Emotion::Sad,
        Emotion::Surprise,
        Emotion::Neutral,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Emotion::Angry => "angry",
            Emotion::Disgust => "disgust",
            Emotion::Fear => "fear",
            Emotion::Happy => "happy",
            Emotion::Sad => "sad",
            Emotion::Surprise => "surprise",
            Emotion::Neutral => "neutral",
        }
    }

    /// Name used by the meeting report, where disgust reads as focus and
    /// sadness as reflection.
    pub fn report_label(self) -> &'static str {
        match self {
            Emotion::Disgust => "focused",
            Emotion::Sad => "thoughtful",
            other => other.as_str(),
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        let name = name.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|emotion| emotion.as_str() == name || emotion.report_label() == name)
    }

    pub fn color(self) -> (u8, u8, u8) {
        match self {
            Emotion::Angry => (255, 0, 0),
            Emotion::Disgust => (0, 128, 0),
            Emotion::Fear => (128, 0, 128),
            Emotion::Happy => (255, 215, 0),
            Emotion::Sad => (0, 0, 255),
            Emotion::Surprise => (255, 165, 0),
            Emotion::Neutral => (128, 128, 128),
        }
    }
}

impl fmt::Display for Emotion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One intensity (0-100) per vocabulary emotion.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct EmotionScores([f32; EMOTION_COUNT]);

impl EmotionScores {
    pub fn zero() -> Self {
        Self::default()
    }

    pub fn from_pairs(pairs: &[(Emotion, f32)]) -> Self {
        let mut scores = Self::zero();
        for &(emotion, value) in pairs {
            scores[emotion] = value;
        }
        scores
    }

    pub fn iter(&self) -> impl Iterator<Item = (Emotion, f32)> + '_ {
        Emotion::ALL.into_iter().map(move |emotion| (emotion, self[emotion]))
    }

    pub fn total(&self) -> f32 {
        self.0.iter().sum()
    }

    /// Highest intensity, first in vocabulary order on ties.
    pub fn dominant(&self) -> Emotion {
        let mut best = Emotion::ALL[0];
        for emotion in Emotion::ALL.into_iter().skip(1) {
            if self[emotion] > self[best] {
                best = emotion;
            }
        }
        best
    }
}

impl Index<Emotion> for EmotionScores {
    type Output = f32;

    fn index(&self, emotion: Emotion) -> &f32 {
        &self.0[emotion.index()]
    }
}

impl IndexMut<Emotion> for EmotionScores {
    fn index_mut(&mut self, emotion: Emotion) -> &mut f32 {
        &mut self.0[emotion.index()]
    }
}

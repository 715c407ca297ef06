pub mod analyzer;
pub mod predictor;
pub mod vocabulary;

pub use analyzer::{AnalyzerError, EmotionAnalyzer, FaceDetection, FaceRegion};
pub use predictor::OnnxEmotionAnalyzer;
pub use vocabulary::{Emotion, EmotionScores, EMOTION_COUNT};

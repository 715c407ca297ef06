use crate::modules::capture::{CaptureError, Frame, FrameSource};
use crate::modules::emotion::{AnalyzerError, Emotion, EmotionAnalyzer, EmotionScores, FaceDetection, FaceRegion};

/// Returns the same detections for every frame.
pub struct FixedAnalyzer {
    pub detections: Vec<FaceDetection>,
}

impl FixedAnalyzer {
    pub fn happy_face() -> FaceDetection {
        FaceDetection::new(
            FaceRegion::new(4, 4, 16, 16),
            EmotionScores::from_pairs(&[(Emotion::Happy, 90.0), (Emotion::Neutral, 10.0)]),
        )
    }

    pub fn happy() -> Self {
        Self { detections: vec![Self::happy_face()] }
    }
}

impl EmotionAnalyzer for FixedAnalyzer {
    fn analyze(&mut self, _frame: &Frame) -> Result<Vec<FaceDetection>, AnalyzerError> {
        Ok(self.detections.clone())
    }
}

/// A source whose screen never changes.
pub struct StillSource {
    pub frame: Frame,
}

impl StillSource {
    pub fn new(width: u32, height: u32) -> Self {
        Self { frame: Frame::blank(width, height) }
    }
}

impl FrameSource for StillSource {
    fn capture(&mut self) -> Result<Frame, CaptureError> {
        Ok(self.frame.clone())
    }
}

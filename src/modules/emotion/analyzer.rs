use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::vocabulary::EmotionScores;
use crate::modules::capture::Frame;

#[derive(Error, Debug, Clone)]
pub enum AnalyzerError {
    #[error("IO error: {0}")]
    Io(String),

    #[error("Model loading error: {0}")]
    ModelLoading(String),

    #[error("Inference error: {0}")]
    Inference(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("ONNX Runtime error: {0}")]
    OnnxRuntime(String),

    #[error("Array shape error: {0}")]
    ArrayShape(String),

    #[error("Analyzer panicked: {0}")]
    Panicked(String),
}

impl From<std::io::Error> for AnalyzerError {
    fn from(error: std::io::Error) -> Self {
        AnalyzerError::Io(error.to_string())
    }
}

impl From<ort::Error> for AnalyzerError {
    fn from(error: ort::Error) -> Self {
        AnalyzerError::OnnxRuntime(error.to_string())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct FaceRegion {
    pub x: u32,
    pub y: u32,
    pub w: u32,
    pub h: u32,
}

impl FaceRegion {
    pub fn new(x: u32, y: u32, w: u32, h: u32) -> Self {
        Self { x, y, w, h }
    }

    pub fn is_empty(&self) -> bool {
        self.w == 0 || self.h == 0
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FaceDetection {
    pub region: FaceRegion,
    pub scores: EmotionScores,
}

impl FaceDetection {
    pub fn new(region: FaceRegion, scores: EmotionScores) -> Self {
        Self { region, scores }
    }

    /// Zero-width regions are placeholders some detectors emit when nothing
    /// was found; they never count as a face.
    pub fn is_face(&self) -> bool {
        self.region.w > 0
    }
}

/// Black-box face emotion model: one frame in, zero or more faces out.
pub trait EmotionAnalyzer: Send {
    fn analyze(&mut self, frame: &Frame) -> Result<Vec<FaceDetection>, AnalyzerError>;
}

impl<A: EmotionAnalyzer + ?Sized> EmotionAnalyzer for Box<A> {
    fn analyze(&mut self, frame: &Frame) -> Result<Vec<FaceDetection>, AnalyzerError> {
        (**self).analyze(frame)
    }
}

use image::imageops::{self, FilterType};
use log::debug;
use ort::{
    inputs,
    session::{builder::GraphOptimizationLevel, Session},
    value::Tensor,
};
use std::path::Path;

use super::analyzer::{AnalyzerError, EmotionAnalyzer, FaceDetection, FaceRegion};
use super::vocabulary::{Emotion, EmotionScores};
use crate::config::DetectionConfig;
use crate::modules::capture::Frame;

const DETECTOR_WIDTH: u32 = 320;
const DETECTOR_HEIGHT: u32 = 240;
const CLASSIFIER_SIDE: u32 = 64;
const FER_PLUS_CLASSES: usize = 8;

/// Face detector (UltraFace) followed by a per-face FER+ emotion classifier.
pub struct OnnxEmotionAnalyzer {
    detector: Session,
    classifier: Session,
    score_threshold: f32,
    iou_threshold: f32,
}

impl OnnxEmotionAnalyzer {
    pub fn new(detector_path: &Path, classifier_path: &Path, detection: &DetectionConfig) -> Result<Self, AnalyzerError> {
        let detector = Self::load_session(detector_path)?;
        let classifier = Self::load_session(classifier_path)?;

        Ok(Self {
            detector,
            classifier,
            score_threshold: detection.score_threshold,
            iou_threshold: detection.iou_threshold,
        })
    }

    fn load_session(model_path: &Path) -> Result<Session, AnalyzerError> {
        if !model_path.exists() {
            return Err(AnalyzerError::ModelLoading(format!(
                "ONNX model file not found at {}. Run 'cargo run --bin download-models' first.",
                model_path.display()
            )));
        }

        if Self::is_placeholder_file(model_path)? {
            return Err(AnalyzerError::ModelLoading(format!(
                "ONNX model {} is a placeholder file. Please run 'cargo run --bin download-models' to download the actual model.",
                model_path.display()
            )));
        }

        let session = Session::builder()?
            .with_optimization_level(GraphOptimizationLevel::Level3)?
            .with_intra_threads(1)?
            .commit_from_file(model_path)?;

        Ok(session)
    }

    pub fn is_placeholder_file(file_path: &Path) -> Result<bool, AnalyzerError> {
        if !file_path.exists() {
            return Ok(false);
        }

        let metadata = std::fs::metadata(file_path)?;
        Ok(metadata.len() < 1000)
    }

    fn detect_faces(&mut self, frame: &Frame) -> Result<Vec<FaceRegion>, AnalyzerError> {
        let input = detector_input(frame);
        let input = Tensor::from_array(([1usize, 3, DETECTOR_HEIGHT as usize, DETECTOR_WIDTH as usize], input))?;

        let outputs = self
            .detector
            .run(inputs![input])
            .map_err(|e| AnalyzerError::Inference(format!("Face detector failed: {}", e)))?;

        if outputs.len() < 2 {
            return Err(AnalyzerError::Inference(format!(
                "Face detector returned {} outputs, expected scores and boxes",
                outputs.len()
            )));
        }

        let (_, scores) = outputs[0]
            .try_extract_tensor::<f32>()
            .map_err(|e| AnalyzerError::Inference(format!("Failed to extract scores: {}", e)))?;
        let (_, boxes) = outputs[1]
            .try_extract_tensor::<f32>()
            .map_err(|e| AnalyzerError::Inference(format!("Failed to extract boxes: {}", e)))?;

        let candidates = decode_detections(scores, boxes, frame.width(), frame.height(), self.score_threshold)?;
        let kept = non_max_suppression(candidates, self.iou_threshold);
        debug!("Face detector kept {} region(s)", kept.len());

        Ok(kept.into_iter().map(|candidate| candidate.to_region()).collect())
    }

    fn classify(&mut self, frame: &Frame, region: FaceRegion) -> Result<EmotionScores, AnalyzerError> {
        let input = classifier_input(frame, region)?;
        let input = Tensor::from_array(([1usize, 1, CLASSIFIER_SIDE as usize, CLASSIFIER_SIDE as usize], input))?;

        let outputs = self
            .classifier
            .run(inputs![input])
            .map_err(|e| AnalyzerError::Inference(format!("Emotion classifier failed: {}", e)))?;

        let (shape, data) = outputs[0]
            .try_extract_tensor::<f32>()
            .map_err(|e| AnalyzerError::Inference(format!("Failed to extract output: {}", e)))?;

        let logits = ndarray::Array2::from_shape_vec((shape[0] as usize, shape[1] as usize), data.to_vec())
            .map_err(|e| AnalyzerError::ArrayShape(format!("Failed to create logits array: {}", e)))?;

        if logits.shape() != [1, FER_PLUS_CLASSES] {
            return Err(AnalyzerError::Inference(format!(
                "Unexpected output shape: {:?}, expected [1, {}]",
                logits.shape(),
                FER_PLUS_CLASSES
            )));
        }

        fer_plus_scores(&logits.row(0).to_vec())
    }
}

impl EmotionAnalyzer for OnnxEmotionAnalyzer {
    fn analyze(&mut self, frame: &Frame) -> Result<Vec<FaceDetection>, AnalyzerError> {
        if frame.width() == 0 || frame.height() == 0 {
            return Err(AnalyzerError::InvalidInput("Empty frame".to_string()));
        }

        let regions = self.detect_faces(frame)?;
        let mut detections = Vec::with_capacity(regions.len());
        for region in regions {
            let scores = self.classify(frame, region)?;
            detections.push(FaceDetection::new(region, scores));
        }

        Ok(detections)
    }
}

/// RGB planes resized to the detector input, normalised to roughly [-1, 1].
fn detector_input(frame: &Frame) -> Vec<f32> {
    let resized = imageops::resize(frame.image(), DETECTOR_WIDTH, DETECTOR_HEIGHT, FilterType::Triangle);
    let plane = (DETECTOR_WIDTH * DETECTOR_HEIGHT) as usize;
    let mut input = vec![0.0f32; plane * 3];

    for (i, pixel) in resized.pixels().enumerate() {
        for channel in 0..3 {
            input[channel * plane + i] = (pixel[channel] as f32 - 127.0) / 128.0;
        }
    }

    input
}

fn classifier_input(frame: &Frame, region: FaceRegion) -> Result<Vec<f32>, AnalyzerError> {
    if region.is_empty() {
        return Err(AnalyzerError::InvalidInput("Empty face region".to_string()));
    }

    let face = imageops::crop_imm(frame.image(), region.x, region.y, region.w, region.h).to_image();
    let gray = imageops::grayscale(&face);
    let resized = imageops::resize(&gray, CLASSIFIER_SIDE, CLASSIFIER_SIDE, FilterType::Triangle);

    Ok(resized.pixels().map(|pixel| pixel[0] as f32).collect())
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Candidate {
    pub x1: f32,
    pub y1: f32,
    pub x2: f32,
    pub y2: f32,
    pub score: f32,
}

impl Candidate {
    fn area(&self) -> f32 {
        (self.x2 - self.x1).max(0.0) * (self.y2 - self.y1).max(0.0)
    }

    pub fn iou(&self, other: &Candidate) -> f32 {
        let w = (self.x2.min(other.x2) - self.x1.max(other.x1)).max(0.0);
        let h = (self.y2.min(other.y2) - self.y1.max(other.y1)).max(0.0);
        let intersection = w * h;
        let union = self.area() + other.area() - intersection;

        if union <= 0.0 {
            0.0
        } else {
            intersection / union
        }
    }

    pub fn to_region(&self) -> FaceRegion {
        let x = self.x1.round() as u32;
        let y = self.y1.round() as u32;
        let w = (self.x2.round() as u32).saturating_sub(x);
        let h = (self.y2.round() as u32).saturating_sub(y);
        FaceRegion::new(x, y, w, h)
    }
}

/// Turns raw detector outputs (per-anchor `[background, face]` scores and
/// normalised corner boxes) into candidates in frame pixels.
pub fn decode_detections(
    scores: &[f32],
    boxes: &[f32],
    frame_width: u32,
    frame_height: u32,
    score_threshold: f32,
) -> Result<Vec<Candidate>, AnalyzerError> {
    if scores.len() % 2 != 0 || boxes.len() % 4 != 0 || scores.len() / 2 != boxes.len() / 4 {
        return Err(AnalyzerError::ArrayShape(format!(
            "Mismatched detector outputs: {} scores, {} box values",
            scores.len(),
            boxes.len()
        )));
    }

    let width = frame_width as f32;
    let height = frame_height as f32;

    let candidates = scores
        .chunks_exact(2)
        .zip(boxes.chunks_exact(4))
        .filter(|(score, _)| score[1] > score_threshold)
        .map(|(score, b)| Candidate {
            x1: (b[0] * width).clamp(0.0, width),
            y1: (b[1] * height).clamp(0.0, height),
            x2: (b[2] * width).clamp(0.0, width),
            y2: (b[3] * height).clamp(0.0, height),
            score: score[1],
        })
        .filter(|candidate| candidate.area() > 0.0)
        .collect();

    Ok(candidates)
}

/// Greedy hard NMS, highest score first.
pub fn non_max_suppression(mut candidates: Vec<Candidate>, iou_threshold: f32) -> Vec<Candidate> {
    candidates.sort_by(|a, b| b.score.total_cmp(&a.score));

    let mut kept: Vec<Candidate> = Vec::new();
    for candidate in candidates {
        if kept.iter().all(|k| k.iou(&candidate) <= iou_threshold) {
            kept.push(candidate);
        }
    }
    kept
}

pub fn softmax(logits: &[f32]) -> Vec<f32> {
    let max = logits.iter().copied().fold(f32::NEG_INFINITY, f32::max);
    let exps: Vec<f32> = logits.iter().map(|v| (v - max).exp()).collect();
    let sum: f32 = exps.iter().sum();
    exps.into_iter().map(|v| v / sum).collect()
}

/// Maps FER+ logits (neutral, happiness, surprise, sadness, anger, disgust,
/// fear, contempt) onto the vocabulary as percentages. Contempt has no slot of
/// its own and is folded into disgust.
pub fn fer_plus_scores(logits: &[f32]) -> Result<EmotionScores, AnalyzerError> {
    if logits.len() != FER_PLUS_CLASSES {
        return Err(AnalyzerError::ArrayShape(format!(
            "Expected {} FER+ logits, got {}",
            FER_PLUS_CLASSES,
            logits.len()
        )));
    }

    let p = softmax(logits);
    Ok(EmotionScores::from_pairs(&[
        (Emotion::Neutral, p[0] * 100.0),
        (Emotion::Happy, p[1] * 100.0),
        (Emotion::Surprise, p[2] * 100.0),
        (Emotion::Sad, p[3] * 100.0),
        (Emotion::Angry, p[4] * 100.0),
        (Emotion::Disgust, (p[5] + p[7]) * 100.0),
        (Emotion::Fear, p[6] * 100.0),
    ]))
}

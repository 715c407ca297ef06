pub mod mock;

use screen_emotion_monitor::config::DetectionConfig;
use screen_emotion_monitor::modules::capture::Frame;
use screen_emotion_monitor::modules::emotion::{
    AnalyzerError, Emotion, EmotionAnalyzer, EmotionScores, OnnxEmotionAnalyzer,
};
use std::path::Path;

use mock::{ScriptedAnalyzer, Step};

#[test]
fn test_io_error_conversion() {
    let io_error = std::fs::read_to_string("/nonexistent/path/file.txt").unwrap_err();
    let analyzer_error: AnalyzerError = io_error.into();
    assert!(matches!(analyzer_error, AnalyzerError::Io(_)));
}

#[test]
fn test_onnx_runtime_error_conversion() {
    let ort_error = ort::Error::new("ONNX Runtime error");
    let analyzer_error: AnalyzerError = ort_error.into();
    assert!(matches!(analyzer_error, AnalyzerError::OnnxRuntime(_)));
}

#[test]
fn test_error_display_formatting() {
    assert!(AnalyzerError::Inference("Inference failed".to_string()).to_string().contains("Inference failed"));
    assert!(AnalyzerError::InvalidInput("Invalid input".to_string()).to_string().contains("Invalid input"));
    assert!(AnalyzerError::Panicked("boom".to_string()).to_string().contains("panicked"));
}

#[test]
fn test_missing_model_files() {
    let result = OnnxEmotionAnalyzer::new(
        Path::new("/nonexistent/detector.onnx"),
        Path::new("/nonexistent/classifier.onnx"),
        &DetectionConfig::default(),
    );
    match result {
        Err(AnalyzerError::ModelLoading(message)) => assert!(message.contains("download-models")),
        Err(e) => panic!("Expected ModelLoading error, got: {:?}", e),
        Ok(_) => panic!("Expected error, but got Ok"),
    }
}

#[test]
fn test_placeholder_model_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let placeholder = dir.path().join("detector.onnx");
    std::fs::write(&placeholder, b"placeholder").unwrap();

    assert!(OnnxEmotionAnalyzer::is_placeholder_file(&placeholder).unwrap());
    assert!(!OnnxEmotionAnalyzer::is_placeholder_file(&dir.path().join("absent.onnx")).unwrap());
    assert!(matches!(
        OnnxEmotionAnalyzer::new(&placeholder, &placeholder, &DetectionConfig::default()),
        Err(AnalyzerError::ModelLoading(_))
    ));
}

#[test]
fn test_emotion_names() {
    assert_eq!(Emotion::from_name("Focused"), Some(Emotion::Disgust));
    assert_eq!(Emotion::from_name("thoughtful"), Some(Emotion::Sad));
    assert_eq!(Emotion::from_name("contempt"), None);
    assert_eq!(Emotion::Surprise.to_string(), "surprise");
    assert_eq!(EmotionScores::zero().dominant(), Emotion::Angry);
}

#[test]
fn test_boxed_analyzer_is_an_analyzer() {
    let mut analyzer: Box<dyn EmotionAnalyzer> =
        Box::new(ScriptedAnalyzer::happy().with_step(Step::Fail("first frame".to_string())));
    let frame = Frame::blank(8, 8);

    assert!(analyzer.analyze(&frame).is_err());
    assert_eq!(analyzer.analyze(&frame).unwrap()[0].scores.dominant(), Emotion::Happy);
}

#[test]
#[ignore = "needs the downloaded ONNX models"]
fn test_real_models_on_blank_frame() {
    let mut analyzer = OnnxEmotionAnalyzer::new(
        Path::new("models/ultraface-rfb-320/version-RFB-320.onnx"),
        Path::new("models/emotion-ferplus-8/emotion-ferplus-8.onnx"),
        &DetectionConfig::default(),
    )
    .unwrap();

    let detections = analyzer.analyze(&Frame::blank(320, 240)).unwrap();
    assert!(detections.is_empty());
}

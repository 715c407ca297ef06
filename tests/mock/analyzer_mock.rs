use mockall::mock;
use screen_emotion_monitor::modules::capture::Frame;
use screen_emotion_monitor::modules::emotion::{
    AnalyzerError, Emotion, EmotionAnalyzer, EmotionScores, FaceDetection, FaceRegion,
};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

mock! {
    pub Analyzer {}

    impl EmotionAnalyzer for Analyzer {
        fn analyze(&mut self, frame: &Frame) -> Result<Vec<FaceDetection>, AnalyzerError>;
    }
}

pub fn face(pairs: &[(Emotion, f32)]) -> FaceDetection {
    FaceDetection::new(FaceRegion::new(20, 20, 40, 40), EmotionScores::from_pairs(pairs))
}

pub enum Step {
    Faces(Vec<FaceDetection>),
    Fail(String),
    Panic(String),
}

/// Plays back a fixed script, then repeats `fallback` forever.
pub struct ScriptedAnalyzer {
    steps: VecDeque<Step>,
    fallback: Vec<FaceDetection>,
    delay: Duration,
    calls: Arc<AtomicUsize>,
}

impl ScriptedAnalyzer {
    pub fn new() -> Self {
        Self {
            steps: VecDeque::new(),
            fallback: Vec::new(),
            delay: Duration::ZERO,
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn with_step(mut self, step: Step) -> Self {
        self.steps.push_back(step);
        self
    }

    pub fn with_fallback(mut self, detections: Vec<FaceDetection>) -> Self {
        self.fallback = detections;
        self
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn happy() -> Self {
        Self::new().with_fallback(vec![face(&[(Emotion::Happy, 80.0), (Emotion::Neutral, 20.0)])])
    }

    /// Shared call counter that stays readable after the analyzer is moved.
    pub fn calls(&self) -> Arc<AtomicUsize> {
        Arc::clone(&self.calls)
    }
}

impl EmotionAnalyzer for ScriptedAnalyzer {
    fn analyze(&mut self, _frame: &Frame) -> Result<Vec<FaceDetection>, AnalyzerError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if !self.delay.is_zero() {
            thread::sleep(self.delay);
        }

        match self.steps.pop_front() {
            Some(Step::Faces(detections)) => Ok(detections),
            Some(Step::Fail(message)) => Err(AnalyzerError::Inference(message)),
            Some(Step::Panic(message)) => panic!("{}", message),
            None => Ok(self.fallback.clone()),
        }
    }
}

pub mod mock;

use chrono::Utc;
use screen_emotion_monitor::modules::emotion::{Emotion, FaceDetection, FaceRegion, EmotionScores};
use screen_emotion_monitor::modules::session::{Aggregator, RollingHistory};

use mock::face;

#[test]
fn test_no_faces_appends_zeros_only_to_history() {
    let mut aggregator = Aggregator::new(5);
    aggregator.ingest(&[face(&[(Emotion::Happy, 90.0)])], Utc::now());
    let summary = aggregator.ingest(&[], Utc::now()).clone();

    assert!(summary.faces.is_empty());
    assert!(summary.dominant.is_none());
    for emotion in Emotion::ALL {
        assert_eq!(aggregator.history().latest()[emotion], 0.0);
    }
    assert_eq!(aggregator.log().len(), 1);
}

#[test]
fn test_two_faces_are_averaged() {
    let mut aggregator = Aggregator::new(5);
    let summary = aggregator
        .ingest(
            &[
                face(&[(Emotion::Happy, 40.0), (Emotion::Sad, 60.0)]),
                face(&[(Emotion::Happy, 60.0)]),
            ],
            Utc::now(),
        )
        .clone();

    let means = summary.means.unwrap();
    assert_eq!(means[Emotion::Happy], 50.0);
    assert_eq!(means[Emotion::Sad], 30.0);
    assert_eq!(summary.dominant, Some(Emotion::Happy));
    assert_eq!(summary.faces.len(), 2);
    assert_eq!(aggregator.log().samples()[0].scores, means);
}

#[test]
fn test_dominant_tie_takes_vocabulary_order() {
    let mut aggregator = Aggregator::new(5);
    let summary = aggregator.ingest(&[face(&[(Emotion::Surprise, 50.0), (Emotion::Fear, 50.0)])], Utc::now());
    assert_eq!(summary.dominant, Some(Emotion::Fear));
}

#[test]
fn test_history_is_bounded() {
    let mut history = RollingHistory::new(3);
    for value in [10.0, 20.0, 30.0, 40.0, 50.0] {
        history.push(&EmotionScores::from_pairs(&[(Emotion::Angry, value)]));
        assert_eq!(history.series(Emotion::Angry).len(), 3);
    }
    assert_eq!(history.series(Emotion::Angry).iter().copied().collect::<Vec<_>>(), vec![30.0, 40.0, 50.0]);
}

#[test]
fn test_balance_totals_match_columns() {
    let mut aggregator = Aggregator::new(10);
    let frames = [
        vec![face(&[(Emotion::Happy, 70.0), (Emotion::Neutral, 30.0)])],
        vec![face(&[(Emotion::Angry, 20.0), (Emotion::Disgust, 10.0), (Emotion::Surprise, 70.0)])],
        vec![],
        vec![face(&[(Emotion::Fear, 35.0), (Emotion::Sad, 65.0)]), face(&[(Emotion::Happy, 100.0)])],
    ];
    for detections in &frames {
        aggregator.ingest(detections, Utc::now());
    }

    let log = aggregator.log();
    let balance = log.balance();
    let column_sum: f64 = Emotion::ALL.iter().map(|e| log.column_total(*e)).sum();

    assert_eq!(log.len(), 3);
    assert!(balance.positive >= 0.0 && balance.negative >= 0.0 && balance.neutral >= 0.0);
    assert!((balance.total() - column_sum).abs() < 1e-6);
    assert_eq!(balance.positive, 120.0);
    assert_eq!(balance.negative, 80.0);
    assert_eq!(balance.neutral, 100.0);
}

#[test]
fn test_placeholder_region_is_ignored() {
    let mut aggregator = Aggregator::new(5);
    let placeholder = FaceDetection::new(FaceRegion::new(0, 0, 0, 0), EmotionScores::from_pairs(&[(Emotion::Angry, 99.0)]));
    let summary = aggregator.ingest(&[placeholder], Utc::now());

    assert!(summary.dominant.is_none());
    assert!(aggregator.log().is_empty());
}

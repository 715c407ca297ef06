use chrono::{Duration, TimeZone, Utc};
use screen_emotion_monitor::config::{OutputConfig, ReportConfig};
use screen_emotion_monitor::modules::emotion::{Emotion, EmotionScores};
use screen_emotion_monitor::modules::report::{
    build_report, load_session_csv, parse_session_csv, save_report_charts, ReportError, Trend, Verdict,
};
use screen_emotion_monitor::modules::session::{EmotionSample, SessionFinalizer, SessionLog};

fn recorded_session(rows: &[&[(Emotion, f32)]]) -> SessionLog {
    let origin = Utc.timestamp_opt(1_700_000_000, 0).unwrap();
    let mut log = SessionLog::new();
    for (i, pairs) in rows.iter().enumerate() {
        let at = origin + Duration::seconds(10 * i as i64);
        log.push(EmotionSample::new(at, EmotionScores::from_pairs(pairs)));
    }
    log
}

#[test]
fn test_report_reads_what_the_monitor_writes() {
    let dir = tempfile::tempdir().unwrap();
    let output = OutputConfig {
        csv: dir.path().join("dados_reuniao.csv"),
        timeline_chart: dir.path().join("final_timeline.png"),
        balance_chart: dir.path().join("final_balance.png"),
    };
    let log = recorded_session(&[
        &[(Emotion::Disgust, 30.0), (Emotion::Sad, 30.0)],
        &[(Emotion::Disgust, 20.0), (Emotion::Sad, 20.0)],
        &[(Emotion::Fear, 45.0), (Emotion::Neutral, 55.0)],
    ]);

    let finalized = SessionFinalizer::new(output.clone()).finalize(&log).unwrap().unwrap();
    assert_eq!(finalized.rows, 3);

    let table = load_session_csv(&output.csv).unwrap();
    assert_eq!(table.rows(), 3);
    assert_eq!(table.emotions().count(), 7);
    assert_eq!(table.time().unwrap(), &[0.0, 10.0, 20.0]);

    let report = build_report(&table, &ReportConfig::default()).unwrap();
    assert_eq!(report.scaled_time, vec![0.0, 15.0, 30.0]);
    assert!((report.productivity - 100.0 / 3.0).abs() < 1e-4);
    assert_eq!(report.verdict, Verdict::Neutral);
    assert_eq!(report.focus_trend, Trend::Decreased);
    assert_eq!(report.tension_moments.len(), 1);
    assert_eq!(report.tension_moments[0].minute, 30.0);

    let text = report.to_string();
    assert!(text.contains("Formal/neutral meeting."));
    assert!(text.contains("attention decreased"));
    assert!(text.contains("focused"));
}

#[test]
fn test_productive_meeting_verdict() {
    let csv = "\
timestamp,angry,disgust,fear,happy,sad,surprise,neutral,time
1.0,0,30,0,40,20,0,10,0
2.0,0,30,0,40,20,70,10,5
";
    let table = parse_session_csv(csv.as_bytes()).unwrap();
    let report = build_report(&table, &ReportConfig::default()).unwrap();

    assert_eq!(report.productivity, 50.0);
    assert_eq!(report.verdict, Verdict::HighlyProductive);
    assert_eq!(report.surprise_peak, Some(30.0));
    assert!(report.to_string().contains("Moment of surprise at around 30.00 min."));
}

#[test]
fn test_positive_and_tense_verdicts() {
    let positive = parse_session_csv("happy,neutral\n35,65\n".as_bytes()).unwrap();
    let report = build_report(&positive, &ReportConfig::default()).unwrap();
    assert_eq!(report.verdict, Verdict::LightPositive);
    assert_eq!(report.predominant, Emotion::Neutral);

    let tense = parse_session_csv("angry,fear,neutral\n10,10,80\n".as_bytes()).unwrap();
    let report = build_report(&tense, &ReportConfig::default()).unwrap();
    assert_eq!(report.verdict, Verdict::Tense);
    assert!(report.tension_moments.is_empty());
    assert!(report.to_string().contains("No significant stress peak detected."));
}

#[test]
fn test_header_only_file_is_empty() {
    let table = parse_session_csv("timestamp,happy,time\n".as_bytes()).unwrap();
    assert!(matches!(build_report(&table, &ReportConfig::default()), Err(ReportError::Empty)));
}

#[test]
fn test_missing_file_message() {
    let err = load_session_csv(std::path::Path::new("no_such_session.csv")).unwrap_err();
    assert!(err.to_string().contains("no_such_session.csv"));
    assert!(err.to_string().contains("not found"));
}

#[test]
fn test_report_charts_written() {
    let dir = tempfile::tempdir().unwrap();
    let table = parse_session_csv("happy,sad,time\n10,20,0\n30,40,1\n".as_bytes()).unwrap();
    let report = build_report(&table, &ReportConfig::default()).unwrap();

    let (timeline, distribution) = save_report_charts(&report, &table, &dir.path().join("charts")).unwrap();
    assert!(timeline.ends_with("report_timeline.png"));
    assert!(timeline.exists());
    assert!(distribution.exists());
}

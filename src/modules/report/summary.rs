use std::fmt;
use std::path::{Path, PathBuf};

use super::loader::{ReportError, SessionTable};
use crate::config::ReportConfig;
use crate::modules::emotion::Emotion;
use crate::modules::render::{charts, save_bars_png, save_timeline_png, Bar, EmotionLine};

const PRODUCTIVE: [Emotion; 2] = [Emotion::Disgust, Emotion::Sad];
const TENSE: [Emotion; 2] = [Emotion::Angry, Emotion::Fear];

const HIGH_PRODUCTIVITY: f64 = 40.0;
const HIGH_WELLBEING: f64 = 30.0;
const HIGH_TENSION: f64 = 15.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    HighlyProductive,
    LightPositive,
    Tense,
    Neutral,
}

impl Verdict {
    pub fn decide(productivity: f64, wellbeing: f64, tension: f64) -> Self {
        if productivity > HIGH_PRODUCTIVITY {
            Verdict::HighlyProductive
        } else if wellbeing > HIGH_WELLBEING {
            Verdict::LightPositive
        } else if tension > HIGH_TENSION {
            Verdict::Tense
        } else {
            Verdict::Neutral
        }
    }

    pub fn headline(self) -> &'static str {
        match self {
            Verdict::HighlyProductive => "Highly productive and focused meeting.",
            Verdict::LightPositive => "Light and positive meeting.",
            Verdict::Tense => "Tense or conflicting meeting.",
            Verdict::Neutral => "Formal/neutral meeting.",
        }
    }

    pub fn detail(self) -> &'static str {
        match self {
            Verdict::HighlyProductive => "High levels of concentration and reflection point to efficient work.",
            Verdict::LightPositive => "Relaxed atmosphere and good receptiveness.",
            Verdict::Tense => "Signs of discomfort deserve a closer look.",
            Verdict::Neutral => "No major emotional swings.",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trend {
    Increased,
    Decreased,
}

impl Trend {
    pub fn as_str(self) -> &'static str {
        match self {
            Trend::Increased => "increased",
            Trend::Decreased => "decreased",
        }
    }
}

/// A row where anger or fear crossed the tension threshold.
#[derive(Debug, Clone, PartialEq)]
pub struct TensionMoment {
    pub row: usize,
    pub minute: f64,
    pub values: Vec<(Emotion, f64)>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MeetingReport {
    pub duration_minutes: f64,
    pub rows: usize,
    pub productivity: f64,
    pub wellbeing: f64,
    pub tension: f64,
    pub predominant: Emotion,
    pub distribution: Vec<(Emotion, f64)>,
    pub scaled_time: Vec<f64>,
    pub tension_moments: Vec<TensionMoment>,
    /// True when neither anger nor fear is present in the file.
    pub no_tension_data: bool,
    pub verdict: Verdict,
    pub focus_trend: Trend,
    pub surprise_peak: Option<f64>,
}

/// Stretches the session onto a fixed `minutes` axis.
pub fn scaled_time(table: &SessionTable, minutes: f64) -> Vec<f64> {
    match table.time() {
        Some(time) => {
            let max = time.iter().copied().fold(f64::NEG_INFINITY, f64::max);
            if max > 0.0 {
                time.iter().map(|t| t / max * minutes).collect()
            } else {
                vec![0.0; time.len()]
            }
        }
        None => {
            let len = table.rows() as f64;
            (0..table.rows()).map(|i| i as f64 / len * minutes).collect()
        }
    }
}

fn mean(values: impl IntoIterator<Item = f64>) -> Option<f64> {
    let (sum, count) = values
        .into_iter()
        .fold((0.0, 0usize), |(sum, count), v| (sum + v, count + 1));
    (count > 0).then(|| sum / count as f64)
}

/// Per-row sum over the given emotions, `None` when none of them is present.
fn row_sums(table: &SessionTable, emotions: &[Emotion]) -> Option<Vec<f64>> {
    let columns: Vec<&[f64]> = emotions.iter().filter_map(|e| table.column(*e)).collect();
    if columns.is_empty() {
        return None;
    }
    Some((0..table.rows()).map(|row| columns.iter().map(|c| c[row]).sum()).collect())
}

pub fn build_report(table: &SessionTable, config: &ReportConfig) -> Result<MeetingReport, ReportError> {
    if table.is_empty() {
        return Err(ReportError::Empty);
    }

    let minutes = config.timeline_minutes as f64;
    let scaled = scaled_time(table, minutes);

    let productive = row_sums(table, &PRODUCTIVE);
    let productivity = productive.as_ref().and_then(|sums| mean(sums.iter().copied())).unwrap_or(0.0);
    let wellbeing = table
        .column(Emotion::Happy)
        .and_then(|c| mean(c.iter().copied()))
        .unwrap_or(0.0);
    let tension = row_sums(table, &TENSE)
        .and_then(|sums| mean(sums))
        .unwrap_or(0.0);

    let distribution: Vec<(Emotion, f64)> = table
        .columns()
        .iter()
        .map(|(emotion, values)| (*emotion, mean(values.iter().copied()).unwrap_or(0.0)))
        .collect();

    let predominant = distribution
        .iter()
        .copied()
        .reduce(|best, candidate| if candidate.1 > best.1 { candidate } else { best })
        .ok_or_else(|| ReportError::UnsupportedSchema("no emotion columns".to_string()))?;

    let tense_columns: Vec<(Emotion, &[f64])> = TENSE
        .iter()
        .filter_map(|e| table.column(*e).map(|c| (*e, c)))
        .collect();
    let tension_threshold = config.tension_threshold as f64;
    let tension_moments = (0..table.rows())
        .filter(|row| tense_columns.iter().any(|(_, c)| c[*row] > tension_threshold))
        .map(|row| TensionMoment {
            row,
            minute: scaled[row],
            values: tense_columns.iter().map(|(e, c)| (*e, c[row])).collect(),
        })
        .collect();

    let half = table.rows() / 2;
    let focus_trend = match productive {
        Some(sums) => {
            let first = mean(sums[..half].iter().copied());
            let second = mean(sums[half..].iter().copied());
            match (first, second) {
                (Some(first), Some(second)) if second > first => Trend::Increased,
                _ => Trend::Decreased,
            }
        }
        None => Trend::Decreased,
    };

    let surprise_threshold = config.surprise_threshold as f64;
    let surprise_peak = table.column(Emotion::Surprise).and_then(|column| {
        let (index, max) = column
            .iter()
            .enumerate()
            .fold((0, f64::NEG_INFINITY), |best, (i, v)| if *v > best.1 { (i, *v) } else { best });
        (max > surprise_threshold).then(|| scaled[index])
    });

    Ok(MeetingReport {
        duration_minutes: minutes,
        rows: table.rows(),
        productivity,
        wellbeing,
        tension,
        predominant: predominant.0,
        distribution,
        scaled_time: scaled,
        tension_moments,
        no_tension_data: tense_columns.is_empty(),
        verdict: Verdict::decide(productivity, wellbeing, tension),
        focus_trend,
        surprise_peak,
    })
}

impl fmt::Display for MeetingReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Executive Emotional Analysis Report")?;
        writeln!(f, "===================================")?;
        writeln!(f, "Simulated duration:  {:.1} min", self.duration_minutes)?;
        writeln!(f, "Productivity level:  {:.1}%", self.productivity)?;
        writeln!(f, "Well-being level:    {:.1}%", self.wellbeing)?;
        writeln!(f, "Predominant state:   {}", self.predominant.report_label().to_uppercase())?;
        writeln!(f)?;

        writeln!(f, "Overall distribution:")?;
        for (emotion, value) in &self.distribution {
            writeln!(f, "  {:<11} {:>6.1}%", emotion.report_label(), value)?;
        }
        writeln!(f)?;

        writeln!(f, "Moments of attention (anger or fear above threshold):")?;
        if self.no_tension_data {
            writeln!(f, "  No negative emotion data to analyse.")?;
        } else if self.tension_moments.is_empty() {
            writeln!(f, "  No significant stress peak detected.")?;
        } else {
            for moment in &self.tension_moments {
                let values: Vec<String> = moment
                    .values
                    .iter()
                    .map(|(emotion, value)| format!("{}={:.1}", emotion.report_label(), value))
                    .collect();
                writeln!(f, "  {:>6.2} min  {}", moment.minute, values.join(" "))?;
            }
        }
        writeln!(f)?;

        writeln!(f, "Verdict: {}", self.verdict.headline())?;
        writeln!(f, "{}", self.verdict.detail())?;
        writeln!(
            f,
            "Focus trend: attention {} in the second half of the meeting.",
            self.focus_trend.as_str()
        )?;
        if let Some(minute) = self.surprise_peak {
            writeln!(f, "Moment of surprise at around {:.2} min.", minute)?;
        }
        Ok(())
    }
}

/// Writes `report_timeline.png` and `report_distribution.png` into `dir`.
pub fn save_report_charts(report: &MeetingReport, table: &SessionTable, dir: &Path) -> Result<(PathBuf, PathBuf), ReportError> {
    std::fs::create_dir_all(dir)?;

    let lines: Vec<EmotionLine> = table
        .columns()
        .iter()
        .map(|(emotion, values)| EmotionLine {
            emotion: *emotion,
            label: emotion.report_label(),
            points: report.scaled_time.iter().copied().zip(values.iter().copied()).collect(),
        })
        .collect();
    let timeline = dir.join("report_timeline.png");
    save_timeline_png(&timeline, "Timeline (minutes)", &lines)?;

    let bars: Vec<Bar> = report
        .distribution
        .iter()
        .map(|(emotion, value)| Bar {
            label: emotion.report_label().to_string(),
            value: *value,
            color: charts::emotion_color(*emotion),
        })
        .collect();
    let distribution = dir.join("report_distribution.png");
    save_bars_png(&distribution, "Overall Distribution", &bars)?;

    Ok((timeline, distribution))
}

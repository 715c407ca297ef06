use plotters::coord::ranged1d::{IntoSegmentedCoord, SegmentValue};
use plotters::coord::Shift;
use plotters::prelude::*;
use std::ops::Range;
use std::path::Path;

use super::fonts::FONT_FAMILY;
use super::{guarded, RenderError};
use crate::modules::emotion::Emotion;
use crate::modules::session::RollingHistory;

pub const TIMELINE_SIZE: (u32, u32) = (1000, 500);
pub const BAR_CHART_SIZE: (u32, u32) = (600, 400);
/// Below this the margins and label areas leave no plotting area.
pub const MIN_LIVE_CHART_SIZE: (u32, u32) = (120, 80);

/// One emotion's points for a line chart.
#[derive(Debug, Clone)]
pub struct EmotionLine {
    pub emotion: Emotion,
    pub label: &'static str,
    pub points: Vec<(f64, f64)>,
}

#[derive(Debug, Clone)]
pub struct Bar {
    pub label: String,
    pub value: f64,
    pub color: RGBColor,
}

pub fn emotion_color(emotion: Emotion) -> RGBColor {
    let (r, g, b) = emotion.color();
    RGBColor(r, g, b)
}

fn chart_err<E: std::fmt::Display>(error: E) -> RenderError {
    RenderError::Chart(error.to_string())
}

pub fn draw_emotion_lines<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    title: &str,
    lines: &[EmotionLine],
    x_range: Range<f64>,
) -> Result<(), RenderError> {
    root.fill(&WHITE).map_err(chart_err)?;

    let mut chart = ChartBuilder::on(root)
        .caption(title, (FONT_FAMILY, 20))
        .margin(10)
        .x_label_area_size(30)
        .y_label_area_size(40)
        .build_cartesian_2d(x_range, 0f64..100f64)
        .map_err(chart_err)?;

    chart.configure_mesh().draw().map_err(chart_err)?;

    for line in lines {
        let color = emotion_color(line.emotion);
        chart
            .draw_series(LineSeries::new(line.points.iter().copied(), color.stroke_width(2)))
            .map_err(chart_err)?
            .label(line.label)
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], color));
    }

    chart
        .configure_series_labels()
        .position(SeriesLabelPosition::UpperLeft)
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .draw()
        .map_err(chart_err)?;

    root.present().map_err(chart_err)
}

pub fn draw_bars<DB: DrawingBackend>(root: &DrawingArea<DB, Shift>, title: &str, bars: &[Bar]) -> Result<(), RenderError> {
    root.fill(&WHITE).map_err(chart_err)?;

    let max = bars.iter().map(|bar| bar.value).fold(0.0, f64::max);
    let y_max = if max > 0.0 { max * 1.1 } else { 1.0 };
    let labels: Vec<String> = bars.iter().map(|bar| bar.label.clone()).collect();

    let mut chart = ChartBuilder::on(root)
        .caption(title, (FONT_FAMILY, 20))
        .margin(10)
        .x_label_area_size(30)
        .y_label_area_size(60)
        .build_cartesian_2d((0..bars.len() as i32).into_segmented(), 0f64..y_max)
        .map_err(chart_err)?;

    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_label_formatter(&|value| match value {
            SegmentValue::CenterOf(i) => labels.get(*i as usize).cloned().unwrap_or_default(),
            _ => String::new(),
        })
        .draw()
        .map_err(chart_err)?;

    chart
        .draw_series(bars.iter().enumerate().map(|(i, bar)| {
            let i = i as i32;
            let mut rect = Rectangle::new(
                [(SegmentValue::Exact(i), 0.0), (SegmentValue::Exact(i + 1), bar.value)],
                bar.color.filled(),
            );
            rect.set_margin(0, 0, 10, 10);
            rect
        }))
        .map_err(chart_err)?;

    root.present().map_err(chart_err)
}

pub fn save_timeline_png(path: &Path, title: &str, lines: &[EmotionLine]) -> Result<(), RenderError> {
    let x_max = lines
        .iter()
        .flat_map(|line| line.points.iter().map(|(x, _)| *x))
        .fold(0.0, f64::max);
    let x_range = 0.0..if x_max > 0.0 { x_max } else { 1.0 };

    guarded(|| {
        let root = BitMapBackend::new(path, TIMELINE_SIZE).into_drawing_area();
        draw_emotion_lines(&root, title, lines, x_range)
    })
}

pub fn save_bars_png(path: &Path, title: &str, bars: &[Bar]) -> Result<(), RenderError> {
    guarded(|| {
        let root = BitMapBackend::new(path, BAR_CHART_SIZE).into_drawing_area();
        draw_bars(&root, title, bars)
    })
}

/// Renders the rolling history into an RGB byte buffer of `width * height * 3`.
pub fn render_live_chart(history: &RollingHistory, width: u32, height: u32) -> Result<Vec<u8>, RenderError> {
    let (min_width, min_height) = MIN_LIVE_CHART_SIZE;
    if width < min_width || height < min_height {
        return Err(RenderError::Chart(format!(
            "live chart area {width}x{height} is smaller than {min_width}x{min_height}"
        )));
    }

    let mut buffer = vec![0u8; (width as usize) * (height as usize) * 3];
    let lines: Vec<EmotionLine> = Emotion::ALL
        .into_iter()
        .map(|emotion| EmotionLine {
            emotion,
            label: emotion.as_str(),
            points: history
                .series(emotion)
                .iter()
                .enumerate()
                .map(|(i, v)| (i as f64, *v as f64))
                .collect(),
        })
        .collect();

    guarded(|| {
        let root = BitMapBackend::with_buffer(&mut buffer, (width, height)).into_drawing_area();
        let x_max = history.capacity().saturating_sub(1).max(1) as f64;
        draw_emotion_lines(&root, "Real-Time Screen Analysis", &lines, 0.0..x_max)
    })?;

    Ok(buffer)
}

use plotters::prelude::*;

use super::charts::emotion_color;
use super::fonts::FONT_FAMILY;
use super::{guarded, RenderError};
use crate::modules::capture::Frame;
use crate::modules::session::FrameSummary;

const BOX_STROKE: u32 = 2;
const SWATCH: (i32, i32, i32, i32) = (10, 10, 50, 30);
const LABEL_GAP: i32 = 8;
const LABEL_SIZE: u32 = 24;

/// Draws the latest analysis onto the frame: a green box per face and a
/// swatch in the dominant emotion's color.
pub fn draw_overlay(frame: &mut Frame, summary: &FrameSummary) -> Result<(), RenderError> {
    if summary.faces.is_empty() && summary.dominant.is_none() {
        return Ok(());
    }

    let (width, height) = frame.dimensions();
    let buffer: &mut [u8] = frame.image_mut();
    guarded(|| {
        let root = BitMapBackend::with_buffer(buffer, (width, height)).into_drawing_area();

        for face in &summary.faces {
            let top_left = (face.x as i32, face.y as i32);
            let bottom_right = ((face.x + face.w) as i32, (face.y + face.h) as i32);
            root.draw(&Rectangle::new([top_left, bottom_right], GREEN.stroke_width(BOX_STROKE)))
                .map_err(chart_err)?;
        }

        if let Some(dominant) = summary.dominant {
            let color = emotion_color(dominant);
            let (x0, y0, x1, y1) = SWATCH;
            root.draw(&Rectangle::new([(x0, y0), (x1, y1)], color.filled()))
                .map_err(chart_err)?;
            root.draw(&Text::new(
                dominant.as_str().to_uppercase(),
                (x1 + LABEL_GAP, y0),
                (FONT_FAMILY, LABEL_SIZE).into_font().color(&color),
            ))
            .map_err(chart_err)?;
        }

        root.present().map_err(chart_err)
    })
}

fn chart_err<E: std::fmt::Display>(error: E) -> RenderError {
    RenderError::Chart(error.to_string())
}

use log::info;
use minifb::{Key, ScaleMode, Window, WindowOptions};

use super::RenderError;
use crate::config::PreviewConfig;
use crate::modules::capture::Frame;
use crate::modules::emotion::Emotion;

fn window_options() -> WindowOptions {
    WindowOptions {
        resize: true,
        scale_mode: ScaleMode::AspectRatioStretch,
        ..WindowOptions::default()
    }
}

/// The two on-screen windows: the annotated capture and the live chart.
pub struct PreviewWindows {
    preview: Window,
    chart: Window,
    base_title: String,
    shown_title: String,
    chart_size: (usize, usize),
}

impl PreviewWindows {
    pub fn open(config: &PreviewConfig, frame_width: u32, frame_height: u32) -> Result<Self, RenderError> {
        let mut preview = Window::new(&config.title, frame_width as usize, frame_height as usize, window_options())?;
        preview.set_position(config.x, config.y);
        preview.set_target_fps(config.target_fps as usize);

        let chart_size = (config.chart_width as usize, config.chart_height as usize);
        let mut chart = Window::new("Real-Time Screen Analysis", chart_size.0, chart_size.1, window_options())?;
        chart.set_position(config.x, config.y + frame_height as isize + 40);

        info!("Preview windows opened at ({}, {})", config.x, config.y);

        Ok(Self {
            preview,
            chart,
            base_title: config.title.clone(),
            shown_title: config.title.clone(),
            chart_size,
        })
    }

    pub fn chart_size(&self) -> (u32, u32) {
        (self.chart_size.0 as u32, self.chart_size.1 as u32)
    }

    pub fn show_frame(&mut self, frame: &Frame, dominant: Option<Emotion>) -> Result<(), RenderError> {
        let title = match dominant {
            Some(emotion) => format!("{} - {}", self.base_title, emotion.as_str().to_uppercase()),
            None => self.base_title.clone(),
        };
        if title != self.shown_title {
            self.preview.set_title(&title);
            self.shown_title = title;
        }

        let (width, height) = frame.dimensions();
        self.preview
            .update_with_buffer(&frame.to_argb(), width as usize, height as usize)?;
        Ok(())
    }

    pub fn show_chart(&mut self, argb: &[u32]) -> Result<(), RenderError> {
        self.chart
            .update_with_buffer(argb, self.chart_size.0, self.chart_size.1)?;
        Ok(())
    }

    /// Keeps the chart window responsive on iterations without a new chart.
    pub fn pump_chart(&mut self) {
        self.chart.update();
    }

    /// `q` or Escape in either window, or closing the preview window.
    pub fn quit_requested(&self) -> bool {
        !self.preview.is_open() || [&self.preview, &self.chart].into_iter().any(quit_key_down)
    }
}

fn quit_key_down(window: &Window) -> bool {
    window.is_key_down(Key::Q) || window.is_key_down(Key::Escape)
}

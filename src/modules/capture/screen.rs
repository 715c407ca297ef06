use image::imageops;
use log::{debug, info};
use thiserror::Error;
use xcap::Monitor;

use super::frame::Frame;
use crate::config::CaptureConfig;

#[derive(Error, Debug)]
pub enum CaptureError {
    #[error("Monitor error: {0}")]
    Monitor(String),

    #[error("No monitor at index {0}")]
    NoMonitor(usize),

    #[error("Captured empty screenshot - possible permission issue or no display")]
    EmptyCapture,

    #[error("Capture region ({left},{top},{width}x{height}) exceeds screen {screen_width}x{screen_height}")]
    OutOfBounds {
        left: u32,
        top: u32,
        width: u32,
        height: u32,
        screen_width: u32,
        screen_height: u32,
    },
}

impl From<xcap::XCapError> for CaptureError {
    fn from(error: xcap::XCapError) -> Self {
        CaptureError::Monitor(error.to_string())
    }
}

/// Anything that can hand out the current contents of the watched region.
pub trait FrameSource {
    fn capture(&mut self) -> Result<Frame, CaptureError>;
}

impl<S: FrameSource + ?Sized> FrameSource for Box<S> {
    fn capture(&mut self) -> Result<Frame, CaptureError> {
        (**self).capture()
    }
}

/// Grabs a fixed rectangle of one monitor.
pub struct ScreenRegionSource {
    monitor: Monitor,
    region: CaptureConfig,
}

impl ScreenRegionSource {
    pub fn open(region: CaptureConfig) -> Result<Self, CaptureError> {
        let monitors = Monitor::all()?;
        info!("Detected {} monitor(s)", monitors.len());

        let monitor = monitors
            .into_iter()
            .nth(region.monitor_index)
            .ok_or(CaptureError::NoMonitor(region.monitor_index))?;

        Ok(Self { monitor, region })
    }
}

impl FrameSource for ScreenRegionSource {
    fn capture(&mut self) -> Result<Frame, CaptureError> {
        let screenshot = self.monitor.capture_image()?;
        let (screen_width, screen_height) = screenshot.dimensions();
        if (screen_width, screen_height) == (0, 0) {
            return Err(CaptureError::EmptyCapture);
        }

        let region = &self.region;
        check_bounds(region, screen_width, screen_height)?;

        let cropped = imageops::crop_imm(&screenshot, region.left, region.top, region.width, region.height).to_image();
        debug!("Captured {}x{} region", cropped.width(), cropped.height());

        Ok(Frame::from_rgba(cropped))
    }
}

pub fn check_bounds(region: &CaptureConfig, screen_width: u32, screen_height: u32) -> Result<(), CaptureError> {
    let fits = region.left.saturating_add(region.width) <= screen_width
        && region.top.saturating_add(region.height) <= screen_height;

    if fits {
        Ok(())
    } else {
        Err(CaptureError::OutOfBounds {
            left: region.left,
            top: region.top,
            width: region.width,
            height: region.height,
            screen_width,
            screen_height,
        })
    }
}

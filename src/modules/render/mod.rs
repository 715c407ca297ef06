pub mod charts;
pub mod compose;
pub mod fonts;
pub mod overlay;
pub mod preview;

use std::panic::{self, AssertUnwindSafe};
use thiserror::Error;

use crate::utils::panic_message;

pub use charts::{render_live_chart, save_bars_png, save_timeline_png, Bar, EmotionLine};
pub use compose::render_frame;
pub use fonts::ensure_fonts;
pub use overlay::draw_overlay;
pub use preview::PreviewWindows;

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("Chart rendering error: {0}")]
    Chart(String),

    #[error("Font error: {0}")]
    Font(String),

    #[error("Window error: {0}")]
    Window(String),
}

impl From<minifb::Error> for RenderError {
    fn from(error: minifb::Error) -> Self {
        RenderError::Window(error.to_string())
    }
}

/// Runs a plotters drawing with the fonts registered, turning a panic inside
/// plotters into a `RenderError` so callers can skip the drawing.
pub(crate) fn guarded<T, F>(draw: F) -> Result<T, RenderError>
where
    F: FnOnce() -> Result<T, RenderError>,
{
    ensure_fonts()?;
    panic::catch_unwind(AssertUnwindSafe(draw)).unwrap_or_else(|payload| {
        Err(RenderError::Chart(format!("renderer panicked: {}", panic_message(payload.as_ref()))))
    })
}

use plotters::style::{register_font, FontStyle};
use std::sync::OnceLock;

use super::RenderError;

/// Every caption, axis label, legend and overlay label asks for this family.
pub const FONT_FAMILY: &str = "sans-serif";

static DEJAVU_SANS: &[u8] = include_bytes!("../../../assets/fonts/DejaVuSans.ttf");

static REGISTERED: OnceLock<bool> = OnceLock::new();

/// Registers the bundled DejaVu Sans under [`FONT_FAMILY`]. Idempotent; the
/// first call does the work.
pub fn ensure_fonts() -> Result<(), RenderError> {
    let registered = *REGISTERED.get_or_init(|| register_font(FONT_FAMILY, FontStyle::Normal, DEJAVU_SANS).is_ok());
    if registered {
        Ok(())
    } else {
        Err(RenderError::Font(format!("bundled {FONT_FAMILY} font could not be parsed")))
    }
}

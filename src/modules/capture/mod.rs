pub mod frame;
pub mod screen;

pub use frame::Frame;
pub use screen::{CaptureError, FrameSource, ScreenRegionSource};

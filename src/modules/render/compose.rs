use log::debug;

use super::{draw_overlay, render_live_chart};
use crate::modules::capture::{frame::rgb_bytes_to_argb, Frame};
use crate::modules::session::Aggregator;

/// Annotates `frame` with the latest analysis and, when `chart_size` is
/// given, renders the live chart as a `0x00RRGGBB` window buffer.
///
/// Either step may fail on its own; the failure is logged and the other step
/// still happens. `None` means there is no new chart to show.
pub fn render_frame(aggregator: &Aggregator, frame: &mut Frame, chart_size: Option<(u32, u32)>) -> Option<Vec<u32>> {
    if let Err(err) = draw_overlay(frame, aggregator.latest()) {
        debug!("Overlay skipped: {err}");
    }

    let (width, height) = chart_size?;
    match render_live_chart(aggregator.history(), width, height) {
        Ok(rgb) => Some(rgb_bytes_to_argb(&rgb)),
        Err(err) => {
            debug!("Live chart skipped: {err}");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::_test_mock::FixedAnalyzer;
    use chrono::Utc;
    use image::Rgb;

    fn aggregator_with_face() -> Aggregator {
        let mut aggregator = Aggregator::new(20);
        aggregator.ingest(&[FixedAnalyzer::happy_face()], Utc::now());
        aggregator
    }

    #[test]
    fn test_overlay_and_chart_together() {
        let aggregator = aggregator_with_face();
        let mut frame = Frame::blank(160, 90);

        let chart = render_frame(&aggregator, &mut frame, Some((240, 160))).unwrap();

        assert_eq!(chart.len(), 240 * 160);
        assert!(chart.iter().any(|px| *px != 0));
        assert_ne!(frame, Frame::blank(160, 90));
    }

    #[test]
    fn test_failed_chart_keeps_overlay_and_next_tick_recovers() {
        let aggregator = aggregator_with_face();
        let mut frame = Frame::blank(160, 90);

        assert!(render_frame(&aggregator, &mut frame, Some((10, 10))).is_none());
        // The face box from the happy face at (4, 4, 16, 16).
        assert_eq!(frame.image().get_pixel(4, 12), &Rgb([0, 255, 0]));

        let mut next = Frame::blank(160, 90);
        assert!(render_frame(&aggregator, &mut next, Some((240, 160))).is_some());
        assert_eq!(next, frame);
    }

    #[test]
    fn test_no_chart_requested() {
        let aggregator = aggregator_with_face();
        let mut frame = Frame::blank(64, 48);

        assert!(render_frame(&aggregator, &mut frame, None).is_none());
        assert_ne!(frame, Frame::blank(64, 48));
    }
}

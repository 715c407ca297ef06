pub mod loader;
pub mod summary;

pub use loader::{load_session_csv, parse_session_csv, ReportError, SessionTable};
pub use summary::{build_report, save_report_charts, scaled_time, MeetingReport, TensionMoment, Trend, Verdict};

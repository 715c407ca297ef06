pub mod aggregator;
pub mod finalizer;
pub mod history;
pub mod log;

pub use aggregator::{average_faces, Aggregator, FrameSummary};
pub use finalizer::{write_session_csv, FinalizedSession, SessionError, SessionFinalizer};
pub use history::RollingHistory;
pub use log::{BalanceBucket, EmotionBalance, EmotionSample, SessionLog};

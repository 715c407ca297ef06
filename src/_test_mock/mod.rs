pub mod pipeline_mock;

pub use pipeline_mock::{FixedAnalyzer, StillSource};

pub mod dispatcher;

pub use dispatcher::{AnalysisDispatcher, AnalysisResult, DispatchOutcome};

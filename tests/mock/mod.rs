pub mod analyzer_mock;
pub mod source_mock;

pub use analyzer_mock::{face, MockAnalyzer, ScriptedAnalyzer, Step};
pub use source_mock::ScriptedSource;

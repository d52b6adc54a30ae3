pub mod assessment_loader;
pub mod content_provider;
pub mod result_sink;
pub mod result_submitter;
pub mod scoring;

pub use assessment_loader::{shuffle_questions, AssessmentLoader};
pub use content_provider::{ContentProvider, TomlContentProvider};
pub use result_sink::{FileResultSink, ResultSink};
pub use result_submitter::ResultSubmitter;
pub use scoring::{compute_score, ScoreSummary};

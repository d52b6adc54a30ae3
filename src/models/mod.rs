pub mod assessment;
pub mod loaders;
pub mod records;
pub mod result;

pub use assessment::{Assessment, Question, Section};
pub use loaders::{load_all_toml_files, parse_assessment_toml};
pub use records::{AssessmentRecord, QuestionRecord, SectionRecord};
pub use result::{ActivityEvent, AttemptResult};

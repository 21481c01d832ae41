pub mod classification;
pub mod content;
pub mod submission;

pub use classification::{Classification, QuestionKind};
pub use content::{DomView, ExtractedContent};
pub use submission::{Answer, SubmissionPayload, SubmissionResponse};

pub mod classifier;
pub mod extractor;
pub mod run_journal;
pub mod strategies;
pub mod submit_target;
pub mod transcriber;

pub use classifier::QuestionClassifier;
pub use run_journal::RunJournal;
pub use strategies::AnswerService;
pub use transcriber::{StdinTranscriber, Transcriber, UnattendedTranscriber};

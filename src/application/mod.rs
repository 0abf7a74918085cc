pub mod use_cases;

pub use use_cases::answer_composer::AnswerComposer;
pub use use_cases::sql_generator::SqlGenerator;

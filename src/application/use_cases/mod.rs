pub mod answer_composer;
pub mod prompts;
pub mod sql_generator;

pub mod application;
pub mod domain;
pub mod infrastructure;
pub mod interfaces;

mod app;

pub use app::AppContext;
pub use domain::error::{AppError, Result};
pub use infrastructure::config::AppConfig;
pub use interfaces::chat::ChatHandler;

//! pdfpeek
//!
//! A small web service that previews the text and metadata of uploaded PDF
//! documents and can ask a language model to restructure them as Word
//! documents.

pub mod config;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod services;
pub mod state;

pub use config::Config;
pub use error::{AppError, AppResult};
pub use handlers::create_router;
pub use state::AppState;

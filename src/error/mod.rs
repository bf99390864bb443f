mod classify;
mod types;

pub use classify::{classify_conversion_error, classify_extraction_error};
pub use types::{AppError, AppResult};

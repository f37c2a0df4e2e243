pub mod api;
pub mod callback;
pub mod error;
pub mod types;

pub use error::ApiError;
pub use types::*;

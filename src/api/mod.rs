pub mod error;
pub mod handlers;
pub mod server;
pub mod utils;

pub use error::{ApiError, ApiResult};
pub use server::{create_app, router, AppState};

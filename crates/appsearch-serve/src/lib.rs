//! appsearch-serve
//!
//! JSON HTTP API over a shared `SearchContext`.

pub mod error;
pub mod handlers;
pub mod server;

pub use error::{ApiError, ApiResult};
pub use handlers::{create_router, AppState};
pub use server::{app, serve};

pub mod api;
pub mod error;
pub mod types;

pub use api::{BackendClient, ClientOptions, HttpBackendClient};
pub use error::{ApiError, ApiResult};
pub use types::*;

pub mod auth;
pub mod authorize;
pub mod json;
pub mod response;

pub use auth::{protect, resolve_identity, Identity};
pub use authorize::authorize;
pub use json::ApiJson;
pub use response::{ApiResponse, ApiResult};

pub mod auth;
pub mod json;
pub mod response;

pub use auth::{authenticate_jwt, AdminUser, AuthUser};
pub use json::ApiJson;
pub use response::{ApiResponse, ApiResult};

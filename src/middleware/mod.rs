pub mod auth;
pub mod rate_limit;
pub mod response;

pub use auth::jwt_auth_middleware;
pub use rate_limit::{rate_limit_middleware, RATE_LIMIT_REMAINING};
pub use response::{ApiResponse, ApiResult};

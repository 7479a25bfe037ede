mod error;
mod handler;
mod router;

pub use error::{ApiError, ApiErrorCode, ApiResponse, recover_error};
pub use router::{SESSION_COOKIE, routes};

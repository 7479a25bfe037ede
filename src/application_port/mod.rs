mod buddy_service;
mod user_service;

pub use buddy_service::*;
pub use user_service::*;

mod buddy_service_impl;
mod user_service_impl;

pub use buddy_service_impl::*;
pub use user_service_impl::*;

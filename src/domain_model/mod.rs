mod course;
mod event;
mod seed;
mod user;

pub use course::*;
pub use event::*;
pub use seed::*;
pub use user::*;

// store

mod event_sink;
mod session_store;

pub use event_sink::*;
pub use session_store::*;

// repo

mod block_repo;
mod buddy_repo;
mod course_repo;
mod user_repo;

mod repo_tx;

pub use block_repo::*;
pub use buddy_repo::*;
pub use course_repo::*;
pub use user_repo::*;

pub use repo_tx::*;

mod block_repo_memory;
mod buddy_repo_memory;
mod course_repo_memory;
mod session_store_memory;
mod user_repo_memory;

pub use block_repo_memory::*;
pub use buddy_repo_memory::*;
pub use course_repo_memory::*;
pub use session_store_memory::*;
pub use user_repo_memory::*;

mod repo_tx_memory;

pub use repo_tx_memory::*;

mod util;

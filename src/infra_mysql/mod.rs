mod block_repo_mysql;
mod buddy_repo_mysql;
mod course_repo_mysql;
mod user_repo_mysql;

pub use block_repo_mysql::*;
pub use buddy_repo_mysql::*;
pub use course_repo_mysql::*;
pub use user_repo_mysql::*;

mod repo_tx_mysql;

pub use repo_tx_mysql::*;

mod util;

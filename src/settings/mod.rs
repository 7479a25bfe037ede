//! Process configuration: `--settings <path>` on the command line, TOML on disk.

mod cli;
pub use clap::Parser;
pub use cli::*;

mod settings;
pub use settings::*;

use super::Parser;

#[derive(Parser, Debug)]
#[command(name = "buddymatch", about = "Student buddy matching backend")]
pub struct Cli {
    /// Path to a TOML settings file.
    #[arg(long)]
    pub settings: Option<String>,
}

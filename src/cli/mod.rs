pub mod commands;
pub mod handlers;

pub use commands::{AnalyzeArgs, CliArgs, Commands, CostArgs};
pub use handlers::{handle_analyze, handle_cost};

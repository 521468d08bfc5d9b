use clap::{Parser, Subcommand};
use genai::adapter::AdapterKind;
use std::path::PathBuf;

/// AI-powered technology due-diligence engine for M&A transactions
#[derive(Parser, Debug)]
#[command(
    name = "mergescope",
    about = "AI-powered technology due-diligence engine for M&A transactions",
    version,
    long_about = "mergescope compares a target company's IT estate against a buyer's, \
                  synthesizes cited findings (risks, work items, recommendations, strategic \
                  considerations) and prices the work under the deal's legal structure."
)]
pub struct CliArgs {
    #[command(subcommand)]
    pub command: Commands,

    #[arg(long, global = true, value_name = "LEVEL", help = "Set logging level")]
    pub log_level: Option<String>,

    #[arg(short = 'v', long, global = true, help = "Increase verbosity")]
    pub verbose: bool,

    #[arg(
        short = 'q',
        long,
        global = true,
        conflicts_with = "verbose",
        help = "Quiet mode - suppress non-error output"
    )]
    pub quiet: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    #[command(
        about = "Run a full analysis over extracted facts",
        long_about = "Runs overlap detection, reasoning, consolidation and costing over a \
                      facts file produced by the extraction collaborator.\n\n\
                      Examples:\n  \
                      mergescope analyze facts.json --deal-type carveout\n  \
                      mergescope analyze facts.json --deal-type acquisition --out-dir ./run1\n  \
                      mergescope analyze facts.json --deal-type divestiture --provider anthropic"
    )]
    Analyze(AnalyzeArgs),

    #[command(
        about = "Price an existing findings export under a deal type",
        long_about = "Re-prices the work items of a previous run's findings export without \
                      re-running the analysis.\n\n\
                      Examples:\n  \
                      mergescope cost findings.json --deal-type divestiture"
    )]
    Cost(CostArgs),
}

#[derive(Parser, Debug, Clone)]
pub struct AnalyzeArgs {
    #[arg(value_name = "FACTS", help = "Path to facts/gaps input JSON")]
    pub input: PathBuf,

    #[arg(
        long,
        value_name = "FILE",
        help = "Inventory summary JSON for transitional-service scope"
    )]
    pub inventory: Option<PathBuf>,

    #[arg(
        long,
        value_name = "TYPE",
        help = "Deal structure: acquisition, carveout or divestiture"
    )]
    pub deal_type: String,

    #[arg(
        long,
        value_name = "MONTHS",
        default_value = "12",
        help = "Assumed transitional-service duration in months"
    )]
    pub tsa_months: u32,

    #[arg(
        short = 'o',
        long,
        value_name = "DIR",
        default_value = "analysis-out",
        help = "Directory to write exports into"
    )]
    pub out_dir: PathBuf,

    #[arg(
        short = 'b',
        long,
        value_parser = parse_adapter_kind,
        help = "Capability provider (overrides MERGESCOPE_PROVIDER)"
    )]
    pub provider: Option<AdapterKind>,

    #[arg(
        short = 'm',
        long,
        value_name = "MODEL",
        help = "Model name (provider-specific, overrides MERGESCOPE_MODEL)"
    )]
    pub model: Option<String>,

    #[arg(
        long,
        value_name = "SECONDS",
        help = "Capability request timeout in seconds"
    )]
    pub timeout: Option<u64>,
}

#[derive(Parser, Debug, Clone)]
pub struct CostArgs {
    #[arg(value_name = "FINDINGS", help = "Path to a findings export JSON")]
    pub findings: PathBuf,

    #[arg(
        long,
        value_name = "TYPE",
        help = "Deal structure: acquisition, carveout or divestiture"
    )]
    pub deal_type: String,

    #[arg(
        short = 'o',
        long,
        value_name = "FILE",
        help = "Write cost output to file instead of stdout"
    )]
    pub output: Option<PathBuf>,
}

fn parse_adapter_kind(s: &str) -> Result<AdapterKind, String> {
    AdapterKind::from_lower_str(&s.to_lowercase()).ok_or_else(|| {
        format!(
            "Invalid provider: {}. Valid options: ollama, openai, anthropic, gemini, xai, groq",
            s
        )
    })
}

//! filterlist-index CLI application
//!
//! Command-line interface for publishing an index of the filter lists
//! maintained in forks of a reference repository.

use std::process;

use tracing::{error, info};
use tracing_subscriber::{fmt, EnvFilter};

use filterlist_index::cli::{handle_generate, handle_parse, handle_render, handle_title, Cli, Commands};
use filterlist_index::errors::Result;

#[tokio::main]
async fn main() {
    let result = run().await;

    if let Err(e) = result {
        error!("{} error: {}", e.category(), e);
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

/// Main application logic
async fn run() -> Result<()> {
    // Load environment variables from .env file if it exists
    dotenv::dotenv().ok();

    let cli = Cli::parse_args();
    init_logging(&cli);

    info!("filterlist-index v{} starting", env!("CARGO_PKG_VERSION"));

    let global = &cli.global;
    match cli.command {
        Commands::Generate(args) => {
            info!("Executing generate command");
            handle_generate(args, global).await
        }
        Commands::Render(args) => {
            info!("Executing render command");
            handle_render(args, global).await
        }
        Commands::Title(args) => handle_title(args, global).await,
        Commands::Parse(args) => handle_parse(args, global).await,
    }
}

/// Initialize logging based on CLI verbosity settings
fn init_logging(cli: &Cli) {
    let log_level = cli.log_level();

    let mut filter = EnvFilter::from_default_env();
    match format!("filterlist_index={}", log_level).parse() {
        Ok(directive) => filter = filter.add_directive(directive),
        Err(e) => eprintln!("Invalid log directive: {}", e),
    }

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_level(cli.global.very_verbose)
        .with_writer(std::io::stderr)
        .init();

    if cli.global.very_verbose {
        info!("Very verbose logging enabled");
    } else if cli.global.verbose {
        info!("Verbose logging enabled");
    }
}

//! Command handlers for the filterlist-index CLI
//!
//! This module implements the command handlers that connect CLI arguments,
//! configuration and the core application functionality.

use std::path::Path;
use std::sync::Arc;

use tokio::io::BufReader;
use tracing::{debug, info};

use crate::app::manifest::read_list;
use crate::app::title::{make_list_title, read_title, strip_extension};
use crate::app::{render_snapshots, resolve_title, Coordinator, ListClient, RunSummary};
use crate::cli::{title_progress, GenerateArgs, GlobalArgs, ParseArgs, RenderArgs, TitleArgs};
use crate::config::{token_from_env, AppConfig};
use crate::constants::titles::UNKNOWN_TITLE;
use crate::errors::{AppError, Result};

/// Handle the generate command
///
/// Loads configuration, checks the access token and runs the coordinator.
pub async fn handle_generate(args: GenerateArgs, global: &GlobalArgs) -> Result<()> {
    args.validate().map_err(AppError::generic)?;

    let token = token_from_env()?;

    let mut config = AppConfig::load(global.config.clone()).await?;
    config.apply_overrides(args.overrides());
    config.validate()?;

    let hosting = Arc::new(config.github_client(&token)?);
    let source = Arc::new(ListClient::with_config(&config.client)?);

    let coordinator_config = config.to_coordinator_config();
    info!(
        "Generating index for {}/{} into {}",
        coordinator_config.owner,
        coordinator_config.repo,
        coordinator_config.output_path.display()
    );

    let summary = Coordinator::new(coordinator_config, hosting, source)
        .with_progress(title_progress(global.quiet))
        .run()
        .await?;

    if !global.quiet {
        print_summary(&summary);
    }
    Ok(())
}

fn print_summary(summary: &RunSummary) {
    println!(
        "Wrote {} lists to {}",
        summary.manifests_retained,
        summary.output_path.display()
    );
    println!(
        "  Repositories: {} checked, {} contributing",
        summary.repositories_checked, summary.repositories_used
    );
    println!(
        "  Manifests:    {} collected, {} duplicates removed",
        summary.manifests_collected,
        summary.duplicates_removed()
    );
    println!(
        "  Filter lists: {} unique, {} without title",
        summary.unique_urls,
        summary.untitled_urls()
    );
    println!("  Duration:     {:.1?}", summary.duration);
}

/// Handle the render command
pub async fn handle_render(args: RenderArgs, global: &GlobalArgs) -> Result<()> {
    let output = match args.output {
        Some(output) => output,
        None => AppConfig::load(global.config.clone()).await?.output.path,
    };

    let count = render_snapshots(&args.lists, &args.titles, &output).await?;
    if !global.quiet {
        println!("Wrote {} lists to {}", count, output.display());
    }
    Ok(())
}

/// Handle the title command
///
/// An existing local file is scanned directly; anything else is treated as
/// a URL and downloaded.
pub async fn handle_title(args: TitleArgs, global: &GlobalArgs) -> Result<()> {
    let path = Path::new(&args.url);
    let title = if path.is_file() {
        let file = tokio::fs::File::open(path).await?;
        match read_title(BufReader::new(file)).await? {
            Some(title) => Some(title),
            None => Some(make_list_title(strip_extension(&args.url)))
                .filter(|title| !title.is_empty()),
        }
    } else {
        let config = AppConfig::load(global.config.clone()).await?;
        let source = ListClient::with_config(&config.client)?;
        resolve_title(&source, &args.url).await
    };

    match title {
        Some(title) => {
            let title = title.trim();
            println!("{}", if title.is_empty() { UNKNOWN_TITLE } else { title });
            Ok(())
        }
        None => Err(AppError::generic(format!(
            "No title could be determined for {}",
            args.url
        ))),
    }
}

/// Handle the parse command
pub async fn handle_parse(args: ParseArgs, global: &GlobalArgs) -> Result<()> {
    let file = tokio::fs::File::open(&args.file).await?;
    let (urls, stats) = read_list(BufReader::new(file)).await?;

    debug!(
        "{}: {} lines, {} comments, {} invalid, {} duplicates",
        args.file.display(),
        stats.lines_processed,
        stats.comment_lines,
        stats.invalid_lines,
        stats.duplicate_urls
    );

    for url in &urls {
        println!("{}", url);
    }
    if !global.quiet {
        eprintln!(
            "{} URLs, {} lines skipped",
            urls.len(),
            stats.total_skipped()
        );
    }
    Ok(())
}

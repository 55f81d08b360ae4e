//! Terminal progress for title resolution

use indicatif::{ProgressBar, ProgressStyle};

/// Progress bar for resolving titles
///
/// Hidden when quiet or when stderr is not a terminal, so logs and piped
/// output stay clean.
pub fn title_progress(quiet: bool) -> ProgressBar {
    if quiet || !atty::is(atty::Stream::Stderr) {
        return ProgressBar::hidden();
    }

    let bar = ProgressBar::new(0);
    match ProgressStyle::default_bar()
        .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} (ETA: {eta}) {msg}")
    {
        Ok(style) => bar.set_style(style.progress_chars("##-")),
        Err(e) => tracing::debug!("Progress bar template error: {}", e),
    }
    bar.set_message("Resolving titles");
    bar
}

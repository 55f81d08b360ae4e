//! Command-line interface components
//!
//! This module contains CLI-specific code: argument parsing, command
//! handlers and progress display.

pub mod args;
pub mod commands;
pub mod progress;

pub use args::{Cli, Commands, GenerateArgs, GlobalArgs, ParseArgs, RenderArgs, TitleArgs};
pub use commands::{handle_generate, handle_parse, handle_render, handle_title};
pub use progress::title_progress;

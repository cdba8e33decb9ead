//! CLI definitions for slotcache
//!
//! This module contains the clap CLI structure definitions, separated from main.rs
//! so they can be accessed by xtask for man page generation.

use clap::builder::styling::{AnsiColor, Effects, Styles};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Build clap styles for the CLI.
pub fn build_cli_styles() -> Styles {
    Styles::styled()
        .header(AnsiColor::Green.on_default() | Effects::BOLD)
        .usage(AnsiColor::Green.on_default() | Effects::BOLD)
        .literal(AnsiColor::Green.on_default())
        .placeholder(AnsiColor::White.on_default())
        .valid(AnsiColor::White.on_default())
        .invalid(AnsiColor::Red.on_default())
        .error(AnsiColor::Red.on_default() | Effects::BOLD)
}

#[derive(Parser)]
#[command(name = "slotcache")]
#[command(about = "[ slotcache ] - decoded image cache with pre-reading")]
#[command(
    long_about = "slotcache - a slot-reusing cache of decoded images for image viewers.

Keeps the current image, one pre-read \"next\" image and a few recently viewed
images decoded in memory, recycling slots instead of reallocating them.

QUICK START:
    slotcache view a.png b.png c.gif     Browse files in order, pre-reading the next one
    slotcache config show                Show the effective configuration"
)]
#[command(version)]
#[command(styles = build_cli_styles())]
pub struct Cli {
    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Browse images through the cache
    #[command(long_about = "Walk through the given files as a viewer would.

Each file is requested for display, then the following file is pre-read in
the background. Prints what each slot holds and how many slots are resident.
Files may repeat to exercise cache hits.

EXAMPLES:
    slotcache view *.png
    slotcache view a.png b.png a.png --extra 0 --no-pre-reading")]
    View(ViewArgs),

    /// Configuration management
    #[command(subcommand)]
    Config(ConfigCommands),
}

#[derive(Args)]
pub struct ViewArgs {
    /// Image files to browse, in order
    #[arg(required = true)]
    pub files: Vec<PathBuf>,

    /// Extra slots for previously viewed images (overrides config)
    #[arg(long)]
    pub extra: Option<usize>,

    /// Disable background pre-reading of the next file
    #[arg(long)]
    pub no_pre_reading: bool,

    /// Loader threads (overrides config)
    #[arg(long)]
    pub threads: Option<usize>,
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Show current configuration as TOML
    Show,
    /// Print the configuration file path
    Path,
}

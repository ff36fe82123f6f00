//! ssbh - inspect and rewrite SSBH containers
//!
//! # Commands
//!
//! - `ssbh info <FILE>` - Format, version, and a summary of the contents
//! - `ssbh dump <FILE>` - Decoded document as JSON
//! - `ssbh anim <FILE>` - Decode animation tracks to JSON frames
//! - `ssbh rewrite <IN> <OUT>` - Decode and re-encode a container
//!
//! # Usage
//!
//! ```bash
//! ssbh info model.numatb
//! ssbh dump model.numshb --output model.json
//! ssbh anim a00wait1.nuanmb --track Hip/Transform
//! ssbh rewrite model.numdlb out.numdlb --offsets data-origin
//! ```
//!
//! Set `RUST_LOG` or pass `-v` for codec logging.

mod anim;
mod dump;
mod info;
mod options;
mod rewrite;

use anyhow::Result;
use clap::{Parser, Subcommand};

/// Inspect and rewrite SSBH containers
#[derive(Parser)]
#[command(name = "ssbh")]
#[command(about = "Inspect and rewrite SSBH containers")]
#[command(version)]
struct Cli {
    /// Log codec activity at debug level
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the format, version, and a summary of a container
    Info(info::InfoArgs),

    /// Print the decoded document as JSON
    Dump(dump::DumpArgs),

    /// Decode animation tracks to per-frame values
    Anim(anim::AnimArgs),

    /// Decode a container and encode it again
    Rewrite(rewrite::RewriteArgs),
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let default_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Info(args) => info::execute(args),
        Commands::Dump(args) => dump::execute(args),
        Commands::Anim(args) => anim::execute(args),
        Commands::Rewrite(args) => rewrite::execute(args),
    }
}

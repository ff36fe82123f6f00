//! Dump command - decoded document as JSON

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use tracing::info;

use crate::options::{CodecArgs, load};

/// Arguments for the dump command
#[derive(Args)]
pub struct DumpArgs {
    /// Container file
    pub file: PathBuf,

    /// Write JSON here instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Single-line JSON
    #[arg(long)]
    pub compact: bool,

    #[command(flatten)]
    pub codec: CodecArgs,
}

/// Execute the dump command
pub fn execute(args: DumpArgs) -> Result<()> {
    let file = load(&args.file, &args.codec.options())?;
    let json = if args.compact {
        serde_json::to_string(&file)?
    } else {
        serde_json::to_string_pretty(&file)?
    };

    match &args.output {
        Some(path) => {
            std::fs::write(path, json)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            info!("Wrote {} JSON to {}", file.kind(), path.display());
        }
        None => println!("{}", json),
    }
    Ok(())
}

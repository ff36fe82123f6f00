//! Rewrite command - decode a container and encode it again

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use ssbh_lib::CodecOptions;
use tracing::info;

use crate::options::{CodecArgs, load};

/// Arguments for the rewrite command
#[derive(Args)]
pub struct RewriteArgs {
    /// Container to read (with header, relative offsets)
    pub input: PathBuf,

    /// Where to write the re-encoded container
    pub output: PathBuf,

    /// Layout of the written container
    #[command(flatten)]
    pub codec: CodecArgs,
}

/// Execute the rewrite command
pub fn execute(args: RewriteArgs) -> Result<()> {
    let file = load(&args.input, &CodecOptions::default())?;
    let options = args.codec.options();
    let bytes = file
        .to_bytes(&options)
        .with_context(|| format!("Failed to encode {}", file.kind()))?;
    std::fs::write(&args.output, &bytes)
        .with_context(|| format!("Failed to write {}", args.output.display()))?;

    info!(
        "Wrote {} ({} bytes) to {}",
        file.kind(),
        bytes.len(),
        args.output.display()
    );
    Ok(())
}

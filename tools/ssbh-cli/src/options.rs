//! Codec flags shared by every command

use std::path::Path;

use anyhow::{Context, Result};
use clap::{Args, ValueEnum};
use ssbh_lib::{CodecOptions, OffsetBase, SsbhFile};
use tracing::debug;

/// How stored offsets are measured
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum Offsets {
    /// From the offset field itself (shipped files)
    #[default]
    Relative,
    /// From the start of the root record
    DataOrigin,
}

/// Container layout flags
#[derive(Args, Clone, Debug, Default)]
pub struct CodecArgs {
    /// Container has no 16-byte "HBSS" header
    #[arg(long)]
    pub no_header: bool,

    /// Offset measurement
    #[arg(long, value_enum, default_value_t)]
    pub offsets: Offsets,
}

impl CodecArgs {
    pub fn options(&self) -> CodecOptions {
        CodecOptions {
            write_header: !self.no_header,
            offset_base: match self.offsets {
                Offsets::Relative => OffsetBase::Relative,
                Offsets::DataOrigin => OffsetBase::DataOrigin,
            },
        }
    }
}

/// Read and decode a container
pub fn load(path: &Path, options: &CodecOptions) -> Result<SsbhFile> {
    let bytes =
        std::fs::read(path).with_context(|| format!("Failed to read {}", path.display()))?;
    let file = SsbhFile::from_bytes_with(&bytes, options)
        .with_context(|| format!("Failed to decode {}", path.display()))?;
    debug!("Loaded {} from {}", file.kind(), path.display());
    Ok(file)
}

//! Error types for SSBH parsing and writing

use thiserror::Error;

pub type Result<T, E = SsbhError> = std::result::Result<T, E>;

/// Errors that can occur when reading or writing SSBH data
#[derive(Debug, Error)]
pub enum SsbhError {
    /// Bad container magic, unknown discriminant, or a value the format does not define
    #[error("Format error: {0}")]
    Format(String),

    /// The encoder met a value with no binary mapping
    #[error("Unsupported type: {0}")]
    UnsupportedType(String),

    /// A read would run past the end of the buffer
    #[error("Truncated data: needed {needed} bytes at 0x{offset:X}, buffer is {len} bytes")]
    TruncatedData {
        offset: u64,
        needed: usize,
        len: usize,
    },

    /// A placeholder offset was never back-patched
    #[error("Unresolved reference: placeholder at 0x{0:X} was never written")]
    UnresolvedReference(u64),

    /// IO error while reading or writing a file
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl SsbhError {
    pub(crate) fn format(msg: impl Into<String>) -> Self {
        Self::Format(msg.into())
    }
}

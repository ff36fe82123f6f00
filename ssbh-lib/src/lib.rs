//! Reader, writer, and animation track decoder for SSBH binary containers
//!
//! SSBH containers store meshes, materials, skeletons, animations, and model
//! descriptions as a graph of records linked by self-relative byte offsets.
//!
//! # Modules
//!
//! - [`cursor`] - Byte and bit cursors over in-memory buffers
//! - [`codec`] - Offset-graph encoder/decoder driven by static field tables
//! - [`formats`] - Container registry and the typed schemas it dispatches to
//! - [`anim`] - Decoder for compressed and constant animation tracks
//!
//! # Usage
//!
//! ```ignore
//! use ssbh_lib::{CodecOptions, SsbhFile};
//!
//! let bytes = std::fs::read("model.numatb")?;
//! let file = SsbhFile::from_bytes(&bytes)?;
//! println!("{}", file.kind());
//!
//! let written = file.to_bytes(&CodecOptions::default())?;
//! ```

#[macro_use]
mod macros;

pub mod anim;
pub mod codec;
pub mod cursor;
mod error;
pub mod formats;

pub use anim::{AnimTrackDecoder, ChannelFlags, TrackFlags, TrackFrame, TrackLayout, Transform};
pub use codec::{CodecOptions, OffsetBase, Ref, SsbhArray, SsbhByteBuffer, SsbhString};
pub use error::{Result, SsbhError};
pub use formats::{FormatKind, SsbhFile};

//! SSBH container formats
//!
//! Every container starts with the "HBSS" header followed by the root
//! record, whose own 4-byte magic identifies the format. [`FormatKind`] and
//! [`SsbhFile`] are the only places a new container kind needs to be added.

pub mod anim;
pub mod common;
pub mod matl;
pub mod mesh;
pub mod modl;
pub mod skel;

use std::fmt;
use std::path::Path;

use serde::Serialize;
use tracing::debug;

use crate::codec::{
    self, CONTAINER_HEADER_SIZE, CodecOptions, SsbhRoot, decode_root, read_container_header,
};
use crate::cursor::SsbhReader;
use crate::{Result, SsbhError};

pub use anim::{Anim, AnimGroup, AnimNode, AnimTrack, AnimType};
pub use common::{Matrix4x4, Vector3, Vector4};
pub use matl::{Matl, MatlAttribute, MatlEntry, ParamData};
pub use mesh::{Mesh, MeshAttribute, MeshBoneBuffer, MeshObject, MeshRiggingGroup};
pub use modl::{Modl, ModlEntry};
pub use skel::{Skel, SkelBoneEntry};

/// Container kind, selected by the root magic
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum FormatKind {
    Mesh,
    Matl,
    Skel,
    Anim,
    Modl,
}

impl FormatKind {
    pub const ALL: [FormatKind; 5] = [
        FormatKind::Mesh,
        FormatKind::Matl,
        FormatKind::Skel,
        FormatKind::Anim,
        FormatKind::Modl,
    ];

    /// Root magic as stored in the file
    pub fn magic(self) -> [u8; 4] {
        match self {
            Self::Mesh => Mesh::MAGIC,
            Self::Matl => Matl::MAGIC,
            Self::Skel => Skel::MAGIC,
            Self::Anim => Anim::MAGIC,
            Self::Modl => Modl::MAGIC,
        }
    }

    pub fn from_magic(magic: [u8; 4]) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.magic() == magic)
    }

    /// Conventional file extension, without the dot
    pub fn extension(self) -> &'static str {
        match self {
            Self::Mesh => "numshb",
            Self::Matl => "numatb",
            Self::Skel => "nusktb",
            Self::Anim => "nuanmb",
            Self::Modl => "numdlb",
        }
    }

    pub fn from_extension(extension: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.extension().eq_ignore_ascii_case(extension))
    }

    fn from_magic_bytes(magic: [u8; 4]) -> Result<Self> {
        Self::from_magic(magic).ok_or_else(|| {
            SsbhError::format(format!(
                "unknown format discriminant {:?}",
                String::from_utf8_lossy(&magic)
            ))
        })
    }
}

impl fmt::Display for FormatKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Mesh => "Mesh",
            Self::Matl => "Matl",
            Self::Skel => "Skel",
            Self::Anim => "Anim",
            Self::Modl => "Modl",
        };
        f.write_str(name)
    }
}

/// A decoded container of any known kind
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "format")]
pub enum SsbhFile {
    Mesh(Mesh),
    Matl(Matl),
    Skel(Skel),
    Anim(Anim),
    Modl(Modl),
}

impl SsbhFile {
    pub fn kind(&self) -> FormatKind {
        match self {
            Self::Mesh(_) => FormatKind::Mesh,
            Self::Matl(_) => FormatKind::Matl,
            Self::Skel(_) => FormatKind::Skel,
            Self::Anim(_) => FormatKind::Anim,
            Self::Modl(_) => FormatKind::Modl,
        }
    }

    /// (major, minor) version stored after the root magic
    pub fn version(&self) -> (u16, u16) {
        match self {
            Self::Mesh(m) => (m.major_version, m.minor_version),
            Self::Matl(m) => (m.major_version, m.minor_version),
            Self::Skel(s) => (s.major_version, s.minor_version),
            Self::Anim(a) => (a.major_version, a.minor_version),
            Self::Modl(m) => (m.major_version, m.minor_version),
        }
    }

    /// Decode a container with the "HBSS" header and relative offsets
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        Self::from_bytes_with(bytes, &CodecOptions::default())
    }

    /// Decode a container, honoring `options.write_header` and `options.offset_base`
    pub fn from_bytes_with(bytes: &[u8], options: &CodecOptions) -> Result<Self> {
        if options.write_header {
            let kind = FormatKind::from_magic_bytes(read_container_header(bytes)?)?;
            Self::decode_kind(kind, bytes, CONTAINER_HEADER_SIZE, options)
        } else {
            Self::from_headerless_bytes(bytes, options)
        }
    }

    /// Decode a root written without the container header
    pub fn from_headerless_bytes(bytes: &[u8], options: &CodecOptions) -> Result<Self> {
        let mut magic = [0u8; 4];
        magic.copy_from_slice(SsbhReader::new(bytes).read_bytes(4)?);
        Self::decode_kind(FormatKind::from_magic_bytes(magic)?, bytes, 0, options)
    }

    fn decode_kind(
        kind: FormatKind,
        bytes: &[u8],
        origin: u64,
        options: &CodecOptions,
    ) -> Result<Self> {
        debug!("Decoding {} container ({} bytes)", kind, bytes.len());
        Ok(match kind {
            FormatKind::Mesh => Self::Mesh(decode_root(bytes, origin, options)?),
            FormatKind::Matl => Self::Matl(decode_root(bytes, origin, options)?),
            FormatKind::Skel => Self::Skel(decode_root(bytes, origin, options)?),
            FormatKind::Anim => Self::Anim(decode_root(bytes, origin, options)?),
            FormatKind::Modl => Self::Modl(decode_root(bytes, origin, options)?),
        })
    }

    pub fn to_bytes(&self, options: &CodecOptions) -> Result<Vec<u8>> {
        debug!("Encoding {} container", self.kind());
        match self {
            Self::Mesh(m) => codec::encode(m, options),
            Self::Matl(m) => codec::encode(m, options),
            Self::Skel(s) => codec::encode(s, options),
            Self::Anim(a) => codec::encode(a, options),
            Self::Modl(m) => codec::encode(m, options),
        }
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let bytes = std::fs::read(path)?;
        Self::from_bytes(&bytes)
    }

    pub fn write_to_file(&self, path: impl AsRef<Path>, options: &CodecOptions) -> Result<()> {
        let bytes = self.to_bytes(options)?;
        std::fs::write(path, bytes)?;
        Ok(())
    }
}

macro_rules! impl_from_root {
    ($($kind:ident),*) => {$(
        impl From<$kind> for SsbhFile {
            fn from(root: $kind) -> Self {
                Self::$kind(root)
            }
        }
    )*};
}

impl_from_root!(Mesh, Matl, Skel, Anim, Modl);

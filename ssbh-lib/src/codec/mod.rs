//! Offset-graph codec
//!
//! SSBH records are laid out breadth first. Scalars, enums, inline arrays
//! and nested records are written in place; strings, arrays and shared
//! references leave an 8-byte offset placeholder (plus an 8-byte element
//! count for arrays) and are queued. The queue is drained in FIFO order and
//! each placeholder is back-patched once its target has a position.
//!
//! # Layout
//! ```text
//! 0x00: "HBSS"            - container magic (optional)
//! 0x04: u32 0x40          - header value
//! 0x08: padding to 0x10
//! 0x10: root magic        - format discriminant, e.g. "LTAM"
//! 0x14: root fields...    - followed by queued strings, arrays, references
//! ```
//!
//! Schemas are static: each record type carries a `FIELDS` table generated
//! by `ssbh_record!`, and the per-field behavior comes from [`SsbhField`].

mod decode;
mod encode;
mod types;


use crate::cursor::{SsbhReader, SsbhWriter};
use crate::{Result, SsbhError};

pub use decode::DecodeContext;
pub use encode::{EncodeContext, Identity};
pub use types::{Ref, SsbhArray, SsbhByteBuffer, SsbhString};

/// Container magic at the start of every file ("SSBH" stored reversed)
pub const SSBH_MAGIC: [u8; 4] = *b"HBSS";

/// Value stored after the container magic
pub const CONTAINER_HEADER_VALUE: u32 = 0x40;

/// Size of the container header; the root object starts here
pub const CONTAINER_HEADER_SIZE: u64 = 0x10;

/// How stored offsets are measured
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OffsetBase {
    /// Offsets count from the position of the offset field itself
    #[default]
    Relative,
    /// Offsets count from the position of the root object
    DataOrigin,
}

impl OffsetBase {
    /// Stored value for a field at `placeholder` pointing at `target`
    ///
    /// Relative offsets are signed: a shared value emitted earlier sits
    /// before the placeholder that points at it.
    pub fn encode(self, placeholder: u64, target: u64, origin: u64) -> u64 {
        match self {
            Self::Relative => (target as i64).wrapping_sub(placeholder as i64) as u64,
            Self::DataOrigin => target.wrapping_sub(origin),
        }
    }

    /// Absolute position for a stored value; `None` if it falls outside `u64`
    pub fn resolve(self, placeholder: u64, value: u64, origin: u64) -> Option<u64> {
        match self {
            Self::Relative => placeholder.checked_add_signed(value as i64),
            Self::DataOrigin => origin.checked_add(value),
        }
    }
}

/// Options for a single encode or decode pass
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CodecOptions {
    /// Write the 16-byte "HBSS" container header before the root
    pub write_header: bool,
    /// Offset measurement for every out-of-line field
    pub offset_base: OffsetBase,
}

impl Default for CodecOptions {
    fn default() -> Self {
        Self {
            write_header: true,
            offset_base: OffsetBase::Relative,
        }
    }
}

/// Binary shape of a field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// Integer, float or bool written in place
    Primitive,
    /// Enumeration written in place with the width of its repr type
    Enum,
    /// Offset to a NUL-terminated string
    String,
    /// Offset + element count
    Array,
    /// Offset + byte count, written raw
    ByteBuffer,
    /// Fixed-count elements written in place
    InlineArray,
    /// Nested record written in place
    Record,
    /// Offset to a shared record
    Reference,
}

impl FieldKind {
    /// Whether the value lives behind an offset
    pub fn is_out_of_line(self) -> bool {
        matches!(
            self,
            Self::String | Self::Array | Self::ByteBuffer | Self::Reference
        )
    }
}

/// One entry of a record's static field table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldDescriptor {
    pub name: &'static str,
    pub kind: FieldKind,
    /// Bytes occupied at the parent's position
    pub size: usize,
}

/// A value with a fixed binary mapping inside a record
pub trait SsbhField: Sized {
    const KIND: FieldKind;

    /// Bytes occupied at the parent's position
    const SIZE: usize;

    /// Bytes occupied by one element of an array
    const ELEMENT_SIZE: usize = Self::SIZE;

    fn write_field<'a>(&'a self, ctx: &mut EncodeContext<'a>) -> Result<()>;

    fn read_field(ctx: &mut DecodeContext<'_>) -> Result<Self>;

    fn write_element<'a>(&'a self, ctx: &mut EncodeContext<'a>) -> Result<()> {
        self.write_field(ctx)
    }

    fn read_element(ctx: &mut DecodeContext<'_>) -> Result<Self> {
        Self::read_field(ctx)
    }
}

/// Records that can be emitted from the work queue
pub trait SsbhWrite {
    /// Write the primary fields in declaration order
    fn write_fields<'a>(&'a self, ctx: &mut EncodeContext<'a>) -> Result<()>;

    /// Runs after the primary fields; appends trailing payload or padding
    fn post_write<'a>(&'a self, _ctx: &mut EncodeContext<'a>) -> Result<()> {
        Ok(())
    }

    /// Alignment applied before the record when it is emitted from the queue
    fn alignment(&self) -> u64 {
        1
    }
}

/// Records that can be read back field by field
pub trait SsbhRead: Sized {
    fn read_fields(ctx: &mut DecodeContext<'_>) -> Result<Self>;
}

/// Root record of a container, identified by its 4-byte magic
pub trait SsbhRoot: SsbhWrite + SsbhRead {
    const MAGIC: [u8; 4];
}

/// Integer and float types with a direct little-endian mapping
pub trait Scalar: Copy {
    fn write_scalar(self, writer: &mut SsbhWriter) -> Result<()>;
    fn read_scalar(reader: &mut SsbhReader<'_>) -> Result<Self>;
}

/// Encode `root` as a complete container
pub fn encode<T: SsbhRoot>(root: &T, options: &CodecOptions) -> Result<Vec<u8>> {
    let mut ctx = EncodeContext::new(*options);
    if options.write_header {
        write_container_header(ctx.writer())?;
    }
    ctx.encode_root(T::MAGIC, root)?;
    ctx.finish()
}

/// Decode a container that starts with the "HBSS" header
pub fn decode<T: SsbhRoot>(bytes: &[u8], options: &CodecOptions) -> Result<T> {
    read_container_header(bytes)?;
    decode_root(bytes, CONTAINER_HEADER_SIZE, options)
}

/// Decode a container written without the "HBSS" header
pub fn decode_headerless<T: SsbhRoot>(bytes: &[u8], options: &CodecOptions) -> Result<T> {
    decode_root(bytes, 0, options)
}

/// Decode the root record whose magic starts at `origin`
pub fn decode_root<T: SsbhRoot>(bytes: &[u8], origin: u64, options: &CodecOptions) -> Result<T> {
    let mut ctx = DecodeContext::new(bytes, origin, *options)?;
    let magic = ctx.reader().read_bytes(4)?;
    if magic != T::MAGIC {
        return Err(SsbhError::format(format!(
            "expected root magic {:?}, found {:?}",
            String::from_utf8_lossy(&T::MAGIC),
            String::from_utf8_lossy(magic)
        )));
    }
    T::read_fields(&mut ctx)
}

/// Write the 16-byte container header
pub fn write_container_header(writer: &mut SsbhWriter) -> Result<()> {
    writer.write_bytes(&SSBH_MAGIC)?;
    writer.write_u32(CONTAINER_HEADER_VALUE)?;
    writer.pad(CONTAINER_HEADER_SIZE, 0)
}

/// Validate the container header and return the root discriminant
pub fn read_container_header(bytes: &[u8]) -> Result<[u8; 4]> {
    let mut reader = SsbhReader::new(bytes);
    let magic = reader.read_bytes(4)?;
    if magic != SSBH_MAGIC {
        return Err(SsbhError::format(format!(
            "bad container magic {:?}",
            String::from_utf8_lossy(magic)
        )));
    }
    reader.seek(CONTAINER_HEADER_SIZE)?;
    let mut discriminant = [0u8; 4];
    discriminant.copy_from_slice(reader.read_bytes(4)?);
    Ok(discriminant)
}

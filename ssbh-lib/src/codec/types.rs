//! Field types and their binary mappings

use std::fmt;
use std::ops::Deref;
use std::sync::Arc;

use serde::{Serialize, Serializer};

use super::encode::{ArrayElements, Deferred, Identity};
use super::{
    DecodeContext, EncodeContext, FieldKind, Scalar, SsbhField, SsbhRead, SsbhWrite,
};
use crate::cursor::{SsbhReader, SsbhWriter};
use crate::{Result, SsbhError};

// ============================================================================
// Scalars
// ============================================================================

macro_rules! scalar_field {
    ($($ty:ty => $write:ident, $read:ident;)*) => {$(
        impl Scalar for $ty {
            fn write_scalar(self, writer: &mut SsbhWriter) -> Result<()> {
                writer.$write(self)
            }

            fn read_scalar(reader: &mut SsbhReader<'_>) -> Result<Self> {
                reader.$read()
            }
        }

        impl SsbhField for $ty {
            const KIND: FieldKind = FieldKind::Primitive;
            const SIZE: usize = std::mem::size_of::<$ty>();

            fn write_field<'a>(&'a self, ctx: &mut EncodeContext<'a>) -> Result<()> {
                self.write_scalar(ctx.writer())
            }

            fn read_field(ctx: &mut DecodeContext<'_>) -> Result<Self> {
                Self::read_scalar(ctx.reader())
            }
        }
    )*};
}

scalar_field! {
    u8 => write_u8, read_u8;
    i8 => write_i8, read_i8;
    u16 => write_u16, read_u16;
    i16 => write_i16, read_i16;
    u32 => write_u32, read_u32;
    i32 => write_i32, read_i32;
    u64 => write_u64, read_u64;
    i64 => write_i64, read_i64;
    f32 => write_f32, read_f32;
}

/// Booleans fill a full 8-byte slot in records and a single byte in arrays
impl SsbhField for bool {
    const KIND: FieldKind = FieldKind::Primitive;
    const SIZE: usize = 8;
    const ELEMENT_SIZE: usize = 1;

    fn write_field<'a>(&'a self, ctx: &mut EncodeContext<'a>) -> Result<()> {
        ctx.writer().write_u64(*self as u64)
    }

    fn read_field(ctx: &mut DecodeContext<'_>) -> Result<Self> {
        Ok(ctx.reader().read_u64()? != 0)
    }

    fn write_element<'a>(&'a self, ctx: &mut EncodeContext<'a>) -> Result<()> {
        ctx.writer().write_u8(*self as u8)
    }

    fn read_element(ctx: &mut DecodeContext<'_>) -> Result<Self> {
        Ok(ctx.reader().read_u8()? != 0)
    }
}

/// Fixed-count arrays are written in place without an offset
impl<T: SsbhField, const N: usize> SsbhField for [T; N] {
    const KIND: FieldKind = FieldKind::InlineArray;
    const SIZE: usize = T::ELEMENT_SIZE * N;

    fn write_field<'a>(&'a self, ctx: &mut EncodeContext<'a>) -> Result<()> {
        for element in self {
            element.write_element(ctx)?;
        }
        Ok(())
    }

    fn read_field(ctx: &mut DecodeContext<'_>) -> Result<Self> {
        let mut elements = Vec::with_capacity(N);
        for _ in 0..N {
            elements.push(T::read_element(ctx)?);
        }
        elements
            .try_into()
            .map_err(|_| SsbhError::format("inline array length mismatch"))
    }
}

// ============================================================================
// Strings
// ============================================================================

/// Out-of-line NUL-terminated string
///
/// An empty string is stored as a null offset, and a null offset reads back
/// as an empty string.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct SsbhString(pub String);

impl SsbhString {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Deref for SsbhString {
    type Target = str;

    fn deref(&self) -> &str {
        &self.0
    }
}

impl From<&str> for SsbhString {
    fn from(text: &str) -> Self {
        Self(text.to_string())
    }
}

impl From<String> for SsbhString {
    fn from(text: String) -> Self {
        Self(text)
    }
}

impl fmt::Display for SsbhString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Serialize for SsbhString {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

impl SsbhField for SsbhString {
    const KIND: FieldKind = FieldKind::String;
    const SIZE: usize = 8;

    /// Empty strings are stored as a null offset and never queued
    fn write_field<'a>(&'a self, ctx: &mut EncodeContext<'a>) -> Result<()> {
        if self.0.is_empty() {
            return ctx.writer().write_u64(0);
        }
        ctx.defer(Identity::string(&self.0), Deferred::String(&self.0))
    }

    fn read_field(ctx: &mut DecodeContext<'_>) -> Result<Self> {
        match ctx.read_offset()? {
            Some(target) => ctx.read_at(target, |ctx| {
                let bytes = ctx.reader().read_cstr()?;
                Ok(Self(String::from_utf8_lossy(bytes).into_owned()))
            }),
            None => Ok(Self::default()),
        }
    }
}

// ============================================================================
// Arrays
// ============================================================================

/// Out-of-line array stored as an offset and an element count
#[derive(Debug, Clone, PartialEq)]
pub struct SsbhArray<T> {
    pub elements: Vec<T>,
}

impl<T> SsbhArray<T> {
    pub fn new(elements: Vec<T>) -> Self {
        Self { elements }
    }
}

impl<T> Default for SsbhArray<T> {
    fn default() -> Self {
        Self {
            elements: Vec::new(),
        }
    }
}

impl<T> Deref for SsbhArray<T> {
    type Target = [T];

    fn deref(&self) -> &[T] {
        &self.elements
    }
}

impl<T> From<Vec<T>> for SsbhArray<T> {
    fn from(elements: Vec<T>) -> Self {
        Self { elements }
    }
}

impl<T> FromIterator<T> for SsbhArray<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self {
            elements: iter.into_iter().collect(),
        }
    }
}

impl<T: Serialize> Serialize for SsbhArray<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.elements.serialize(serializer)
    }
}

impl<T: SsbhField> ArrayElements for SsbhArray<T> {
    fn write_elements<'a>(&'a self, ctx: &mut EncodeContext<'a>) -> Result<()> {
        for element in &self.elements {
            element.write_element(ctx)?;
        }
        Ok(())
    }
}

impl<T: SsbhField> SsbhField for SsbhArray<T> {
    const KIND: FieldKind = FieldKind::Array;
    const SIZE: usize = 16;

    fn write_field<'a>(&'a self, ctx: &mut EncodeContext<'a>) -> Result<()> {
        if self.elements.is_empty() {
            ctx.writer().write_u64(0)?;
        } else {
            ctx.defer(Identity::array(&self.elements), Deferred::Array(self))?;
        }
        ctx.writer().write_u64(self.elements.len() as u64)
    }

    fn read_field(ctx: &mut DecodeContext<'_>) -> Result<Self> {
        let target = ctx.read_offset()?;
        let count = ctx.reader().read_u64()?;
        match target {
            Some(target) if count > 0 => {
                let count = ctx.check_count(target, count, T::ELEMENT_SIZE)?;
                ctx.read_at(target, |ctx| {
                    let mut elements = Vec::with_capacity(count);
                    for _ in 0..count {
                        elements.push(T::read_element(ctx)?);
                    }
                    Ok(Self { elements })
                })
            }
            _ => Ok(Self::default()),
        }
    }
}

/// Out-of-line bytes stored as an offset and a byte count
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SsbhByteBuffer(pub Vec<u8>);

impl Deref for SsbhByteBuffer {
    type Target = [u8];

    fn deref(&self) -> &[u8] {
        &self.0
    }
}

impl From<Vec<u8>> for SsbhByteBuffer {
    fn from(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }
}

impl Serialize for SsbhByteBuffer {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_bytes(&self.0)
    }
}

impl SsbhField for SsbhByteBuffer {
    const KIND: FieldKind = FieldKind::ByteBuffer;
    const SIZE: usize = 16;

    fn write_field<'a>(&'a self, ctx: &mut EncodeContext<'a>) -> Result<()> {
        if self.0.is_empty() {
            ctx.writer().write_u64(0)?;
        } else {
            ctx.defer(Identity::bytes(&self.0), Deferred::Bytes(&self.0))?;
        }
        ctx.writer().write_u64(self.0.len() as u64)
    }

    fn read_field(ctx: &mut DecodeContext<'_>) -> Result<Self> {
        let target = ctx.read_offset()?;
        let count = ctx.reader().read_u64()?;
        match target {
            Some(target) if count > 0 => {
                let count = ctx.check_count(target, count, 1)?;
                ctx.read_at(target, |ctx| Ok(Self(ctx.reader().read_bytes(count)?.to_vec())))
            }
            _ => Ok(Self::default()),
        }
    }
}

// ============================================================================
// Shared references
// ============================================================================

/// Shared reference to an out-of-line record
///
/// Clones point at the same allocation and are encoded once; equality
/// compares the referenced values.
#[derive(Debug)]
pub struct Ref<T>(Arc<T>);

impl<T> Ref<T> {
    pub fn new(value: T) -> Self {
        Self(Arc::new(value))
    }

    /// Whether both references share one allocation
    pub fn ptr_eq(this: &Self, other: &Self) -> bool {
        Arc::ptr_eq(&this.0, &other.0)
    }
}

impl<T: SsbhWrite> Ref<T> {
    /// Write a placeholder and queue the referenced record
    ///
    /// Clones of one `Ref` share a single emission.
    pub fn write_reference<'a>(&'a self, ctx: &mut EncodeContext<'a>) -> Result<()> {
        ctx.defer(
            Identity::object(Arc::as_ptr(&self.0)),
            Deferred::Object(&*self.0),
        )
    }
}

impl<T> Clone for Ref<T> {
    fn clone(&self) -> Self {
        Self(Arc::clone(&self.0))
    }
}

impl<T> Deref for Ref<T> {
    type Target = T;

    fn deref(&self) -> &T {
        &self.0
    }
}

impl<T> From<Arc<T>> for Ref<T> {
    fn from(value: Arc<T>) -> Self {
        Self(value)
    }
}

impl<T: PartialEq> PartialEq for Ref<T> {
    fn eq(&self, other: &Self) -> bool {
        *self.0 == *other.0
    }
}

impl<T: Serialize> Serialize for Ref<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.0.serialize(serializer)
    }
}

impl<T> SsbhField for Ref<T>
where
    T: SsbhWrite + SsbhRead + Send + Sync + 'static,
{
    const KIND: FieldKind = FieldKind::Reference;
    const SIZE: usize = 8;

    fn write_field<'a>(&'a self, ctx: &mut EncodeContext<'a>) -> Result<()> {
        self.write_reference(ctx)
    }

    fn read_field(ctx: &mut DecodeContext<'_>) -> Result<Self> {
        let position = ctx.reader().position();
        let target = ctx.read_offset()?.ok_or_else(|| {
            SsbhError::format(format!("null reference at 0x{:X}", position))
        })?;
        ctx.read_reference(target, T::read_fields).map(Self)
    }
}

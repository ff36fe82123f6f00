//! Encode pass: work queue, offset table, back-patching

use std::collections::VecDeque;

use hashbrown::HashMap;
use tracing::{debug, trace};

use super::{CodecOptions, SsbhWrite};
use crate::cursor::SsbhWriter;
use crate::{Result, SsbhError};

/// Identity of a deferred value, used to share one emission between fields
///
/// Identities come from the address of the value's backing allocation, so two
/// fields holding clones of the same [`Ref`](super::Ref) share an identity while
/// equal but separately allocated values do not.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Identity {
    kind: IdentityKind,
    address: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum IdentityKind {
    Root,
    Object,
    String,
    Array,
    Bytes,
}

impl Identity {
    pub(crate) fn root<T: ?Sized>(value: *const T) -> Self {
        Self::new(IdentityKind::Root, value as *const ())
    }

    pub(crate) fn object<T: ?Sized>(value: *const T) -> Self {
        Self::new(IdentityKind::Object, value as *const ())
    }

    /// Only for non-empty text; every empty string shares one dangling address
    pub(crate) fn string(value: &str) -> Self {
        Self::new(IdentityKind::String, value.as_ptr() as *const ())
    }

    pub(crate) fn array<T>(value: &[T]) -> Self {
        Self::new(IdentityKind::Array, value.as_ptr() as *const ())
    }

    pub(crate) fn bytes(value: &[u8]) -> Self {
        Self::new(IdentityKind::Bytes, value.as_ptr() as *const ())
    }

    fn new(kind: IdentityKind, address: *const ()) -> Self {
        Self {
            kind,
            address: address as usize,
        }
    }
}

/// Elements of an out-of-line array, written in place when the array is emitted
pub trait ArrayElements {
    fn write_elements<'a>(&'a self, ctx: &mut EncodeContext<'a>) -> Result<()>;
}

/// A value waiting in the work queue
pub(crate) enum Deferred<'a> {
    Root {
        magic: [u8; 4],
        object: &'a dyn SsbhWrite,
    },
    Object(&'a dyn SsbhWrite),
    String(&'a str),
    Array(&'a dyn ArrayElements),
    Bytes(&'a [u8]),
}

impl Deferred<'_> {
    fn alignment(&self) -> u64 {
        match self {
            Self::Root { .. } => 1,
            Self::Object(object) => object.alignment(),
            Self::String(_) => 4,
            Self::Array(_) | Self::Bytes(_) => 8,
        }
    }
}

struct Pending<'a> {
    identity: Identity,
    /// Position of the offset field to patch; `None` for the root
    placeholder: Option<u64>,
    value: Deferred<'a>,
}

/// Placeholder bookkeeping for one encode pass
#[derive(Debug, Default)]
struct OffsetTable {
    /// Placeholder position -> identity awaiting placement
    awaiting: HashMap<u64, Identity>,
    /// Identity -> position it was emitted at
    emitted: HashMap<Identity, u64>,
}

/// State of a single encode pass
///
/// The queue and offset table live only as long as the pass; nothing is
/// shared between calls.
pub struct EncodeContext<'a> {
    writer: SsbhWriter,
    options: CodecOptions,
    origin: u64,
    queue: VecDeque<Pending<'a>>,
    offsets: OffsetTable,
}

impl<'a> EncodeContext<'a> {
    pub fn new(options: CodecOptions) -> Self {
        Self {
            writer: SsbhWriter::new(),
            options,
            origin: 0,
            queue: VecDeque::new(),
            offsets: OffsetTable::default(),
        }
    }

    pub fn writer(&mut self) -> &mut SsbhWriter {
        &mut self.writer
    }

    pub fn options(&self) -> &CodecOptions {
        &self.options
    }

    /// Stored value for an offset field at `placeholder` pointing at `target`
    pub fn offset_value(&self, placeholder: u64, target: u64) -> u64 {
        self.options
            .offset_base
            .encode(placeholder, target, self.origin)
    }

    /// Write a zero placeholder here and queue `value` to fill it
    pub(crate) fn defer(&mut self, identity: Identity, value: Deferred<'a>) -> Result<()> {
        let placeholder = self.writer.position();
        self.writer.write_u64(0)?;
        self.offsets.awaiting.insert(placeholder, identity);
        self.queue.push_back(Pending {
            identity,
            placeholder: Some(placeholder),
            value,
        });
        Ok(())
    }

    /// Queue the root at the current position and drain the queue
    pub(crate) fn encode_root(&mut self, magic: [u8; 4], root: &'a dyn SsbhWrite) -> Result<()> {
        self.origin = self.writer.position();
        self.queue.push_front(Pending {
            identity: Identity::root(root),
            placeholder: None,
            value: Deferred::Root {
                magic,
                object: root,
            },
        });

        while let Some(pending) = self.queue.pop_front() {
            self.emit(pending)?;
        }
        self.writer.pad(4, 0)
    }

    /// Check that every placeholder was patched and return the bytes
    pub(crate) fn finish(self) -> Result<Vec<u8>> {
        if let Some(&placeholder) = self.offsets.awaiting.keys().min() {
            return Err(SsbhError::UnresolvedReference(placeholder));
        }
        let bytes = self.writer.into_inner()?;
        debug!(
            "Encoded {} bytes ({} distinct out-of-line values)",
            bytes.len(),
            self.offsets.emitted.len()
        );
        Ok(bytes)
    }

    fn emit(&mut self, pending: Pending<'a>) -> Result<()> {
        let Pending {
            identity,
            placeholder,
            value,
        } = pending;

        if let Some(&position) = self.offsets.emitted.get(&identity) {
            // Already placed; share the earlier emission.
            if let Some(placeholder) = placeholder {
                trace!("Sharing 0x{:X} for placeholder 0x{:X}", position, placeholder);
                self.patch(placeholder, position)?;
            }
            return Ok(());
        }

        self.writer.pad(value.alignment(), 0)?;
        let position = self.writer.position();
        self.offsets.emitted.insert(identity, position);
        if let Some(placeholder) = placeholder {
            self.patch(placeholder, position)?;
        }

        match value {
            Deferred::Root { magic, object } => {
                self.writer.write_bytes(&magic)?;
                object.write_fields(self)?;
                object.post_write(self)?;
                self.writer.pad(4, 0)?;
            }
            Deferred::Object(object) => {
                object.write_fields(self)?;
                object.post_write(self)?;
                self.writer.pad(4, 0)?;
            }
            Deferred::String(text) => {
                self.writer.write_bytes(text.as_bytes())?;
                self.writer.write_u8(0)?;
                self.writer.pad(4, 0)?;
            }
            Deferred::Array(elements) => {
                // Values deferred by the elements go ahead of the outer queue.
                let outer = std::mem::take(&mut self.queue);
                elements.write_elements(self)?;
                self.queue.extend(outer);
            }
            Deferred::Bytes(bytes) => {
                self.writer.write_bytes(bytes)?;
            }
        }
        Ok(())
    }

    fn patch(&mut self, placeholder: u64, target: u64) -> Result<()> {
        if self.offsets.awaiting.remove(&placeholder).is_none() {
            return Err(SsbhError::UnresolvedReference(placeholder));
        }
        let value = self.offset_value(placeholder, target);
        self.writer.patch_u64(placeholder, value)
    }
}

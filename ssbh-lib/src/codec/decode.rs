//! Decode pass: offset resolution and reference memoization

use std::any::Any;
use std::sync::Arc;

use hashbrown::{HashMap, HashSet};
use tracing::trace;

use super::CodecOptions;
use crate::cursor::SsbhReader;
use crate::{Result, SsbhError};

/// State of a single decode pass
///
/// Shared references are memoized by the absolute position they resolve to,
/// so every field pointing at the same bytes receives the same `Arc`.
pub struct DecodeContext<'a> {
    reader: SsbhReader<'a>,
    options: CodecOptions,
    origin: u64,
    references: HashMap<u64, Arc<dyn Any + Send + Sync>>,
    in_progress: HashSet<u64>,
}

impl<'a> DecodeContext<'a> {
    /// Start a pass with the cursor on the root object at `origin`
    pub fn new(bytes: &'a [u8], origin: u64, options: CodecOptions) -> Result<Self> {
        let mut reader = SsbhReader::new(bytes);
        reader.seek(origin)?;
        Ok(Self {
            reader,
            options,
            origin,
            references: HashMap::new(),
            in_progress: HashSet::new(),
        })
    }

    pub fn reader(&mut self) -> &mut SsbhReader<'a> {
        &mut self.reader
    }

    pub fn options(&self) -> &CodecOptions {
        &self.options
    }

    /// Read an 8-byte offset field and resolve it to an absolute position
    ///
    /// Returns `None` for a zero offset.
    pub fn read_offset(&mut self) -> Result<Option<u64>> {
        let placeholder = self.reader.position();
        let value = self.reader.read_u64()?;
        if value == 0 {
            return Ok(None);
        }

        let len = self.reader.len();
        match self
            .options
            .offset_base
            .resolve(placeholder, value, self.origin)
        {
            Some(target) if target < len as u64 => Ok(Some(target)),
            resolved => Err(SsbhError::TruncatedData {
                offset: resolved.unwrap_or(u64::MAX),
                needed: 1,
                len,
            }),
        }
    }

    /// Run `read` with the cursor at `target`, then restore the cursor
    pub fn read_at<T>(
        &mut self,
        target: u64,
        read: impl FnOnce(&mut Self) -> Result<T>,
    ) -> Result<T> {
        let here = self.reader.position();
        self.reader.seek(target)?;
        let result = read(self);
        self.reader.seek(here)?;
        result
    }

    /// Decode the shared record at `target`, reusing an earlier decode of the same position
    pub fn read_reference<T>(
        &mut self,
        target: u64,
        read: impl FnOnce(&mut Self) -> Result<T>,
    ) -> Result<Arc<T>>
    where
        T: Send + Sync + 'static,
    {
        if let Some(existing) = self.references.get(&target) {
            trace!("Reusing reference at 0x{:X}", target);
            return existing.clone().downcast::<T>().map_err(|_| {
                SsbhError::format(format!(
                    "offset 0x{:X} is referenced as two different types",
                    target
                ))
            });
        }

        if !self.in_progress.insert(target) {
            return Err(SsbhError::format(format!(
                "reference cycle through offset 0x{:X}",
                target
            )));
        }
        let result = self.read_at(target, read);
        self.in_progress.remove(&target);

        let value = Arc::new(result?);
        self.references
            .insert(target, value.clone() as Arc<dyn Any + Send + Sync>);
        Ok(value)
    }

    /// Guard an element count against the bytes left after `target`
    pub(crate) fn check_count(&self, target: u64, count: u64, element_size: usize) -> Result<usize> {
        let available = (self.reader.len() as u64).saturating_sub(target);
        match count.checked_mul(element_size as u64) {
            Some(total) if total <= available => Ok(count as usize),
            _ => Err(SsbhError::TruncatedData {
                offset: target,
                needed: count.saturating_mul(element_size as u64) as usize,
                len: self.reader.len(),
            }),
        }
    }
}

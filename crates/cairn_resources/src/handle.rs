//! Resource Handles
//!
//! A [`ResourceHandle`] owns one heap buffer. It is deliberately neither
//! `Clone` nor `Copy`: there is exactly one owner of every buffer at any time,
//! and the buffer is released when that owner is dropped.
//!
//! Lookups never hand out handles. They return a [`ResourceView`], a borrowed
//! read-only window onto a registered buffer that cannot outlive the pile
//! entry it points into.

use std::fmt;

use cairn_core::errors::{CairnError, Result};
use cairn_core::hash::HashId;

/// Owned byte buffer plus its registration identity.
pub struct ResourceHandle {
    pub(crate) id: HashId,
    pub(crate) name: String,
    pub(crate) content: Box<[u8]>,
}

impl ResourceHandle {
    /// The empty sentinel stored in unused pile slots. Does not allocate.
    #[inline]
    #[must_use]
    pub fn empty() -> Self {
        Self {
            id: HashId::NONE,
            name: String::new(),
            content: Box::default(),
        }
    }

    /// Allocates an unregistered handle with exactly `size` zeroed bytes.
    ///
    /// Allocation failure is reported as [`CairnError::OutOfMemory`] instead
    /// of aborting the process.
    pub fn allocate(size: usize) -> Result<Self> {
        let mut buffer = Vec::new();
        buffer
            .try_reserve_exact(size)
            .map_err(|_| CairnError::OutOfMemory { size })?;
        buffer.resize(size, 0);

        Ok(Self {
            id: HashId::NONE,
            name: String::new(),
            content: buffer.into_boxed_slice(),
        })
    }

    /// Allocates a handle and copies `data` into it.
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        let mut handle = Self::allocate(data.len())?;
        handle.content.copy_from_slice(data);
        Ok(handle)
    }

    #[inline]
    #[must_use]
    pub fn id(&self) -> HashId {
        self.id
    }

    /// Registration name; empty until the handle has been registered.
    #[inline]
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.content.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }

    #[inline]
    #[must_use]
    pub fn is_registered(&self) -> bool {
        self.id.is_valid()
    }

    #[inline]
    #[must_use]
    pub fn bytes(&self) -> &[u8] {
        &self.content
    }

    /// Mutable access for filling a freshly allocated buffer.
    #[inline]
    pub fn bytes_mut(&mut self) -> &mut [u8] {
        &mut self.content
    }

    /// Consumes the handle and returns its buffer.
    #[must_use]
    pub fn into_bytes(self) -> Box<[u8]> {
        self.content
    }

    pub(crate) fn view(&self, index: usize) -> ResourceView<'_> {
        ResourceView {
            id: self.id,
            name: &self.name,
            bytes: &self.content,
            index,
        }
    }
}

impl Default for ResourceHandle {
    fn default() -> Self {
        Self::empty()
    }
}

impl fmt::Debug for ResourceHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResourceHandle")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("length", &self.content.len())
            .finish()
    }
}

/// Borrowed, read-only view of a registered resource.
#[derive(Debug, Clone, Copy)]
pub struct ResourceView<'a> {
    id: HashId,
    name: &'a str,
    bytes: &'a [u8],
    index: usize,
}

impl<'a> ResourceView<'a> {
    #[inline]
    #[must_use]
    pub fn id(&self) -> HashId {
        self.id
    }

    #[inline]
    #[must_use]
    pub fn name(&self) -> &'a str {
        self.name
    }

    #[inline]
    #[must_use]
    pub fn bytes(&self) -> &'a [u8] {
        self.bytes
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Slot index in the pile at the time of the lookup.
    #[inline]
    #[must_use]
    pub fn index(&self) -> usize {
        self.index
    }
}

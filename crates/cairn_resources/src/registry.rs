//! Resource Registry
//!
//! [`ResourceRegistry`] is the façade asset loaders talk to. It allocates
//! buffers, fills them from a file or from memory, and registers them in a
//! [`ResourcePile`] under a caller-chosen name.
//!
//! # Ownership
//!
//! - `load_from_file` and `create_from_memory` allocate internally. When
//!   registration fails the buffer is dropped before the error is returned.
//! - `register` takes a handle the caller allocated. When it fails the
//!   handle comes back inside [`RegisterError`] and stays the caller's.
//! - Lookups return [`ResourceView`]s; only [`take`](ResourceRegistry::take)
//!   and the pile's `pop`/`remove_at` move a handle out.
//!
//! Dropping the registry drains it, so every buffer is released even when
//! [`drain_all`](ResourceRegistry::drain_all) is never called.
//!
//! ```rust,ignore
//! use cairn::resources::ResourceRegistry;
//!
//! let mut registry = ResourceRegistry::default();
//! registry.create_from_memory("cube.indices", &[0, 1, 2])?;
//! registry.load_from_file("stone", "assets/stone.png")?;
//!
//! let stone = registry.get("stone").unwrap();
//! println!("{} bytes", stone.len());
//!
//! registry.destroy("cube.indices");
//! registry.drain_all();
//! ```

use std::fmt;
use std::fs::File;
use std::io::{self, Read};
use std::path::Path;

use cairn_core::errors::{CairnError, Result};
use cairn_core::hash::HashId;

use crate::handle::{ResourceHandle, ResourceView};
use crate::pile::{HashFn, Probe, ResourcePile};
use crate::settings::RegistrySettings;

/// A failed [`ResourceRegistry::register`]: the reason plus the handle, which
/// is still owned by the caller.
pub struct RegisterError {
    pub error: CairnError,
    pub handle: ResourceHandle,
}

impl RegisterError {
    /// Releases the handle and keeps the error.
    #[must_use]
    pub fn into_error(self) -> CairnError {
        self.error
    }

    #[must_use]
    pub fn into_handle(self) -> ResourceHandle {
        self.handle
    }
}

impl fmt::Debug for RegisterError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegisterError")
            .field("error", &self.error)
            .field("handle", &self.handle)
            .finish()
    }
}

impl fmt::Display for RegisterError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.error, f)
    }
}

impl std::error::Error for RegisterError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.error)
    }
}

impl From<RegisterError> for CairnError {
    fn from(err: RegisterError) -> Self {
        err.error
    }
}

#[derive(Debug, Default)]
pub struct ResourceRegistry {
    pile: ResourcePile,
}

impl ResourceRegistry {
    pub fn new(settings: RegistrySettings) -> Result<Self> {
        Ok(Self {
            pile: ResourcePile::new(settings)?,
        })
    }

    pub fn with_hash_fn(settings: RegistrySettings, hash_fn: HashFn) -> Result<Self> {
        Ok(Self {
            pile: ResourcePile::with_hash_fn(settings, hash_fn)?,
        })
    }

    #[inline]
    #[must_use]
    pub fn pile(&self) -> &ResourcePile {
        &self.pile
    }

    /// Mutable access to the underlying pile for stack-style use.
    #[inline]
    pub fn pile_mut(&mut self) -> &mut ResourcePile {
        &mut self.pile
    }

    #[inline]
    #[must_use]
    pub fn settings(&self) -> &RegistrySettings {
        self.pile.settings()
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.pile.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pile.is_empty()
    }

    #[inline]
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.pile.capacity()
    }

    // ========================================================================
    // Allocation & Registration
    // ========================================================================

    /// Allocates an unregistered handle of exactly `size` bytes.
    pub fn allocate(size: usize) -> Result<ResourceHandle> {
        ResourceHandle::allocate(size)
    }

    /// Registers a caller-allocated handle under `name` and returns its slot.
    ///
    /// On failure the handle is returned inside the error untouched; the
    /// registry never releases a buffer it did not allocate.
    pub fn register(
        &mut self,
        name: &str,
        mut handle: ResourceHandle,
    ) -> std::result::Result<usize, RegisterError> {
        let id = match self.pile.probe(name) {
            Probe::Vacant(id) => id,
            Probe::Found(_) => {
                log::warn!("Resource '{name}' is already registered");
                return Err(RegisterError {
                    error: CairnError::DuplicateName(name.to_owned()),
                    handle,
                });
            }
            Probe::Collision(index) => {
                let existing = self
                    .pile
                    .get(index)
                    .map(|v| v.name().to_owned())
                    .unwrap_or_default();
                let id = self.pile.hash(name);
                log::warn!("Resource '{name}' collides with '{existing}' ({id})");
                return Err(RegisterError {
                    error: CairnError::HashCollision {
                        name: name.to_owned(),
                        existing,
                        id,
                    },
                    handle,
                });
            }
        };

        handle.id = id;
        handle.name = name.to_owned();

        match self.pile.push(handle) {
            Ok(slot) => {
                log::debug!("Registered resource '{name}' ({id}) at slot {slot}");
                Ok(slot)
            }
            Err(mut handle) => {
                // Back to the unregistered state the caller handed in.
                handle.id = HashId::NONE;
                handle.name.clear();
                Err(RegisterError {
                    error: CairnError::CapacityExceeded {
                        capacity: self.pile.capacity(),
                    },
                    handle,
                })
            }
        }
    }

    /// Reads a whole file into a new buffer and registers it under `name`.
    pub fn load_from_file(
        &mut self,
        name: &str,
        path: impl AsRef<Path>,
    ) -> Result<ResourceView<'_>> {
        let path = path.as_ref();
        let mut file = File::open(path).map_err(|source| CairnError::FileNotFound {
            path: path.to_path_buf(),
            source,
        })?;

        let io_err = |source| CairnError::Io {
            path: path.to_path_buf(),
            source,
        };
        let metadata = file.metadata().map_err(io_err)?;
        if metadata.is_dir() {
            return Err(io_err(io::Error::from(io::ErrorKind::IsADirectory)));
        }
        let size = metadata.len();
        let size = usize::try_from(size).map_err(|_| CairnError::OutOfMemory { size: usize::MAX })?;

        let mut handle = ResourceHandle::allocate(size)?;
        file.read_exact(handle.bytes_mut()).map_err(io_err)?;

        let slot = self.register(name, handle)?;
        log::info!("Loaded '{}' as '{name}' ({size} bytes)", path.display());
        Ok(self.view_at(slot))
    }

    /// Copies `data` into a new buffer and registers it under `name`.
    pub fn create_from_memory(&mut self, name: &str, data: &[u8]) -> Result<ResourceView<'_>> {
        let handle = ResourceHandle::from_bytes(data)?;
        let slot = self.register(name, handle)?;
        Ok(self.view_at(slot))
    }

    fn view_at(&self, slot: usize) -> ResourceView<'_> {
        self.pile
            .get(slot)
            .unwrap_or_else(|| unreachable!("slot {slot} was just registered"))
    }

    // ========================================================================
    // Lookup
    // ========================================================================

    #[must_use]
    pub fn get(&self, name: &str) -> Option<ResourceView<'_>> {
        self.pile.find_by_name(name)
    }

    #[must_use]
    pub fn get_by_id(&self, id: HashId) -> Option<ResourceView<'_>> {
        self.pile.find_by_id(id)
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.pile.find_by_name(name).is_some()
    }

    /// Registered resources in slot (insertion) order.
    pub fn iter(&self) -> impl Iterator<Item = ResourceView<'_>> + '_ {
        self.pile.iter()
    }

    // ========================================================================
    // Destruction
    // ========================================================================

    /// Removes and releases the resource registered under `name`.
    pub fn destroy(&mut self, name: &str) -> bool {
        let removed = self.pile.remove_by_name(name);
        if removed {
            log::debug!("Destroyed resource '{name}'");
        }
        removed
    }

    /// Removes and releases the resource at slot `index`.
    pub fn destroy_at(&mut self, index: usize) -> bool {
        match self.pile.remove_at(index) {
            Some(handle) => {
                log::debug!("Destroyed resource '{}' at slot {index}", handle.name());
                true
            }
            None => false,
        }
    }

    /// Unregisters `name` and hands its buffer to the caller.
    pub fn take(&mut self, name: &str) -> Option<ResourceHandle> {
        let handle = self.pile.take_by_name(name)?;
        log::debug!("Took resource '{name}' ({} bytes)", handle.len());
        Some(handle)
    }

    /// Pops and releases every resource. Returns how many were released.
    pub fn drain_all(&mut self) -> usize {
        let mut released = 0;
        while let Some(handle) = self.pile.pop() {
            drop(handle);
            released += 1;
        }
        if released > 0 {
            log::debug!("Drained {released} resources");
        }
        released
    }
}

impl Drop for ResourceRegistry {
    fn drop(&mut self) {
        self.drain_all();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cairn_core::ErrorKind;

    #[test]
    fn test_register_assigns_identity() {
        let mut registry = ResourceRegistry::default();
        let handle = ResourceRegistry::allocate(4).unwrap();

        let slot = registry.register("blob", handle).unwrap();
        let view = registry.get("blob").unwrap();
        assert_eq!(slot, 0);
        assert_eq!(view.name(), "blob");
        assert_eq!(view.id(), cairn_core::compute_hash("blob"));
        assert_eq!(view.len(), 4);
    }

    #[test]
    fn test_failed_register_returns_handle() {
        let mut registry = ResourceRegistry::default();
        registry.create_from_memory("blob", &[1, 2, 3]).unwrap();

        let mut handle = ResourceRegistry::allocate(3).unwrap();
        handle.bytes_mut().copy_from_slice(&[7, 8, 9]);

        let err = registry.register("blob", handle).unwrap_err();
        assert_eq!(err.error.kind(), ErrorKind::DuplicateName);
        let handle = err.into_handle();
        assert_eq!(handle.bytes(), &[7, 8, 9]);
        assert!(!handle.is_registered());
    }

    #[test]
    fn test_capacity_failure_resets_handle_identity() {
        let mut registry = ResourceRegistry::new(RegistrySettings::with_capacity(1)).unwrap();
        registry.create_from_memory("first", &[1]).unwrap();

        let handle = ResourceRegistry::allocate(2).unwrap();
        let err = registry.register("second", handle).unwrap_err();
        assert_eq!(err.error.kind(), ErrorKind::CapacityExceeded);
        assert_eq!(err.handle.name(), "");
        assert!(err.handle.id().is_none());
    }

    #[test]
    fn test_drain_twice_is_harmless() {
        let mut registry = ResourceRegistry::default();
        registry.create_from_memory("a", &[1]).unwrap();
        registry.create_from_memory("b", &[2]).unwrap();
        assert_eq!(registry.drain_all(), 2);
        assert_eq!(registry.drain_all(), 0);
    }
}

//! Thread-shared registry.
//!
//! [`ResourceRegistry`] itself is single-threaded. [`SharedRegistry`] puts the
//! whole registry behind one mutex so that every read-then-write on the pile
//! is serialized. Borrowed views never leave the lock: callers either run a
//! closure under the lock ([`read`](SharedRegistry::read)) or receive owned
//! copies.

use std::path::Path;
use std::sync::Arc;

use cairn_core::errors::Result;
use cairn_core::hash::HashId;
use parking_lot::{Mutex, MutexGuard};

use crate::handle::{ResourceHandle, ResourceView};
use crate::registry::ResourceRegistry;
use crate::settings::RegistrySettings;

#[derive(Clone, Default)]
pub struct SharedRegistry {
    inner: Arc<Mutex<ResourceRegistry>>,
}

impl SharedRegistry {
    pub fn new(settings: RegistrySettings) -> Result<Self> {
        Ok(Self::from_registry(ResourceRegistry::new(settings)?))
    }

    #[must_use]
    pub fn from_registry(registry: ResourceRegistry) -> Self {
        Self {
            inner: Arc::new(Mutex::new(registry)),
        }
    }

    pub fn create_from_memory(&self, name: &str, data: &[u8]) -> Result<HashId> {
        let mut guard = self.inner.lock();
        guard.create_from_memory(name, data).map(|view| view.id())
    }

    pub fn load_from_file(&self, name: &str, path: impl AsRef<Path>) -> Result<HashId> {
        let mut guard = self.inner.lock();
        guard.load_from_file(name, path).map(|view| view.id())
    }

    /// Runs `f` on the resource registered under `name` while holding the lock.
    pub fn read<R>(&self, name: &str, f: impl FnOnce(ResourceView<'_>) -> R) -> Option<R> {
        let guard = self.inner.lock();
        guard.get(name).map(f)
    }

    /// Copies the bytes of the resource registered under `name`.
    #[must_use]
    pub fn copy_bytes(&self, name: &str) -> Option<Vec<u8>> {
        self.read(name, |view| view.bytes().to_vec())
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.inner.lock().contains(name)
    }

    pub fn destroy(&self, name: &str) -> bool {
        self.inner.lock().destroy(name)
    }

    pub fn take(&self, name: &str) -> Option<ResourceHandle> {
        self.inner.lock().take(name)
    }

    pub fn drain_all(&self) -> usize {
        self.inner.lock().drain_all()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.lock().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.lock().is_empty()
    }

    /// Locks the registry for a batch of operations.
    pub fn lock(&self) -> MutexGuard<'_, ResourceRegistry> {
        self.inner.lock()
    }
}

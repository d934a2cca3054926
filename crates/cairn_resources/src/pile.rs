//! Resource Pile
//!
//! Fixed-capacity, densely packed storage for [`ResourceHandle`]s.
//!
//! # Layout
//!
//! The pile owns `capacity` slots and a `count` of active entries:
//!
//! ```text
//!  0        1        2          count-1   count              capacity-1
//! [ tex_a ][ tex_b ][ mesh ] ... [ last ][ empty ][ empty ] ... [ empty ]
//!  \_______________ active _____________/ \_________ sentinel (id 0) ____/
//! ```
//!
//! Slots `[0, count)` always hold registered handles and every slot past
//! `count` holds the empty sentinel. Removal shifts later entries down by one,
//! so the relative insertion order of the survivors never changes.
//!
//! # Lookup
//!
//! Names resolve to slots either through a hash-to-slot side table
//! ([`LookupStrategy::Indexed`]) or by scanning from slot 0 until the first
//! empty slot ([`LookupStrategy::Scan`]). The side table is maintained in both
//! modes so the strategy only changes how a lookup is answered.

use std::mem;

use cairn_core::errors::{CairnError, Result};
use cairn_core::hash::{compute_hash, HashId};
use rustc_hash::FxHashMap;

use crate::handle::{ResourceHandle, ResourceView};
use crate::settings::{CollisionPolicy, LookupStrategy, RegistrySettings};

/// Signature of a name hash function. Its output is passed through
/// [`HashId::from_raw`], so returning `0` is harmless.
pub type HashFn = fn(&str) -> u64;

fn default_hash(text: &str) -> u64 {
    compute_hash(text).get()
}

/// Outcome of resolving a name against the pile.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Probe {
    /// The name is registered at this slot.
    Found(usize),
    /// A different name with the same hash occupies this slot.
    Collision(usize),
    /// Nothing is registered under the name's hash.
    Vacant(HashId),
}

pub struct ResourcePile {
    slots: Box<[ResourceHandle]>,
    count: usize,
    /// Hash to the first slot holding it.
    index: FxHashMap<HashId, usize>,
    settings: RegistrySettings,
    hash_fn: HashFn,
}

impl std::fmt::Debug for ResourcePile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResourcePile")
            .field("count", &self.count)
            .field("capacity", &self.slots.len())
            .field("settings", &self.settings)
            .finish_non_exhaustive()
    }
}

impl Default for ResourcePile {
    fn default() -> Self {
        let settings = RegistrySettings::default();
        let slots = std::iter::repeat_with(ResourceHandle::empty)
            .take(settings.capacity)
            .collect();
        Self::build(settings, default_hash, slots)
    }
}

impl ResourcePile {
    pub fn new(settings: RegistrySettings) -> Result<Self> {
        Self::with_hash_fn(settings, default_hash)
    }

    /// Creates a pile that hashes names with `hash_fn` instead of xxh3.
    pub fn with_hash_fn(settings: RegistrySettings, hash_fn: HashFn) -> Result<Self> {
        settings.validate()?;
        let slots = Self::empty_slots(settings.capacity)?;
        Ok(Self::build(settings, hash_fn, slots))
    }

    /// Reserves `capacity` sentinel slots, reporting an oversized capacity
    /// as [`CairnError::OutOfMemory`].
    fn empty_slots(capacity: usize) -> Result<Box<[ResourceHandle]>> {
        let mut slots = Vec::new();
        slots
            .try_reserve_exact(capacity)
            .map_err(|_| CairnError::OutOfMemory {
                size: capacity.saturating_mul(mem::size_of::<ResourceHandle>()),
            })?;
        slots.resize_with(capacity, ResourceHandle::empty);
        Ok(slots.into_boxed_slice())
    }

    fn build(settings: RegistrySettings, hash_fn: HashFn, slots: Box<[ResourceHandle]>) -> Self {
        Self {
            slots,
            count: 0,
            index: FxHashMap::default(),
            settings,
            hash_fn,
        }
    }

    // ========================================================================
    // Queries
    // ========================================================================

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.count
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    #[inline]
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    #[inline]
    #[must_use]
    pub fn is_full(&self) -> bool {
        self.count >= self.slots.len()
    }

    #[inline]
    #[must_use]
    pub fn settings(&self) -> &RegistrySettings {
        &self.settings
    }

    /// Hashes a name with this pile's hash function.
    #[inline]
    #[must_use]
    pub fn hash(&self, name: &str) -> HashId {
        HashId::from_raw((self.hash_fn)(name))
    }

    /// Id stored in any slot below `capacity`, active or not.
    #[must_use]
    pub fn slot_id(&self, index: usize) -> Option<HashId> {
        self.slots.get(index).map(ResourceHandle::id)
    }

    /// Active entry at `index`.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<ResourceView<'_>> {
        if index < self.active_len() {
            Some(self.slots[index].view(index))
        } else {
            None
        }
    }

    /// Active entries in slot order.
    pub fn iter(&self) -> impl Iterator<Item = ResourceView<'_>> + '_ {
        self.slots[..self.active_len()]
            .iter()
            .enumerate()
            .map(|(i, handle)| handle.view(i))
    }

    /// Looks a resource up by name.
    ///
    /// Under [`CollisionPolicy::Alias`] a different name with the same hash
    /// matches as well.
    #[must_use]
    pub fn find_by_name(&self, name: &str) -> Option<ResourceView<'_>> {
        match self.probe(name) {
            Probe::Found(index) => Some(self.slots[index].view(index)),
            Probe::Collision(_) | Probe::Vacant(_) => None,
        }
    }

    #[must_use]
    pub fn find_by_id(&self, id: HashId) -> Option<ResourceView<'_>> {
        self.slot_of(id).map(|index| self.slots[index].view(index))
    }

    pub(crate) fn probe(&self, name: &str) -> Probe {
        let id = self.hash(name);
        match self.slot_of(id) {
            None => Probe::Vacant(id),
            Some(index) => match self.settings.collision_policy {
                CollisionPolicy::Alias => Probe::Found(index),
                CollisionPolicy::Reject if self.slots[index].name == name => Probe::Found(index),
                CollisionPolicy::Reject => Probe::Collision(index),
            },
        }
    }

    fn slot_of(&self, id: HashId) -> Option<usize> {
        if id.is_none() {
            return None;
        }
        match self.settings.lookup {
            LookupStrategy::Indexed => self.index.get(&id).copied(),
            // Dense packing: the first empty slot ends the active prefix.
            LookupStrategy::Scan => self
                .slots
                .iter()
                .take_while(|slot| slot.id.is_valid())
                .position(|slot| slot.id == id),
        }
    }

    /// `count` clamped to the slot array, in case the counter was ever corrupted.
    #[inline]
    fn active_len(&self) -> usize {
        debug_assert!(self.count <= self.slots.len());
        self.count.min(self.slots.len())
    }

    // ========================================================================
    // Stack operations
    // ========================================================================

    /// Appends a registered handle at slot `count` and returns that index.
    ///
    /// Fails, handing the handle back untouched, if the pile is full or the
    /// handle still carries the sentinel id. Duplicate ids are not checked here.
    pub fn push(&mut self, handle: ResourceHandle) -> std::result::Result<usize, ResourceHandle> {
        if self.count >= self.slots.len() {
            log::warn!(
                "ResourcePile is full (max {} resources), rejecting '{}'",
                self.slots.len(),
                handle.name
            );
            return Err(handle);
        }
        if handle.id.is_none() {
            log::warn!("ResourcePile::push called with an unregistered handle");
            return Err(handle);
        }

        let slot = self.count;
        self.index.entry(handle.id).or_insert(slot);
        self.slots[slot] = handle;
        self.count += 1;
        Ok(slot)
    }

    /// Removes the most recently pushed handle and transfers it to the caller.
    pub fn pop(&mut self) -> Option<ResourceHandle> {
        if self.count == 0 || self.count > self.slots.len() {
            return None;
        }

        self.count -= 1;
        let handle = mem::take(&mut self.slots[self.count]);
        if self.index.get(&handle.id) == Some(&self.count) {
            self.index.remove(&handle.id);
        }
        Some(handle)
    }

    // ========================================================================
    // Removal
    // ========================================================================

    /// Removes the entry at `index`, shifting every later entry down by one.
    ///
    /// Returns the removed handle; dropping it releases the buffer. Indices
    /// outside `[0, count)` leave the pile untouched and return `None`.
    pub fn remove_at(&mut self, index: usize) -> Option<ResourceHandle> {
        let len = self.active_len();
        if index >= len {
            return None;
        }

        let removed = mem::take(&mut self.slots[index]);
        // Moves the sentinel left behind to `len - 1` and shifts the rest down.
        self.slots[index..len].rotate_left(1);
        self.count = len - 1;

        for (new_pos, slot) in self.slots[index..self.count].iter().enumerate() {
            let new_pos = index + new_pos;
            if let Some(pos) = self.index.get_mut(&slot.id) {
                if *pos == new_pos + 1 {
                    *pos = new_pos;
                }
            }
        }

        if self.index.get(&removed.id) == Some(&index) {
            self.index.remove(&removed.id);
            // A duplicate pushed after the removed entry now becomes the first.
            if let Some(next) = self.slots[..self.count]
                .iter()
                .position(|slot| slot.id == removed.id)
            {
                self.index.insert(removed.id, next);
            }
        }

        Some(removed)
    }

    /// Removes and releases the resource registered under `name`.
    pub fn remove_by_name(&mut self, name: &str) -> bool {
        self.take_by_name(name).is_some()
    }

    /// Removes the resource registered under `name` and hands it to the caller.
    pub fn take_by_name(&mut self, name: &str) -> Option<ResourceHandle> {
        match self.probe(name) {
            Probe::Found(index) => self.remove_at(index),
            Probe::Collision(_) | Probe::Vacant(_) => None,
        }
    }

    // ========================================================================
    // Invariants
    // ========================================================================

    /// Checks that `[0, count)` holds registered handles, every later slot
    /// holds the sentinel, and the side table points at matching slots.
    #[must_use]
    pub fn is_densely_packed(&self) -> bool {
        if self.count > self.slots.len() {
            return false;
        }
        let (active, free) = self.slots.split_at(self.count);

        active.iter().all(|slot| slot.id.is_valid())
            && free.iter().all(|slot| slot.id.is_none())
            && self.index.len() <= self.count
            && self
                .index
                .iter()
                .all(|(id, &pos)| pos < self.count && self.slots[pos].id == *id)
            && active
                .iter()
                .enumerate()
                .all(|(i, slot)| self.index.get(&slot.id).is_some_and(|&first| first <= i))
    }
}

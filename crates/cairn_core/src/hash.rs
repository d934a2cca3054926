//! Resource Identifiers
//!
//! Every registered resource is addressed by a [`HashId`]: a 64-bit hash of
//! the caller-supplied name. The value `0` is reserved as the empty-slot
//! sentinel ([`HashId::NONE`]) and is never produced by [`compute_hash`].
//!
//! ```rust,ignore
//! use cairn_core::hash::{compute_hash, HashId};
//!
//! let id = compute_hash("textures/stone.png");
//! assert_eq!(id, compute_hash("textures/stone.png"));
//! assert!(id.is_valid());
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};
use xxhash_rust::xxh3::xxh3_64;

/// 64-bit identifier derived from a resource name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HashId(u64);

impl HashId {
    /// The empty-slot sentinel.
    pub const NONE: HashId = HashId(0);

    /// Value substituted for a raw hash of `0`.
    pub const ZERO_SUBSTITUTE: u64 = u64::MAX;

    /// Wraps the output of a hash function, remapping `0` so the result can
    /// never be mistaken for the sentinel.
    #[inline]
    #[must_use]
    pub const fn from_raw(raw: u64) -> Self {
        if raw == 0 {
            HashId(Self::ZERO_SUBSTITUTE)
        } else {
            HashId(raw)
        }
    }

    #[inline]
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }

    /// Returns `true` for anything other than [`HashId::NONE`].
    #[inline]
    #[must_use]
    pub const fn is_valid(self) -> bool {
        self.0 != 0
    }

    #[inline]
    #[must_use]
    pub const fn is_none(self) -> bool {
        self.0 == 0
    }
}

impl fmt::Display for HashId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#018x}", self.0)
    }
}

/// Hashes a resource name with xxh3-64.
///
/// Equal strings always yield equal ids. Distinct strings may collide; what
/// happens then is decided by the registry's collision policy.
#[inline]
#[must_use]
pub fn compute_hash(text: &str) -> HashId {
    HashId::from_raw(xxh3_64(text.as_bytes()))
}

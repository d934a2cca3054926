//! Registry Settings
//!
//! [`RegistrySettings`] is consumed once when a pile or registry is created.
//!
//! | Field              | Description                                  | Default   |
//! |--------------------|----------------------------------------------|-----------|
//! | `capacity`         | Number of slots in the pile                  | `4096`    |
//! | `collision_policy` | What happens when two names share a hash     | `Reject`  |
//! | `lookup`           | How names are resolved to slots              | `Indexed` |
//!
//! ```rust,ignore
//! use cairn::resources::{RegistrySettings, LookupStrategy};
//!
//! let settings = RegistrySettings {
//!     capacity: 256,
//!     lookup: LookupStrategy::Scan,
//!     ..Default::default()
//! };
//! ```

use cairn_core::errors::{CairnError, Result};
use serde::{Deserialize, Serialize};

/// Default number of slots in a pile.
pub const MAX_RESOURCES: usize = 4096;

/// Behaviour when a new name hashes to the id of a different registered name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CollisionPolicy {
    /// Names are stored and compared. Registering a colliding name fails with
    /// [`CairnError::HashCollision`], and looking it up finds nothing.
    #[default]
    Reject,
    /// Only the hash is compared: colliding names resolve to whichever
    /// resource was registered first.
    Alias,
}

/// How a name is resolved to a pile slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LookupStrategy {
    /// Hash-to-slot side table, constant time.
    #[default]
    Indexed,
    /// Linear scan from slot 0, stopping at the first empty slot.
    Scan,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegistrySettings {
    /// Number of slots. Fixed for the lifetime of the pile.
    pub capacity: usize,
    pub collision_policy: CollisionPolicy,
    pub lookup: LookupStrategy,
}

impl Default for RegistrySettings {
    fn default() -> Self {
        Self {
            capacity: MAX_RESOURCES,
            collision_policy: CollisionPolicy::default(),
            lookup: LookupStrategy::default(),
        }
    }
}

impl RegistrySettings {
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            capacity,
            ..Default::default()
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.capacity == 0 {
            return Err(CairnError::InvalidSettings(
                "capacity must be at least 1".to_owned(),
            ));
        }
        Ok(())
    }
}

#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

//! # Cairn
//!
//! A fixed-capacity registry of owned byte buffers addressed by name.
//!
//! Asset loaders hand the registry a name and either a file path or a block of
//! memory; the registry copies the bytes into a buffer it owns, hashes the
//! name into a [`HashId`], and stores the buffer in a densely packed pile of
//! at most [`MAX_RESOURCES`] slots (configurable).
//!
//! ```rust,ignore
//! use cairn::prelude::*;
//!
//! let mut registry = ResourceRegistry::default();
//! registry.create_from_memory("cube.vertices", vertex_bytes)?;
//! registry.load_from_file("stone", "assets/stone.png")?;
//!
//! for resource in registry.iter() {
//!     println!("{} {} bytes", resource.name(), resource.len());
//! }
//!
//! registry.drain_all();
//! ```

pub use cairn_resources as resources;

pub use cairn_core::errors::{self, CairnError, ErrorKind, Result};
pub use cairn_core::hash::{self, compute_hash, HashId};
pub use cairn_resources::{
    CollisionPolicy, HashFn, LookupStrategy, MAX_RESOURCES, RegisterError, RegistrySettings,
    ResourceHandle, ResourcePile, ResourceRegistry, ResourceView, SharedRegistry,
};

pub mod prelude {
    pub use crate::{
        compute_hash, CairnError, ErrorKind, HashId, RegistrySettings, ResourceHandle,
        ResourceRegistry, ResourceView, SharedRegistry,
    };
}

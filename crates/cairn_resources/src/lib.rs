//! Resource storage for Cairn.
//!
//! - [`ResourceHandle`] / [`ResourceView`]: an owned buffer and a borrowed view of one
//! - [`ResourcePile`]: fixed-capacity, densely packed slot array
//! - [`ResourceRegistry`]: allocate / register / load / destroy façade
//! - [`SharedRegistry`]: the registry behind a mutex
//! - [`RegistrySettings`]: capacity, collision policy and lookup strategy

pub mod handle;
pub mod pile;
pub mod registry;
pub mod settings;
pub mod shared;

pub use handle::{ResourceHandle, ResourceView};
pub use pile::{HashFn, ResourcePile};
pub use registry::{RegisterError, ResourceRegistry};
pub use settings::{CollisionPolicy, LookupStrategy, RegistrySettings, MAX_RESOURCES};
pub use shared::SharedRegistry;

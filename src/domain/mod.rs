//! Domain layer: the tree store and its entities
//!
//! This layer is independent of external concerns (no I/O, no CLI, no config loading).

pub mod error;
pub mod node;
pub mod store;

pub use error::{StoreError, StoreResult};
pub use node::{NodeId, TreeNode};
pub use store::TreeStore;

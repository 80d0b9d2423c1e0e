//! treestore: an in-memory store for a forest of parent-linked, labeled
//! nodes, plus the editing session, rendering and CLI around it.
//!
//! Layers, innermost first:
//! - [`domain`]: `TreeStore` with validated add/remove/update and derived
//!   queries (children, descendants, ancestors)
//! - [`application`]: editing session with snapshot-based undo/redo, seed loading
//! - [`cli`]: argument parsing and command dispatch

pub mod application;
pub mod cli;
pub mod config;
pub mod domain;
pub mod exitcode;
pub mod tree_traits;
pub mod util;

pub use domain::{NodeId, StoreError, StoreResult, TreeNode, TreeStore};

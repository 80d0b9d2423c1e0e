//! Application layer: the store's caller
//!
//! Owns the editing session, its undo/redo history and seed loading.

pub mod error;
pub mod error_ext;
pub mod history;
pub mod seed;
pub mod session;

pub use error::{ApplicationError, ApplicationResult};
pub use error_ext::IoResultExt;
pub use history::{History, Snapshot};
pub use seed::load_seed;
pub use session::{Command, EditorSession, Outcome};

//! Ports - trait definitions for external dependencies.
//! These are the "interfaces" that infrastructure must implement.

mod change_store;
mod repository;

pub use change_store::{Change, ChangeStore, CommitReceipt};
pub use repository::{BaseRepository, BlogRepository, PostRepository};

//! TripCheck Client
//!
//! - models: wire structures and the local tree node
//! - tree: structural edits on the local tree
//! - commands: REST bindings and the `Backend` seam
//! - store: optimistic checklist store

pub mod commands;
pub mod error;
pub mod models;
pub mod store;
pub mod tree;

pub use commands::{Backend, HttpBackend, USER_HEADER};
pub use error::{ClientError, ClientResult};
pub use models::{Checklist, ChecklistDetails, Item, ItemKey, NewItem, Node};
pub use store::{ChecklistStore, Failure, MutationKind, Pending, Reconciled};

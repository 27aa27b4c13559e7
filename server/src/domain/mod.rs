//! Domain Layer
//!
//! Contains all domain entities and core abstractions.
//! This layer has NO external dependencies (except serde and chrono for the wire format).

mod checklist;
mod error;
mod identity;
mod item;
mod tree;

pub use checklist::{Checklist, ChecklistDetails, Member, Role, DEFAULT_ITEM_NAME};
pub use error::{DomainError, DomainResult};
pub use identity::Identity;
pub use item::{Item, ItemNode, NewItem};
pub use tree::{build_tree, count_nodes, flatten, BuiltTree};

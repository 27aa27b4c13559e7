//! Repository Layer
//!
//! Data access abstractions and implementations.

mod checklist_repo;
pub(crate) mod db;
mod item;
mod traits;


pub use checklist_repo::ChecklistRepository;
pub use db::{DbState, SharedConnection};
pub use item::ItemRepository;
pub use traits::{ChecklistStore, ItemStore};

//! Item Repository Module
//!
//! This module provides item repository functionality split into specialized sub-modules:
//! - item_repo: Store trait implementation, listing, toggle, rename
//! - item_positioning: Position allocation (shift-and-insert)
//! - item_hierarchy: Recursive deletion and reparenting

mod item_hierarchy;
mod item_positioning;
mod item_repo;

pub(crate) use item_positioning::inserted_id;
pub use item_repo::ItemRepository;

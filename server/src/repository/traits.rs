//! Repository Layer - Core Traits
//!
//! Defines the abstract interfaces for data access.
//! Every item operation is scoped by checklist id so an item id can never
//! reach into a checklist the caller was not authorized for.

use async_trait::async_trait;

use crate::domain::{
    BuiltTree, Checklist, ChecklistDetails, DomainResult, Item, Member, NewItem, Role,
};

/// Durable store for checklist items
#[async_trait]
pub trait ItemStore: Send + Sync {
    /// Flat list ordered by parent (nulls first), then position, then id
    async fn list_items(&self, checklist_id: u32) -> DomainResult<Vec<Item>>;

    /// Canonical tree of a checklist
    async fn item_tree(&self, checklist_id: u32) -> DomainResult<BuiltTree>;

    async fn find_item(&self, checklist_id: u32, id: u32) -> DomainResult<Option<Item>>;

    /// Shift-and-insert as one atomic step
    async fn create_item(&self, new_item: &NewItem) -> DomainResult<Item>;

    /// Flip the completion flag and return the new value
    async fn toggle_item(&self, checklist_id: u32, id: u32) -> DomainResult<bool>;

    async fn rename_item(&self, checklist_id: u32, id: u32, name: &str) -> DomainResult<()>;

    /// Remove an item and all its descendants, returning how many rows went
    async fn delete_subtree(&self, checklist_id: u32, id: u32) -> DomainResult<usize>;

    /// Like `delete_subtree`, but refuses to remove the last top-level item
    async fn delete_item(&self, checklist_id: u32, id: u32) -> DomainResult<usize>;

    /// Reparent and/or reorder an item
    async fn move_item(
        &self,
        checklist_id: u32,
        id: u32,
        new_parent_id: Option<u32>,
        position: i32,
    ) -> DomainResult<Item>;
}

/// Durable store for checklists and their memberships
#[async_trait]
pub trait ChecklistStore: Send + Sync {
    /// Create a checklist owned by `owner_id`, seeded with the default item
    async fn create_checklist(&self, details: &ChecklistDetails, owner_id: u32) -> DomainResult<Checklist>;

    async fn find_checklist(&self, id: u32) -> DomainResult<Option<Checklist>>;

    async fn list_for_user(&self, user_id: u32) -> DomainResult<Vec<Checklist>>;

    async fn update_checklist(&self, id: u32, details: &ChecklistDetails) -> DomainResult<Checklist>;

    /// Delete a checklist; items and memberships cascade
    async fn delete_checklist(&self, id: u32) -> DomainResult<()>;

    /// Role of a user on a checklist, `None` when not a member
    async fn role_for(&self, checklist_id: u32, user_id: u32) -> DomainResult<Option<Role>>;

    /// Grant or change a membership
    async fn share(&self, member: &Member) -> DomainResult<()>;

    async fn members(&self, checklist_id: u32) -> DomainResult<Vec<Member>>;
}

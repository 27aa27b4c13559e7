//! Item Entity
//!
//! A checklist entry with a single optional parent in the same checklist.

use serde::{Deserialize, Serialize};

/// A persisted checklist item
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    /// Unique identifier, stable for the item's lifetime
    pub id: u32,
    /// Owning checklist
    pub checklist_id: u32,
    /// Parent item ID (None = top level)
    pub parent_item_id: Option<u32>,
    /// Display label, may be empty while being edited
    pub name: String,
    /// Rank within the sibling group
    pub position: i32,
    /// Completion flag
    pub is_checked: bool,
}

impl Item {
    pub fn new(id: u32, checklist_id: u32, name: impl Into<String>, position: i32) -> Self {
        Self {
            id,
            checklist_id,
            parent_item_id: None,
            name: name.into(),
            position,
            is_checked: false,
        }
    }

    pub fn new_child(
        id: u32,
        checklist_id: u32,
        name: impl Into<String>,
        parent_item_id: u32,
        position: i32,
    ) -> Self {
        Self {
            parent_item_id: Some(parent_item_id),
            ..Self::new(id, checklist_id, name, position)
        }
    }

    /// Check if this is a top-level item (no parent)
    pub fn is_root(&self) -> bool {
        self.parent_item_id.is_none()
    }
}

/// Insertion request for the position allocator
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewItem {
    #[serde(default)]
    pub name: String,
    pub checklist_id: u32,
    #[serde(default)]
    pub parent_item_id: Option<u32>,
    #[serde(default)]
    pub is_checked: bool,
    /// Requested rank; `None` appends to the end of the sibling group
    #[serde(default)]
    pub position: Option<i32>,
}

impl NewItem {
    pub fn root(checklist_id: u32, name: impl Into<String>, position: Option<i32>) -> Self {
        Self {
            name: name.into(),
            checklist_id,
            parent_item_id: None,
            is_checked: false,
            position,
        }
    }

    pub fn child(
        checklist_id: u32,
        parent_item_id: u32,
        name: impl Into<String>,
        position: Option<i32>,
    ) -> Self {
        Self {
            parent_item_id: Some(parent_item_id),
            ..Self::root(checklist_id, name, position)
        }
    }
}

/// An item together with its derived children, as served to clients
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemNode {
    #[serde(flatten)]
    pub item: Item,
    pub children: Vec<ItemNode>,
}

impl ItemNode {
    pub fn leaf(item: Item) -> Self {
        Self {
            item,
            children: Vec::new(),
        }
    }

    pub fn id(&self) -> u32 {
        self.item.id
    }
}

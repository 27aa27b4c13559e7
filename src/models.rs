//! Client Models
//!
//! Wire structures matching the REST API, plus the local tree node the
//! optimistic store edits.

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Item as served by `GET /checklist/{id}/items`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    pub id: u32,
    pub checklist_id: u32,
    pub parent_item_id: Option<u32>,
    pub name: String,
    pub position: i32,
    pub is_checked: bool,
    #[serde(default)]
    pub children: Vec<Item>,
}

/// Body of `POST /checklist/{id}/items/new`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewItem {
    pub name: String,
    pub checklist_id: u32,
    pub parent_item_id: Option<u32>,
    pub is_checked: bool,
    pub position: Option<i32>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Checklist {
    pub id: u32,
    pub title: String,
    pub description: Option<String>,
    pub trip_destination: Option<String>,
    pub trip_from_date: Option<NaiveDate>,
    pub trip_to_date: Option<NaiveDate>,
    pub created_at: i64,
}

/// Body for creating or editing a checklist
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChecklistDetails {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trip_destination: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trip_from_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trip_to_date: Option<NaiveDate>,
}

impl ChecklistDetails {
    pub fn titled(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Default::default()
        }
    }
}

/// Identity of a node in the local tree.
///
/// A node created locally stays `Provisional` until the server assigns it an id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ItemKey {
    Saved(u32),
    Provisional(Uuid),
}

impl ItemKey {
    pub fn provisional() -> Self {
        ItemKey::Provisional(Uuid::new_v4())
    }

    pub fn saved_id(&self) -> Option<u32> {
        match self {
            ItemKey::Saved(id) => Some(*id),
            ItemKey::Provisional(_) => None,
        }
    }

    pub fn is_provisional(&self) -> bool {
        matches!(self, ItemKey::Provisional(_))
    }
}

impl From<u32> for ItemKey {
    fn from(id: u32) -> Self {
        ItemKey::Saved(id)
    }
}

impl fmt::Display for ItemKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ItemKey::Saved(id) => write!(f, "item {}", id),
            ItemKey::Provisional(uuid) => write!(f, "provisional item {}", uuid),
        }
    }
}

/// Node of the local, optimistically edited tree
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
    pub key: ItemKey,
    pub checklist_id: u32,
    pub parent_item_id: Option<u32>,
    pub name: String,
    pub position: i32,
    pub is_checked: bool,
    pub children: Vec<Node>,
}

impl Node {
    /// Unsaved, unchecked leaf; placement is filled in by the tree helpers
    pub fn provisional(checklist_id: u32, name: impl Into<String>) -> Self {
        Self {
            key: ItemKey::provisional(),
            checklist_id,
            parent_item_id: None,
            name: name.into(),
            position: 0,
            is_checked: false,
            children: Vec::new(),
        }
    }
}

impl From<Item> for Node {
    fn from(item: Item) -> Self {
        Self {
            key: ItemKey::Saved(item.id),
            checklist_id: item.checklist_id,
            parent_item_id: item.parent_item_id,
            name: item.name,
            position: item.position,
            is_checked: item.is_checked,
            children: item.children.into_iter().map(Node::from).collect(),
        }
    }
}

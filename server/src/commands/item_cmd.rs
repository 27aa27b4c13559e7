//! Item Commands
//!
//! REST handlers for listing, creating, updating, moving and deleting items.

use axum::extract::{Path, State};
use axum::Json;
use serde::{Deserialize, Serialize};

use super::auth::authorize;
use crate::domain::{DomainError, DomainResult, Identity, Item, ItemNode, NewItem};
use crate::repository::ItemStore;
use crate::AppState;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemCreated {
    pub message: &'static str,
    pub new_item: Item,
}

/// Body of `PUT /checklist/{id}/items/{itemId}`
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ItemUpdate {
    Toggle,
    #[serde(rename_all = "camelCase")]
    UpdateName { new_name: String },
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemUpdated {
    pub message: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_checked: Option<bool>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MoveItem {
    #[serde(default)]
    pub parent_item_id: Option<u32>,
    pub position: i32,
}

#[derive(Debug, Serialize)]
pub struct ItemDeleted {
    pub message: &'static str,
    pub deleted: usize,
}

/// Canonical tree of a checklist
pub async fn list_items(
    State(state): State<AppState>,
    identity: Identity,
    Path(checklist_id): Path<u32>,
) -> DomainResult<Json<Vec<ItemNode>>> {
    authorize(&state, identity, checklist_id).await?;
    let built = state.items.item_tree(checklist_id).await?;
    Ok(Json(built.roots))
}

pub async fn create_item(
    State(state): State<AppState>,
    identity: Identity,
    Path(checklist_id): Path<u32>,
    Json(new_item): Json<NewItem>,
) -> DomainResult<Json<ItemCreated>> {
    authorize(&state, identity, checklist_id).await?;
    if new_item.checklist_id != checklist_id {
        return Err(DomainError::InvalidInput(format!(
            "item belongs to checklist {} but was posted to checklist {}",
            new_item.checklist_id, checklist_id
        )));
    }

    let new_item = state.items.create_item(&new_item).await?;
    Ok(Json(ItemCreated {
        message: "Item added successfully",
        new_item,
    }))
}

/// Toggle the check box or rename an item
pub async fn update_item(
    State(state): State<AppState>,
    identity: Identity,
    Path((checklist_id, item_id)): Path<(u32, u32)>,
    Json(update): Json<ItemUpdate>,
) -> DomainResult<Json<ItemUpdated>> {
    authorize(&state, identity, checklist_id).await?;

    let updated = match update {
        ItemUpdate::Toggle => {
            let checked = state.items.toggle_item(checklist_id, item_id).await?;
            ItemUpdated {
                message: "Item toggled successfully",
                is_checked: Some(checked),
            }
        }
        ItemUpdate::UpdateName { new_name } => {
            state.items.rename_item(checklist_id, item_id, &new_name).await?;
            ItemUpdated {
                message: "Item name updated successfully",
                is_checked: None,
            }
        }
    };
    Ok(Json(updated))
}

pub async fn move_item(
    State(state): State<AppState>,
    identity: Identity,
    Path((checklist_id, item_id)): Path<(u32, u32)>,
    Json(target): Json<MoveItem>,
) -> DomainResult<Json<Item>> {
    authorize(&state, identity, checklist_id).await?;
    let item = state
        .items
        .move_item(checklist_id, item_id, target.parent_item_id, target.position)
        .await?;
    Ok(Json(item))
}

/// Delete an item and its descendants; the last top-level item is kept
pub async fn delete_item(
    State(state): State<AppState>,
    identity: Identity,
    Path((checklist_id, item_id)): Path<(u32, u32)>,
) -> DomainResult<Json<ItemDeleted>> {
    authorize(&state, identity, checklist_id).await?;
    let deleted = state.items.delete_item(checklist_id, item_id).await?;
    Ok(Json(ItemDeleted {
        message: "Item and its descendants deleted successfully",
        deleted,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_update_body_variants() {
        let toggle: ItemUpdate = serde_json::from_str(r#"{"type":"toggle"}"#).unwrap();
        assert_eq!(toggle, ItemUpdate::Toggle);

        let rename: ItemUpdate =
            serde_json::from_str(r#"{"type":"updateName","newName":"Shoes"}"#).unwrap();
        assert_eq!(rename, ItemUpdate::UpdateName { new_name: "Shoes".to_string() });

        assert!(serde_json::from_str::<ItemUpdate>(r#"{"type":"explode"}"#).is_err());
    }
}

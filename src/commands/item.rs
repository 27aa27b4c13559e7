//! Item Commands
//!
//! Client bindings for the item routes.

use async_trait::async_trait;
use reqwest::Method;
use serde::{Deserialize, Serialize};

use super::{Backend, HttpBackend};
use crate::error::ClientResult;
use crate::models::{Item, NewItem};

// ========================
// Argument Structs
// ========================

#[derive(Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
enum UpdateArgs<'a> {
    Toggle,
    #[serde(rename_all = "camelCase")]
    UpdateName { new_name: &'a str },
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct MoveArgs {
    parent_item_id: Option<u32>,
    position: i32,
}

// ========================
// Responses
// ========================

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct Created {
    new_item: Item,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct Updated {
    #[serde(default)]
    is_checked: Option<bool>,
}

#[derive(Deserialize)]
struct Deleted {
    deleted: usize,
}

// ========================
// Commands
// ========================

#[async_trait]
impl Backend for HttpBackend {
    async fn list_items(&self, checklist_id: u32) -> ClientResult<Vec<Item>> {
        let path = format!("/checklist/{}/items", checklist_id);
        self.send(self.request(Method::GET, &path)).await
    }

    async fn create_item(&self, new_item: &NewItem) -> ClientResult<Item> {
        let path = format!("/checklist/{}/items/new", new_item.checklist_id);
        let created: Created = self.send(self.request(Method::POST, &path).json(new_item)).await?;
        Ok(created.new_item)
    }

    async fn toggle_item(&self, checklist_id: u32, item_id: u32) -> ClientResult<bool> {
        let path = format!("/checklist/{}/items/{}", checklist_id, item_id);
        let updated: Updated = self
            .send(self.request(Method::PUT, &path).json(&UpdateArgs::Toggle))
            .await?;
        Ok(updated.is_checked.unwrap_or_default())
    }

    async fn rename_item(&self, checklist_id: u32, item_id: u32, new_name: &str) -> ClientResult<()> {
        let path = format!("/checklist/{}/items/{}", checklist_id, item_id);
        let _: Updated = self
            .send(self.request(Method::PUT, &path).json(&UpdateArgs::UpdateName { new_name }))
            .await?;
        Ok(())
    }

    async fn delete_item(&self, checklist_id: u32, item_id: u32) -> ClientResult<usize> {
        let path = format!("/checklist/{}/items/{}", checklist_id, item_id);
        let deleted: Deleted = self.send(self.request(Method::DELETE, &path)).await?;
        Ok(deleted.deleted)
    }
}

impl HttpBackend {
    /// Reparent and/or reorder an item; not mirrored optimistically
    pub async fn move_item(
        &self,
        checklist_id: u32,
        item_id: u32,
        parent_item_id: Option<u32>,
        position: i32,
    ) -> ClientResult<Item> {
        let path = format!("/checklist/{}/items/{}/move", checklist_id, item_id);
        let args = MoveArgs {
            parent_item_id,
            position,
        };
        self.send(self.request(Method::PUT, &path).json(&args)).await
    }
}

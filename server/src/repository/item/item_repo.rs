//! Item Repository - Core Operations
//!
//! SQLite-backed implementation of [`ItemStore`].
//! Specialized operations are in separate modules:
//! - item_positioning: shift-and-insert allocation
//! - item_hierarchy: subtree deletion and reparenting
//!
//! Each async method takes the connection lock once and hands the guard to
//! a synchronous helper, so no rusqlite handle is held across an await.

use async_trait::async_trait;
use rusqlite::{params, Connection, OptionalExtension, Row};
use tracing::{debug, info, warn};

use super::item_hierarchy::{delete_subtree, move_to, DeleteGuard};
use super::item_positioning::insert_at;
use crate::domain::{build_tree, BuiltTree, DomainError, DomainResult, Item, NewItem};
use crate::repository::db::SharedConnection;
use crate::repository::traits::ItemStore;

pub(super) const ITEM_COLUMNS: &str = "id, checklist_id, parent_item_id, name, position, is_checked";

/// SQLite implementation of the item store
pub struct ItemRepository {
    conn: SharedConnection,
}

impl ItemRepository {
    pub fn new(conn: SharedConnection) -> Self {
        Self { conn }
    }
}

#[async_trait]
impl ItemStore for ItemRepository {
    async fn list_items(&self, checklist_id: u32) -> DomainResult<Vec<Item>> {
        let conn = self.conn.lock().await;
        select_items(&conn, checklist_id)
    }

    async fn item_tree(&self, checklist_id: u32) -> DomainResult<BuiltTree> {
        let built = build_tree(self.list_items(checklist_id).await?);
        if !built.detached.is_empty() {
            let detached: Vec<u32> = built.detached.iter().map(|i| i.id).collect();
            warn!(checklist_id, ?detached, "items unreachable from the top level left out of the tree");
        }
        Ok(built)
    }

    async fn find_item(&self, checklist_id: u32, id: u32) -> DomainResult<Option<Item>> {
        let conn = self.conn.lock().await;
        find(&conn, checklist_id, id)
    }

    async fn create_item(&self, new_item: &NewItem) -> DomainResult<Item> {
        let mut conn = self.conn.lock().await;
        let item = insert_at(&mut conn, new_item)?;
        info!(
            checklist_id = item.checklist_id,
            item_id = item.id,
            parent_item_id = ?item.parent_item_id,
            position = item.position,
            "item created"
        );
        Ok(item)
    }

    async fn toggle_item(&self, checklist_id: u32, id: u32) -> DomainResult<bool> {
        let conn = self.conn.lock().await;
        let checked: Option<bool> = conn
            .query_row(
                "UPDATE items SET is_checked = NOT is_checked
                 WHERE id = ?1 AND checklist_id = ?2
                 RETURNING is_checked",
                params![id, checklist_id],
                |row| row.get(0),
            )
            .optional()?;

        let checked = checked.ok_or_else(|| DomainError::item_not_found(id))?;
        debug!(checklist_id, item_id = id, checked, "item toggled");
        Ok(checked)
    }

    async fn rename_item(&self, checklist_id: u32, id: u32, name: &str) -> DomainResult<()> {
        let conn = self.conn.lock().await;
        let changed = conn.execute(
            "UPDATE items SET name = ?1 WHERE id = ?2 AND checklist_id = ?3",
            params![name, id, checklist_id],
        )?;
        if changed == 0 {
            return Err(DomainError::item_not_found(id));
        }
        debug!(checklist_id, item_id = id, "item renamed");
        Ok(())
    }

    async fn delete_subtree(&self, checklist_id: u32, id: u32) -> DomainResult<usize> {
        let mut conn = self.conn.lock().await;
        let removed = delete_subtree(&mut conn, checklist_id, id, DeleteGuard::Unrestricted)?;
        info!(checklist_id, item_id = id, removed, "item subtree deleted");
        Ok(removed)
    }

    async fn delete_item(&self, checklist_id: u32, id: u32) -> DomainResult<usize> {
        let mut conn = self.conn.lock().await;
        let removed = delete_subtree(&mut conn, checklist_id, id, DeleteGuard::KeepLastRoot)?;
        info!(checklist_id, item_id = id, removed, "item and descendants deleted");
        Ok(removed)
    }

    async fn move_item(
        &self,
        checklist_id: u32,
        id: u32,
        new_parent_id: Option<u32>,
        position: i32,
    ) -> DomainResult<Item> {
        let mut conn = self.conn.lock().await;
        let item = move_to(&mut conn, checklist_id, id, new_parent_id, position)?;
        info!(checklist_id, item_id = id, parent_item_id = ?new_parent_id, position, "item moved");
        Ok(item)
    }
}

/// Flat listing in the order the tree builder expects
fn select_items(conn: &Connection, checklist_id: u32) -> DomainResult<Vec<Item>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {ITEM_COLUMNS} FROM items
         WHERE checklist_id = ?1
         ORDER BY parent_item_id NULLS FIRST, position, id"
    ))?;
    let items = stmt
        .query_map(params![checklist_id], row_to_item)?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(items)
}

pub(super) fn find(conn: &Connection, checklist_id: u32, id: u32) -> DomainResult<Option<Item>> {
    let item = conn
        .query_row(
            &format!("SELECT {ITEM_COLUMNS} FROM items WHERE id = ?1 AND checklist_id = ?2"),
            params![id, checklist_id],
            row_to_item,
        )
        .optional()?;
    Ok(item)
}

/// Convert a database row to Item
pub(super) fn row_to_item(row: &Row<'_>) -> rusqlite::Result<Item> {
    Ok(Item {
        id: row.get(0)?,
        checklist_id: row.get(1)?,
        parent_item_id: row.get(2)?,
        name: row.get(3)?,
        position: row.get(4)?,
        is_checked: row.get(5)?,
    })
}

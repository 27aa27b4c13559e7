//! Item Hierarchy Operations
//!
//! Subtree deletion and reparenting over the `parent_item_id` back-reference.

use std::collections::HashSet;

use rusqlite::{params, Connection, OptionalExtension, TransactionBehavior};

use super::item_positioning::{ensure_parent_in_checklist, ensure_valid_position, shift_siblings};
use super::item_repo::find;
use crate::domain::{DomainError, DomainResult, Item};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum DeleteGuard {
    Unrestricted,
    /// Reject removing the only top-level item of a checklist
    KeepLastRoot,
}

/// Delete an item and every transitive descendant.
///
/// The recursive walk and the delete are one statement inside one
/// immediate transaction. Surviving siblings keep their positions.
pub(super) fn delete_subtree(
    conn: &mut Connection,
    checklist_id: u32,
    id: u32,
    guard: DeleteGuard,
) -> DomainResult<usize> {
    let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

    let target = find(&tx, checklist_id, id)?.ok_or_else(|| DomainError::item_not_found(id))?;

    if guard == DeleteGuard::KeepLastRoot && target.is_root() {
        let roots: i64 = tx.query_row(
            "SELECT COUNT(*) FROM items WHERE checklist_id = ?1 AND parent_item_id IS NULL",
            params![checklist_id],
            |row| row.get(0),
        )?;
        if roots <= 1 {
            return Err(DomainError::InvalidState(format!(
                "Item {} is the last top-level item; a checklist cannot be empty",
                id
            )));
        }
    }

    let removed = tx.execute(
        &format!("WITH RECURSIVE {SUBTREE_CTE} DELETE FROM items WHERE id IN (SELECT id FROM subtree)"),
        params![id],
    )?;

    tx.commit()?;
    Ok(removed)
}

/// An item and all its descendants.
///
/// `UNION` (not `UNION ALL`) keeps the walk finite even if stored data
/// already contains a cycle.
const SUBTREE_CTE: &str = "subtree(id) AS (
    SELECT id FROM items WHERE id = ?1
    UNION
    SELECT i.id FROM items i
    JOIN subtree s ON i.parent_item_id = s.id
)";

/// Move an item under `new_parent_id` (None = top level) at `position`.
pub(super) fn move_to(
    conn: &mut Connection,
    checklist_id: u32,
    id: u32,
    new_parent_id: Option<u32>,
    position: i32,
) -> DomainResult<Item> {
    ensure_valid_position(position)?;

    let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

    let mut item = find(&tx, checklist_id, id)?.ok_or_else(|| DomainError::item_not_found(id))?;
    if let Some(parent_id) = new_parent_id {
        ensure_parent_in_checklist(&tx, checklist_id, parent_id)?;
        ensure_not_ancestor(&tx, id, parent_id)?;
    }

    shift_siblings(&tx, checklist_id, new_parent_id, position, Some(id))?;
    tx.execute(
        "UPDATE items SET parent_item_id = ?1, position = ?2 WHERE id = ?3",
        params![new_parent_id, position, id],
    )?;

    tx.commit()?;

    item.parent_item_id = new_parent_id;
    item.position = position;
    Ok(item)
}

/// Walk the ancestors of `new_parent_id`; `id` must not be one of them.
fn ensure_not_ancestor(conn: &Connection, id: u32, new_parent_id: u32) -> DomainResult<()> {
    let mut visited = HashSet::new();
    let mut current = Some(new_parent_id);

    while let Some(ancestor) = current {
        if ancestor == id {
            return Err(DomainError::InvalidInput(format!(
                "Item {} cannot be moved under itself or its descendant {}",
                id, new_parent_id
            )));
        }
        if !visited.insert(ancestor) {
            break;
        }
        current = conn
            .query_row(
                "SELECT parent_item_id FROM items WHERE id = ?1",
                params![ancestor],
                |row| row.get::<_, Option<u32>>(0),
            )
            .optional()?
            .flatten();
    }

    Ok(())
}

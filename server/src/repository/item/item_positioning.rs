//! Item Positioning Operations
//!
//! The position allocator: a sibling group is identified by
//! `(checklist_id, parent_item_id)` and `parent_item_id IS ?` matches the
//! top-level group when the parameter is NULL.

use rusqlite::{params, Connection, OptionalExtension, TransactionBehavior};

use crate::domain::{DomainError, DomainResult, Item, NewItem};

/// Insert a new item at its requested rank, shifting later siblings by one.
///
/// Validation, the shift and the insert share one immediate transaction; any
/// failure rolls all of it back.
pub(super) fn insert_at(conn: &mut Connection, new_item: &NewItem) -> DomainResult<Item> {
    if let Some(position) = new_item.position {
        ensure_valid_position(position)?;
    }

    let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

    ensure_checklist_exists(&tx, new_item.checklist_id)?;
    if let Some(parent_id) = new_item.parent_item_id {
        ensure_parent_in_checklist(&tx, new_item.checklist_id, parent_id)?;
    }

    let position = match new_item.position {
        Some(position) => {
            shift_siblings(&tx, new_item.checklist_id, new_item.parent_item_id, position, None)?;
            position
        }
        None => next_position(&tx, new_item.checklist_id, new_item.parent_item_id)?,
    };

    tx.execute(
        "INSERT INTO items (checklist_id, parent_item_id, name, position, is_checked)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        params![
            new_item.checklist_id,
            new_item.parent_item_id,
            new_item.name,
            position,
            new_item.is_checked
        ],
    )?;
    let id = inserted_id(&tx)?;

    tx.commit()?;

    Ok(Item {
        id,
        checklist_id: new_item.checklist_id,
        parent_item_id: new_item.parent_item_id,
        name: new_item.name.clone(),
        position,
        is_checked: new_item.is_checked,
    })
}

/// Row id of the last insert, as an item id
pub(crate) fn inserted_id(conn: &Connection) -> DomainResult<u32> {
    let rowid = conn.last_insert_rowid();
    u32::try_from(rowid).map_err(|_| DomainError::Store(format!("Row id {} does not fit an id", rowid)))
}

/// Next free position at the end of a sibling group
pub(super) fn next_position(conn: &Connection, checklist_id: u32, parent_id: Option<u32>) -> DomainResult<i32> {
    let next: i64 = conn.query_row(
        "SELECT COALESCE(MAX(position), -1) + 1 FROM items
         WHERE checklist_id = ?1 AND parent_item_id IS ?2",
        params![checklist_id, parent_id],
        |row| row.get(0),
    )?;
    i32::try_from(next).map_err(|_| group_full())
}

/// Make room at `from` by moving every sibling at or after it up by one.
///
/// `exclude` keeps an item that is being moved within its own group out of
/// the shift.
pub(super) fn shift_siblings(
    conn: &Connection,
    checklist_id: u32,
    parent_id: Option<u32>,
    from: i32,
    exclude: Option<u32>,
) -> DomainResult<usize> {
    // Shifting a row already at i32::MAX would store a value positions can't hold
    let highest: Option<i32> = conn.query_row(
        "SELECT MAX(position) FROM items
         WHERE checklist_id = ?1 AND parent_item_id IS ?2 AND position >= ?3 AND id IS NOT ?4",
        params![checklist_id, parent_id, from, exclude],
        |row| row.get(0),
    )?;
    if highest == Some(i32::MAX) {
        return Err(group_full());
    }

    let shifted = conn.execute(
        "UPDATE items SET position = position + 1
         WHERE checklist_id = ?1 AND parent_item_id IS ?2 AND position >= ?3 AND id IS NOT ?4",
        params![checklist_id, parent_id, from, exclude],
    )?;
    Ok(shifted)
}

fn group_full() -> DomainError {
    DomainError::InvalidInput(format!("No room left in sibling group past position {}", i32::MAX))
}

pub(super) fn ensure_valid_position(position: i32) -> DomainResult<()> {
    if position < 0 {
        return Err(DomainError::InvalidInput(format!(
            "Position must not be negative, got {}",
            position
        )));
    }
    Ok(())
}

fn ensure_checklist_exists(conn: &Connection, checklist_id: u32) -> DomainResult<()> {
    let found = conn
        .query_row("SELECT 1 FROM checklists WHERE id = ?1", params![checklist_id], |_| Ok(()))
        .optional()?;
    found.ok_or_else(|| DomainError::checklist_not_found(checklist_id))
}

/// A parent must exist and live in the same checklist as its child
pub(super) fn ensure_parent_in_checklist(conn: &Connection, checklist_id: u32, parent_id: u32) -> DomainResult<()> {
    let owner: Option<u32> = conn
        .query_row(
            "SELECT checklist_id FROM items WHERE id = ?1",
            params![parent_id],
            |row| row.get(0),
        )
        .optional()?;

    match owner {
        Some(owner) if owner == checklist_id => Ok(()),
        _ => Err(DomainError::NotFound(format!(
            "Parent item not found with id: {} in checklist {}",
            parent_id, checklist_id
        ))),
    }
}

//! Checklist Repository
//!
//! Checklists, their owner/collaborator memberships, and default item seeding.

use async_trait::async_trait;
use rusqlite::{params, Connection, OptionalExtension, Row, TransactionBehavior};
use tracing::info;

use super::db::SharedConnection;
use super::item::inserted_id;
use super::traits::ChecklistStore;
use crate::domain::{Checklist, ChecklistDetails, DomainError, DomainResult, Member, Role, DEFAULT_ITEM_NAME};

const CHECKLIST_COLUMNS: &str =
    "c.id, c.title, c.description, c.trip_destination, c.trip_from_date, c.trip_to_date, c.created_at";

pub struct ChecklistRepository {
    conn: SharedConnection,
}

impl ChecklistRepository {
    pub fn new(conn: SharedConnection) -> Self {
        Self { conn }
    }
}

#[async_trait]
impl ChecklistStore for ChecklistRepository {
    async fn create_checklist(&self, details: &ChecklistDetails, owner_id: u32) -> DomainResult<Checklist> {
        let mut conn = self.conn.lock().await;
        let checklist = insert_checklist(&mut conn, details, owner_id)?;
        info!(checklist_id = checklist.id, owner_id, "checklist created");
        Ok(checklist)
    }

    async fn find_checklist(&self, id: u32) -> DomainResult<Option<Checklist>> {
        let conn = self.conn.lock().await;
        find(&conn, id)
    }

    async fn list_for_user(&self, user_id: u32) -> DomainResult<Vec<Checklist>> {
        let conn = self.conn.lock().await;
        let mut stmt = conn.prepare(&format!(
            "SELECT {CHECKLIST_COLUMNS} FROM checklists c
             JOIN user_checklists uc ON c.id = uc.checklist_id
             WHERE uc.user_id = ?1
             ORDER BY c.id"
        ))?;
        let checklists = stmt
            .query_map(params![user_id], row_to_checklist)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(checklists)
    }

    async fn update_checklist(&self, id: u32, details: &ChecklistDetails) -> DomainResult<Checklist> {
        ensure_title(details)?;
        let conn = self.conn.lock().await;
        let changed = conn.execute(
            "UPDATE checklists
             SET title = ?1, description = ?2, trip_destination = ?3, trip_from_date = ?4, trip_to_date = ?5
             WHERE id = ?6",
            params![
                details.title,
                details.description,
                details.trip_destination,
                details.trip_from_date,
                details.trip_to_date,
                id
            ],
        )?;
        if changed == 0 {
            return Err(DomainError::checklist_not_found(id));
        }
        find(&conn, id)?.ok_or_else(|| DomainError::checklist_not_found(id))
    }

    async fn delete_checklist(&self, id: u32) -> DomainResult<()> {
        let conn = self.conn.lock().await;
        let removed = conn.execute("DELETE FROM checklists WHERE id = ?1", params![id])?;
        if removed == 0 {
            return Err(DomainError::checklist_not_found(id));
        }
        info!(checklist_id = id, "checklist deleted");
        Ok(())
    }

    async fn role_for(&self, checklist_id: u32, user_id: u32) -> DomainResult<Option<Role>> {
        let conn = self.conn.lock().await;
        let role: Option<String> = conn
            .query_row(
                "SELECT role FROM user_checklists WHERE checklist_id = ?1 AND user_id = ?2",
                params![checklist_id, user_id],
                |row| row.get(0),
            )
            .optional()?;

        match role {
            None => Ok(None),
            Some(role) => Role::parse(&role)
                .map(Some)
                .ok_or_else(|| DomainError::Store(format!("Unknown role stored: {}", role))),
        }
    }

    async fn share(&self, member: &Member) -> DomainResult<()> {
        let conn = self.conn.lock().await;
        conn.execute(
            "INSERT INTO user_checklists (user_id, checklist_id, role) VALUES (?1, ?2, ?3)
             ON CONFLICT (user_id, checklist_id) DO UPDATE SET role = excluded.role",
            params![member.user_id, member.checklist_id, member.role.as_str()],
        )?;
        info!(
            checklist_id = member.checklist_id,
            user_id = member.user_id,
            role = member.role.as_str(),
            "checklist shared"
        );
        Ok(())
    }

    async fn members(&self, checklist_id: u32) -> DomainResult<Vec<Member>> {
        let conn = self.conn.lock().await;
        let mut stmt = conn.prepare(
            "SELECT user_id, role FROM user_checklists WHERE checklist_id = ?1 ORDER BY user_id",
        )?;
        let rows = stmt
            .query_map(params![checklist_id], |row| {
                Ok((row.get::<_, u32>(0)?, row.get::<_, String>(1)?))
            })?
            .collect::<Result<Vec<_>, _>>()?;

        rows.into_iter()
            .map(|(user_id, role)| {
                let role = Role::parse(&role)
                    .ok_or_else(|| DomainError::Store(format!("Unknown role stored: {}", role)))?;
                Ok(Member {
                    user_id,
                    checklist_id,
                    role,
                })
            })
            .collect()
    }
}

/// Checklist row, owner membership and default item, committed together
fn insert_checklist(conn: &mut Connection, details: &ChecklistDetails, owner_id: u32) -> DomainResult<Checklist> {
    ensure_title(details)?;

    let created_at = chrono::Utc::now().timestamp_millis();
    let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

    tx.execute(
        "INSERT INTO checklists (title, description, trip_destination, trip_from_date, trip_to_date, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        params![
            details.title,
            details.description,
            details.trip_destination,
            details.trip_from_date,
            details.trip_to_date,
            created_at
        ],
    )?;
    let id = inserted_id(&tx)?;

    tx.execute(
        "INSERT INTO user_checklists (user_id, checklist_id, role) VALUES (?1, ?2, ?3)",
        params![owner_id, id, Role::Owner.as_str()],
    )?;
    tx.execute(
        "INSERT INTO items (checklist_id, parent_item_id, name, position, is_checked)
         VALUES (?1, NULL, ?2, 0, 0)",
        params![id, DEFAULT_ITEM_NAME],
    )?;

    tx.commit()?;

    Ok(Checklist {
        id,
        title: details.title.clone(),
        description: details.description.clone(),
        trip_destination: details.trip_destination.clone(),
        trip_from_date: details.trip_from_date,
        trip_to_date: details.trip_to_date,
        created_at,
    })
}

fn ensure_title(details: &ChecklistDetails) -> DomainResult<()> {
    if details.title.trim().is_empty() {
        return Err(DomainError::InvalidInput("Checklist title must not be empty".to_string()));
    }
    Ok(())
}

fn find(conn: &Connection, id: u32) -> DomainResult<Option<Checklist>> {
    let checklist = conn
        .query_row(
            &format!("SELECT {CHECKLIST_COLUMNS} FROM checklists c WHERE c.id = ?1"),
            params![id],
            row_to_checklist,
        )
        .optional()?;
    Ok(checklist)
}

fn row_to_checklist(row: &Row<'_>) -> rusqlite::Result<Checklist> {
    Ok(Checklist {
        id: row.get(0)?,
        title: row.get(1)?,
        description: row.get(2)?,
        trip_destination: row.get(3)?,
        trip_from_date: row.get(4)?,
        trip_to_date: row.get(5)?,
        created_at: row.get(6)?,
    })
}

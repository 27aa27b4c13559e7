//! Checklist Commands
//!
//! REST handlers for checklist details and sharing.

use axum::extract::{Path, State};
use axum::Json;
use serde::{Deserialize, Serialize};

use super::auth::{authorize, authorize_owner};
use crate::domain::{Checklist, ChecklistDetails, DomainError, DomainResult, Identity, Member, Role};
use crate::repository::ChecklistStore;
use crate::AppState;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChecklistCreated {
    pub message: &'static str,
    pub new_checklist: Checklist,
}

#[derive(Debug, Serialize)]
pub struct Message {
    pub message: &'static str,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShareRequest {
    pub user_id: u32,
    #[serde(default = "default_share_role")]
    pub role: Role,
}

fn default_share_role() -> Role {
    Role::Collaborator
}

/// Checklists the caller is a member of
pub async fn list_checklists(
    State(state): State<AppState>,
    identity: Identity,
) -> DomainResult<Json<Vec<Checklist>>> {
    let checklists = state.checklists.list_for_user(identity.user_id).await?;
    Ok(Json(checklists))
}

pub async fn create_checklist(
    State(state): State<AppState>,
    identity: Identity,
    Json(details): Json<ChecklistDetails>,
) -> DomainResult<Json<ChecklistCreated>> {
    let new_checklist = state.checklists.create_checklist(&details, identity.user_id).await?;
    Ok(Json(ChecklistCreated {
        message: "Checklist added successfully",
        new_checklist,
    }))
}

pub async fn get_checklist(
    State(state): State<AppState>,
    identity: Identity,
    Path(checklist_id): Path<u32>,
) -> DomainResult<Json<Checklist>> {
    authorize(&state, identity, checklist_id).await?;
    state
        .checklists
        .find_checklist(checklist_id)
        .await?
        .map(Json)
        .ok_or_else(|| DomainError::checklist_not_found(checklist_id))
}

pub async fn edit_checklist(
    State(state): State<AppState>,
    identity: Identity,
    Path(checklist_id): Path<u32>,
    Json(details): Json<ChecklistDetails>,
) -> DomainResult<Json<Checklist>> {
    authorize(&state, identity, checklist_id).await?;
    let checklist = state.checklists.update_checklist(checklist_id, &details).await?;
    Ok(Json(checklist))
}

pub async fn delete_checklist(
    State(state): State<AppState>,
    identity: Identity,
    Path(checklist_id): Path<u32>,
) -> DomainResult<Json<Message>> {
    authorize_owner(&state, identity, checklist_id).await?;
    state.checklists.delete_checklist(checklist_id).await?;
    Ok(Json(Message {
        message: "Checklist deleted successfully",
    }))
}

pub async fn list_members(
    State(state): State<AppState>,
    identity: Identity,
    Path(checklist_id): Path<u32>,
) -> DomainResult<Json<Vec<Member>>> {
    authorize(&state, identity, checklist_id).await?;
    Ok(Json(state.checklists.members(checklist_id).await?))
}

/// Grant another user access; only the owner may share
pub async fn share_checklist(
    State(state): State<AppState>,
    identity: Identity,
    Path(checklist_id): Path<u32>,
    Json(request): Json<ShareRequest>,
) -> DomainResult<Json<Message>> {
    authorize_owner(&state, identity, checklist_id).await?;
    if request.user_id == identity.user_id {
        return Err(DomainError::InvalidInput("the owner cannot change their own role".to_string()));
    }
    state
        .checklists
        .share(&Member {
            user_id: request.user_id,
            checklist_id,
            role: request.role,
        })
        .await?;
    Ok(Json(Message {
        message: "Checklist shared successfully",
    }))
}

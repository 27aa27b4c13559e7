//! Identity extraction and the checklist access gate.
//!
//! The caller's user id arrives already verified in [`USER_HEADER`], set by
//! the authenticating proxy in front of this service.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use crate::domain::{DomainError, DomainResult, Identity, Role};
use crate::repository::ChecklistStore;
use crate::AppState;

pub const USER_HEADER: &str = "x-tripcheck-user";

impl<S> FromRequestParts<S> for Identity
where
    S: Send + Sync,
{
    type Rejection = DomainError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let raw = parts
            .headers
            .get(USER_HEADER)
            .ok_or_else(|| DomainError::Unauthorized(format!("missing {} header", USER_HEADER)))?;

        raw.to_str()
            .ok()
            .and_then(|v| v.trim().parse::<u32>().ok())
            .map(Identity::new)
            .ok_or_else(|| DomainError::Unauthorized(format!("malformed {} header", USER_HEADER)))
    }
}

/// Allow/deny gate run before any checklist or item operation.
///
/// Non-members get NotFound so a checklist's existence is not revealed.
pub(crate) async fn authorize(state: &AppState, identity: Identity, checklist_id: u32) -> DomainResult<Role> {
    state
        .checklists
        .role_for(checklist_id, identity.user_id)
        .await?
        .ok_or_else(|| DomainError::checklist_not_found(checklist_id))
}

pub(crate) async fn authorize_owner(state: &AppState, identity: Identity, checklist_id: u32) -> DomainResult<()> {
    match authorize(state, identity, checklist_id).await? {
        Role::Owner => Ok(()),
        Role::Collaborator => Err(DomainError::Forbidden(format!(
            "only the owner may do this on checklist {}",
            checklist_id
        ))),
    }
}

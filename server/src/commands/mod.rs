//! Commands Layer
//!
//! REST handlers that bridge clients to the repositories.

mod auth;
mod checklist_cmd;
mod error;
mod item_cmd;
mod request_tracing;

use axum::middleware;
use axum::routing::{get, post, put};
use axum::{Json, Router};
use serde_json::{json, Value};

pub use auth::USER_HEADER;
pub use checklist_cmd::*;
pub use item_cmd::*;
pub use request_tracing::REQUEST_ID_HEADER;

use crate::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        // Checklists
        .route("/checklist", get(list_checklists))
        .route("/checklist/new", post(create_checklist))
        .route(
            "/checklist/{checklist_id}",
            get(get_checklist).put(edit_checklist).delete(delete_checklist),
        )
        .route(
            "/checklist/{checklist_id}/members",
            get(list_members).post(share_checklist),
        )
        // Items
        .route("/checklist/{checklist_id}/items", get(list_items))
        .route("/checklist/{checklist_id}/items/new", post(create_item))
        .route(
            "/checklist/{checklist_id}/items/{item_id}",
            put(update_item).delete(delete_item),
        )
        .route("/checklist/{checklist_id}/items/{item_id}/move", put(move_item))
        .layer(middleware::from_fn(request_tracing::request_tracing))
        .with_state(state)
}

async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

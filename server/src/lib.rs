//! TripCheck Backend
//!
//! Layered architecture:
//! - domain: Core entities and business rules
//! - repository: Data access abstractions and implementations
//! - commands: REST handlers

use std::future::Future;
use std::sync::Arc;

use tokio::net::TcpListener;
use tracing::info;

pub mod commands;
pub mod config;
pub mod domain;
pub mod logging;
pub mod repository;

pub use commands::{build_router, REQUEST_ID_HEADER, USER_HEADER};
pub use config::ServerConfig;
pub use repository::{ChecklistRepository, DbState, ItemRepository};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub db_state: DbState,
    pub items: Arc<ItemRepository>,
    pub checklists: Arc<ChecklistRepository>,
}

impl AppState {
    pub fn new(db_state: DbState) -> Self {
        let conn = db_state.connection();
        Self {
            items: Arc::new(ItemRepository::new(conn.clone())),
            checklists: Arc::new(ChecklistRepository::new(conn)),
            db_state,
        }
    }
}

/// Serve the REST API on `listener` until `shutdown` resolves
pub async fn serve<F>(listener: TcpListener, state: AppState, shutdown: F) -> std::io::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    if let Ok(addr) = listener.local_addr() {
        info!(%addr, "TripCheck server listening");
    }
    axum::serve(listener, build_router(state))
        .with_graceful_shutdown(shutdown)
        .await
}

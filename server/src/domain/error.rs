//! Domain Layer - Errors
//!
//! Error taxonomy shared by the store, the tree builder and the REST layer.

use serde::{Deserialize, Serialize};

/// Common result type for domain operations
pub type DomainResult<T> = Result<T, DomainError>;

/// Domain-level errors
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum DomainError {
    /// Referenced checklist or item does not exist, or is not visible to the caller
    NotFound(String),
    /// Request is malformed (negative position, reparent cycle, bad role)
    InvalidInput(String),
    /// Operation would break a checklist invariant; rejected before any write
    InvalidState(String),
    /// No verified identity on the request
    Unauthorized(String),
    /// Identity is known but lacks the required role
    Forbidden(String),
    /// Persistence failed; the enclosing transaction was rolled back
    Store(String),
}

impl DomainError {
    pub fn item_not_found(id: u32) -> Self {
        DomainError::NotFound(format!("Item not found with id: {}", id))
    }

    pub fn checklist_not_found(id: u32) -> Self {
        DomainError::NotFound(format!("Checklist not found with id: {}", id))
    }
}

impl std::fmt::Display for DomainError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DomainError::NotFound(msg) => write!(f, "Not found: {}", msg),
            DomainError::InvalidInput(msg) => write!(f, "Invalid input: {}", msg),
            DomainError::InvalidState(msg) => write!(f, "Invalid state: {}", msg),
            DomainError::Unauthorized(msg) => write!(f, "Unauthorized: {}", msg),
            DomainError::Forbidden(msg) => write!(f, "Forbidden: {}", msg),
            DomainError::Store(msg) => write!(f, "Store failure: {}", msg),
        }
    }
}

impl std::error::Error for DomainError {}

//! Verified caller identity, threaded explicitly into every operation.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Identity {
    pub user_id: u32,
}

impl Identity {
    pub fn new(user_id: u32) -> Self {
        Self { user_id }
    }
}

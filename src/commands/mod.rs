//! REST Command Wrappers
//!
//! Client bindings to the server routes, organized by domain.

mod checklist;
mod item;

use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::Deserialize;

use crate::error::{ClientError, ClientResult};
use crate::models::{Item, NewItem};

pub use checklist::*;
pub use item::*;

/// Header carrying the caller's user id
pub const USER_HEADER: &str = "x-tripcheck-user";

/// Durable item operations the optimistic store relies on
#[async_trait]
pub trait Backend: Send + Sync + 'static {
    /// Canonical tree of a checklist
    async fn list_items(&self, checklist_id: u32) -> ClientResult<Vec<Item>>;

    async fn create_item(&self, new_item: &NewItem) -> ClientResult<Item>;

    /// Returns the new `is_checked` value
    async fn toggle_item(&self, checklist_id: u32, item_id: u32) -> ClientResult<bool>;

    async fn rename_item(&self, checklist_id: u32, item_id: u32, new_name: &str) -> ClientResult<()>;

    /// Returns how many items went with the subtree
    async fn delete_item(&self, checklist_id: u32, item_id: u32) -> ClientResult<usize>;
}

#[derive(Deserialize)]
struct ErrorBody {
    error: String,
}

/// HTTP transport acting as one user
#[derive(Debug, Clone)]
pub struct HttpBackend {
    client: Client,
    base_url: String,
    user_id: u32,
}

impl HttpBackend {
    pub fn new(base_url: impl Into<String>, user_id: u32) -> Self {
        Self::with_client(Client::new(), base_url, user_id)
    }

    pub fn with_client(client: Client, base_url: impl Into<String>, user_id: u32) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            client,
            base_url,
            user_id,
        }
    }

    pub fn user_id(&self) -> u32 {
        self.user_id
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        self.client
            .request(method, format!("{}{}", self.base_url, path))
            .header(USER_HEADER, self.user_id.to_string())
    }

    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> ClientResult<T> {
        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            let message = match response.json::<ErrorBody>().await {
                Ok(body) => body.error,
                Err(_) => status.canonical_reason().unwrap_or("unknown error").to_string(),
            };
            log::debug!("request failed with {}: {}", status, message);
            return Err(ClientError::Api {
                status: status.as_u16(),
                message,
            });
        }
        Ok(response.json::<T>().await?)
    }
}

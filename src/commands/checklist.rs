//! Checklist Commands
//!
//! Client bindings for checklist details and sharing.

use reqwest::Method;
use serde::de::IgnoredAny;
use serde::{Deserialize, Serialize};

use super::HttpBackend;
use crate::error::ClientResult;
use crate::models::{Checklist, ChecklistDetails};

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ShareArgs<'a> {
    user_id: u32,
    role: &'a str,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct Created {
    new_checklist: Checklist,
}

impl HttpBackend {
    pub async fn list_checklists(&self) -> ClientResult<Vec<Checklist>> {
        self.send(self.request(Method::GET, "/checklist")).await
    }

    /// Create a checklist owned by this user, seeded with one item
    pub async fn create_checklist(&self, details: &ChecklistDetails) -> ClientResult<Checklist> {
        let created: Created = self
            .send(self.request(Method::POST, "/checklist/new").json(details))
            .await?;
        Ok(created.new_checklist)
    }

    pub async fn get_checklist(&self, checklist_id: u32) -> ClientResult<Checklist> {
        let path = format!("/checklist/{}", checklist_id);
        self.send(self.request(Method::GET, &path)).await
    }

    pub async fn edit_checklist(&self, checklist_id: u32, details: &ChecklistDetails) -> ClientResult<Checklist> {
        let path = format!("/checklist/{}", checklist_id);
        self.send(self.request(Method::PUT, &path).json(details)).await
    }

    pub async fn delete_checklist(&self, checklist_id: u32) -> ClientResult<()> {
        let path = format!("/checklist/{}", checklist_id);
        let _: IgnoredAny = self.send(self.request(Method::DELETE, &path)).await?;
        Ok(())
    }

    /// Give another user collaborator access
    pub async fn share_checklist(&self, checklist_id: u32, user_id: u32) -> ClientResult<()> {
        let path = format!("/checklist/{}/members", checklist_id);
        let args = ShareArgs {
            user_id,
            role: "collaborator",
        };
        let _: IgnoredAny = self.send(self.request(Method::POST, &path).json(&args)).await?;
        Ok(())
    }
}

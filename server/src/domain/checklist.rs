//! Checklist Entity
//!
//! A named trip checklist and the membership rows that grant access to it.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Name of the item seeded into every new checklist
pub const DEFAULT_ITEM_NAME: &str = "Suitcase";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Checklist {
    pub id: u32,
    pub title: String,
    pub description: Option<String>,
    pub trip_destination: Option<String>,
    pub trip_from_date: Option<NaiveDate>,
    pub trip_to_date: Option<NaiveDate>,
    /// Epoch milliseconds
    pub created_at: i64,
}

/// Editable checklist details, used for both create and edit
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChecklistDetails {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub trip_destination: Option<String>,
    #[serde(default)]
    pub trip_from_date: Option<NaiveDate>,
    #[serde(default)]
    pub trip_to_date: Option<NaiveDate>,
}

impl ChecklistDetails {
    pub fn titled(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Default::default()
        }
    }
}

/// Access level of a user on a checklist
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Owner,
    Collaborator,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Owner => "owner",
            Role::Collaborator => "collaborator",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "owner" => Some(Role::Owner),
            "collaborator" => Some(Role::Collaborator),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Member {
    pub user_id: u32,
    pub checklist_id: u32,
    pub role: Role,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_round_trips_through_str() {
        assert_eq!(Role::parse(Role::Owner.as_str()), Some(Role::Owner));
        assert_eq!(Role::parse("collaborator"), Some(Role::Collaborator));
        assert_eq!(Role::parse("admin"), None);
    }

    #[test]
    fn test_details_parse_short_dates() {
        let details: ChecklistDetails = serde_json::from_str(
            r#"{"title":"Lisbon","tripFromDate":"2024-05-01","tripToDate":"2024-05-09"}"#,
        )
        .unwrap();
        assert_eq!(details.title, "Lisbon");
        assert_eq!(details.trip_from_date, NaiveDate::from_ymd_opt(2024, 5, 1));
        assert_eq!(details.description, None);
    }
}

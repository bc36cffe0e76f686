use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::macros::string_enum;

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub role: Role,
    pub department: Option<String>,
    pub gender: Gender,
    pub date_joined: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserInput {
    pub username: String,
    pub email: String,
    pub role: Role,
    pub department: Option<String>,
    pub gender: Gender,
    pub date_joined: Option<DateTime<Utc>>,
}

string_enum! {
    #[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
    #[serde(rename_all = "lowercase")]
    pub enum Role {
        Staff => "staff",
        Hod => "hod",
        Principal => "principal",
    }
}

string_enum! {
    #[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
    pub enum Gender {
        #[serde(rename = "m")]
        Male => "m",
        #[serde(rename = "f")]
        Female => "f",
        #[serde(rename = "o")]
        Other => "o",
    }
}

impl Default for Role {
    fn default() -> Self {
        Role::Staff
    }
}

impl Default for Gender {
    fn default() -> Self {
        Gender::Other
    }
}

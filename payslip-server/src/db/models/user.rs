//! User Model

use super::serde_helpers;
use serde::{Deserialize, Serialize};
use surrealdb::RecordId;

/// Registered user, keyed by the identity provider's stable user id.
///
/// Created on first sign-in and field-refreshed on every later sign-in;
/// records are never deleted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    #[serde(
        default,
        with = "serde_helpers::option_record_id",
        skip_serializing_if = "Option::is_none"
    )]
    pub id: Option<RecordId>,
    /// External identifier from the identity provider (unique)
    pub userid: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    /// Provider access token. Stored, never rendered back to a client.
    #[serde(default, skip_serializing)]
    pub access_token: String,
    /// Avatar image as a base64 blob
    #[serde(default)]
    pub avatar: String,
}

impl User {
    /// Display name for page headers and the payslip employee block
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
            .trim()
            .to_string()
    }
}

/// Upsert payload for the user collection
///
/// Carries exactly the fields refreshed on every authentication.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserUpsert {
    pub userid: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub access_token: String,
    /// Already base64-encoded by the caller
    pub avatar: String,
}

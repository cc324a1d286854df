use chrono::{DateTime, Utc};
use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

use crate::errors::ModelError;

/// Persisted user document. `password` holds the argon2 hash and never
/// crosses the read boundary; reads go through [`UserView`], which has no
/// password field at all.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub username: String,
    pub password: String,
    pub fullname: String,
    pub score: i64,
    #[serde(default)]
    pub is_admin: bool,
}

/// Embedded `{_id, fullname}` reference, stored with the id in its textual
/// hex form inside embedding documents.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct UserSummary {
    #[serde(rename = "_id")]
    pub id: String,
    pub fullname: String,
}

/// Read-side user shape.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserView {
    #[serde(rename = "_id")]
    pub id: String,
    pub username: String,
    pub fullname: String,
    pub score: i64,
    pub is_admin: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl User {
    pub fn into_view(self) -> Result<UserView, ModelError> {
        let id = self.id.ok_or(ModelError::MissingId)?;
        Ok(UserView {
            id: id.to_hex(),
            username: self.username,
            fullname: self.fullname,
            score: self.score,
            is_admin: self.is_admin,
            created_at: None,
        })
    }
}

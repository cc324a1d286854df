use chrono::{DateTime, Utc};
use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

use crate::errors::ModelError;
use crate::user::UserSummary;

/// Persisted car document. `owner` is the denormalized summary of the user
/// who created the record; `msgs` is an ordered, append-only-by-id sequence
/// of embedded messages.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Car {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub vendor: String,
    pub speed: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub owner: Option<UserSummary>,
    #[serde(default)]
    pub msgs: Vec<CarMsg>,
}

/// Embedded car message. Ids are short random strings generated server-side,
/// not database ids.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CarMsg {
    pub id: String,
    pub txt: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub by: Option<UserSummary>,
}

/// Read-side car shape. `created_at` is derived from the id's embedded
/// timestamp and only populated by get-by-id.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CarView {
    #[serde(rename = "_id")]
    pub id: String,
    pub vendor: String,
    pub speed: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub owner: Option<UserSummary>,
    #[serde(default)]
    pub msgs: Vec<CarMsg>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl Car {
    pub fn into_view(self) -> Result<CarView, ModelError> {
        let id = self.id.ok_or(ModelError::MissingId)?;
        Ok(CarView {
            id: id.to_hex(),
            vendor: self.vendor,
            speed: self.speed,
            owner: self.owner,
            msgs: self.msgs,
            created_at: None,
        })
    }
}

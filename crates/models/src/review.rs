use chrono::{DateTime, Utc};
use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

use crate::user::UserSummary;

/// Persisted review document. The user references are real ObjectIds so the
/// read path can join against the user collection.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Review {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub by_user_id: ObjectId,
    pub about_user_id: ObjectId,
    pub txt: String,
}

/// Read-side review shape: author/subject resolved to live `{_id, fullname}`
/// summaries at read time; the raw id fields do not appear.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewView {
    #[serde(rename = "_id")]
    pub id: String,
    pub txt: String,
    pub by_user: UserSummary,
    pub about_user: UserSummary,
    pub created_at: DateTime<Utc>,
}

/// Acknowledgement shape returned by add, ids in textual hex form.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddedReview {
    #[serde(rename = "_id")]
    pub id: String,
    pub by_user_id: String,
    pub about_user_id: String,
    pub txt: String,
}

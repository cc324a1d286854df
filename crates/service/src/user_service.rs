use futures_util::TryStreamExt;
use mongodb::bson::{doc, oid::ObjectId, Document};
use mongodb::{Collection, Database};
use serde::{Deserialize, Serialize};
use tracing::error;

use models::errors::ModelError;
use models::user::{User, UserView};

use crate::errors::ServiceError;

const USER_COLLECTION: &str = "user";

/// List filter. `txt` matches username OR fullname as a case-insensitive
/// substring; `minBalance` is a score floor.
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct UserFilter {
    pub txt: Option<String>,
    pub min_balance: Option<i64>,
}

/// Allow-listed fields a caller may set on a new user. The password is
/// expected to arrive already hashed from the boundary doing the hashing.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserPayload {
    pub username: String,
    pub password: String,
    pub fullname: String,
    #[serde(default)]
    pub score: i64,
    #[serde(default)]
    pub is_admin: bool,
}

/// Mutable subset for update.
#[derive(Debug, Clone, Deserialize)]
pub struct UserPatch {
    pub fullname: String,
    pub score: i64,
}

/// Update acknowledgement: the allow-listed fields merged with the id.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdatedUser {
    #[serde(rename = "_id")]
    pub id: String,
    pub fullname: String,
    pub score: i64,
}

fn users(db: &Database) -> Collection<User> {
    db.collection(USER_COLLECTION)
}

pub async fn query(db: &Database, filter: &UserFilter) -> Result<Vec<UserView>, ServiceError> {
    let criteria = build_criteria(filter);

    let found: Vec<User> = users(db)
        .find(criteria)
        .await
        .inspect_err(|err| error!(%err, "cannot query users"))?
        .try_collect()
        .await
        .inspect_err(|err| error!(%err, "cannot query users"))?;

    found
        .into_iter()
        .map(|user| {
            let created_at = user.id.map(|oid| oid.timestamp().to_chrono());
            let mut view = user.into_view()?;
            view.created_at = created_at;
            Ok(view)
        })
        .collect()
}

pub async fn get_by_id(db: &Database, user_id: &str) -> Result<UserView, ServiceError> {
    let criteria = doc! { "_id": ObjectId::parse_str(user_id)? };

    let user = users(db)
        .find_one(criteria)
        .await
        .inspect_err(|err| error!(%err, user_id, "while finding user by id"))?
        .ok_or_else(|| ServiceError::not_found("user"))?;

    Ok(user.into_view()?)
}

/// Full record lookup for the login path; the only read that may see the
/// password hash.
pub async fn get_by_username(
    db: &Database,
    username: &str,
) -> Result<Option<User>, ServiceError> {
    let user = users(db)
        .find_one(doc! { "username": username })
        .await
        .inspect_err(|err| error!(%err, username, "while finding user by username"))?;
    Ok(user)
}

pub async fn add(db: &Database, payload: UserPayload) -> Result<UserView, ServiceError> {
    // Allow-list copy: nothing outside these fields reaches the document.
    let user = User {
        id: None,
        username: payload.username,
        password: payload.password,
        fullname: payload.fullname,
        score: payload.score,
        is_admin: payload.is_admin,
    };

    let res = users(db)
        .insert_one(&user)
        .await
        .inspect_err(|err| error!(%err, "cannot add user"))?;

    let id = res.inserted_id.as_object_id().ok_or(ModelError::MissingId)?;
    Ok(User { id: Some(id), ..user }.into_view()?)
}

pub async fn update(
    db: &Database,
    user_id: &str,
    patch: UserPatch,
) -> Result<UpdatedUser, ServiceError> {
    let criteria = doc! { "_id": ObjectId::parse_str(user_id)? };
    let changes = doc! { "$set": { "fullname": patch.fullname.as_str(), "score": patch.score } };

    users(db)
        .update_one(criteria, changes)
        .await
        .inspect_err(|err| error!(%err, user_id, "cannot update user"))?;

    Ok(UpdatedUser { id: user_id.to_string(), fullname: patch.fullname, score: patch.score })
}

pub async fn remove(db: &Database, user_id: &str) -> Result<(), ServiceError> {
    let criteria = doc! { "_id": ObjectId::parse_str(user_id)? };

    users(db)
        .delete_one(criteria)
        .await
        .inspect_err(|err| error!(%err, user_id, "cannot remove user"))?;
    Ok(())
}

fn build_criteria(filter: &UserFilter) -> Document {
    let mut criteria = Document::new();
    if let Some(txt) = filter.txt.as_deref().filter(|txt| !txt.is_empty()) {
        let txt_criteria = doc! { "$regex": txt, "$options": "i" };
        criteria.insert(
            "$or",
            vec![doc! { "username": txt_criteria.clone() }, doc! { "fullname": txt_criteria }],
        );
    }
    if let Some(min_balance) = filter.min_balance {
        criteria.insert("score", doc! { "$gte": min_balance });
    }
    criteria
}

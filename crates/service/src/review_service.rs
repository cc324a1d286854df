use futures_util::TryStreamExt;
use mongodb::bson::{doc, oid::ObjectId, Document};
use mongodb::{Collection, Database};
use serde::Deserialize;
use tracing::error;

use models::errors::ModelError;
use models::review::{AddedReview, Review, ReviewView};
use models::user::UserSummary;

use crate::errors::ServiceError;
use crate::principal::Principal;

const REVIEW_COLLECTION: &str = "review";
const USER_COLLECTION: &str = "user";

#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ReviewFilter {
    pub by_user_id: Option<String>,
}

/// Allow-listed fields a caller may set on a review. The author is always
/// the principal, never caller input.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewPayload {
    pub about_user_id: String,
    pub txt: String,
}

fn reviews(db: &Database) -> Collection<Review> {
    db.collection(REVIEW_COLLECTION)
}

pub async fn query(db: &Database, filter: &ReviewFilter) -> Result<Vec<ReviewView>, ServiceError> {
    let criteria = build_criteria(filter)?;

    let pipeline = vec![
        doc! { "$match": criteria },
        doc! { "$lookup": {
            "from": USER_COLLECTION,
            "localField": "byUserId",
            "foreignField": "_id",
            "as": "byUser",
        } },
        doc! { "$unwind": "$byUser" },
        doc! { "$lookup": {
            "from": USER_COLLECTION,
            "localField": "aboutUserId",
            "foreignField": "_id",
            "as": "aboutUser",
        } },
        doc! { "$unwind": "$aboutUser" },
    ];

    let raw: Vec<Document> = reviews(db)
        .aggregate(pipeline)
        .await
        .inspect_err(|err| error!(%err, "cannot get reviews"))?
        .try_collect()
        .await
        .inspect_err(|err| error!(%err, "cannot get reviews"))?;

    raw.into_iter().map(view_from_doc).collect()
}

pub async fn add(
    db: &Database,
    principal: &Principal,
    payload: ReviewPayload,
) -> Result<AddedReview, ServiceError> {
    let review = Review {
        id: None,
        by_user_id: principal.id,
        about_user_id: ObjectId::parse_str(&payload.about_user_id)?,
        txt: payload.txt,
    };

    let res = reviews(db)
        .insert_one(&review)
        .await
        .inspect_err(|err| error!(%err, "cannot add review"))?;

    let id = res.inserted_id.as_object_id().ok_or(ModelError::MissingId)?;
    Ok(AddedReview {
        id: id.to_hex(),
        by_user_id: review.by_user_id.to_hex(),
        about_user_id: review.about_user_id.to_hex(),
        txt: review.txt,
    })
}

pub async fn remove(
    db: &Database,
    principal: &Principal,
    review_id: &str,
) -> Result<String, ServiceError> {
    let mut criteria = doc! { "_id": ObjectId::parse_str(review_id)? };
    // Non-admins may only remove their own reviews; absent and foreign ids
    // fail the same way.
    if !principal.is_admin {
        criteria.insert("byUserId", principal.id);
    }

    let res = reviews(db)
        .delete_one(criteria)
        .await
        .inspect_err(|err| error!(%err, review_id, "cannot remove review"))?;

    if res.deleted_count == 0 {
        return Err(ServiceError::not_found("review"));
    }
    Ok(review_id.to_string())
}

/// Reshape one joined document: live user summaries in, raw id fields out.
fn view_from_doc(doc: Document) -> Result<ReviewView, ServiceError> {
    let id = doc.get_object_id("_id")?;
    let by = doc.get_document("byUser")?;
    let about = doc.get_document("aboutUser")?;

    Ok(ReviewView {
        id: id.to_hex(),
        txt: doc.get_str("txt")?.to_string(),
        by_user: UserSummary {
            id: by.get_object_id("_id")?.to_hex(),
            fullname: by.get_str("fullname")?.to_string(),
        },
        about_user: UserSummary {
            id: about.get_object_id("_id")?.to_hex(),
            fullname: about.get_str("fullname")?.to_string(),
        },
        created_at: id.timestamp().to_chrono(),
    })
}

fn build_criteria(filter: &ReviewFilter) -> Result<Document, ServiceError> {
    let mut criteria = Document::new();
    if let Some(by_user_id) = filter.by_user_id.as_deref().filter(|id| !id.is_empty()) {
        criteria.insert("byUserId", ObjectId::parse_str(by_user_id)?);
    }
    Ok(criteria)
}

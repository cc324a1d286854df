use futures_util::TryStreamExt;
use mongodb::bson::{doc, oid::ObjectId, Document};
use mongodb::{Collection, Database};
use serde::{Deserialize, Serialize};
use tracing::error;

use common::utils::id::make_id;
use models::car::{Car, CarMsg, CarView};
use models::errors::ModelError;

use crate::errors::ServiceError;
use crate::principal::Principal;

pub const PAGE_SIZE: i64 = 3;
const CAR_COLLECTION: &str = "car";
const MSG_ID_LEN: usize = 6;

/// List filter, deserialized straight from the query string. All fields are
/// optional; absent fields constrain nothing.
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CarFilter {
    pub txt: Option<String>,
    pub min_speed: Option<i64>,
    pub page_idx: Option<u64>,
    pub sort_field: Option<String>,
    pub sort_dir: Option<i32>,
}

/// Allow-listed fields a caller may set on a car. Anything else in the
/// request body never reaches the persisted document; the owner comes from
/// the principal, never from the caller.
#[derive(Debug, Clone, Deserialize)]
pub struct CarPayload {
    pub vendor: String,
    pub speed: i64,
}

/// Update acknowledgement: the allow-listed fields merged with the id.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdatedCar {
    #[serde(rename = "_id")]
    pub id: String,
    pub vendor: String,
    pub speed: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MsgPayload {
    pub txt: String,
}

fn cars(db: &Database) -> Collection<Car> {
    db.collection(CAR_COLLECTION)
}

pub async fn query(db: &Database, filter: &CarFilter) -> Result<Vec<CarView>, ServiceError> {
    let criteria = build_criteria(filter);
    let sort = build_sort(filter);

    let collection = cars(db);
    let mut find = collection.find(criteria).sort(sort);
    if let Some(page_idx) = filter.page_idx {
        find = find.skip(page_idx * PAGE_SIZE as u64).limit(PAGE_SIZE);
    }

    let found: Vec<Car> = find
        .await
        .inspect_err(|err| error!(%err, "cannot query cars"))?
        .try_collect()
        .await
        .inspect_err(|err| error!(%err, "cannot query cars"))?;

    found.into_iter().map(|car| Ok(car.into_view()?)).collect()
}

pub async fn get_by_id(db: &Database, car_id: &str) -> Result<CarView, ServiceError> {
    let criteria = doc! { "_id": ObjectId::parse_str(car_id)? };

    let car = cars(db)
        .find_one(criteria)
        .await
        .inspect_err(|err| error!(%err, car_id, "while finding car"))?
        .ok_or_else(|| ServiceError::not_found("car"))?;

    // Ids encode their creation time; surface it on the read shape.
    let created_at = car.id.map(|oid| oid.timestamp().to_chrono());
    let mut view = car.into_view()?;
    view.created_at = created_at;
    Ok(view)
}

pub async fn add(
    db: &Database,
    principal: &Principal,
    payload: CarPayload,
) -> Result<CarView, ServiceError> {
    let car = Car {
        id: None,
        vendor: payload.vendor,
        speed: payload.speed,
        owner: Some(principal.summary()),
        msgs: Vec::new(),
    };

    let res = cars(db)
        .insert_one(&car)
        .await
        .inspect_err(|err| error!(%err, "cannot insert car"))?;

    let id = res.inserted_id.as_object_id().ok_or(ModelError::MissingId)?;
    Ok(Car { id: Some(id), ..car }.into_view()?)
}

pub async fn update(
    db: &Database,
    car_id: &str,
    payload: CarPayload,
) -> Result<UpdatedCar, ServiceError> {
    let criteria = doc! { "_id": ObjectId::parse_str(car_id)? };
    let changes = doc! { "$set": { "vendor": payload.vendor.as_str(), "speed": payload.speed } };

    cars(db)
        .update_one(criteria, changes)
        .await
        .inspect_err(|err| error!(%err, car_id, "cannot update car"))?;

    Ok(UpdatedCar { id: car_id.to_string(), vendor: payload.vendor, speed: payload.speed })
}

pub async fn remove(
    db: &Database,
    principal: &Principal,
    car_id: &str,
) -> Result<String, ServiceError> {
    let mut criteria = doc! { "_id": ObjectId::parse_str(car_id)? };
    // Non-admins may only delete their own cars. The combined criteria keep
    // "no such id" and "not yours" indistinguishable in the outcome.
    if !principal.is_admin {
        criteria.insert("owner._id", principal.id.to_hex());
    }

    let res = cars(db)
        .delete_one(criteria)
        .await
        .inspect_err(|err| error!(%err, car_id, "cannot remove car"))?;

    if res.deleted_count == 0 {
        return Err(ServiceError::not_found("car"));
    }
    Ok(car_id.to_string())
}

pub async fn add_msg(
    db: &Database,
    principal: &Principal,
    car_id: &str,
    payload: MsgPayload,
) -> Result<CarMsg, ServiceError> {
    let criteria = doc! { "_id": ObjectId::parse_str(car_id)? };
    let msg = CarMsg { id: make_id(MSG_ID_LEN), txt: payload.txt, by: Some(principal.summary()) };

    let changes = doc! { "$push": { "msgs": mongodb::bson::to_bson(&msg)? } };
    cars(db)
        .update_one(criteria, changes)
        .await
        .inspect_err(|err| error!(%err, car_id, "cannot add car msg"))?;

    Ok(msg)
}

pub async fn remove_msg(
    db: &Database,
    car_id: &str,
    msg_id: &str,
) -> Result<String, ServiceError> {
    let criteria = doc! { "_id": ObjectId::parse_str(car_id)? };
    // Filter-and-reassign semantics: an absent msg id is a silent no-op.
    let changes = doc! { "$pull": { "msgs": { "id": msg_id } } };

    cars(db)
        .update_one(criteria, changes)
        .await
        .inspect_err(|err| error!(%err, car_id, "cannot remove car msg"))?;

    Ok(msg_id.to_string())
}

fn build_criteria(filter: &CarFilter) -> Document {
    let mut criteria = Document::new();
    if let Some(txt) = filter.txt.as_deref().filter(|txt| !txt.is_empty()) {
        criteria.insert("vendor", doc! { "$regex": txt, "$options": "i" });
    }
    // Absent minimum means no speed clause at all.
    if let Some(min_speed) = filter.min_speed {
        criteria.insert("speed", doc! { "$gte": min_speed });
    }
    criteria
}

fn build_sort(filter: &CarFilter) -> Document {
    let mut sort = Document::new();
    if let Some(field) = filter.sort_field.as_deref().filter(|field| !field.is_empty()) {
        sort.insert(field, filter.sort_dir.unwrap_or(1));
    }
    sort
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support;

    #[test]
    fn criteria_empty_filter_matches_all() {
        assert!(build_criteria(&CarFilter::default()).is_empty());
    }

    #[test]
    fn criteria_combines_vendor_and_speed() {
        let filter = CarFilter {
            txt: Some("tesl".into()),
            min_speed: Some(150),
            ..Default::default()
        };
        assert_eq!(
            build_criteria(&filter),
            doc! {
                "vendor": { "$regex": "tesl", "$options": "i" },
                "speed": { "$gte": 150_i64 },
            }
        );
    }

    #[test]
    fn criteria_skips_absent_minimum() {
        let filter = CarFilter { txt: Some("fiat".into()), ..Default::default() };
        assert!(build_criteria(&filter).get("speed").is_none());
    }

    #[test]
    fn sort_is_single_key_defaulting_ascending() {
        let filter = CarFilter { sort_field: Some("speed".into()), ..Default::default() };
        assert_eq!(build_sort(&filter), doc! { "speed": 1 });

        let filter = CarFilter {
            sort_field: Some("vendor".into()),
            sort_dir: Some(-1),
            ..Default::default()
        };
        assert_eq!(build_sort(&filter), doc! { "vendor": -1 });

        assert!(build_sort(&CarFilter::default()).is_empty());
    }

    #[tokio::test]
    async fn car_crud_service() -> Result<(), anyhow::Error> {
        if std::env::var("SKIP_DB_TESTS").is_ok() {
            return Ok(());
        }
        let db = test_support::get_db().await?;
        let owner = test_support::principal(false);

        let tag = make_id(8).to_lowercase();
        let vendor = format!("Tesla-{tag}");
        let added = add(&db, &owner, CarPayload { vendor: vendor.clone(), speed: 200 }).await?;
        assert_eq!(added.vendor, vendor);
        let owner_hex = owner.id.to_hex();
        assert_eq!(added.owner.as_ref().map(|o| o.id.clone()), Some(owner_hex));

        assert!(matches!(
            get_by_id(&db, "not-a-hex-id").await,
            Err(ServiceError::MalformedId(_))
        ));

        let view = get_by_id(&db, &added.id).await?;
        assert_eq!(view.vendor, vendor);
        assert_eq!(view.speed, 200);
        assert!(view.created_at.is_some());

        // substring matches case-insensitively, the minimum cuts off
        let filter = CarFilter {
            txt: Some(tag.clone()),
            min_speed: Some(150),
            ..Default::default()
        };
        let hits = query(&db, &filter).await?;
        assert!(hits.iter().any(|c| c.id == added.id));
        assert!(hits.iter().all(|c| c.vendor.to_lowercase().contains(&tag) && c.speed >= 150));

        let filter = CarFilter {
            txt: Some(tag.clone()),
            min_speed: Some(250),
            ..Default::default()
        };
        let misses = query(&db, &filter).await?;
        assert!(misses.iter().all(|c| c.id != added.id));

        // update writes only the allow-listed fields
        let renamed = format!("Fiat-{tag}");
        let updated = update(&db, &added.id, CarPayload { vendor: renamed.clone(), speed: 90 }).await?;
        assert_eq!(updated.speed, 90);
        let after = get_by_id(&db, &added.id).await?;
        assert_eq!(after.vendor, renamed);
        assert_eq!(after.speed, 90);
        assert_eq!(after.owner, view.owner);
        assert_eq!(after.msgs, view.msgs);

        // strangers cannot remove it, and the failure is the generic not-found
        let stranger = test_support::principal(false);
        let err = remove(&db, &stranger, &added.id).await.unwrap_err();
        assert!(matches!(err, ServiceError::NotFound(_)));
        // a bogus id fails identically
        let err = remove(&db, &stranger, &ObjectId::new().to_hex()).await.unwrap_err();
        assert!(matches!(err, ServiceError::NotFound(_)));

        // admins bypass the ownership clause
        let admin = test_support::principal(true);
        remove(&db, &admin, &added.id).await?;
        assert!(matches!(get_by_id(&db, &added.id).await, Err(ServiceError::NotFound(_))));
        Ok(())
    }

    #[tokio::test]
    async fn paged_query_returns_at_most_a_page() -> Result<(), anyhow::Error> {
        if std::env::var("SKIP_DB_TESTS").is_ok() {
            return Ok(());
        }
        let db = test_support::get_db().await?;
        let owner = test_support::principal(false);

        let tag = make_id(8).to_lowercase();
        let mut ids = Vec::new();
        for speed in [100, 110, 120, 130] {
            let payload = CarPayload { vendor: format!("Page-{tag}"), speed };
            ids.push(add(&db, &owner, payload).await?.id);
        }

        let filter = CarFilter { txt: Some(tag.clone()), page_idx: Some(0), ..Default::default() };
        let page0 = query(&db, &filter).await?;
        assert_eq!(page0.len(), PAGE_SIZE as usize);

        let filter = CarFilter { txt: Some(tag.clone()), page_idx: Some(1), ..Default::default() };
        let page1 = query(&db, &filter).await?;
        assert_eq!(page1.len(), 1);

        for id in ids {
            remove(&db, &owner, &id).await?;
        }
        Ok(())
    }

    #[tokio::test]
    async fn concurrent_msg_appends_both_land() -> Result<(), anyhow::Error> {
        if std::env::var("SKIP_DB_TESTS").is_ok() {
            return Ok(());
        }
        let db = test_support::get_db().await?;
        let owner = test_support::principal(false);
        let added = add(&db, &owner, CarPayload { vendor: "Susita".into(), speed: 45 }).await?;

        // $push on a single document is atomic server-side; neither append
        // may overwrite the other.
        let (a, b) = tokio::join!(
            add_msg(&db, &owner, &added.id, MsgPayload { txt: "first".into() }),
            add_msg(&db, &owner, &added.id, MsgPayload { txt: "second".into() }),
        );
        let (a, b) = (a?, b?);

        let car = get_by_id(&db, &added.id).await?;
        assert!(car.msgs.iter().any(|m| m.id == a.id));
        assert!(car.msgs.iter().any(|m| m.id == b.id));

        // removing an absent msg id is a silent no-op
        remove_msg(&db, &added.id, "nope42").await?;
        assert_eq!(get_by_id(&db, &added.id).await?.msgs.len(), 2);

        remove_msg(&db, &added.id, &a.id).await?;
        let car = get_by_id(&db, &added.id).await?;
        assert!(car.msgs.iter().all(|m| m.id != a.id));
        assert!(car.msgs.iter().any(|m| m.id == b.id));

        remove(&db, &owner, &added.id).await?;
        Ok(())
    }
}

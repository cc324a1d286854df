#![cfg(test)]
use mongodb::bson::oid::ObjectId;
use mongodb::Database;
use tokio::sync::OnceCell;

use crate::principal::Principal;

// One client per test process; each test works against its own records.
static CLIENT: OnceCell<mongodb::Client> = OnceCell::const_new();

pub async fn get_db() -> Result<Database, anyhow::Error> {
    let client = CLIENT
        .get_or_try_init(|| async {
            let uri = std::env::var("MONGODB_URI")
                .unwrap_or_else(|_| "mongodb://localhost:27017".to_string());
            mongodb::Client::with_uri_str(&uri).await
        })
        .await?;
    Ok(client.database("carhub_test"))
}

pub fn principal(is_admin: bool) -> Principal {
    Principal { id: ObjectId::new(), fullname: "Test User".into(), is_admin }
}

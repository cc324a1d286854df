use mongodb::{Client, Database};
use once_cell::sync::Lazy;
use std::env;

pub static MONGODB_URI: Lazy<String> = Lazy::new(|| {
    // Load .env if present
    let _ = dotenvy::dotenv();
    env::var("MONGODB_URI").unwrap_or_else(|_| "mongodb://localhost:27017".to_string())
});

pub static DB_NAME: Lazy<String> = Lazy::new(|| {
    let _ = dotenvy::dotenv();
    env::var("MONGODB_DB").unwrap_or_else(|_| "carhub".to_string())
});

pub async fn connect() -> anyhow::Result<Database> {
    connect_to(MONGODB_URI.as_str(), DB_NAME.as_str()).await
}

pub async fn connect_with(cfg: &configs::DatabaseConfig) -> anyhow::Result<Database> {
    connect_to(&cfg.url, &cfg.db_name).await
}

pub async fn connect_to(uri: &str, db_name: &str) -> anyhow::Result<Database> {
    let client = Client::with_uri_str(uri).await?;
    Ok(client.database(db_name))
}

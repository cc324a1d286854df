use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("malformed id: {0}")]
    MalformedId(#[from] mongodb::bson::oid::Error),
    #[error("not found: {0}")]
    NotFound(String),
    #[error("database error: {0}")]
    Db(#[from] mongodb::error::Error),
    #[error("malformed document: {0}")]
    Document(#[from] mongodb::bson::document::ValueAccessError),
    #[error("serialization error: {0}")]
    Serialize(#[from] mongodb::bson::ser::Error),
    #[error("model error: {0}")]
    Model(#[from] models::errors::ModelError),
}

impl ServiceError {
    pub fn not_found(entity: &str) -> Self {
        Self::NotFound(format!("{} not found", entity))
    }
}

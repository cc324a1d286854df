use thiserror::Error;

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("document missing _id")]
    MissingId,
}

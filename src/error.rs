use crate::schema::ValidationError;

#[derive(Debug, thiserror::Error)]
pub enum PayloadError {
    #[error("unknown schema: {0}")]
    UnknownSchema(String),
    #[error("malformed JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Validation(#[from] ValidationError),
}

pub type Result<T> = std::result::Result<T, PayloadError>;

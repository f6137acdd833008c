use thiserror::Error;

/// Failures reading or writing the save record.
///
/// These only ever come out of a [`crate::persist::SaveStore`]; the app logs
/// them and keeps playing.
#[derive(Debug, Error)]
pub enum PersistError {
    #[error("save file i/o error: {0}")]
    Io(#[from] std::io::Error),

    #[error("save record is not valid json: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid save record: {0}")]
    InvalidRecord(String),
}

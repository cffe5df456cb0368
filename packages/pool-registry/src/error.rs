use thiserror::Error;

#[derive(Error, Debug)]
pub enum RegistryError {
    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error("Failed to read pool table {path}: {reason}")]
    Read { path: String, reason: String },

    #[error("Pool {name} lists no underlying token")]
    NoUnderlyingToken { name: String },
}

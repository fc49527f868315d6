use thiserror::Error;

/// Failures raised by secretsm itself, as opposed to the AWS SDK
#[derive(Debug, Error)]
pub enum SecretsError {
    #[error("Key/Value pair {0} invalid")]
    InvalidToken(String),

    #[error("{0} is set and removed in the same command")]
    Conflict(String),

    #[error("Key {0} doesn't exist, can't be deleted")]
    MissingKey(String),

    #[error("No region")]
    NoRegion,

    #[error("max_results must be between 1 and 100, got {0}")]
    InvalidMaxResults(i32),

    #[error("Secret '{name}' is not a JSON object: {source}")]
    InvalidPayload {
        name: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Secret '{0}' has no string value")]
    NoSecretString(String),

    #[error("Failed to encode secret payload: {0}")]
    Encode(#[from] serde_json::Error),
}

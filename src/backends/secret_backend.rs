use anyhow::Result;

/// A secret as returned by a list call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SecretRef {
    pub name: String,
    pub arn: String,
}

/// One page of a list call
#[derive(Debug, Clone, Default)]
pub struct SecretPage {
    pub secrets: Vec<SecretRef>,
    pub next_token: Option<String>,
}

/// Identifiers of the version written by a put call
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PutReceipt {
    pub arn: Option<String>,
    pub version_id: Option<String>,
}

/// The three secret store operations secretsm relies on
#[async_trait::async_trait]
pub trait SecretBackend: Send + Sync {
    /// Fetch the string content of a secret
    async fn get_secret_value(&self, secret_id: &str) -> Result<String>;

    /// Fetch one page of secrets, starting at `next_token` when given
    async fn list_secrets(&self, max_results: i32, next_token: Option<String>)
        -> Result<SecretPage>;

    /// Store a new string value for an existing secret
    async fn put_secret_value(&self, secret_id: &str, secret_string: &str) -> Result<PutReceipt>;

    /// Get the backend type name for display purposes
    fn backend_type(&self) -> &'static str;
}

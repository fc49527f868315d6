use anyhow::{Context, Result};
use aws_config::Region;
use aws_sdk_secretsmanager::error::ProvideErrorMetadata;
use aws_sdk_secretsmanager::types::SecretListEntry;
use aws_sdk_secretsmanager::Client as SecretsManagerClient;
use tracing::{debug, info, warn};

use super::secret_backend::{PutReceipt, SecretBackend, SecretPage, SecretRef};
use crate::error::SecretsError;

/// AWS Secrets Manager client
pub struct AwsSecretsClient {
    client: SecretsManagerClient,
    region: String,
}

impl AwsSecretsClient {
    /// Create a client for the given region using the default credential chain
    pub async fn new(region: &str) -> Result<Self> {
        let config = aws_config::defaults(aws_config::BehaviorVersion::latest())
            .region(Region::new(region.to_string()))
            .load()
            .await;
        let client = SecretsManagerClient::new(&config);

        debug!("Created AWS Secrets Manager client for region {}", region);

        Ok(Self {
            client,
            region: region.to_string(),
        })
    }

    /// Create a client from an explicit service config
    pub fn from_conf(conf: aws_sdk_secretsmanager::Config) -> Self {
        let region = conf.region().map(|r| r.to_string()).unwrap_or_default();

        Self {
            client: SecretsManagerClient::from_conf(conf),
            region,
        }
    }

    pub fn region(&self) -> &str {
        &self.region
    }
}

/// Convert an SDK list entry, treating missing fields as empty
fn entry_to_ref(entry: &SecretListEntry) -> SecretRef {
    SecretRef {
        name: entry.name().unwrap_or_default().to_string(),
        arn: entry.arn().unwrap_or_default().to_string(),
    }
}

#[async_trait::async_trait]
impl SecretBackend for AwsSecretsClient {
    async fn get_secret_value(&self, secret_id: &str) -> Result<String> {
        debug!("Reading secret from AWS Secrets Manager: {}", secret_id);

        let response = self
            .client
            .get_secret_value()
            .secret_id(secret_id)
            .send()
            .await
            .with_context(|| {
                format!(
                    "Failed to read secret '{}' from AWS Secrets Manager",
                    secret_id
                )
            })?;

        let secret_string = response
            .secret_string()
            .ok_or_else(|| SecretsError::NoSecretString(secret_id.to_string()))?;

        Ok(secret_string.to_string())
    }

    async fn list_secrets(
        &self,
        max_results: i32,
        next_token: Option<String>,
    ) -> Result<SecretPage> {
        debug!(
            "Listing secrets in {} (max_results={}, next_token={:?})",
            self.region, max_results, next_token
        );

        let response = self
            .client
            .list_secrets()
            .max_results(max_results)
            .set_next_token(next_token)
            .send()
            .await
            .map_err(|e| {
                if let Some(service_err) = e.as_service_error() {
                    warn!(
                        "ListSecrets failed with {}: {}",
                        service_err.code().unwrap_or("unknown error"),
                        service_err.message().unwrap_or_default()
                    );
                }
                e
            })
            .context("Failed to list secrets from AWS Secrets Manager")?;

        Ok(SecretPage {
            secrets: response.secret_list().iter().map(entry_to_ref).collect(),
            next_token: response.next_token().map(|s| s.to_string()),
        })
    }

    async fn put_secret_value(&self, secret_id: &str, secret_string: &str) -> Result<PutReceipt> {
        debug!("Writing secret to AWS Secrets Manager: {}", secret_id);

        let response = self
            .client
            .put_secret_value()
            .secret_id(secret_id)
            .secret_string(secret_string)
            .send()
            .await
            .with_context(|| format!("Putting secret {} error", secret_id))?;

        info!(
            "Successfully wrote secret '{}' to AWS Secrets Manager",
            secret_id
        );

        Ok(PutReceipt {
            arn: response.arn().map(|s| s.to_string()),
            version_id: response.version_id().map(|s| s.to_string()),
        })
    }

    fn backend_type(&self) -> &'static str {
        "AWS Secrets Manager"
    }
}

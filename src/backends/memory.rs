use anyhow::{anyhow, Result};
use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard};
use tracing::debug;

use super::secret_backend::{PutReceipt, SecretBackend, SecretPage, SecretRef};

/// In-process secret store, paging through secrets in name order.
///
/// Continuation tokens are the offset of the next entry. Each put bumps a
/// per-secret version counter so callers can tell whether anything was written.
#[derive(Debug, Default)]
pub struct MemoryBackend {
    secrets: Mutex<BTreeMap<String, StoredSecret>>,
}

#[derive(Debug, Clone)]
struct StoredSecret {
    value: String,
    version: u64,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store holding the given name/value pairs
    pub fn with_secrets<I, K, V>(secrets: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let secrets = secrets
            .into_iter()
            .map(|(k, v)| {
                (
                    k.into(),
                    StoredSecret {
                        value: v.into(),
                        version: 1,
                    },
                )
            })
            .collect();

        Self {
            secrets: Mutex::new(secrets),
        }
    }

    /// Current string value of a secret
    pub fn secret_string(&self, name: &str) -> Option<String> {
        self.lock().ok()?.get(name).map(|s| s.value.clone())
    }

    /// Number of versions written for a secret, including the initial one
    pub fn version_count(&self, name: &str) -> u64 {
        self.lock()
            .ok()
            .and_then(|secrets| secrets.get(name).map(|s| s.version))
            .unwrap_or(0)
    }

    fn lock(&self) -> Result<MutexGuard<'_, BTreeMap<String, StoredSecret>>> {
        self.secrets
            .lock()
            .map_err(|_| anyhow!("In-memory secret store lock poisoned"))
    }
}

fn arn_for(name: &str) -> String {
    format!("arn:memory:secretsmanager:local:000000000000:secret:{}", name)
}

#[async_trait::async_trait]
impl SecretBackend for MemoryBackend {
    async fn get_secret_value(&self, secret_id: &str) -> Result<String> {
        self.lock()?
            .get(secret_id)
            .map(|s| s.value.clone())
            .ok_or_else(|| anyhow!("Secret '{}' not found", secret_id))
    }

    async fn list_secrets(
        &self,
        max_results: i32,
        next_token: Option<String>,
    ) -> Result<SecretPage> {
        let start = match next_token {
            Some(token) => token
                .parse::<usize>()
                .map_err(|_| anyhow!("Invalid next token: {}", token))?,
            None => 0,
        };
        let page_size = usize::try_from(max_results.max(1))?;

        let secrets = self.lock()?;
        let page: Vec<SecretRef> = secrets
            .keys()
            .skip(start)
            .take(page_size)
            .map(|name| SecretRef {
                name: name.clone(),
                arn: arn_for(name),
            })
            .collect();

        let end = start + page.len();
        let next_token = (end < secrets.len()).then(|| end.to_string());
        debug!("Listed {} in-memory secrets, next token {:?}", page.len(), next_token);

        Ok(SecretPage {
            secrets: page,
            next_token,
        })
    }

    async fn put_secret_value(&self, secret_id: &str, secret_string: &str) -> Result<PutReceipt> {
        let mut secrets = self.lock()?;
        let stored = secrets
            .get_mut(secret_id)
            .ok_or_else(|| anyhow!("Secret '{}' not found", secret_id))?;

        stored.value = secret_string.to_string();
        stored.version += 1;

        Ok(PutReceipt {
            arn: Some(arn_for(secret_id)),
            version_id: Some(stored.version.to_string()),
        })
    }

    fn backend_type(&self) -> &'static str {
        "in-memory"
    }
}

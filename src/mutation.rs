//! Editing a secret payload with `key=value` / `key-` tokens

use anyhow::{Context, Result};
use serde_json::Value;
use std::collections::BTreeMap;
use tracing::{debug, info, warn};

use crate::backends::{PutReceipt, SecretBackend};
use crate::error::SecretsError;
use crate::payload::{self, Payload};

/// Keys to set and keys to delete. A key never appears in both.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Mutation {
    pub add: BTreeMap<String, String>,
    pub remove: Vec<String>,
}

/// Result of a read-modify-write on one secret
#[derive(Debug, Clone)]
pub struct UpdateOutcome {
    pub payload: Payload,
    /// None when nothing was written
    pub receipt: Option<PutReceipt>,
}

/// Parse `key=value` (set) and `key-` (delete) tokens.
///
/// The value is everything after the first `=`, so `a=b=c` sets `a` to `b=c`
/// and `a=x-` sets `a` to `x-`.
pub fn parse_mutations<S: AsRef<str>>(tokens: &[S]) -> Result<Mutation, SecretsError> {
    let mut mutation = Mutation::default();

    for token in tokens {
        let token = token.as_ref();
        if let Some((key, value)) = token.split_once('=') {
            mutation.add.insert(key.to_string(), value.to_string());
        } else if let Some(key) = token.strip_suffix('-') {
            mutation.remove.push(key.to_string());
        } else {
            return Err(SecretsError::InvalidToken(token.to_string()));
        }
    }

    if let Some(key) = mutation
        .remove
        .iter()
        .find(|key| mutation.add.contains_key(*key))
    {
        return Err(SecretsError::Conflict(key.clone()));
    }

    Ok(mutation)
}

/// Apply a mutation to a payload. On error the payload is dropped.
pub fn apply_mutations(mut payload: Payload, mutation: &Mutation) -> Result<Payload, SecretsError> {
    for (key, value) in &mutation.add {
        if !payload.contains_key(key) {
            warn!("Key {} doesn't exist, adding it", key);
        }
        payload.insert(key.clone(), Value::String(value.clone()));
    }

    for key in &mutation.remove {
        if payload.remove(key).is_none() {
            return Err(SecretsError::MissingKey(key.clone()));
        }
    }

    Ok(payload)
}

/// Fetch a secret, apply the mutation and, unless `dry_run`, write it back
pub async fn update_secret(
    backend: &dyn SecretBackend,
    name: &str,
    mutation: &Mutation,
    dry_run: bool,
) -> Result<UpdateOutcome> {
    let current = payload::fetch_payload(backend, name)
        .await
        .with_context(|| format!("Failed to read secret '{}'", name))?;

    let updated = apply_mutations(current, mutation)?;
    let secret_string = payload::encode_payload(&updated)?;

    if dry_run {
        info!("Dry run, not writing secret '{}'", name);
        return Ok(UpdateOutcome {
            payload: updated,
            receipt: None,
        });
    }

    debug!(
        "Writing {} keys to '{}' ({} set, {} removed)",
        updated.len(),
        name,
        mutation.add.len(),
        mutation.remove.len()
    );

    let receipt = backend
        .put_secret_value(name, &secret_string)
        .await
        .with_context(|| format!("Failed to write secret '{}'", name))?;

    Ok(UpdateOutcome {
        payload: updated,
        receipt: Some(receipt),
    })
}

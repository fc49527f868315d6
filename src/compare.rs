use anyhow::{Context, Result};
use std::collections::BTreeMap;
use tracing::debug;

use crate::backends::SecretBackend;
use crate::payload::{self, render_value, Payload};

/// `"key=<value in A>"` -> `"key=<value in B>"`
pub type Diff = BTreeMap<String, String>;

/// Keys of `a` whose value differs in `b`, including keys `b` lacks.
///
/// Values are compared by their rendered text, so `1` and `"1"` are equal.
/// Keys only present in `b` are not reported; compare the other way for those.
pub fn compare_payloads(a: &Payload, b: &Payload) -> Diff {
    a.iter()
        .filter_map(|(key, a_value)| {
            let a_text = render_value(a_value);
            let b_text = b.get(key).map(render_value);
            if b_text.as_deref() == Some(a_text.as_str()) {
                return None;
            }
            Some((
                format!("{}={}", key, a_text),
                format!("{}={}", key, b_text.unwrap_or_default()),
            ))
        })
        .collect()
}

/// Fetch two secrets and diff them in both directions: (A -> B, B -> A)
pub async fn compare_secrets(
    backend: &dyn SecretBackend,
    name_a: &str,
    name_b: &str,
) -> Result<(Diff, Diff)> {
    let a = payload::fetch_payload(backend, name_a)
        .await
        .with_context(|| format!("Failed to read secret '{}'", name_a))?;
    let b = payload::fetch_payload(backend, name_b)
        .await
        .with_context(|| format!("Failed to read secret '{}'", name_b))?;

    let forward = compare_payloads(&a, &b);
    let backward = compare_payloads(&b, &a);
    debug!(
        "{} -> {}: {} differences, {} -> {}: {} differences",
        name_a,
        name_b,
        forward.len(),
        name_b,
        name_a,
        backward.len()
    );

    Ok((forward, backward))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backends::MemoryBackend;
    use serde_json::json;

    fn payload_of(pairs: &[(&str, &str)]) -> Payload {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), json!(v)))
            .collect()
    }

    #[test]
    fn test_changed_value() {
        let a = payload_of(&[("a", "1"), ("b", "2")]);
        let b = payload_of(&[("a", "1"), ("b", "3")]);

        let diff = compare_payloads(&a, &b);
        assert_eq!(diff.len(), 1);
        assert_eq!(diff.get("b=2").map(String::as_str), Some("b=3"));
    }

    #[test]
    fn test_identical_payloads() {
        let a = payload_of(&[("a", "1")]);
        assert!(compare_payloads(&a, &a.clone()).is_empty());
    }

    #[test]
    fn test_key_missing_from_b() {
        let a = payload_of(&[("only_a", "x")]);
        let b = Payload::new();

        let diff = compare_payloads(&a, &b);
        assert_eq!(diff.get("only_a=x").map(String::as_str), Some("only_a="));

        // the reverse direction has nothing to report
        assert!(compare_payloads(&b, &a).is_empty());
    }

    #[test]
    fn test_empty_value_versus_missing_key() {
        let a = payload_of(&[("k", "")]);
        let diff = compare_payloads(&a, &Payload::new());
        assert_eq!(diff.get("k=").map(String::as_str), Some("k="));
    }

    #[test]
    fn test_non_string_values_compare_as_text() {
        let mut a = Payload::new();
        a.insert("port".to_string(), json!(5432));
        a.insert("tls".to_string(), json!(true));
        let mut b = Payload::new();
        b.insert("port".to_string(), json!("5432"));
        b.insert("tls".to_string(), json!(false));

        let diff = compare_payloads(&a, &b);
        assert_eq!(diff.len(), 1);
        assert_eq!(diff.get("tls=true").map(String::as_str), Some("tls=false"));
    }

    #[tokio::test]
    async fn test_compare_secrets_both_ways() {
        let backend = MemoryBackend::with_secrets([
            ("staging", r#"{"host":"stg","user":"app","debug":"1"}"#),
            ("prod", r#"{"host":"prd","user":"app","replica":"r1"}"#),
        ]);

        let (forward, backward) = compare_secrets(&backend, "staging", "prod").await.unwrap();

        assert_eq!(forward.len(), 2);
        assert_eq!(forward.get("host=stg").map(String::as_str), Some("host=prd"));
        assert_eq!(forward.get("debug=1").map(String::as_str), Some("debug="));

        assert_eq!(backward.len(), 2);
        assert_eq!(backward.get("host=prd").map(String::as_str), Some("host=stg"));
        assert_eq!(backward.get("replica=r1").map(String::as_str), Some("replica="));
    }

    #[tokio::test]
    async fn test_compare_fails_when_either_secret_missing() {
        let backend = MemoryBackend::with_secrets([("a", "{}")]);

        let err = compare_secrets(&backend, "a", "b").await.unwrap_err();
        assert!(err.to_string().contains("'b'"));

        let err = compare_secrets(&backend, "b", "a").await.unwrap_err();
        assert!(err.to_string().contains("'b'"));
    }
}

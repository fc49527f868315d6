use anyhow::{Context, Result};
use tracing::debug;

use crate::backends::{SecretBackend, SecretRef};

/// List every secret, following continuation tokens until the service stops
/// returning one.
pub async fn list_all_secrets(
    backend: &dyn SecretBackend,
    max_results: i32,
) -> Result<Vec<SecretRef>> {
    let mut secrets = Vec::new();
    let mut next_token: Option<String> = None;

    loop {
        let page = backend
            .list_secrets(max_results, next_token.take())
            .await
            .context("Failed to list secrets")?;

        secrets.extend(page.secrets);

        // An empty token would only ask for the first page again.
        next_token = page.next_token.filter(|t| !t.is_empty());
        debug!(
            "Listed {} secrets so far, next token: {:?}",
            secrets.len(),
            next_token
        );

        if next_token.is_none() {
            break;
        }
    }

    debug!(
        "Listed {} secrets from {}",
        secrets.len(),
        backend.backend_type()
    );
    Ok(secrets)
}

/// Names of every secret, in listing order
pub async fn secret_names(backend: &dyn SecretBackend, max_results: i32) -> Result<Vec<String>> {
    Ok(list_all_secrets(backend, max_results)
        .await?
        .into_iter()
        .map(|s| s.name)
        .collect())
}

pub fn sort_by_name(secrets: &mut [SecretRef]) {
    secrets.sort_by(|a, b| a.name.cmp(&b.name));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backends::{MemoryBackend, PutReceipt, SecretPage};
    use std::collections::HashMap;
    use std::sync::Mutex;

    /// Serves fixed pages keyed by the token that requests them
    struct ScriptedPages {
        pages: HashMap<Option<String>, SecretPage>,
        requested: Mutex<Vec<Option<String>>>,
    }

    impl ScriptedPages {
        fn new(pages: Vec<(Option<&str>, Vec<&str>, Option<&str>)>) -> Self {
            let pages = pages
                .into_iter()
                .map(|(token, names, next)| {
                    let secrets = names
                        .into_iter()
                        .map(|n| SecretRef {
                            name: n.to_string(),
                            arn: format!("arn:{}", n),
                        })
                        .collect();
                    (
                        token.map(String::from),
                        SecretPage {
                            secrets,
                            next_token: next.map(String::from),
                        },
                    )
                })
                .collect();

            Self {
                pages,
                requested: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait::async_trait]
    impl SecretBackend for ScriptedPages {
        async fn get_secret_value(&self, secret_id: &str) -> Result<String> {
            anyhow::bail!("no secret {}", secret_id)
        }

        async fn list_secrets(
            &self,
            _max_results: i32,
            next_token: Option<String>,
        ) -> Result<SecretPage> {
            self.requested.lock().unwrap().push(next_token.clone());
            self.pages
                .get(&next_token)
                .cloned()
                .ok_or_else(|| anyhow::anyhow!("InvalidNextTokenException: {:?}", next_token))
        }

        async fn put_secret_value(&self, _secret_id: &str, _value: &str) -> Result<PutReceipt> {
            anyhow::bail!("read only")
        }

        fn backend_type(&self) -> &'static str {
            "scripted"
        }
    }

    #[tokio::test]
    async fn test_concatenates_pages_in_order() {
        let backend = ScriptedPages::new(vec![
            (None, vec!["one", "two"], Some("T1")),
            (Some("T1"), vec!["three"], Some("T2")),
            (Some("T2"), vec!["four", "five"], Some("T3")),
            (Some("T3"), vec!["six"], None),
        ]);

        let secrets = list_all_secrets(&backend, 2).await.unwrap();
        let names: Vec<_> = secrets.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["one", "two", "three", "four", "five", "six"]);
        assert_eq!(secrets[2].arn, "arn:three");

        let requested = backend.requested.lock().unwrap().clone();
        assert_eq!(
            requested,
            vec![
                None,
                Some("T1".to_string()),
                Some("T2".to_string()),
                Some("T3".to_string())
            ]
        );
    }

    #[tokio::test]
    async fn test_single_page() {
        let backend = ScriptedPages::new(vec![(None, vec!["only"], None)]);
        let secrets = list_all_secrets(&backend, 100).await.unwrap();
        assert_eq!(secrets.len(), 1);
    }

    #[tokio::test]
    async fn test_page_failure_aborts() {
        // T1 points at a page that does not exist
        let backend = ScriptedPages::new(vec![(None, vec!["a"], Some("T1"))]);
        let err = list_all_secrets(&backend, 100).await.unwrap_err();
        assert!(err.to_string().contains("Failed to list secrets"));
    }

    #[tokio::test]
    async fn test_empty_token_ends_listing() {
        let backend = ScriptedPages::new(vec![(None, vec!["a", "b"], Some(""))]);
        let secrets = list_all_secrets(&backend, 100).await.unwrap();
        assert_eq!(secrets.len(), 2);
        assert_eq!(backend.requested.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_secret_names_over_many_pages() {
        let backend = MemoryBackend::with_secrets((0..25).map(|i| (format!("s{:02}", i), "{}")));
        let names = secret_names(&backend, 4).await.unwrap();
        assert_eq!(names.len(), 25);
        assert_eq!(names.first().map(String::as_str), Some("s00"));
        assert_eq!(names.last().map(String::as_str), Some("s24"));
    }

    #[test]
    fn test_sort_by_name() {
        let mut secrets = vec![
            SecretRef {
                name: "zeta".into(),
                arn: "arn:z".into(),
            },
            SecretRef {
                name: "alpha".into(),
                arn: "arn:a".into(),
            },
        ];
        sort_by_name(&mut secrets);
        assert_eq!(secrets[0].name, "alpha");
        assert_eq!(secrets[1].name, "zeta");
    }
}

//! Secret backend implementations
//!
//! `SecretBackend` is the get/list/put capability the commands run against.
//! `AwsSecretsClient` talks to AWS Secrets Manager; `MemoryBackend` keeps
//! everything in process and stands in for it in tests.

mod aws_secrets;
mod memory;
mod secret_backend;

pub use aws_secrets::AwsSecretsClient;
pub use memory::MemoryBackend;
pub use secret_backend::{PutReceipt, SecretBackend, SecretPage, SecretRef};

/// Type alias for backend trait object
pub type Backend = Box<dyn SecretBackend>;

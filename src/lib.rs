//! secretsm
//!
//! List, read, edit and compare AWS Secrets Manager secrets whose values are
//! JSON key/value objects.

pub mod backends;
pub mod cli;
pub mod compare;
pub mod config;
pub mod error;
pub mod listing;
pub mod mutation;
pub mod output;
pub mod payload;

pub use backends::{Backend, SecretBackend};
pub use config::Config;
pub use error::SecretsError;

//! secret2es Convert - Secret to ExternalSecret converter
//!
//! This crate turns Kubernetes Secrets written for argocd-vault-plugin
//! into `external-secrets.io/v1beta1` ExternalSecrets. The Secret names its
//! vault location with the `avp.kubernetes.io/path` annotation and marks
//! the values to fetch with angle-bracket placeholders:
//!
//! | Secret value                 | ExternalSecret template              |
//! |------------------------------|--------------------------------------|
//! | `<password>`                 | `"{{ .password }}"`                  |
//! | `postgres://<user>@db`       | `"postgres://{{ .user }}@db"`        |
//! | `<% ENV %>-<name>`           | `"<% ENV %>-{{ .name }}"`            |
//! | `<<% ENV %>_PASSWORD>`       | `"{{ .prod_PASSWORD }}"` (resolved)  |
//!
//! Every placeholder becomes a remote reference to the property of the same
//! name under the vault key derived from the annotation.
//!
//! # Example
//!
//! ```no_run
//! use std::collections::HashMap;
//! use secret2es_convert::{ConvertOptions, SecretStoreRef, StoreKind, convert_with_env};
//!
//! let input = std::fs::read_to_string("secrets.yaml").unwrap();
//! let options = ConvertOptions {
//!     store: SecretStoreRef {
//!         name: "vault-backend".to_string(),
//!         kind: StoreKind::ClusterSecretStore,
//!     },
//!     resolve_env: true,
//!     ..ConvertOptions::default()
//! };
//! let env: HashMap<String, String> = [("ENV".to_string(), "prod".to_string())].into();
//!
//! let result = convert_with_env(&input, options, env).unwrap();
//! print!("{}", result.output);
//!
//! for warning in &result.warnings {
//!     eprintln!("{warning}");
//! }
//! ```
//!
//! # Supported Secret types
//!
//! - `Opaque` (the default when `type` is omitted)
//! - `kubernetes.io/basic-auth`
//! - `kubernetes.io/dockerconfigjson`
//! - `kubernetes.io/tls`

pub mod converter;
pub mod document;
pub mod env;
pub mod error;
pub mod external_secret;
pub mod generator;
pub mod secret;
pub mod template;
pub mod validate;
pub mod vault;

// Re-exports
pub use converter::{ConversionResult, ConvertOptions, Converter, convert, convert_with_env};
pub use env::{EnvSource, ProcessEnv, resolve_env};
pub use error::{ConversionWarning, ConvertError, Result};
pub use external_secret::{
    CreationPolicy, DecodingStrategy, ExternalSecret, MergePolicy, RemoteReference,
    SecretStoreRef, StoreKind,
};
pub use secret::{InputSecret, SecretPayload, SecretType, VAULT_PATH_ANNOTATION};

//! Per-type ExternalSecret generators
//!
//! [`generate`] validates a Secret, resolves its environment placeholders
//! when asked to, narrows it to a [`SecretPayload`] and hands the payload
//! to the generator for its type. Every generator produces the same two
//! things: the remote references to fetch and the template data rendering
//! them.

mod basic_auth;
mod docker_config_json;
mod opaque;
mod tls;

use indexmap::IndexMap;

use crate::converter::ConvertOptions;
use crate::env::{self, EnvSource};
use crate::error::{ConvertError, Result};
use crate::external_secret::{
    API_VERSION, DecodingStrategy, DeletionPolicy, ExternalSecret, ExternalSecretMetadata,
    ExternalSecretSpec, ExternalSecretTarget, ExternalSecretTemplate, KIND, MergePolicy,
    RemoteReference,
};
use crate::secret::{InputSecret, SecretPayload, VAULT_PATH_ANNOTATION};
use crate::validate::validate;
use crate::vault;

/// References and template data produced for one Secret
#[derive(Debug, Default)]
pub(crate) struct Generated {
    /// Vault key shared by every reference of the Secret
    remote_key: String,
    pub references: Vec<RemoteReference>,
    pub template: IndexMap<String, String>,
}

impl Generated {
    fn new(remote_key: &str) -> Self {
        Self {
            remote_key: remote_key.to_string(),
            ..Self::default()
        }
    }

    /// Add a reference unless one with the same property already exists
    fn reference(&mut self, property: &str, decoding: DecodingStrategy) {
        if self.references.iter().any(|r| r.property() == property) {
            return;
        }
        self.references
            .push(RemoteReference::new(&self.remote_key, property, decoding));
    }

    fn set_decoding(&mut self, decoding: DecodingStrategy) {
        for reference in &mut self.references {
            reference.remote_ref.decoding_strategy = decoding;
        }
    }
}

/// Convert one Secret into an ExternalSecret
pub fn generate<E>(secret: &InputSecret, options: &ConvertOptions, env: &E) -> Result<ExternalSecret>
where
    E: EnvSource + ?Sized,
{
    validate(secret)?;

    let resolved;
    let secret = if options.resolve_env {
        resolved = resolve_secret(secret, env)?;
        &resolved
    } else {
        secret
    };

    let name = secret.name();
    let path = secret
        .vault_path()
        .ok_or_else(|| ConvertError::MissingVaultPath {
            secret: name.to_string(),
        })?;
    let remote_key = vault::remote_key(path)?;

    let payload = SecretPayload::from_secret(secret)?;
    let generated = match payload {
        SecretPayload::Opaque(fields) => opaque::generate(name, &remote_key, fields)?,
        SecretPayload::BasicAuth(string_data) => basic_auth::generate(&remote_key, string_data)?,
        SecretPayload::DockerConfigJson(config) => {
            docker_config_json::generate(name, &remote_key, config)?
        }
        SecretPayload::Tls(fields) => tls::generate(name, &remote_key, fields)?,
    };

    if generated.references.is_empty() {
        return Err(ConvertError::NoReferencesFound {
            secret: name.to_string(),
        });
    }

    let template_type = payload.template_type();
    tracing::debug!(
        secret = name,
        secret_type = %template_type,
        references = generated.references.len(),
        "generated ExternalSecret"
    );

    Ok(ExternalSecret {
        api_version: API_VERSION.to_string(),
        kind: KIND.to_string(),
        metadata: ExternalSecretMetadata {
            name: name.to_string(),
            namespace: secret.metadata.namespace.clone(),
            labels: secret.metadata.labels.clone(),
        },
        spec: ExternalSecretSpec {
            refresh_interval: options.refresh_interval,
            secret_store_ref: options.store.clone(),
            target: ExternalSecretTarget {
                name: name.to_string(),
                creation_policy: options.creation_policy,
                deletion_policy: DeletionPolicy::Retain,
                template: ExternalSecretTemplate {
                    merge_policy: MergePolicy::for_type(&template_type),
                    secret_type: template_type,
                    data: generated.template,
                },
            },
            data: generated.references,
        },
    })
}

/// Copy of `secret` with `<% NAME %>` substituted in the vault path and
/// every data value
fn resolve_secret<E>(secret: &InputSecret, env: &E) -> Result<InputSecret>
where
    E: EnvSource + ?Sized,
{
    let mut resolved = secret.clone();

    if let Some(path) = resolved.metadata.annotations.get_mut(VAULT_PATH_ANNOTATION) {
        *path = env::resolve_env(path, env, true)?;
    }
    for value in resolved
        .data
        .values_mut()
        .chain(resolved.string_data.values_mut())
    {
        *value = env::resolve_env(value, env, true)?;
    }

    Ok(resolved)
}

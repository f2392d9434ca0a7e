//! ExternalSecret output model (`external-secrets.io/v1beta1`)

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use crate::error::ConvertError;
use crate::secret::SecretType;

pub const API_VERSION: &str = "external-secrets.io/v1beta1";
pub const KIND: &str = "ExternalSecret";

/// The generated ExternalSecret
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExternalSecret {
    pub api_version: String,
    pub kind: String,
    pub metadata: ExternalSecretMetadata,
    pub spec: ExternalSecretSpec,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExternalSecretMetadata {
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub namespace: Option<String>,

    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub labels: IndexMap<String, String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExternalSecretSpec {
    #[serde(with = "humantime_serde")]
    pub refresh_interval: Duration,
    pub secret_store_ref: SecretStoreRef,
    pub target: ExternalSecretTarget,
    pub data: Vec<RemoteReference>,
}

/// Store the ExternalSecret reads from
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SecretStoreRef {
    pub name: String,
    pub kind: StoreKind,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExternalSecretTarget {
    pub name: String,
    pub creation_policy: CreationPolicy,
    pub deletion_policy: DeletionPolicy,
    pub template: ExternalSecretTemplate,
}

/// Template rendered into the target Secret
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExternalSecretTemplate {
    #[serde(rename = "type")]
    pub secret_type: SecretType,
    pub merge_policy: MergePolicy,
    pub data: IndexMap<String, String>,
}

/// One value fetched from the store.
///
/// The local key (`secretKey`) is always the remote property, which is the
/// name templates use to refer to the fetched value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoteReference {
    pub secret_key: String,
    pub remote_ref: RemoteRef,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoteRef {
    pub key: String,
    pub property: String,
    pub conversion_strategy: ConversionStrategy,
    pub decoding_strategy: DecodingStrategy,
    pub metadata_policy: MetadataPolicy,
}

impl RemoteReference {
    pub fn new(key: &str, property: &str, decoding_strategy: DecodingStrategy) -> Self {
        Self {
            secret_key: property.to_string(),
            remote_ref: RemoteRef {
                key: key.to_string(),
                property: property.to_string(),
                conversion_strategy: ConversionStrategy::Default,
                decoding_strategy,
                metadata_policy: MetadataPolicy::None,
            },
        }
    }

    pub fn property(&self) -> &str {
        &self.remote_ref.property
    }
}

// =============================================================================
// ENUMS
// =============================================================================

/// Kind of the referenced store
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StoreKind {
    SecretStore,
    #[default]
    ClusterSecretStore,
}

impl FromStr for StoreKind {
    type Err = ConvertError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "SecretStore" => Ok(Self::SecretStore),
            "ClusterSecretStore" => Ok(Self::ClusterSecretStore),
            other => Err(ConvertError::IllegalStoreKind(other.to_string())),
        }
    }
}

impl fmt::Display for StoreKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SecretStore => f.write_str("SecretStore"),
            Self::ClusterSecretStore => f.write_str("ClusterSecretStore"),
        }
    }
}

/// What external-secrets does with the target Secret it creates
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CreationPolicy {
    Owner,
    #[default]
    Orphan,
    Merge,
}

impl FromStr for CreationPolicy {
    type Err = ConvertError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Owner" => Ok(Self::Owner),
            "Orphan" => Ok(Self::Orphan),
            "Merge" => Ok(Self::Merge),
            other => Err(ConvertError::IllegalCreationPolicy(other.to_string())),
        }
    }
}

impl fmt::Display for CreationPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Owner => f.write_str("Owner"),
            Self::Orphan => f.write_str("Orphan"),
            Self::Merge => f.write_str("Merge"),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum DeletionPolicy {
    #[default]
    Retain,
    Delete,
    Merge,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum MergePolicy {
    #[default]
    Replace,
    Merge,
}

impl MergePolicy {
    /// Opaque and TLS templates replace the target; credential types merge into it
    pub fn for_type(secret_type: &SecretType) -> Self {
        match secret_type {
            SecretType::BasicAuth | SecretType::DockerConfigJson => Self::Merge,
            _ => Self::Replace,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum DecodingStrategy {
    #[default]
    None,
    Base64,
    #[serde(rename = "Base64URL")]
    Base64Url,
    Auto,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConversionStrategy {
    #[default]
    Default,
    Unicode,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum MetadataPolicy {
    #[default]
    None,
    Fetch,
}

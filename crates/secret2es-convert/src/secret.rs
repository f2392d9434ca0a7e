//! Input Secret model
//!
//! The Secret is decoded leniently: `data` values are kept as raw strings
//! because they hold `<placeholder>` text rather than real base64.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::{ConvertError, Result};

/// Annotation holding the vault path of a Secret
pub const VAULT_PATH_ANNOTATION: &str = "avp.kubernetes.io/path";

/// Well-known keys of a `kubernetes.io/basic-auth` Secret
pub const BASIC_AUTH_USERNAME_KEY: &str = "username";
pub const BASIC_AUTH_PASSWORD_KEY: &str = "password";

/// Single key of a `kubernetes.io/dockerconfigjson` Secret
pub const DOCKER_CONFIG_JSON_KEY: &str = ".dockerconfigjson";

/// Kubernetes Secret with vault placeholders
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InputSecret {
    #[serde(default)]
    pub api_version: String,

    #[serde(default)]
    pub kind: String,

    #[serde(default)]
    pub metadata: SecretMetadata,

    /// Secret type; defaults to Opaque like the API server does
    #[serde(default, rename = "type")]
    pub secret_type: SecretType,

    /// base64 fields, in document order
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub data: IndexMap<String, String>,

    /// plain-text fields, in document order
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub string_data: IndexMap<String, String>,
}

/// The subset of ObjectMeta the converter cares about
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct SecretMetadata {
    #[serde(default)]
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub namespace: Option<String>,

    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub labels: IndexMap<String, String>,

    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub annotations: IndexMap<String, String>,
}

impl InputSecret {
    pub fn name(&self) -> &str {
        &self.metadata.name
    }

    /// The `avp.kubernetes.io/path` annotation, if set and non-empty
    pub fn vault_path(&self) -> Option<&str> {
        self.metadata
            .annotations
            .get(VAULT_PATH_ANNOTATION)
            .map(String::as_str)
            .filter(|path| !path.is_empty())
    }

    /// Iterate over every value of `data` and `stringData`
    pub fn values(&self) -> impl Iterator<Item = &str> {
        self.data
            .values()
            .chain(self.string_data.values())
            .map(String::as_str)
    }
}

// =============================================================================
// SECRET TYPE
// =============================================================================

/// Secret types the converter understands
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(from = "String", into = "String")]
pub enum SecretType {
    #[default]
    Opaque,
    BasicAuth,
    DockerConfigJson,
    Tls,
    /// Any other type string, kept for the error message
    Unsupported(String),
}

impl SecretType {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Opaque => "Opaque",
            Self::BasicAuth => "kubernetes.io/basic-auth",
            Self::DockerConfigJson => "kubernetes.io/dockerconfigjson",
            Self::Tls => "kubernetes.io/tls",
            Self::Unsupported(raw) => raw,
        }
    }
}

impl From<String> for SecretType {
    fn from(raw: String) -> Self {
        match raw.as_str() {
            "" | "Opaque" => Self::Opaque,
            "kubernetes.io/basic-auth" => Self::BasicAuth,
            "kubernetes.io/dockerconfigjson" => Self::DockerConfigJson,
            "kubernetes.io/tls" => Self::Tls,
            _ => Self::Unsupported(raw),
        }
    }
}

impl From<SecretType> for String {
    fn from(secret_type: SecretType) -> Self {
        secret_type.as_str().to_string()
    }
}

impl std::fmt::Display for SecretType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// PAYLOAD
// =============================================================================

/// Which of the two data fields carries the values
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SecretFields<'a> {
    Data(&'a IndexMap<String, String>),
    StringData(&'a IndexMap<String, String>),
}

impl<'a> SecretFields<'a> {
    /// Pick whichever field is populated, preferring `data`
    fn of(secret: &'a InputSecret) -> Self {
        if secret.data.is_empty() {
            Self::StringData(&secret.string_data)
        } else {
            Self::Data(&secret.data)
        }
    }
}

/// A validated Secret, narrowed to the fields its type may use
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SecretPayload<'a> {
    Opaque(SecretFields<'a>),
    BasicAuth(&'a IndexMap<String, String>),
    DockerConfigJson(&'a str),
    Tls(SecretFields<'a>),
}

impl<'a> SecretPayload<'a> {
    /// Check the type-specific shape of `secret` and narrow it
    pub fn from_secret(secret: &'a InputSecret) -> Result<Self> {
        let name = secret.name();

        match &secret.secret_type {
            SecretType::Opaque => Ok(Self::Opaque(SecretFields::of(secret))),
            SecretType::Tls => Ok(Self::Tls(SecretFields::of(secret))),
            SecretType::BasicAuth => {
                if !secret.data.is_empty() {
                    return Err(ConvertError::DataFieldsNotAllowed {
                        secret: name.to_string(),
                    });
                }
                if is_blank(secret.string_data.get(BASIC_AUTH_USERNAME_KEY)) {
                    return Err(ConvertError::EmptyUsername {
                        secret: name.to_string(),
                    });
                }
                if is_blank(secret.string_data.get(BASIC_AUTH_PASSWORD_KEY)) {
                    return Err(ConvertError::EmptyPassword {
                        secret: name.to_string(),
                    });
                }
                Ok(Self::BasicAuth(&secret.string_data))
            }
            SecretType::DockerConfigJson => {
                let config = match (secret.data.is_empty(), secret.string_data.len()) {
                    (true, 1) => secret.string_data.get(DOCKER_CONFIG_JSON_KEY),
                    _ => None,
                };
                config
                    .map(|config| Self::DockerConfigJson(config.as_str()))
                    .ok_or_else(|| ConvertError::DockerConfigJsonShape {
                        secret: name.to_string(),
                    })
            }
            SecretType::Unsupported(raw) => Err(ConvertError::UnsupportedSecretType {
                secret: name.to_string(),
                kind: raw.clone(),
            }),
        }
    }

    /// Secret type declared in the generated template
    pub fn template_type(&self) -> SecretType {
        match self {
            Self::Opaque(_) => SecretType::Opaque,
            Self::BasicAuth(_) => SecretType::BasicAuth,
            Self::DockerConfigJson(_) => SecretType::DockerConfigJson,
            Self::Tls(_) => SecretType::Tls,
        }
    }
}

fn is_blank(value: Option<&String>) -> bool {
    value.is_none_or(|v| v.is_empty())
}

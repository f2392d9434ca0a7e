//! Error and warning types for the converter
//!
//! Every failure is scoped to one Secret. The assembler downgrades the
//! recoverable ones (see [`ConvertError::is_recoverable`]) to
//! [`ConversionWarning`]s and keeps going with the next document.

use miette::Diagnostic;
use thiserror::Error;

/// Converter error
#[derive(Debug, Error, Diagnostic)]
pub enum ConvertError {
    // -------------------------------------------------------------------------
    // Structural validation
    // -------------------------------------------------------------------------
    #[error("not accept empty annotations of secret: {secret}")]
    #[diagnostic(
        code(secret2es::validation::empty_annotations),
        help("annotate the Secret with avp.kubernetes.io/path")
    )]
    EmptyAnnotations { secret: String },

    #[error("not found avp.kubernetes.io/path from secret: {secret}")]
    #[diagnostic(code(secret2es::validation::missing_vault_path))]
    MissingVaultPath { secret: String },

    #[error("not accept both data and stringData fields of secret: {secret}")]
    #[diagnostic(
        code(secret2es::validation::both_data_fields),
        help("move every entry into either data or stringData")
    )]
    BothDataFields { secret: String },

    #[error("not accept neither data and stringData fields of secret: {secret}")]
    #[diagnostic(code(secret2es::validation::neither_data_fields))]
    NeitherDataFields { secret: String },

    #[error("not include any angle brackets of secret: {secret}")]
    #[diagnostic(
        code(secret2es::validation::no_references),
        help("reference a vault property with <property-name>")
    )]
    NoReferencesFound { secret: String },

    // -------------------------------------------------------------------------
    // Resolution
    // -------------------------------------------------------------------------
    #[error("not set ENV: {0}")]
    #[diagnostic(code(secret2es::resolve::unset_env))]
    UnsetEnvVariable(String),

    #[error("illegal vault path: {0}")]
    #[diagnostic(
        code(secret2es::resolve::vault_path),
        help("the path must contain a 'data' segment followed by the secret key, e.g. secret/data/app")
    )]
    IllegalVaultPath(String),

    // -------------------------------------------------------------------------
    // Template syntax
    // -------------------------------------------------------------------------
    #[error("template syntax error: nested or unclosed '<' in {input:?}")]
    #[diagnostic(code(secret2es::syntax::nested_bracket))]
    NestedOrUnclosedBracket { input: String },

    #[error("template syntax error: unclosed '<' in {input:?}")]
    #[diagnostic(code(secret2es::syntax::unclosed_bracket))]
    UnclosedBracket { input: String },

    #[error("template syntax error: unterminated '<%' in {input:?}")]
    #[diagnostic(
        code(secret2es::syntax::unterminated_env),
        help("close environment placeholders with '%>'")
    )]
    UnterminatedEnvPlaceholder { input: String },

    // -------------------------------------------------------------------------
    // Unsupported shapes
    // -------------------------------------------------------------------------
    #[error("not support multiple value in data field {key} of secret: {secret}")]
    #[diagnostic(
        code(secret2es::shape::multiple_values),
        help("use stringData to combine several references in one value")
    )]
    MultipleValuesUnsupported { secret: String, key: String },

    #[error("kubernetes.io/basic-auth type should not allow set data fields: {secret}")]
    #[diagnostic(code(secret2es::shape::basic_auth_data))]
    DataFieldsNotAllowed { secret: String },

    #[error("basic auth secret with empty username: {secret}")]
    #[diagnostic(code(secret2es::shape::empty_username))]
    EmptyUsername { secret: String },

    #[error("basic auth secret with empty password: {secret}")]
    #[diagnostic(code(secret2es::shape::empty_password))]
    EmptyPassword { secret: String },

    #[error(
        "kubernetes.io/dockerconfigjson type should only accept one stringData value named .dockerconfigjson: {secret}"
    )]
    #[diagnostic(code(secret2es::shape::docker_config_json))]
    DockerConfigJsonShape { secret: String },

    #[error("invalid .dockerconfigjson of secret {secret}: {source}")]
    #[diagnostic(code(secret2es::shape::docker_config_json_parse))]
    InvalidDockerConfigJson {
        secret: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("not impl {kind} secret type of secret: {secret}")]
    #[diagnostic(code(secret2es::shape::unsupported_type))]
    UnsupportedSecretType { secret: String, kind: String },

    // -------------------------------------------------------------------------
    // Configuration
    // -------------------------------------------------------------------------
    #[error("illegal store type: {0}")]
    #[diagnostic(
        code(secret2es::config::store_kind),
        help("use SecretStore or ClusterSecretStore")
    )]
    IllegalStoreKind(String),

    #[error("illegal create policy: {0}, only support Owner, Orphan, Merge")]
    #[diagnostic(code(secret2es::config::creation_policy))]
    IllegalCreationPolicy(String),

    // -------------------------------------------------------------------------
    // Encoding
    // -------------------------------------------------------------------------
    #[error("error unmarshalling input secret: {0}")]
    #[diagnostic(code(secret2es::yaml))]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON error: {0}")]
    #[diagnostic(code(secret2es::json))]
    Json(#[from] serde_json::Error),
}

impl ConvertError {
    /// Errors that only skip the offending document in a multi-document stream
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Self::NoReferencesFound { .. } | Self::EmptyAnnotations { .. }
        )
    }

    /// Errors caused by malformed placeholder syntax
    pub fn is_syntax(&self) -> bool {
        matches!(
            self,
            Self::NestedOrUnclosedBracket { .. }
                | Self::UnclosedBracket { .. }
                | Self::UnterminatedEnvPlaceholder { .. }
        )
    }
}

/// Result type for conversion operations
pub type Result<T> = std::result::Result<T, ConvertError>;

// =============================================================================
// WARNINGS
// =============================================================================

/// A document that was skipped instead of aborting the conversion
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversionWarning {
    /// 1-based position of the Secret among the Secret documents of the input
    pub document: usize,
    /// Name of the skipped Secret
    pub secret: String,
    /// Human-readable reason
    pub message: String,
}

impl ConversionWarning {
    pub fn skipped(document: usize, secret: &str, err: &ConvertError) -> Self {
        Self {
            document,
            secret: secret.to_string(),
            message: err.to_string(),
        }
    }
}

impl std::fmt::Display for ConversionWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Error: {}", self.message)
    }
}

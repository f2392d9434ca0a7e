//! Main converter logic
//!
//! Orchestrates the conversion of a YAML stream of Secrets into
//! ExternalSecrets: parse, convert each Secret in order, downgrade the
//! recoverable failures to warnings and render the rest.

use std::time::Duration;

use crate::document;
use crate::env::{EnvSource, ProcessEnv};
use crate::error::{ConversionWarning, Result};
use crate::external_secret::{CreationPolicy, ExternalSecret, SecretStoreRef};
use crate::generator;
use crate::secret::InputSecret;

/// Options for the converter
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConvertOptions {
    /// Store every ExternalSecret reads from
    pub store: SecretStoreRef,
    /// Creation policy of the target Secret
    pub creation_policy: CreationPolicy,
    /// Substitute `<% NAME %>` placeholders from the environment
    pub resolve_env: bool,
    /// How often external-secrets refreshes; zero disables refreshing
    pub refresh_interval: Duration,
}

/// Result of a conversion
#[derive(Debug, Default)]
pub struct ConversionResult {
    /// Rendered ExternalSecrets, each document prefixed with `---`
    pub output: String,
    /// Names of the Secrets that were converted, in input order
    pub converted: Vec<String>,
    /// Secrets that were skipped
    pub warnings: Vec<ConversionWarning>,
}

impl ConversionResult {
    /// Warnings as one `Error: ...` line each
    pub fn warnings_text(&self) -> String {
        self.warnings
            .iter()
            .map(|warning| format!("{warning}\n"))
            .collect()
    }
}

/// Converts Secrets to ExternalSecrets
pub struct Converter<E = ProcessEnv> {
    options: ConvertOptions,
    env: E,
}

impl Converter<ProcessEnv> {
    /// Converter resolving placeholders from the process environment
    pub fn new(options: ConvertOptions) -> Self {
        Self::with_env(options, ProcessEnv)
    }
}

impl<E: EnvSource> Converter<E> {
    pub fn with_env(options: ConvertOptions, env: E) -> Self {
        Self { options, env }
    }

    pub fn options(&self) -> &ConvertOptions {
        &self.options
    }

    /// Convert a single, already decoded Secret
    pub fn convert_secret(&self, secret: &InputSecret) -> Result<ExternalSecret> {
        generator::generate(secret, &self.options, &self.env)
    }

    /// Convert every Secret document of a YAML stream
    pub fn convert(&self, content: &str) -> Result<ConversionResult> {
        let mut result = ConversionResult::default();

        for (index, secret) in document::parse_secrets(content)?.iter().enumerate() {
            match self.convert_secret(secret) {
                Ok(external_secret) => {
                    result.output.push_str(&document::render(&external_secret)?);
                    result.converted.push(secret.name().to_string());
                }
                Err(err) if err.is_recoverable() => {
                    tracing::debug!(secret = secret.name(), error = %err, "skipping secret");
                    result
                        .warnings
                        .push(ConversionWarning::skipped(index + 1, secret.name(), &err));
                }
                Err(err) => return Err(err),
            }
        }

        tracing::debug!(
            converted = result.converted.len(),
            skipped = result.warnings.len(),
            "conversion finished"
        );

        Ok(result)
    }
}

// =============================================================================
// Public API
// =============================================================================

/// Convert with placeholders resolved from the process environment
pub fn convert(content: &str, options: ConvertOptions) -> Result<ConversionResult> {
    Converter::new(options).convert(content)
}

/// Convert with an explicit environment
pub fn convert_with_env<E: EnvSource>(
    content: &str,
    options: ConvertOptions,
    env: E,
) -> Result<ConversionResult> {
    Converter::with_env(options, env).convert(content)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ConvertError;
    use crate::external_secret::StoreKind;
    use std::collections::HashMap;

    const INPUT: &str = r#"
apiVersion: v1
kind: Secret
metadata:
  name: input1
  annotations:
    avp.kubernetes.io/path: "secret/data/foo"
type: Opaque
data:
  dist: <dist-name-of-linux>
---
apiVersion: v1
kind: Secret
metadata:
  name: plain
  annotations:
    avp.kubernetes.io/path: "secret/data/foo"
stringData:
  mode: readonly
---
apiVersion: v1
kind: ConfigMap
metadata:
  name: ignored
---
apiVersion: v1
kind: Secret
metadata:
  name: unannotated
stringData:
  a: <A>
---
apiVersion: v1
kind: Secret
metadata:
  name: creds
  annotations:
    avp.kubernetes.io/path: "kv/data/team/app"
stringData:
  url: <% SCHEME %>://<USER>:<PASSWORD>@db
"#;

    fn options() -> ConvertOptions {
        ConvertOptions {
            store: SecretStoreRef {
                name: "vault-backend".to_string(),
                kind: StoreKind::SecretStore,
            },
            ..ConvertOptions::default()
        }
    }

    fn documents(output: &str) -> Vec<serde_yaml::Value> {
        serde_yaml::Deserializer::from_str(output)
            .map(|doc| serde::Deserialize::deserialize(doc).unwrap())
            .collect()
    }

    #[test]
    fn test_convert_stream() {
        let result = convert_with_env(INPUT, options(), HashMap::new()).unwrap();

        assert_eq!(result.converted, vec!["input1", "creds"]);
        assert!(result.output.starts_with("---\n"));

        let docs = documents(&result.output);
        assert_eq!(docs.len(), 2);

        let first = &docs[0];
        assert_eq!(first["kind"].as_str(), Some("ExternalSecret"));
        assert_eq!(first["spec"]["refreshInterval"].as_str(), Some("0s"));
        assert_eq!(first["spec"]["secretStoreRef"]["kind"].as_str(), Some("SecretStore"));
        assert_eq!(first["spec"]["target"]["creationPolicy"].as_str(), Some("Orphan"));
        assert_eq!(
            first["spec"]["target"]["template"]["data"]["dist"].as_str(),
            Some("{{ .dist-name-of-linux }}")
        );
        assert_eq!(
            first["spec"]["data"][0]["remoteRef"]["property"].as_str(),
            Some("dist-name-of-linux")
        );
        assert_eq!(first["spec"]["data"][0]["remoteRef"]["key"].as_str(), Some("foo"));

        let second = &docs[1];
        assert_eq!(
            second["spec"]["target"]["template"]["data"]["url"].as_str(),
            Some("<% SCHEME %>://{{ .USER }}:{{ .PASSWORD }}@db")
        );
        assert_eq!(second["spec"]["data"][1]["remoteRef"]["key"].as_str(), Some("team/app"));
    }

    #[test]
    fn test_quoted_template_rendered_double_quoted() {
        let result = convert_with_env(INPUT, options(), HashMap::new()).unwrap();
        assert!(result.output.contains(r#"dist: "{{ .dist-name-of-linux }}""#));
        assert!(!result.output.contains("'\""));
    }

    #[test]
    fn test_recoverable_errors_become_warnings() {
        let result = convert_with_env(INPUT, options(), HashMap::new()).unwrap();

        assert_eq!(result.warnings.len(), 2);
        assert_eq!(result.warnings[0].secret, "plain");
        assert_eq!(result.warnings[0].document, 2);
        assert_eq!(result.warnings[1].secret, "unannotated");
        assert_eq!(
            result.warnings_text(),
            "Error: not include any angle brackets of secret: plain\n\
             Error: not accept empty annotations of secret: unannotated\n"
        );
    }

    #[test]
    fn test_fatal_error_aborts_stream() {
        let input = format!(
            "{INPUT}---\nkind: Secret\nmetadata:\n  name: broken\n  annotations:\n    avp.kubernetes.io/path: secret/data/x\nstringData:\n  a: sn0rt-<A\n"
        );
        let err = convert_with_env(&input, options(), HashMap::new()).unwrap_err();
        assert!(matches!(err, ConvertError::UnclosedBracket { .. }));
    }

    #[test]
    fn test_resolve_with_env() {
        let env: HashMap<String, String> =
            [("SCHEME".to_string(), "postgres".to_string())].into_iter().collect();
        let options = ConvertOptions {
            resolve_env: true,
            ..options()
        };

        let result = convert_with_env(INPUT, options, &env).unwrap();
        let docs = documents(&result.output);
        assert_eq!(
            docs[1]["spec"]["target"]["template"]["data"]["url"].as_str(),
            Some("postgres://{{ .USER }}:{{ .PASSWORD }}@db")
        );
    }

    #[test]
    fn test_refresh_interval_rendered() {
        let options = ConvertOptions {
            refresh_interval: Duration::from_secs(3600),
            ..options()
        };
        let result = convert_with_env(INPUT, options, HashMap::new()).unwrap();
        assert!(result.output.contains("refreshInterval: 1h"));
    }

    #[test]
    fn test_empty_input() {
        let result = convert_with_env("", options(), HashMap::new()).unwrap();
        assert!(result.output.is_empty());
        assert!(result.warnings.is_empty());
    }
}

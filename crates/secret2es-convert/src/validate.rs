//! Manifest-level checks run before dispatching on the Secret type

use crate::error::{ConvertError, Result};
use crate::secret::InputSecret;
use crate::template;

/// Validate the parts of a Secret every generator relies on
pub fn validate(secret: &InputSecret) -> Result<()> {
    let name = || secret.name().to_string();

    if secret.metadata.annotations.is_empty() {
        return Err(ConvertError::EmptyAnnotations { secret: name() });
    }

    if secret.vault_path().is_none() {
        return Err(ConvertError::MissingVaultPath { secret: name() });
    }

    match (secret.data.is_empty(), secret.string_data.is_empty()) {
        (false, false) => return Err(ConvertError::BothDataFields { secret: name() }),
        (true, true) => return Err(ConvertError::NeitherDataFields { secret: name() }),
        _ => {}
    }

    if !secret.values().any(template::has_reference) {
        return Err(ConvertError::NoReferencesFound { secret: name() });
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn secret(yaml: &str) -> InputSecret {
        serde_yaml::from_str(yaml).unwrap()
    }

    const ANNOTATED: &str = "metadata:\n  name: s\n  annotations:\n    avp.kubernetes.io/path: secret/data/foo\n";

    #[test]
    fn test_valid_secret() {
        let s = secret(&format!("{ANNOTATED}data:\n  a: <b>\n"));
        assert!(validate(&s).is_ok());
    }

    #[test]
    fn test_empty_annotations() {
        let s = secret("metadata:\n  name: s\ndata:\n  a: <b>\n");
        assert!(matches!(
            validate(&s).unwrap_err(),
            ConvertError::EmptyAnnotations { ref secret } if secret == "s"
        ));
    }

    #[test]
    fn test_missing_vault_path() {
        let s = secret("metadata:\n  name: s\n  annotations:\n    other: x\ndata:\n  a: <b>\n");
        assert!(matches!(
            validate(&s).unwrap_err(),
            ConvertError::MissingVaultPath { .. }
        ));
    }

    #[test]
    fn test_data_field_presence() {
        let both = secret(&format!("{ANNOTATED}data:\n  a: <b>\nstringData:\n  c: <d>\n"));
        assert!(matches!(
            validate(&both).unwrap_err(),
            ConvertError::BothDataFields { .. }
        ));

        let neither = secret(ANNOTATED);
        assert!(matches!(
            validate(&neither).unwrap_err(),
            ConvertError::NeitherDataFields { .. }
        ));
    }

    #[test]
    fn test_no_references() {
        let s = secret(&format!("{ANNOTATED}stringData:\n  a: plain\n  b: <% ENV %>\n"));
        assert!(matches!(
            validate(&s).unwrap_err(),
            ConvertError::NoReferencesFound { .. }
        ));
    }

    #[test]
    fn test_malformed_syntax_counts_as_reference() {
        let s = secret(&format!("{ANNOTATED}stringData:\n  a: sn0rt-<A\n"));
        assert!(validate(&s).is_ok());
    }
}

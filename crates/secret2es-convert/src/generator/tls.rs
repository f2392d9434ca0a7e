//! `kubernetes.io/tls` Secrets
//!
//! Certificates stored under `data` may or may not be base64 in the vault,
//! so those references let external-secrets auto-detect the encoding.

use super::{Generated, opaque};
use crate::error::Result;
use crate::external_secret::DecodingStrategy;
use crate::secret::SecretFields;

pub(super) fn generate(secret: &str, remote_key: &str, fields: SecretFields<'_>) -> Result<Generated> {
    let mut generated = opaque::generate(secret, remote_key, fields)?;
    if matches!(fields, SecretFields::Data(_)) {
        generated.set_decoding(DecodingStrategy::Auto);
    }
    Ok(generated)
}

#[cfg(test)]
mod tests {
    use super::*;
    use indexmap::IndexMap;

    fn map(pairs: &[(&str, &str)]) -> IndexMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_data_uses_auto_decoding() {
        let data = map(&[("tls.crt", "<CERT>"), ("tls.key", "<KEY>")]);
        let generated = generate("tls", "certs/web", SecretFields::Data(&data)).unwrap();

        assert_eq!(generated.references.len(), 2);
        assert!(
            generated
                .references
                .iter()
                .all(|r| r.remote_ref.decoding_strategy == DecodingStrategy::Auto)
        );
        assert_eq!(generated.template["tls.crt"], r#""{{ .CERT }}""#);
    }

    #[test]
    fn test_string_data_keeps_plain_decoding() {
        let string_data = map(&[("tls.crt", "<CERT>")]);
        let generated =
            generate("tls", "certs/web", SecretFields::StringData(&string_data)).unwrap();

        assert_eq!(
            generated.references[0].remote_ref.decoding_strategy,
            DecodingStrategy::None
        );
    }
}

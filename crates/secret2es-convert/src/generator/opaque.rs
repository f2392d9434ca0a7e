//! Opaque Secrets, the base every other generator builds on

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use indexmap::IndexMap;

use super::Generated;
use crate::error::{ConvertError, Result};
use crate::external_secret::DecodingStrategy;
use crate::secret::SecretFields;
use crate::template;

pub(super) fn generate(secret: &str, remote_key: &str, fields: SecretFields<'_>) -> Result<Generated> {
    match fields {
        SecretFields::Data(data) => generate_data(secret, remote_key, data),
        SecretFields::StringData(string_data) => generate_string_data(remote_key, string_data),
    }
}

/// `data` values hold at most one reference each, fetched base64-decoded
fn generate_data(secret: &str, remote_key: &str, data: &IndexMap<String, String>) -> Result<Generated> {
    let mut generated = Generated::new(remote_key);

    for (key, value) in data {
        let rewritten = template::rewrite(value)?;

        let rendered = match rewritten.references.as_slice() {
            [] if STANDARD.decode(value).is_ok() => format!(r#"{{{{ "{value}" | b64dec }}}}"#),
            [] => value.clone(),
            [property] => {
                generated.reference(property, DecodingStrategy::Base64);
                template::quote_expressions(&rewritten.text)
            }
            _ => {
                return Err(ConvertError::MultipleValuesUnsupported {
                    secret: secret.to_string(),
                    key: key.clone(),
                });
            }
        };

        generated.template.insert(key.clone(), rendered);
    }

    Ok(generated)
}

/// `stringData` values may embed any number of references
pub(super) fn generate_string_data(
    remote_key: &str,
    string_data: &IndexMap<String, String>,
) -> Result<Generated> {
    let mut generated = Generated::new(remote_key);

    for (key, value) in string_data {
        let rewritten = template::rewrite(value)?;
        for property in &rewritten.references {
            generated.reference(property, DecodingStrategy::None);
        }

        // multi-line values are emitted as block scalars
        let rendered = if rewritten.text.contains('\n') {
            rewritten.text
        } else {
            template::quote_expressions(&rewritten.text)
        };
        generated.template.insert(key.clone(), rendered);
    }

    Ok(generated)
}

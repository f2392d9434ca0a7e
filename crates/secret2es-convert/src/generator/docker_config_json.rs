//! `kubernetes.io/dockerconfigjson` Secrets

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::Generated;
use crate::error::{ConvertError, Result};
use crate::external_secret::DecodingStrategy;
use crate::secret::DOCKER_CONFIG_JSON_KEY;
use crate::template;

/// `{ "auths": { "<registry>": { "auth": "..." } } }`
#[derive(Debug, Deserialize, Serialize)]
struct DockerConfig {
    auths: BTreeMap<String, RegistryAuth>,
}

#[derive(Debug, Deserialize, Serialize)]
struct RegistryAuth {
    auth: String,
}

pub(super) fn generate(secret: &str, remote_key: &str, config: &str) -> Result<Generated> {
    let mut docker_config: DockerConfig =
        serde_json::from_str(config).map_err(|source| ConvertError::InvalidDockerConfigJson {
            secret: secret.to_string(),
            source,
        })?;

    let mut generated = Generated::new(remote_key);
    for registry in docker_config.auths.values_mut() {
        let rewritten = template::rewrite(&registry.auth)?;
        for property in &rewritten.references {
            generated.reference(property, DecodingStrategy::None);
        }
        registry.auth = rewritten.text;
    }

    generated.template.insert(
        DOCKER_CONFIG_JSON_KEY.to_string(),
        serde_json::to_string(&docker_config)?,
    );

    Ok(generated)
}

//! `<% NAME %>` placeholder resolution
//!
//! Values are looked up through an [`EnvSource`] handed in by the caller.
//! [`ProcessEnv`] reads the process environment; maps serve per-request
//! environments.

use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::{BTreeMap, HashMap};

use crate::error::{ConvertError, Result};

/// `<%` whitespace* NAME whitespace* `%>`
static ENV_PLACEHOLDER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"<%\s*([A-Za-z0-9_]+)\s*%>").expect("valid regex"));

/// Read-only lookup of environment variables
pub trait EnvSource {
    fn get(&self, name: &str) -> Option<String>;
}

/// The environment of the running process
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessEnv;

impl EnvSource for ProcessEnv {
    fn get(&self, name: &str) -> Option<String> {
        std::env::var(name).ok()
    }
}

impl EnvSource for HashMap<String, String> {
    fn get(&self, name: &str) -> Option<String> {
        HashMap::get(self, name).cloned()
    }
}

impl EnvSource for BTreeMap<String, String> {
    fn get(&self, name: &str) -> Option<String> {
        BTreeMap::get(self, name).cloned()
    }
}

impl<T: EnvSource + ?Sized> EnvSource for &T {
    fn get(&self, name: &str) -> Option<String> {
        (**self).get(name)
    }
}

/// Returns true if `input` holds at least one well-formed `<% NAME %>`
pub fn has_env_placeholder(input: &str) -> bool {
    ENV_PLACEHOLDER.is_match(input)
}

/// Substitute every `<% NAME %>` in `input` with the value of `NAME`.
///
/// When `enabled` is false the input comes back untouched. Placeholders
/// that do not match the grammar (e.g. a missing `%>`) are left as they
/// are. An unset or empty variable is an error.
pub fn resolve_env<E>(input: &str, env: &E, enabled: bool) -> Result<String>
where
    E: EnvSource + ?Sized,
{
    if !enabled {
        return Ok(input.to_string());
    }

    let mut output = String::with_capacity(input.len());
    let mut last = 0;

    for caps in ENV_PLACEHOLDER.captures_iter(input) {
        let (Some(whole), Some(name)) = (caps.get(0), caps.get(1)) else {
            continue;
        };

        let value = env
            .get(name.as_str())
            .filter(|v| !v.is_empty())
            .ok_or_else(|| ConvertError::UnsetEnvVariable(name.as_str().to_string()))?;

        output.push_str(&input[last..whole.start()]);
        output.push_str(&value);
        last = whole.end();
    }

    output.push_str(&input[last..]);
    Ok(output)
}

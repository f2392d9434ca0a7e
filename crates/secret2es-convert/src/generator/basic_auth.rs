//! `kubernetes.io/basic-auth` Secrets
//!
//! Username and password presence is checked when the payload is built;
//! the values themselves go through the stringData path.

use indexmap::IndexMap;

use super::{Generated, opaque};
use crate::error::Result;

pub(super) fn generate(remote_key: &str, string_data: &IndexMap<String, String>) -> Result<Generated> {
    opaque::generate_string_data(remote_key, string_data)
}

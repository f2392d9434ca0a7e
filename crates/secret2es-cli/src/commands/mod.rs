//! CLI commands

pub mod es_gen;
pub mod serve;
pub mod version;

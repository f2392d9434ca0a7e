//! es-gen command - convert Secrets to ExternalSecrets
//!
//! Reads a YAML stream from a file or stdin, writes the ExternalSecrets to
//! stdout or a file and reports skipped Secrets on stderr.

use console::style;
use secret2es_convert::{
    ConversionResult, ConvertOptions, Converter, CreationPolicy, EnvSource, SecretStoreRef,
    StoreKind,
};
use std::collections::HashMap;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::{CliError, Result};

/// Arguments of `secret2es es-gen`
#[derive(Debug, Clone)]
pub struct EsGenArgs {
    pub input: PathBuf,
    pub store_name: String,
    pub store_type: StoreKind,
    pub creation_policy: CreationPolicy,
    pub resolve: bool,
    pub env: Vec<(String, String)>,
    pub output: Option<PathBuf>,
    pub strict: bool,
    pub refresh_interval: Duration,
}

/// `-e KEY=VALUE` overrides layered over the process environment
struct LayeredEnv {
    overrides: HashMap<String, String>,
}

impl EnvSource for LayeredEnv {
    fn get(&self, name: &str) -> Option<String> {
        self.overrides
            .get(name)
            .cloned()
            .or_else(|| std::env::var(name).ok())
    }
}

pub fn run(args: EsGenArgs) -> Result<()> {
    if args.store_name.trim().is_empty() {
        return Err(CliError::usage_with_help(
            "store name must not be empty",
            "pass --storename or set SECRET2ES_STORE_NAME",
        ));
    }

    let content = read_input(&args.input)?;

    let options = ConvertOptions {
        store: SecretStoreRef {
            name: args.store_name,
            kind: args.store_type,
        },
        creation_policy: args.creation_policy,
        resolve_env: args.resolve,
        refresh_interval: args.refresh_interval,
    };
    let env = LayeredEnv {
        overrides: args.env.into_iter().collect(),
    };

    let result = Converter::with_env(options, env).convert(&content)?;

    print_warnings(&result);
    if args.strict && !result.warnings.is_empty() {
        return Err(CliError::StrictWarnings {
            count: result.warnings.len(),
        });
    }

    match &args.output {
        Some(path) => {
            std::fs::write(path, &result.output).map_err(|e| CliError::io_at(path.display(), e))?;
            eprintln!(
                "{} Converted {} secret(s) → {}",
                style("✓").green().bold(),
                result.converted.len(),
                style(path.display()).cyan()
            );
        }
        None => print!("{}", result.output),
    }

    Ok(())
}

/// Read the whole input; `-` means stdin
fn read_input(input: &Path) -> Result<String> {
    if input == Path::new("-") {
        let mut content = String::new();
        std::io::stdin()
            .read_to_string(&mut content)
            .map_err(|e| CliError::io_at("<stdin>", e))?;
        return Ok(content);
    }

    std::fs::read_to_string(input).map_err(|e| CliError::io_at(input.display(), e))
}

fn print_warnings(result: &ConversionResult) {
    for warning in &result.warnings {
        eprintln!(
            "{} {} {}",
            style("warn:").yellow().bold(),
            warning,
            style(format!("(document {})", warning.document)).dim()
        );
    }
}

/// Parse a `KEY=VALUE` pair
pub fn parse_key_val(s: &str) -> std::result::Result<(String, String), String> {
    match s.split_once('=') {
        Some((key, value)) if !key.is_empty() => Ok((key.to_string(), value.to_string())),
        _ => Err(format!("invalid KEY=VALUE: no `=` found in `{s}`")),
    }
}

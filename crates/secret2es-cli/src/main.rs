//! secret2es CLI - convert argocd-vault-plugin Secrets to ExternalSecrets

use clap::{Parser, Subcommand};
use secret2es_convert::{CreationPolicy, StoreKind};
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

mod commands;
mod error;
mod exit_codes;
mod logging;

use commands::es_gen::{EsGenArgs, parse_key_val};
use error::CliError;

#[derive(Parser)]
#[command(name = "secret2es")]
#[command(author = "secret2es Contributors")]
#[command(version)]
#[command(about = "A tool to convert Kubernetes secrets to External Secrets", long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable debug output
    #[arg(long, global = true)]
    debug: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate external secrets from corev1 secrets
    #[command(name = "es-gen", visible_alias = "convert")]
    EsGen {
        /// Input file of corev1 secrets (`-` for stdin)
        #[arg(short, long)]
        input: PathBuf,

        /// Name of the SecretStore or ClusterSecretStore
        #[arg(short = 'n', long = "storename", env = "SECRET2ES_STORE_NAME")]
        store_name: String,

        /// Store kind (SecretStore or ClusterSecretStore)
        #[arg(
            short = 's',
            long = "storetype",
            env = "SECRET2ES_STORE_TYPE",
            default_value = "ClusterSecretStore"
        )]
        store_type: StoreKind,

        /// Creation policy of the target Secret (Owner, Orphan or Merge)
        #[arg(
            long = "creation-policy",
            env = "SECRET2ES_CREATION_POLICY",
            default_value = "Orphan"
        )]
        creation_policy: CreationPolicy,

        /// Resolve <% ENV %> placeholders from the environment
        #[arg(long, env = "SECRET2ES_RESOLVE")]
        resolve: bool,

        /// Environment variable for --resolve (KEY=VALUE, repeatable)
        #[arg(short = 'e', long = "env", value_parser = parse_key_val)]
        env: Vec<(String, String)>,

        /// Output file (defaults to stdout)
        #[arg(short, long, env = "SECRET2ES_OUTPUT")]
        output: Option<PathBuf>,

        /// Fail when any Secret was skipped
        #[arg(long, env = "SECRET2ES_STRICT")]
        strict: bool,

        /// Refresh interval of the ExternalSecrets (e.g. 1h, 15m); 0s disables refreshing
        #[arg(
            long,
            env = "SECRET2ES_REFRESH_INTERVAL",
            default_value = "0s",
            value_parser = humantime_serde::re::humantime::parse_duration
        )]
        refresh_interval: Duration,
    },

    /// Serve the converter over HTTP
    Serve {
        /// Address to bind
        #[arg(long, env = "SECRET2ES_BIND", default_value = "0.0.0.0")]
        bind: String,

        /// Port to listen on
        #[arg(short, long, env = "PORT", default_value_t = 8080)]
        port: u16,
    },

    /// Print the version number of secret2es
    Version,
}

fn main() -> ExitCode {
    // Setup miette for nice error display
    miette::set_panic_hook();

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) if !err.use_stderr() => err.exit(),
        Err(err) => {
            let _ = err.print();
            return ExitCode::from(exit_codes::USAGE_ERROR as u8);
        }
    };

    logging::init(cli.debug);

    let result = match cli.command {
        Commands::EsGen {
            input,
            store_name,
            store_type,
            creation_policy,
            resolve,
            env,
            output,
            strict,
            refresh_interval,
        } => commands::es_gen::run(EsGenArgs {
            input,
            store_name,
            store_type,
            creation_policy,
            resolve,
            env,
            output,
            strict,
            refresh_interval,
        }),

        Commands::Serve { bind, port } => tokio::runtime::Runtime::new()
            .map_err(|e| CliError::internal(e.to_string()))
            .and_then(|runtime| runtime.block_on(commands::serve::run(&bind, port))),

        Commands::Version => {
            commands::version::run();
            Ok(())
        }
    };

    match result {
        Ok(()) => ExitCode::from(exit_codes::SUCCESS as u8),
        Err(err) => {
            let code = err.exit_code();
            eprintln!("{:?}", miette::Report::new(err));
            ExitCode::from(code as u8)
        }
    }
}

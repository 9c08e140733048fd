//! Binary entry point for the Butler CLI.

use std::fmt::Write as _;
use std::io::{self, Write};
use std::process;

use clap::{CommandFactory, Parser};
use thiserror::Error;

use butler::plugins::render_table;
use butler::{
    ButlerConfig, ConfigError, ConfigOverrides, Connection, CredentialError, Credentials,
    ImportSummary, JenkinsClient, ListedJob, LogConfig, MirrorError, MirrorOrchestrator,
    ReqwestTransport, logging,
};

mod cli;

use cli::{Cli, Command, ConnectionArgs, CredentialsCommand, JobsCommand, PluginsCommand};

type Mirror = MirrorOrchestrator<ReqwestTransport>;

#[derive(Debug, Error)]
enum CliError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Mirror(#[from] MirrorError),
    #[error(transparent)]
    Credential(#[from] CredentialError),
    #[error("{failed} of {attempted} {kind} could not be imported")]
    PartialImport {
        kind: &'static str,
        failed: usize,
        attempted: usize,
    },
    #[error("failed to read standard input: {0}")]
    Stdin(String),
    #[error("failed to write output: {0}")]
    Output(String),
    #[error("unknown subcommand path {0}")]
    UnknownSubcommand(String),
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let cli = Cli::parse();
    logging::init(LogConfig {
        verbose: cli.verbose,
    });
    let exit_code = match dispatch(cli.command).await {
        Ok(()) => 0,
        Err(err) => {
            report_error(&err);
            1
        }
    };

    process::exit(exit_code);
}

async fn dispatch(command: Command) -> Result<(), CliError> {
    match command {
        Command::Jobs(JobsCommand::Import(args)) => {
            let overrides = ConfigOverrides {
                jobs_dir: args.jobs_dir,
                ..connection_overrides(args.connection)
            };
            let Some(mirror) = open(overrides, &["jobs", "import"])? else {
                return Ok(());
            };
            let summary = mirror.import_jobs(&args.folder).await?;
            report_summary("jobs", &summary)
        }
        Command::Jobs(JobsCommand::Export(args)) => {
            let overrides = ConfigOverrides {
                jobs_dir: args.jobs_dir,
                ..connection_overrides(args.connection)
            };
            let Some(mirror) = open(overrides, &["jobs", "export"])? else {
                return Ok(());
            };
            let exported = mirror.export_jobs(&args.folder, args.skip_folders).await?;
            write_stdout(&format!(
                "Exported {} jobs to {}",
                exported.len(),
                mirror.store().jobs_dir()
            ))
        }
        Command::Jobs(JobsCommand::List(args)) => {
            let Some(mirror) = open(connection_overrides(args.connection), &["jobs", "list"])?
            else {
                return Ok(());
            };
            let listed = mirror
                .list_jobs(&args.folder, args.recursive, args.skip_folders)
                .await?;
            write_stdout(&render_listing(&listed))
        }
        Command::Plugins(PluginsCommand::Import(args)) => {
            let overrides = ConfigOverrides {
                plugins_file: args.plugins_file,
                ..connection_overrides(args.connection)
            };
            let Some(mirror) = open(overrides, &["plugins", "import"])? else {
                return Ok(());
            };
            let summary = mirror.import_plugins().await?;
            report_summary("plugins", &summary)
        }
        Command::Plugins(PluginsCommand::Export(args)) => {
            let overrides = ConfigOverrides {
                plugins_file: args.plugins_file,
                ..connection_overrides(args.connection)
            };
            let Some(mirror) = open(overrides, &["plugins", "export"])? else {
                return Ok(());
            };
            let plugins = mirror.export_plugins().await?;
            write_stdout(&render_table(&plugins))
        }
        Command::Credentials(CredentialsCommand::Decrypt(args)) => {
            let Some(mirror) = open(
                connection_overrides(args.connection),
                &["credentials", "decrypt"],
            )?
            else {
                return Ok(());
            };
            let credentials = mirror.decrypt_credentials(&args.folder).await?;
            write_stdout(&credentials.to_json_pretty()?)
        }
        Command::Credentials(CredentialsCommand::Apply(args)) => {
            let Some(mirror) = open(
                connection_overrides(args.connection),
                &["credentials", "apply"],
            )?
            else {
                return Ok(());
            };
            let input =
                io::read_to_string(io::stdin()).map_err(|err| CliError::Stdin(err.to_string()))?;
            let credentials = Credentials::from_json(&input)?;
            let output = mirror.apply_credentials(&args.folder, &credentials).await?;
            write_stdout(&output)
        }
    }
}

fn connection_overrides(connection: ConnectionArgs) -> ConfigOverrides {
    ConfigOverrides {
        server: connection.server,
        username: connection.username,
        password: connection.password,
        ..ConfigOverrides::default()
    }
}

/// Builds the orchestrator, or prints the subcommand help when no server is
/// configured.
fn open(overrides: ConfigOverrides, help_path: &[&str]) -> Result<Option<Mirror>, CliError> {
    let config = ButlerConfig::load_without_cli_args()?.with_overrides(overrides);
    let Some(Connection { server, auth }) = config.connection() else {
        write_stdout(&subcommand_help(help_path)?)?;
        return Ok(None);
    };
    let client = JenkinsClient::with_reqwest(server, auth);
    Ok(Some(MirrorOrchestrator::new(client, config.store())))
}

fn subcommand_help(path: &[&str]) -> Result<String, CliError> {
    let mut root = Cli::command();
    root.build();
    let mut target = &root;
    for name in path {
        target = target
            .find_subcommand(name)
            .ok_or_else(|| CliError::UnknownSubcommand(path.join(" ")))?;
    }
    Ok(target.clone().render_help().to_string())
}

fn render_listing(listed: &[ListedJob]) -> String {
    listed.iter().fold(String::new(), |mut out, entry| {
        let marker = if entry.job.is_folder() { "/" } else { "" };
        writeln!(out, "{}{marker}", entry.path()).ok();
        out
    })
}

fn report_summary(kind: &'static str, summary: &ImportSummary) -> Result<(), CliError> {
    let mut stderr = io::stderr();
    for failure in &summary.failed {
        writeln!(stderr, "{}: {}", failure.name, failure.error).ok();
    }
    if !summary.is_success() {
        return Err(CliError::PartialImport {
            kind,
            failed: summary.failed.len(),
            attempted: summary.attempted(),
        });
    }
    write_stdout(&format!("Imported {} {kind}", summary.imported.len()))
}

fn write_stdout(text: &str) -> Result<(), CliError> {
    writeln!(io::stdout(), "{}", text.trim_end()).map_err(|err| CliError::Output(err.to_string()))
}

fn report_error(err: &CliError) {
    write_error(io::stderr(), err);
}

fn write_error(mut target: impl Write, err: &CliError) {
    writeln!(target, "{err}").ok();
}

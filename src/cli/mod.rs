//! Command-line interface definitions for the `butler` binary.
//!
//! This module centralises the clap parser structures so both the main binary
//! and the build script can reuse them when generating the manual page.

use clap::{Args, Parser, Subcommand};

/// Top-level CLI for the `butler` binary.
#[derive(Debug, Parser)]
#[command(
    name = "butler",
    version,
    about = "Import and export Jenkins jobs, plugins, and folder credentials",
    arg_required_else_help = true
)]
pub(crate) struct Cli {
    /// Log every HTTP request to standard error.
    #[arg(long, short = 'v', global = true)]
    pub(crate) verbose: bool,
    /// Operation to perform.
    #[command(subcommand)]
    pub(crate) command: Command,
}

/// Resource groups.
#[derive(Debug, Subcommand)]
pub(crate) enum Command {
    /// Jenkins jobs management.
    #[command(subcommand, arg_required_else_help = true)]
    Jobs(JobsCommand),
    /// Jenkins plugins management.
    #[command(subcommand, arg_required_else_help = true)]
    Plugins(PluginsCommand),
    /// Folder credentials management.
    #[command(subcommand, arg_required_else_help = true)]
    Credentials(CredentialsCommand),
}

/// `butler jobs` subcommands.
#[derive(Debug, Subcommand)]
pub(crate) enum JobsCommand {
    /// Create every job stored under the jobs directory.
    #[command(visible_alias = "i")]
    Import(JobsImportArgs),
    /// Write the definition of every job to the jobs directory.
    #[command(visible_alias = "e")]
    Export(JobsExportArgs),
    /// Print the jobs of a folder.
    #[command(visible_alias = "ls")]
    List(JobsListArgs),
}

/// `butler plugins` subcommands.
#[derive(Debug, Subcommand)]
pub(crate) enum PluginsCommand {
    /// Install every plugin listed in the manifest.
    #[command(visible_alias = "i")]
    Import(PluginsArgs),
    /// Write installed plugins to the manifest and print them.
    #[command(visible_alias = "e")]
    Export(PluginsArgs),
}

/// `butler credentials` subcommands.
#[derive(Debug, Subcommand)]
pub(crate) enum CredentialsCommand {
    /// Print the decrypted credentials of a folder as JSON.
    Decrypt(CredentialsArgs),
    /// Create or update folder credentials from JSON on standard input.
    Apply(CredentialsArgs),
}

/// Server address and account.
#[derive(Debug, Args)]
pub(crate) struct ConnectionArgs {
    /// Jenkins server URL; `http://` is assumed without a scheme.
    #[arg(long, short = 's', value_name = "URL")]
    pub(crate) server: Option<String>,
    /// Jenkins username.
    #[arg(long, short = 'u')]
    pub(crate) username: Option<String>,
    /// Jenkins password or API token.
    #[arg(long, short = 'p')]
    pub(crate) password: Option<String>,
}

/// Arguments for `butler jobs import`.
#[derive(Debug, Args)]
pub(crate) struct JobsImportArgs {
    #[command(flatten)]
    pub(crate) connection: ConnectionArgs,
    /// Target folder path such as `teamA/service1`; the root when omitted.
    #[arg(long, short = 'f', default_value = "")]
    pub(crate) folder: String,
    /// Directory holding one subdirectory per job.
    #[arg(long, value_name = "DIR")]
    pub(crate) jobs_dir: Option<String>,
}

/// Arguments for `butler jobs export`.
#[derive(Debug, Args)]
pub(crate) struct JobsExportArgs {
    #[command(flatten)]
    pub(crate) connection: ConnectionArgs,
    /// Source folder path; the root when omitted.
    #[arg(long, short = 'f', default_value = "")]
    pub(crate) folder: String,
    /// Leave folders out of the export.
    #[arg(long)]
    pub(crate) skip_folders: bool,
    /// Directory receiving one subdirectory per job.
    #[arg(long, value_name = "DIR")]
    pub(crate) jobs_dir: Option<String>,
}

/// Arguments for `butler jobs list`.
#[derive(Debug, Args)]
pub(crate) struct JobsListArgs {
    #[command(flatten)]
    pub(crate) connection: ConnectionArgs,
    /// Folder path to list; the root when omitted.
    #[arg(long, short = 'f', default_value = "")]
    pub(crate) folder: String,
    /// Also list the contents of every nested folder.
    #[arg(long, short = 'r')]
    pub(crate) recursive: bool,
    /// Leave folders out of the output.
    #[arg(long)]
    pub(crate) skip_folders: bool,
}

/// Arguments for `butler plugins import` and `butler plugins export`.
#[derive(Debug, Args)]
pub(crate) struct PluginsArgs {
    #[command(flatten)]
    pub(crate) connection: ConnectionArgs,
    /// Plugin manifest path.
    #[arg(long, value_name = "PATH")]
    pub(crate) plugins_file: Option<String>,
}

/// Arguments for `butler credentials decrypt` and `butler credentials apply`.
#[derive(Debug, Args)]
pub(crate) struct CredentialsArgs {
    #[command(flatten)]
    pub(crate) connection: ConnectionArgs,
    /// Folder path holding the credentials.
    #[arg(long, short = 'f', default_value = "")]
    pub(crate) folder: String,
}

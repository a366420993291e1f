use std::net::SocketAddr;
use std::path::PathBuf;

use clap::{Args as ClapArgs, Parser, Subcommand, ValueEnum};
use uuid::Uuid;

#[derive(Debug, Parser)]
#[command(
    name = "aicomplyr",
    version,
    about = "Compliance reporting for AI tool usage"
)]
pub struct Args {
    /// Compliance config (TOML); defaults apply when omitted
    #[arg(long, global = true, env = "AICOMPLYR_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Compute a compliance report for one project
    Report(ReportArgs),
    /// Serve the report and override endpoints over HTTP
    Serve(ServeArgs),
}

#[derive(Debug, ClapArgs)]
pub struct ReportArgs {
    /// Dataset JSON with projects, tool usage and policies
    #[arg(long, env = "AICOMPLYR_DATA")]
    pub data: PathBuf,

    #[arg(long)]
    pub project: Uuid,

    /// Reject the request unless the project belongs to this organization
    #[arg(long)]
    pub enterprise: Option<Uuid>,

    #[arg(long)]
    pub workspace: Option<Uuid>,

    /// Only evaluate policies tagged with this framework
    #[arg(long)]
    pub framework: Option<String>,

    /// Leave out the per-tool detail list
    #[arg(long)]
    pub no_details: bool,

    /// Output format
    #[arg(long, default_value = "json")]
    pub format: OutputFormat,

    /// Write output to a file instead of stdout
    #[arg(long)]
    pub out: Option<PathBuf>,
}

#[derive(Debug, ClapArgs)]
pub struct ServeArgs {
    #[arg(long, env = "AICOMPLYR_DATA")]
    pub data: Option<PathBuf>,

    #[arg(long, env = "AICOMPLYR_BIND", default_value = "127.0.0.1:8080")]
    pub bind: SocketAddr,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    Json,
    Text,
}

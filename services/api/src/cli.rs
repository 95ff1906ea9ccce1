use crate::rank::{run_export, run_rank, ExportArgs, RankArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use talent_shortlist::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "Talent Shortlist",
    about = "Score, filter, and shortlist candidate uploads from the command line or over HTTP",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// Print candidates from a JSON upload file ranked by score
    Rank(RankArgs),
    /// Write a ranked CSV of the candidates in a JSON upload file
    Export(ExportArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Rank(args) => run_rank(args),
        Command::Export(args) => run_export(args),
    }
}

use crate::demo::{run_demo, run_score, run_search, DemoArgs, ScoreArgs, SearchArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use food_lens::error::AppError;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "Food Lens",
    about = "Score scanned food products and rank them against a dietary profile",
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
    /// Look up a product by barcode and print its health score
    Score(ScoreArgs),
    /// Search the catalog and rank results for a profile
    Search(SearchArgs),
    /// Walk through scoring, profile ranking and recommendations
    Demo(DemoArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
    /// Override the configured catalog export (CSV or Open Food Facts JSON)
    #[arg(long)]
    pub(crate) catalog: Option<PathBuf>,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Score(args) => run_score(args),
        Command::Search(args) => run_search(args),
        Command::Demo(args) => run_demo(args),
    }
}

use crate::commands::{run_batch, run_rules_check, run_score, BatchArgs, ScoreArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use food_score::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "Food Score",
    about = "Grade packaged food products by processing level and diet compatibility",
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
    /// Score a single product JSON file and print the result
    Score(ScoreArgs),
    /// Score every row of a product CSV
    Batch(BatchArgs),
    /// Inspect the configured rule tables
    Rules {
        #[command(subcommand)]
        command: RulesCommand,
    },
}

#[derive(Subcommand, Debug)]
enum RulesCommand {
    /// Load and validate the rule tables, then print their sizes
    Check,
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
        Command::Score(args) => run_score(args),
        Command::Batch(args) => run_batch(args),
        Command::Rules {
            command: RulesCommand::Check,
        } => run_rules_check(),
    }
}

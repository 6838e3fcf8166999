use std::sync::Arc;

use clap::{
    CommandFactory, Parser, Subcommand,
    builder::{
        Styles,
        styling::{AnsiColor, Effects},
    },
};
use clap_complete::{Shell, generate};

use sptrackcli::{cli, config, error, types::PkceToken};
use tokio::sync::Mutex;

fn styles() -> Styles {
    Styles::styled()
        .header(AnsiColor::White.on_default() | Effects::BOLD)
        .usage(AnsiColor::White.on_default() | Effects::BOLD)
        .literal(AnsiColor::BrightBlue.on_default())
        .placeholder(AnsiColor::BrightGreen.on_default())
}

#[derive(Parser, Debug, Clone)]
#[clap(
  version = env!("CARGO_PKG_VERSION"),
  name=env!("CARGO_PKG_NAME"),
  bin_name=env!("CARGO_PKG_NAME"),
  author=env!("CARGO_PKG_AUTHORS"),
  about=env!("CARGO_PKG_DESCRIPTION"),
  styles=styles(),
)]
struct Cli {
    #[clap(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Authorize with Spotify API
    Auth,

    /// Record the currently playing track into the history spreadsheet
    Record(RecordOptions),

    /// Show recorded listening history
    History(HistoryOptions),

    /// Some helper information about the history store
    Info,

    /// Get shell completions
    Completions(CompletionsOption),
}

#[derive(Parser, Debug, Clone)]
#[command(about = "Record the currently playing track into the history spreadsheet")]
pub struct RecordOptions {
    /// Poll interval in seconds (overrides POLL_INTERVAL_SECS)
    #[clap(long)]
    pub interval: Option<u64>,

    /// Path of the history spreadsheet (overrides HISTORY_FILE)
    #[clap(long)]
    pub output: Option<String>,
}

#[derive(Parser, Debug, Clone)]
#[command(about = "Show recorded listening history")]
pub struct HistoryOptions {
    /// Number of most recent plays to show
    #[clap(long, default_value = "20")]
    pub limit: usize,

    /// Show the genre tally instead of plays
    #[clap(long)]
    pub genres: bool,

    /// Path of the history spreadsheet (overrides HISTORY_FILE)
    #[clap(long)]
    pub file: Option<String>,
}

#[derive(Parser, Debug, Clone)]
pub struct CompletionsOption {
    shell: Shell,
}

#[tokio::main]
async fn main() {
    if let Err(e) = config::load_env().await {
        error!("Cannot load environment. Err: {}", e);
    }

    let cli = Cli::parse();

    match cli.command {
        Command::Auth => {
            let oauth_result: Arc<Mutex<Option<PkceToken>>> = Arc::new(Mutex::new(None));
            cli::auth(Arc::clone(&oauth_result)).await;
        }
        Command::Record(opt) => cli::record(opt.interval, opt.output).await,
        Command::History(opt) => cli::history(opt.limit, opt.genres, opt.file).await,
        Command::Info => cli::info().await,
        Command::Completions(opt) => {
            let mut cmd = Cli::command_for_update();
            let name = cmd.get_name().to_string();
            generate(opt.shell, &mut cmd, name, &mut std::io::stdout())
        }
    }
}

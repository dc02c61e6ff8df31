use anyhow::Result;
use clap::{Parser, Subcommand};
use dotenvy::dotenv;

mod catalog;
mod errors;
mod export;
mod list;
mod output;
mod planner;
mod scrape;
mod telemetry;

#[derive(Parser)]
#[command(name = "ilrdc", about = "Scrape grammar, vocabulary and story pages from the ILRDC site")]
struct Cli {
    /// Emit a single JSON envelope to stdout; logs go to stderr
    #[arg(global = true, long, default_value_t = false)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    List(list::ListCmd),
    Download(scrape::DownloadCmd),
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();
    let cli = Cli::parse();
    telemetry::config::set_json_mode(cli.json);

    // stderr logging; respects RUST_LOG and ILRDC_LOG_FORMAT
    telemetry::config::init_tracing();

    match cli.command {
        Commands::List(args) => list::run(args)?,
        Commands::Download(args) => scrape::run(args).await?,
    }

    Ok(())
}

use clap::{Parser, Subcommand};
use anyhow::Result;
use dotenvy::dotenv;
use std::path::PathBuf;

mod config;
mod fetch;
mod job;
mod page;
mod parser;
mod sites;
mod store;
mod controller;

mod classify;
mod catalog;
mod scan;
mod current;
mod serve;

mod output;
mod telemetry;

#[derive(Parser)]
#[command(name = "jobscout", about = "Job posting detector and extractor")]
struct Cli {
    /// Path of the persisted current-job file (overrides JOBSCOUT_STORE)
    #[arg(global = true, long)]
    store: Option<PathBuf>,
    /// Emit a single JSON envelope to stdout; logs go to stderr
    #[arg(global = true, long, default_value_t = false)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Identify the site and page type of a URL
    Classify(classify::ClassifyCmd),
    /// Extract job information from a page
    Scan(scan::ScanCmd),
    /// List supported sites
    Sites(catalog::SitesCmd),
    /// Inspect or clear the persisted job
    Current(current::CurrentCmd),
    /// Run the message host on stdin/stdout
    Serve(serve::ServeCmd),
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();
    let cli = Cli::parse();
    telemetry::config::set_json_mode(cli.json);

    // initialize logging/tracing (stderr). Respect RUST_LOG and JOBSCOUT_LOG_FORMAT
    telemetry::config::init_tracing();
    let cfg = config::AppConfig::from_env()?.with_store(cli.store);

    match cli.command {
        Commands::Classify(args) => classify::run(args)?,
        Commands::Scan(args) => scan::run(&cfg, args).await?,
        Commands::Sites(args) => catalog::run(args)?,
        Commands::Current(args) => current::run(&cfg, args)?,
        Commands::Serve(args) => serve::run(&cfg, args).await?,
    }

    Ok(())
}

mod commands;
mod output;

use anyhow::Result;
use bangumi_lib::{Client, ClientConfig};
use clap::{Parser, Subcommand};

use crate::output::OutputFormat;

#[derive(Parser)]
#[command(name = "bangumi")]
#[command(about = "Query Bangumi rankings and pick the best subject of each month")]
struct Cli {
    /// Output format: table, json or markdown
    #[arg(long, default_value = "table", global = true)]
    output: String,

    /// Bearer token (overrides BANGUMI_ACCESS_TOKEN)
    #[arg(long, global = true)]
    token: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch a ranking, optionally filtered server-side
    Ranking(commands::ranking::RankingArgs),
    /// Walk the full listing of one subject type
    Scan(commands::scan::ScanArgs),
    /// Best subject per month over the latest unbroken run of months
    MonthlyBest(commands::monthly_best::MonthlyBestArgs),
    /// Read rows from an offline archive dump
    Archive(commands::archive::ArchiveArgs),
}

fn build_client(token: Option<&str>) -> Result<Client> {
    let mut config = ClientConfig::from_env();
    if let Some(token) = token {
        config = config.with_access_token(token);
    }
    Ok(Client::new(config)?)
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("bangumi_lib=info".parse()?)
                .add_directive("bangumi_api=warn".parse()?),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let format: OutputFormat = cli.output.parse()?;

    match &cli.command {
        Commands::Ranking(args) => {
            let client = build_client(cli.token.as_deref())?;
            commands::ranking::run(args, &client, &format).await?
        }
        Commands::Scan(args) => {
            let client = build_client(cli.token.as_deref())?;
            commands::scan::run(args, &client, &format).await?
        }
        Commands::MonthlyBest(args) => commands::monthly_best::run(args, &format)?,
        Commands::Archive(args) => commands::archive::run(args, &format)?,
    }

    Ok(())
}

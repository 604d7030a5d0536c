use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use moviedb::{
    actions::Query,
    config::Config,
    dataset, db, pipeline,
    stats::{self, GenreProfit, PersonProfit},
};
use sea_orm::DatabaseConnection;

#[derive(Parser)]
#[command(name = "moviedb", about = "Normalize movie metadata into a relational store")]
struct Cli {
    #[command(subcommand)]
    command: CliCommand,
}

#[derive(Subcommand)]
enum CliCommand {
    /// Load a movie metadata CSV into the store (defaults to $DATASET_NAME)
    LoadData {
        file: Option<PathBuf>,

        /// Print the load report as JSON
        #[arg(long)]
        json: bool,
    },

    /// List the top genres ranked by average profit
    RankGenre {
        #[arg(default_value_t = 10)]
        count: usize,

        #[arg(long)]
        json: bool,
    },

    /// List the top directors and actors ranked by average profit
    RankPersonnel {
        #[arg(default_value_t = 10)]
        count: usize,

        #[arg(long)]
        json: bool,
    },

    /// Display the first rows of a dataset after malformed rows are dropped
    ShowRaw {
        file: Option<PathBuf>,

        #[arg(long, default_value_t = 5)]
        rows: usize,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            std::env::var("RUST_LOG")
                .unwrap_or_else(|_| "info,moviedb=debug,sqlx=warn".to_string()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = Config::from_env();

    match cli.command {
        CliCommand::LoadData { file, json } => {
            let db = connect(&config).await?;
            let path = file.unwrap_or_else(|| config.dataset_path.clone());
            let report = pipeline::load_file(&db, &path).await?;
            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            }
        },
        CliCommand::RankGenre { count, json } => {
            let db = connect(&config).await?;
            tracing::info!(count, "ranking genres");
            let ranked = stats::rank_profit_map(GenreProfit.query(&db).await?, count);
            print_ranking("Genre", &ranked, json)?;
        },
        CliCommand::RankPersonnel { count, json } => {
            let db = connect(&config).await?;
            tracing::info!(count, "ranking personnel");
            let ranked = stats::rank_profit_map(PersonProfit.query(&db).await?, count);
            print_ranking("Name", &ranked, json)?;
        },
        CliCommand::ShowRaw { file, rows } => {
            let path = file.unwrap_or_else(|| config.dataset_path.clone());
            let table = dataset::load_table(&path)?;
            print!("{}", table.preview(rows));
        },
    }

    Ok(())
}

async fn connect(config: &Config) -> anyhow::Result<DatabaseConnection> {
    let sqlite_file = config.sqlite_file();
    if let Some(parent) = sqlite_file.as_deref().and_then(|p| p.parent()) {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("creating {}", parent.display()))?;
        }
    }
    Ok(db::connect_and_migrate(&config.database_url).await?)
}

fn print_ranking(label: &str, ranked: &[stats::ProfitRank], json: bool) -> anyhow::Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(ranked)?);
    } else {
        print!("{}", stats::format_ranking(label, ranked));
    }
    Ok(())
}

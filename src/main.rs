mod config;
mod engine;
mod models;
mod storage;
mod types;

use std::fmt::Display;
use std::fs::File;
use std::io::{stderr, stdin, stdout, BufReader};
use std::process::exit;

use anyhow::{Context, Result};
use clap::Parser;
use serde::Serialize;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, Layer};

use crate::config::{Cli, Command, UploadSource};
use crate::engine::TransactionService;
use crate::models::SummaryError;

const EXIT_SERVER_ERROR: i32 = 1;
const EXIT_CLIENT_ERROR: i32 = 2;
const EXIT_NOT_FOUND: i32 = 3;

#[derive(Debug, Serialize)]
struct InitReport {
    database: String,
    rows: u64
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.log_level.into());

    if let Err(message) = cli.validate() {
        fail(EXIT_CLIENT_ERROR, message);
    }

    let service = TransactionService::new(cli.database()).with_chunk_size(cli.chunk_size);

    let rows = match service.initialize().await {
        Ok(rows) => rows,
        Err(error) => fail(EXIT_SERVER_ERROR, format!("Server error: {error}"))
    };

    match cli.command {
        Command::Init => write_result(&InitReport {
            database: cli.database.display().to_string(),
            rows
        }),
        Command::Upload { source } => {
            let result = match source {
                UploadSource::Stdin => service.upload(stdin()).await,
                UploadSource::File(path) => {
                    let file = File::open(&path)
                        .with_context(|| format!("Error opening CSV at path: {}", path.display()))?;

                    service.upload(BufReader::new(file)).await
                }
            };

            match result {
                Ok(report) => write_result(&report),
                Err(error) if error.is_client_error() => fail(EXIT_CLIENT_ERROR, error),
                Err(error) => fail(EXIT_SERVER_ERROR, format!("Server error: {error}"))
            }
        }
        Command::Summary { user_id, start_date, end_date } => {
            match service.summary(user_id, start_date, end_date).await {
                Ok(summary) => write_result(&summary),
                Err(error @ SummaryError::NotFound { .. }) => fail(EXIT_NOT_FOUND, error),
                Err(error) => fail(EXIT_SERVER_ERROR, format!("Server error: {error}"))
            }
        }
        Command::Clear => match service.clear().await {
            Ok(report) => write_result(&report),
            Err(error) => fail(EXIT_SERVER_ERROR, format!("Server error: {error}"))
        }
    }
}

fn setup_logging(level: LevelFilter) {
    //NOTE: stdout carries the result row, logging goes to stderr
    let terminal_log = fmt::layer()
        .with_target(false)
        .with_writer(stderr)
        .with_filter(level);

    tracing_subscriber::registry()
        .with(terminal_log)
        .init();
}

fn write_result<T: Serialize>(result: &T) -> Result<()> {
    let mut writer = csv::Writer::from_writer(stdout().lock());

    writer.serialize(result)?;
    writer.flush()?;

    Ok(())
}

fn fail(code: i32, message: impl Display) -> ! {
    eprintln!("{message}");
    exit(code);
}

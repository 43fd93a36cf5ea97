use crate::engine::DEFAULT_CHUNK_SIZE;
use crate::storage::{Database, DEFAULT_BUSY_TIMEOUT_MS};
use crate::types::{QueryDate, UserId};
use clap::builder::TypedValueParser;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use std::time::Duration;
use tracing::level_filters::LevelFilter;

/// Ingest transaction CSV uploads and summarise them per user.
#[derive(Debug, Parser)]
#[command(version)]
pub struct Cli {
    /// SQLite database file holding the transactions table
    #[arg(long, env = "TXN_DATABASE", default_value = "transactions.db", global = true)]
    pub database: PathBuf,

    /// Rows validated and inserted per chunk
    #[arg(long, default_value_t = DEFAULT_CHUNK_SIZE, value_parser = clap::value_parser!(u64).range(1..).map(|size| size as usize), global = true)]
    pub chunk_size: usize,

    /// Milliseconds to wait on a locked database
    #[arg(long, default_value_t = DEFAULT_BUSY_TIMEOUT_MS, global = true)]
    pub busy_timeout_ms: u64,

    /// Log verbosity on stderr
    #[arg(long, value_enum, default_value_t = LogLevel::Error, global = true)]
    pub log_level: LogLevel,

    #[command(subcommand)]
    pub command: Command
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Create the table if absent and report how many rows it holds
    Init,
    /// Validate a CSV file and append its rows, all or nothing
    Upload {
        /// Path to a .csv file, or - for stdin
        source: UploadSource
    },
    /// Count, max, min and mean amount of a user's transactions in a date range
    Summary {
        /// Positive user id
        #[arg(value_parser = clap::value_parser!(i64).range(1..))]
        user_id: UserId,
        /// First day of the range (YYYY-MM-DD)
        #[arg(long)]
        start_date: QueryDate,
        /// Last day of the range, inclusive (YYYY-MM-DD)
        #[arg(long)]
        end_date: QueryDate
    },
    /// Delete every stored transaction
    Clear
}

#[derive(Debug, Clone, PartialEq)]
pub enum UploadSource {
    Stdin,
    File(PathBuf)
}

impl std::str::FromStr for UploadSource {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        if value == "-" {
            return Ok(Self::Stdin);
        }

        if !value.ends_with(".csv") {
            return Err(format!("File must be CSV. Got: {value}"));
        }

        Ok(Self::File(PathBuf::from(value)))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace
}

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Error => LevelFilter::ERROR,
            LogLevel::Warn => LevelFilter::WARN,
            LogLevel::Info => LevelFilter::INFO,
            LogLevel::Debug => LevelFilter::DEBUG,
            LogLevel::Trace => LevelFilter::TRACE
        }
    }
}

impl Cli {
    pub fn database(&self) -> Database {
        Database::new(&self.database).with_busy_timeout(Duration::from_millis(self.busy_timeout_ms))
    }

    /// Rejects summary ranges whose start falls after their end.
    pub fn validate(&self) -> Result<(), String> {
        if let Command::Summary { start_date, end_date, .. } = &self.command {
            if start_date > end_date {
                return Err(format!("start date ({start_date}) cannot be after end date ({end_date})"));
            }
        }

        Ok(())
    }
}

use std::env;
use std::fs::{create_dir_all, File};
use std::io::{self, stdout, BufWriter, Write};
use std::path::Path;

use chrono::{Duration, NaiveDate};
use rand::Rng;
use rust_decimal::Decimal;

const PRODUCT_COUNT: i64 = 5_000;
const DAYS_IN_RANGE: i64 = 730;

struct GeneratorConfig {
    num_records: usize,
    num_users: i64,
    output_path: String,
    corrupt_last: bool
}

impl GeneratorConfig {
    fn from_args() -> Self {
        let args: Vec<String> = env::args().collect();
        let num_records = args.get(1).and_then(|s| s.parse().ok()).unwrap_or(1_000_000);
        let num_users = args.get(2).and_then(|s| s.parse().ok()).unwrap_or(10_000);
        let corrupt_last = args.iter().any(|arg| arg == "--corrupt-last");

        Self {
            num_records,
            num_users,
            output_path: "samples/large_upload.csv".to_string(),
            corrupt_last
        }
    }
}

/// Writes a large, valid upload. With `--corrupt-last` the final row carries a
/// negative amount, so uploading the file exercises a rollback that spans many chunks.
fn main() -> io::Result<()> {
    let config = GeneratorConfig::from_args();

    println!(
        "Generating {} transactions for {} users in {}...",
        config.num_records, config.num_users, config.output_path
    );

    if let Some(parent) = Path::new(&config.output_path).parent() {
        create_dir_all(parent)?;
    }

    let file = File::create(&config.output_path)?;
    let mut writer = BufWriter::new(file);

    writeln!(writer, "transaction_id,user_id,product_id,timestamp,transaction_amount")?;

    let mut rng = rand::thread_rng();
    let first_day = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap_or_default();

    for index in 1..=config.num_records {
        let user_id = rng.gen_range(1..=config.num_users);
        let product_id = rng.gen_range(1..=PRODUCT_COUNT);
        let timestamp = first_day.and_hms_opt(0, 0, 0).unwrap_or_default()
            + Duration::days(rng.gen_range(0..DAYS_IN_RANGE))
            + Duration::seconds(rng.gen_range(0..86_400));

        let mut amount = Decimal::new(rng.gen_range(1..=1_000_000), 2);

        if config.corrupt_last && index == config.num_records {
            amount = -amount;
        }

        writeln!(writer, "TX{index:010},{user_id},{product_id},{},{amount}", timestamp.format("%Y-%m-%d %H:%M:%S"))?;

        if index % 100_000 == 0 {
            print!(".");
            stdout().flush()?;
        }
    }

    writer.flush()?;
    println!("\nGeneration complete.");

    Ok(())
}

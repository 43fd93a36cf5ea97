use crate::models::{Summary, SummaryError};
use crate::storage::Database;
use crate::types::{QueryDate, UserId};
use rust_decimal::Decimal;
use rust_decimal::prelude::FromPrimitive;
use tracing::{debug, info};

const MEAN_DECIMAL_PLACES: u32 = 2;

/// Count, extrema and mean of one user's transactions over an inclusive date range.
#[derive(Debug, Clone)]
pub struct SummaryQuery {
    database: Database
}

impl SummaryQuery {
    pub fn new(database: Database) -> Self {
        Self { database }
    }

    /// `start_date <= end_date` is the caller's to enforce; an inverted range simply matches nothing.
    pub fn run(&self, user_id: UserId, start_date: QueryDate, end_date: QueryDate) -> Result<Summary, SummaryError> {
        let connection = self.database.connect()?;
        let aggregate = Database::aggregate(&connection, user_id, start_date, end_date)?;

        debug!("Aggregate for user [{user_id}] between {start_date} and {end_date}: {aggregate:?}");

        if aggregate.count == 0 {
            return Err(SummaryError::not_found(user_id, start_date, end_date));
        }

        let (Some(max), Some(min), Some(mean)) = (aggregate.max, aggregate.min, aggregate.mean) else {
            return Err(SummaryError::not_found(user_id, start_date, end_date));
        };

        let max_amount = to_decimal(max)?;
        let min_amount = to_decimal(min)?;

        //NOTE: Rounding can push the mean of sub-cent amounts past an extremum, it must stay within them
        let mean_amount = to_decimal(mean)?
            .round_dp(MEAN_DECIMAL_PLACES)
            .clamp(min_amount, max_amount);

        let summary = Summary {
            user_id,
            transaction_count: aggregate.count,
            max_amount,
            min_amount,
            mean_amount,
            start_date,
            end_date
        };

        info!("Summarised {} transactions for user [{user_id}]", summary.transaction_count);

        Ok(summary)
    }
}

fn to_decimal(value: f64) -> Result<Decimal, SummaryError> {
    Decimal::from_f64(value).ok_or(SummaryError::InvalidAmount(value))
}

use crate::types::errors::TimestampError;
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Serialize, Serializer};
use std::fmt;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

const DATE_FORMAT: &str = "%Y-%m-%d";
const STORED_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.f";
const ACCEPTED_FORMATS: [&str; 3] = ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M"];

/// A transaction's point in time.
///
/// Stored as `YYYY-MM-DD HH:MM:SS[.fff]` so that the text column sorts in the
/// same order as the instants it represents. Range filters rely on that.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct Timestamp(NaiveDateTime);

impl Display for Timestamp {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
        write!(formatter, "{}", self.0.format(STORED_FORMAT))
    }
}

impl FromStr for Timestamp {
    type Err = TimestampError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let value = value.trim();

        if value.is_empty() {
            return Err(TimestampError::Empty);
        }

        for format in ACCEPTED_FORMATS {
            if let Ok(datetime) = NaiveDateTime::parse_from_str(value, format) {
                return Ok(Timestamp(datetime));
            }
        }

        //NOTE: A bare date is midnight of that day, which is also how it compares against date bounds
        let date = QueryDate::from_str(value)
            .map_err(|_| TimestampError::InvalidFormat(value.to_string()))?;

        Ok(Timestamp(date.0.and_time(NaiveTime::MIN)))
    }
}

impl Serialize for Timestamp {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// A calendar day used as an inclusive bound of a summary range.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct QueryDate(NaiveDate);

impl QueryDate {
    /// Smallest stored timestamp text that falls on this day.
    pub fn start_bound(&self) -> String {
        self.to_string()
    }

    /// Largest stored timestamp text that falls on this day.
    pub fn end_bound(&self) -> String {
        format!("{self} 23:59:59.999999999")
    }
}

impl Display for QueryDate {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
        write!(formatter, "{}", self.0.format(DATE_FORMAT))
    }
}

impl FromStr for QueryDate {
    type Err = TimestampError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let value = value.trim();
        let bytes = value.as_bytes();

        //NOTE: chrono accepts unpadded months and days, the stored text ordering does not
        let well_formed = bytes.len() == 10
            && bytes[4] == b'-'
            && bytes[7] == b'-'
            && bytes.iter().enumerate().all(|(index, byte)| index == 4 || index == 7 || byte.is_ascii_digit());

        if !well_formed {
            return Err(TimestampError::InvalidDate(value.to_string()));
        }

        NaiveDate::parse_from_str(value, DATE_FORMAT)
            .map(QueryDate)
            .map_err(|_| TimestampError::InvalidDate(value.to_string()))
    }
}

impl Serialize for QueryDate {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

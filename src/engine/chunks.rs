use crate::models::{EmptyInput, IngestError, IntegrityViolation, TransactionRecord, EXPECTED_COLUMNS};
use crate::types::Timestamp;
use csv::{Reader, ReaderBuilder, StringRecord, Trim};
use rust_decimal::Decimal;
use std::io::Read;
use std::str::FromStr;

const TRANSACTION_ID: usize = 0;
const USER_ID: usize = 1;
const PRODUCT_ID: usize = 2;
const TIMESTAMP: usize = 3;
const TRANSACTION_AMOUNT: usize = 4;

/// Splits a CSV stream into validated chunks of at most `chunk_size` records.
///
/// The header is checked once when the reader is opened. After that each call
/// to `next` reads, validates and yields one chunk, so only a single chunk is
/// ever held in memory. The first error ends the iteration.
pub struct ChunkReader<R: Read> {
    reader: Reader<R>,
    chunk_size: usize,
    rows_read: u64,
    finished: bool
}

impl<R: Read> ChunkReader<R> {
    pub fn open(input: R, chunk_size: usize) -> Result<Self, IngestError> {
        let mut reader = ReaderBuilder::new()
            .trim(Trim::Fields)
            .flexible(true)
            .from_reader(input);

        let headers = reader.headers()?;

        if headers.is_empty() {
            return Err(IngestError::EmptyInput(EmptyInput::NoContent));
        }

        if !headers.iter().eq(EXPECTED_COLUMNS) {
            return Err(IngestError::schema_mismatch(headers));
        }

        Ok(Self {
            reader,
            chunk_size: chunk_size.max(1),
            rows_read: 0,
            finished: false
        })
    }

    fn read_chunk(&mut self) -> Result<Option<Vec<TransactionRecord>>, IngestError> {
        let mut rows = Vec::with_capacity(self.chunk_size);
        let mut record = StringRecord::new();

        while rows.len() < self.chunk_size && self.reader.read_record(&mut record)? {
            let line = line_of(&record);

            if record.len() > EXPECTED_COLUMNS.len() {
                return Err(IngestError::malformed(line, format!("expected {} fields, found {}", EXPECTED_COLUMNS.len(), record.len())));
            }

            rows.push((line, record.clone()));
        }

        if rows.is_empty() {
            return match self.rows_read {
                0 => Err(IngestError::EmptyInput(EmptyInput::NoRows)),
                _ => Ok(None)
            };
        }

        self.rows_read += rows.len() as u64;

        check_no_nulls(&rows)?;

        let chunk = rows.iter()
            .map(|(line, row)| parse_record(*line, row))
            .collect::<Result<Vec<_>, _>>()?;

        check_positive_amounts(&rows, &chunk)?;
        check_positive_ids(&rows, &chunk)?;

        Ok(Some(chunk))
    }
}

impl<R: Read> Iterator for ChunkReader<R> {
    type Item = Result<Vec<TransactionRecord>, IngestError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }

        match self.read_chunk() {
            Ok(Some(chunk)) => Some(Ok(chunk)),
            Ok(None) => {
                self.finished = true;
                None
            }
            Err(error) => {
                self.finished = true;
                Some(Err(error))
            }
        }
    }
}

fn line_of(record: &StringRecord) -> u64 {
    record.position().map(|position| position.line()).unwrap_or_default()
}

//NOTE: Short rows are padded with missing cells by the flexible reader, they count as nulls too
fn check_no_nulls(rows: &[(u64, StringRecord)]) -> Result<(), IntegrityViolation> {
    for (line, row) in rows {
        for (index, column) in EXPECTED_COLUMNS.iter().enumerate() {
            if row.get(index).is_none_or(str::is_empty) {
                return Err(IntegrityViolation::NullValue { line: *line, column: *column });
            }
        }
    }

    Ok(())
}

fn check_positive_amounts(rows: &[(u64, StringRecord)], chunk: &[TransactionRecord]) -> Result<(), IntegrityViolation> {
    for ((line, _), record) in rows.iter().zip(chunk) {
        if record.transaction_amount <= Decimal::ZERO {
            return Err(IntegrityViolation::NonPositiveAmount {
                line: *line,
                transaction_id: record.transaction_id.clone()
            });
        }
    }

    Ok(())
}

fn check_positive_ids(rows: &[(u64, StringRecord)], chunk: &[TransactionRecord]) -> Result<(), IntegrityViolation> {
    for ((line, _), record) in rows.iter().zip(chunk) {
        let column = if record.user_id <= 0 {
            EXPECTED_COLUMNS[USER_ID]
        } else if record.product_id <= 0 {
            EXPECTED_COLUMNS[PRODUCT_ID]
        } else {
            continue;
        };

        return Err(IntegrityViolation::NonPositiveId {
            line: *line,
            column,
            transaction_id: record.transaction_id.clone()
        });
    }

    Ok(())
}

fn parse_record(line: u64, row: &StringRecord) -> Result<TransactionRecord, IngestError> {
    let field = |index: usize| row.get(index).unwrap_or_default();

    let parse_id = |index: usize| {
        i64::from_str(field(index)).map_err(|error| {
            IngestError::malformed(line, format!("{} [{}] is not an integer: {error}", EXPECTED_COLUMNS[index], field(index)))
        })
    };

    let transaction_amount = Decimal::from_str(field(TRANSACTION_AMOUNT))
        .or_else(|_| Decimal::from_scientific(field(TRANSACTION_AMOUNT)))
        .map_err(|error| {
            IngestError::malformed(line, format!("transaction_amount [{}] is not a decimal: {error}", field(TRANSACTION_AMOUNT)))
        })?;

    let timestamp = Timestamp::from_str(field(TIMESTAMP))
        .map_err(|error| IngestError::malformed(line, error))?;

    Ok(TransactionRecord {
        transaction_id: field(TRANSACTION_ID).to_string(),
        user_id: parse_id(USER_ID)?,
        product_id: parse_id(PRODUCT_ID)?,
        timestamp,
        transaction_amount
    })
}

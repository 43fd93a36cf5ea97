mod errors;
mod timestamp;
#[cfg(test)]
mod tests;

pub use timestamp::{QueryDate, Timestamp};

pub type UserId = i64;
pub type ProductId = i64;
pub type TransactionId = String;

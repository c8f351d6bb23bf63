// Library interface for querystat
// Exposes the scanning and aggregation pipeline for the binary and tests

pub mod aggregate;
pub mod cli;
pub mod error;
pub mod filter;
pub mod line;
pub mod query;
pub mod scan;
pub mod source;
pub mod timestamp;

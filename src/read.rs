//! Read requests against a collection's table.
//!
//! - Scanning a whole table, optionally filtered or only counted
//! - Querying the documents stored under one identifier

/// Arguments shared by the read requests.
pub mod common;

/// Query request keyed by document identifier.
pub mod query;

/// Scan request over a whole table.
pub mod scan;

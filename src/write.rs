//! Write requests against a collection's table.
//!
//! - Putting a whole document, optionally guarded by a condition
//! - Deleting a document by identifier
//! - Putting many documents in batches

/// Batch put of many documents.
pub mod batch_write_item;

/// Arguments shared by the write requests.
pub mod common;

/// Delete of one document by identifier.
pub mod delete_item;

/// Put of one whole document.
pub mod put_item;

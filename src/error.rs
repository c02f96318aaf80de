use crate::{common::key, mapping};

/// Errors raised by [`Collection`](crate::collection::Collection) and [`Database`](crate::collection::Database).
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Entity and document do not fit the registered class map.
    #[error("mapping error: {0}")]
    Mapping(#[from] mapping::MappingError),

    /// A document or filter value could not be converted to DynamoDB attributes.
    #[error("attribute conversion error: {0}")]
    Serialization(#[from] serde_dynamo::Error),

    /// An entity could not be converted to or from its document form.
    #[error("document conversion error: {0}")]
    Document(#[from] serde_json::Error),

    /// The store rejected or failed a request.
    #[error("DynamoDB error: {0}")]
    DynamoDb(#[from] aws_sdk_dynamodb::Error),

    /// A point lookup matched more than one document.
    #[error("expected at most one document with id {id}, found {count}")]
    MultipleMatches {
        /// The identifier that was looked up.
        id: key::DocumentId,
        /// How many documents matched.
        count: usize,
    },

    /// The entity has never been inserted, so it has nothing to be keyed by.
    #[error("entity has no identifier; insert it before replacing it")]
    MissingId,

    /// The store left part of a batch unwritten.
    #[error("{0} batch write request(s) were left unprocessed")]
    Unprocessed(usize),

    /// A table did not reach the expected state in time.
    #[error("waiting for table {table} failed: {source}")]
    TableWait {
        /// The table being waited on.
        table: String,
        /// What the waiter reported.
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// The connection string is not `host:port/database`.
    #[error("invalid connection string {0:?}: expected host:port/database")]
    InvalidConnectionString(String),
}

/// Result alias for this crate's [`Error`].
pub type Result<T, E = Error> = std::result::Result<T, E>;

use crate::common;

use aws_sdk_dynamodb::{Client, error, operation, types};
use serde::ser::Error as _;
use serde_dynamo::{Error, Result, to_item};
use std::collections;

/// Most put requests DynamoDB accepts in one BatchWriteItem call.
pub const MAX_BATCH_SIZE: usize = 25;

type RequestItems = collections::HashMap<String, Vec<types::WriteRequest>>;

/// batch write item operation, one entry per call
#[derive(Debug, Default, PartialEq)]
struct BatchWriteItemInput {
    batches: Vec<RequestItems>,
}

/// Store many documents with as few calls as possible.
///
/// Documents are sent in batches of [`MAX_BATCH_SIZE`]. Each batch is applied
/// by the store as a unit; requests it could not apply come back in the
/// output's `unprocessed_items` and are not retried here.
///
/// ```rust,no_run
/// use aws_sdk_dynamodb::Client;
/// use employee_crud::write;
/// use serde_json::json;
///
/// # async fn example(client: &Client) -> Result<(), Box<dyn std::error::Error>> {
/// let serde_json::Value::Object(document) = json!({"_id": "1", "Income": 3000}) else {
///     unreachable!()
/// };
/// let batch_write = write::batch_write_item::BatchWriteItem {
///     items: vec![document],
///     table_name: "EmployeeDB.Employees".to_string(),
/// };
/// batch_write.send(client).await?;
/// # Ok(())
/// # }
/// ```
#[derive(Clone, Debug, Default, PartialEq)]
pub struct BatchWriteItem {
    /// Documents to store, each replacing any document with the same identifier.
    pub items: Vec<common::Document>,
    /// The table to write to.
    pub table_name: String,
}

impl TryFrom<BatchWriteItem> for BatchWriteItemInput {
    type Error = Error;

    fn try_from(batch_write_item: BatchWriteItem) -> Result<Self> {
        let mut batches = Vec::with_capacity(batch_write_item.items.len().div_ceil(MAX_BATCH_SIZE));
        let mut items = batch_write_item.items.into_iter().peekable();
        while items.peek().is_some() {
            let mut requests = Vec::with_capacity(MAX_BATCH_SIZE);
            for item in items.by_ref().take(MAX_BATCH_SIZE) {
                let put_request = types::PutRequest::builder()
                    .set_item(Some(to_item(item)?))
                    .build()
                    .map_err(Error::custom)?;
                requests.push(
                    types::WriteRequest::builder()
                        .put_request(put_request)
                        .build(),
                );
            }
            batches.push(RequestItems::from([(
                batch_write_item.table_name.clone(),
                requests,
            )]));
        }
        Ok(Self { batches })
    }
}

impl BatchWriteItem {
    /// Execute one BatchWriteItem call per batch, in order.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(
            name = "employee_crud.batch_write_item",
            skip_all,
            fields(items = self.items.len()),
            err
        )
    )]
    pub async fn send(
        self,
        client: &Client,
    ) -> Result<
        Vec<operation::batch_write_item::BatchWriteItemOutput>,
        error::SdkError<operation::batch_write_item::BatchWriteItemError>,
    > {
        let batch_write_item: BatchWriteItemInput =
            self.try_into().map_err(error::BuildError::other)?;
        let mut outputs = Vec::with_capacity(batch_write_item.batches.len());
        for request_items in batch_write_item.batches {
            let output = client
                .batch_write_item()
                .set_request_items(Some(request_items))
                .send()
                .await?;
            outputs.push(output);
        }
        Ok(outputs)
    }
}

/// Number of write requests the store left unprocessed across `outputs`.
pub fn unprocessed_count(outputs: &[operation::batch_write_item::BatchWriteItemOutput]) -> usize {
    outputs
        .iter()
        .filter_map(|output| output.unprocessed_items.as_ref())
        .flat_map(|unprocessed| unprocessed.values())
        .map(Vec::len)
        .sum()
}

use crate::{common, write};

use aws_sdk_dynamodb::{Client, error, operation, types};
use serde::Serialize;
use serde_dynamo::{Error, Result, to_item};
use std::collections;

/// put item operation
#[derive(Debug, PartialEq)]
struct PutItemInput {
    item: collections::HashMap<String, types::AttributeValue>,
    write_operation: write::common::WriteInput,
}

/// Store a whole document, replacing any document with the same identifier.
///
/// Guard it with a condition on `_id` to make it an insert
/// (`Condition::Null`) or a replace (`Condition::NotNull`).
///
/// ```rust,no_run
/// use aws_sdk_dynamodb::Client;
/// use employee_crud::{common, write};
/// use serde_json::json;
///
/// # async fn example(client: &Client) -> Result<(), Box<dyn std::error::Error>> {
/// let serde_json::Value::Object(document) = json!({"_id": "1", "Income": 2000}) else {
///     unreachable!()
/// };
/// let put_item = write::put_item::PutItem {
///     item: document,
///     write_args: write::common::WriteArgs {
///         condition: Some(common::condition::Filter::field(
///             common::ID_ELEMENT,
///             common::condition::Condition::<common::key::DocumentId>::Null,
///         )),
///         table_name: "EmployeeDB.Employees".to_string(),
///         ..Default::default()
///     },
/// };
/// put_item.send(client).await?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, PartialEq)]
pub struct PutItem<T> {
    /// The document to store.
    pub item: common::Document,
    /// Table, condition and return values of the write.
    pub write_args: write::common::WriteArgs<T>,
}

impl<T: Serialize> TryFrom<PutItem<T>> for PutItemInput {
    type Error = Error;

    fn try_from(put_item: PutItem<T>) -> Result<Self> {
        let item = to_item(put_item.item)?;
        let write_operation: write::common::WriteInput = put_item.write_args.try_into()?;
        let operation = Self {
            item,
            write_operation,
        };
        Ok(operation)
    }
}

impl<T: Serialize> PutItem<T> {
    /// Execute the put item operation.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(name = "employee_crud.put_item", skip_all, err)
    )]
    pub async fn send(
        self,
        client: &Client,
    ) -> Result<
        operation::put_item::PutItemOutput,
        error::SdkError<operation::put_item::PutItemError>,
    > {
        let put_item: PutItemInput = self.try_into().map_err(error::BuildError::other)?;
        let builder = client.put_item().set_item(Some(put_item.item));
        crate::apply_write_operation!(builder, put_item.write_operation)
            .send()
            .await
    }
}

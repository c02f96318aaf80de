use crate::{common, write};

use aws_sdk_dynamodb::{Client, error, operation, types};
use serde::Serialize;
use serde_dynamo::{Error, Result};
use std::collections;

/// delete item operation
#[derive(Debug, PartialEq)]
struct DeleteItemInput {
    key: collections::HashMap<String, types::AttributeValue>,
    write_operation: write::common::WriteInput,
}

/// Delete the document stored under an identifier.
///
/// Deleting an identifier that is not stored succeeds and changes nothing.
///
/// ```rust,no_run
/// use aws_sdk_dynamodb::{Client, types};
/// use employee_crud::{common, write};
///
/// # async fn example(client: &Client) -> Result<(), Box<dyn std::error::Error>> {
/// let delete_item: write::delete_item::DeleteItem<serde_json::Value> = write::delete_item::DeleteItem {
///     key: common::key::DocumentKey {
///         id: common::key::DocumentId::from("1"),
///     },
///     write_args: write::common::WriteArgs {
///         return_values: Some(types::ReturnValue::AllOld),
///         table_name: "EmployeeDB.Employees".to_string(),
///         ..Default::default()
///     },
/// };
/// let deleted = delete_item.send(client).await?.attributes.is_some();
/// # Ok(())
/// # }
/// ```
#[derive(Debug, PartialEq)]
pub struct DeleteItem<T> {
    /// Identifier of the document to delete.
    pub key: common::key::DocumentKey,
    /// Table, condition and return values of the write.
    pub write_args: write::common::WriteArgs<T>,
}

impl<T: Serialize> TryFrom<DeleteItem<T>> for DeleteItemInput {
    type Error = Error;

    fn try_from(delete_item: DeleteItem<T>) -> Result<Self> {
        let write_operation: write::common::WriteInput = delete_item.write_args.try_into()?;
        let operation = Self {
            key: delete_item.key.into(),
            write_operation,
        };
        Ok(operation)
    }
}

impl<T: Serialize> DeleteItem<T> {
    /// Execute the delete item operation.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(name = "employee_crud.delete_item", skip_all, fields(id = %self.key.id), err)
    )]
    pub async fn send(
        self,
        client: &Client,
    ) -> Result<
        operation::delete_item::DeleteItemOutput,
        error::SdkError<operation::delete_item::DeleteItemError>,
    > {
        let delete_item: DeleteItemInput = self.try_into().map_err(error::BuildError::other)?;
        let builder = client.delete_item().set_key(Some(delete_item.key));
        crate::apply_write_operation!(builder, delete_item.write_operation)
            .send()
            .await
    }
}

//! Creating and dropping the table behind a collection.
//!
//! Both requests are idempotent: creating a table that exists and deleting
//! one that does not are successes. Both wait for the table to settle so the
//! next request sees the new state.

use crate::{common, error::Error};

use aws_sdk_dynamodb::{Client, client::Waiters, error, operation, types};
use std::time;

/// Longest wait for a table to become active or disappear.
pub const TABLE_WAIT: time::Duration = time::Duration::from_secs(60);

/// create table operation
#[derive(Debug, PartialEq)]
struct CreateTableInput {
    attribute_definitions: Vec<types::AttributeDefinition>,
    billing_mode: types::BillingMode,
    key_schema: Vec<types::KeySchemaElement>,
    table_name: String,
}

/// Create a collection's table if it does not exist yet.
///
/// The table is keyed by the string element `_id` and billed on demand.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct CreateTable {
    /// The table to create.
    pub table_name: String,
}

impl TryFrom<CreateTable> for CreateTableInput {
    type Error = error::BuildError;

    fn try_from(create_table: CreateTable) -> Result<Self, Self::Error> {
        let attribute_definition = types::AttributeDefinition::builder()
            .attribute_name(common::ID_ELEMENT)
            .attribute_type(types::ScalarAttributeType::S)
            .build()?;
        let key_schema_element = types::KeySchemaElement::builder()
            .attribute_name(common::ID_ELEMENT)
            .key_type(types::KeyType::Hash)
            .build()?;
        let operation = Self {
            attribute_definitions: vec![attribute_definition],
            billing_mode: types::BillingMode::PayPerRequest,
            key_schema: vec![key_schema_element],
            table_name: create_table.table_name,
        };
        Ok(operation)
    }
}

impl CreateTable {
    async fn create(
        self,
        client: &Client,
    ) -> Result<
        operation::create_table::CreateTableOutput,
        error::SdkError<operation::create_table::CreateTableError>,
    > {
        let create_table: CreateTableInput = self.try_into()?;
        client
            .create_table()
            .set_attribute_definitions(Some(create_table.attribute_definitions))
            .billing_mode(create_table.billing_mode)
            .set_key_schema(Some(create_table.key_schema))
            .table_name(create_table.table_name)
            .send()
            .await
    }

    /// Create the table, or do nothing if it exists, then wait until it is active.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(
            name = "employee_crud.create_table",
            skip_all,
            fields(table = %self.table_name),
            err
        )
    )]
    pub async fn send(self, client: &Client) -> Result<(), Error> {
        let table_name = self.table_name.clone();
        match self.create(client).await {
            Ok(_) => {}
            Err(error)
                if error
                    .as_service_error()
                    .is_some_and(|error| error.is_resource_in_use_exception()) => {}
            Err(error) => return Err(aws_sdk_dynamodb::Error::from(error).into()),
        }
        client
            .wait_until_table_exists()
            .table_name(&table_name)
            .wait(TABLE_WAIT)
            .await
            .map_err(|source| Error::TableWait {
                table: table_name,
                source: Box::new(source),
            })?;
        Ok(())
    }
}

/// Delete a collection's table with every document in it.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct DeleteTable {
    /// The table to delete.
    pub table_name: String,
}

impl DeleteTable {
    /// Delete the table, or do nothing if it does not exist, then wait until it is gone.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(
            name = "employee_crud.delete_table",
            skip_all,
            fields(table = %self.table_name),
            err
        )
    )]
    pub async fn send(self, client: &Client) -> Result<(), Error> {
        let deleted = client
            .delete_table()
            .table_name(&self.table_name)
            .send()
            .await;
        match deleted {
            Ok(_) => {}
            Err(error)
                if error
                    .as_service_error()
                    .is_some_and(|error| error.is_resource_not_found_exception()) =>
            {
                return Ok(());
            }
            Err(error) => return Err(aws_sdk_dynamodb::Error::from(error).into()),
        }
        client
            .wait_until_table_not_exists()
            .table_name(&self.table_name)
            .wait(TABLE_WAIT)
            .await
            .map_err(|source| Error::TableWait {
                table: self.table_name,
                source: Box::new(source),
            })?;
        Ok(())
    }
}

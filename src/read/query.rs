use crate::{common, read};

use aws_sdk_dynamodb::{Client, error, operation};
use serde::Serialize;
use serde_dynamo::{Error, Result, to_attribute_value};
use std::collections;

/// query operation
#[derive(Clone, Debug, Default, PartialEq)]
struct QueryInput {
    key_condition_expression: String,
    read_operation: read::common::ReadInput,
}

/// Query the documents stored under one identifier.
///
/// `_id` is the table's partition key, so a healthy table answers with zero
/// or one item; callers that need exactly that check the count themselves.
///
/// ```rust,no_run
/// use aws_sdk_dynamodb::Client;
/// use employee_crud::{common, read};
/// use serde_json::Value;
///
/// # async fn example(client: &Client) -> Result<(), Box<dyn std::error::Error>> {
/// let query: read::query::Query<Value> = read::query::Query {
///     key: common::key::DocumentKey {
///         id: common::key::DocumentId::from("0b7c…"),
///     },
///     read_args: read::common::ReadArgs {
///         table_name: "EmployeeDB.Employees".to_string(),
///         ..Default::default()
///     },
/// };
/// query.send(client).await?;
/// # Ok(())
/// # }
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct Query<T> {
    /// The identifier to look up.
    pub key: common::key::DocumentKey,
    /// Table and optional filter applied to the keyed documents.
    pub read_args: read::common::ReadArgs<T>,
}

impl<T: Serialize> TryFrom<Query<T>> for QueryInput {
    type Error = Error;

    fn try_from(query: Query<T>) -> Result<Self> {
        let mut read_operation: read::common::ReadInput = query.read_args.try_into()?;
        let name = common::name_placeholder(common::ID_ELEMENT);
        let value = format!(":{}_key", common::ID_ELEMENT);
        let key_condition = common::ExpressionInput {
            expression: format!("{name} = {value}"),
            expression_attribute_names: collections::HashMap::from([(
                name,
                common::ID_ELEMENT.to_string(),
            )]),
            expression_attribute_values: collections::HashMap::from([(
                value,
                to_attribute_value(query.key.id)?,
            )]),
        };
        let key_condition_expression = key_condition.merge_into(
            &mut read_operation.expression_attribute_names,
            &mut read_operation.expression_attribute_values,
        );
        let operation = Self {
            key_condition_expression,
            read_operation,
        };
        Ok(operation)
    }
}

impl<T: Serialize> Query<T> {
    /// Execute the query operation.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(name = "employee_crud.query", skip_all, fields(id = %self.key.id), err)
    )]
    pub async fn send(
        self,
        client: &Client,
    ) -> Result<operation::query::QueryOutput, error::SdkError<operation::query::QueryError>> {
        let query: QueryInput = self.try_into().map_err(error::BuildError::other)?;
        let builder = client
            .query()
            .key_condition_expression(query.key_condition_expression);
        let mut paginator = crate::apply_read_operation!(builder, query.read_operation)
            .into_paginator()
            .send();
        crate::get_paginated_output!(paginator, operation::query::QueryOutput)
    }
}

use crate::common;

use aws_sdk_dynamodb::types;
use serde::Serialize;
use serde_dynamo::{Error, Result};
use std::collections;

/// Write arguments after their condition has been rendered to an expression.
#[derive(Clone, Debug, Default, PartialEq)]
pub(crate) struct WriteInput {
    pub(crate) condition_expression: Option<String>,
    pub(crate) expression_attribute_names: Option<collections::HashMap<String, String>>,
    pub(crate) expression_attribute_values:
        Option<collections::HashMap<String, types::AttributeValue>>,
    pub(crate) return_values: Option<types::ReturnValue>,
    pub(crate) table_name: String,
}

/// Arguments shared by single-document writes (Put, Delete).
#[derive(Clone, Debug, PartialEq)]
pub struct WriteArgs<T> {
    /// Condition on the stored document that must hold for the write to happen.
    ///
    /// When it does not hold the store answers with a conditional check failure
    /// and nothing is written.
    pub condition: Option<common::condition::Filter<T>>,
    /// Which version of the document to return: `AllOld` returns the replaced
    /// or deleted document, if there was one.
    pub return_values: Option<types::ReturnValue>,
    /// The table to write to.
    pub table_name: String,
}

impl<T> Default for WriteArgs<T> {
    fn default() -> Self {
        Self {
            condition: None,
            return_values: None,
            table_name: String::new(),
        }
    }
}

impl<T: Serialize> TryFrom<WriteArgs<T>> for WriteInput {
    type Error = Error;

    fn try_from(write_args: WriteArgs<T>) -> Result<Self> {
        let mut operation = Self {
            return_values: write_args.return_values,
            table_name: write_args.table_name,
            ..Default::default()
        };
        if let Some(condition) = write_args.condition {
            let condition: common::ExpressionInput = condition.try_into()?;
            if !condition.expression.is_empty() {
                let expression = condition.merge_into(
                    &mut operation.expression_attribute_names,
                    &mut operation.expression_attribute_values,
                );
                operation.condition_expression = Some(expression);
            }
        }
        Ok(operation)
    }
}

/// apply common write operation settings to a builder
#[macro_export]
macro_rules! apply_write_operation {
    ($builder:expr, $write_operation:expr) => {
        $builder
            .set_condition_expression($write_operation.condition_expression)
            .set_expression_attribute_names($write_operation.expression_attribute_names)
            .set_expression_attribute_values($write_operation.expression_attribute_values)
            .set_return_values($write_operation.return_values)
            .table_name($write_operation.table_name)
    };
}

use crate::common;

use aws_sdk_dynamodb::types;
use serde::Serialize;
use serde_dynamo::{Error, Result};
use std::collections;

#[derive(Clone, Debug, Default, PartialEq)]
pub(crate) struct ReadInput {
    pub(crate) consistent_read: Option<bool>,
    pub(crate) expression_attribute_names: Option<collections::HashMap<String, String>>,
    pub(crate) expression_attribute_values:
        Option<collections::HashMap<String, types::AttributeValue>>,
    pub(crate) filter_expression: Option<String>,
    pub(crate) select: Option<types::Select>,
    pub(crate) table_name: String,
}

/// Arguments for reads that may return many documents (Query, Scan).
#[derive(Clone, Debug, PartialEq)]
pub struct ReadArgs<T> {
    /// Whether reads must reflect every write acknowledged before them.
    ///
    /// DynamoDB reads are eventually consistent unless this is `Some(true)`.
    pub consistent_read: Option<bool>,
    /// Filter over persisted element names, evaluated by the store.
    pub filter: Option<common::condition::Filter<T>>,
    /// What to return: `Select::Count` returns only the number of matches.
    pub select: Option<types::Select>,
    /// The table to read from.
    pub table_name: String,
}

impl<T> Default for ReadArgs<T> {
    fn default() -> Self {
        Self {
            consistent_read: None,
            filter: None,
            select: None,
            table_name: String::new(),
        }
    }
}

impl<T: Serialize> TryFrom<ReadArgs<T>> for ReadInput {
    type Error = Error;

    fn try_from(read_args: ReadArgs<T>) -> Result<Self> {
        let filter: Option<common::ExpressionInput> = read_args
            .filter
            .map(|filter| filter.try_into())
            .transpose()?;
        let mut operation = Self {
            consistent_read: read_args.consistent_read,
            select: read_args.select,
            table_name: read_args.table_name,
            ..Default::default()
        };
        if let Some(filter) = filter.filter(|filter| !filter.expression.is_empty()) {
            let expression = filter.merge_into(
                &mut operation.expression_attribute_names,
                &mut operation.expression_attribute_values,
            );
            operation.filter_expression = Some(expression);
        }
        Ok(operation)
    }
}

/// drain a paginator into a single output holding every page's items and counts
#[macro_export]
macro_rules! get_paginated_output {
    ($paginator:expr, $output_type:ty) => {{
        let mut items = Vec::new();
        let mut count = 0;
        let mut scanned_count = 0;
        while let Some(page) = $paginator.next().await {
            let page = page?;
            if let Some(page_items) = page.items {
                items.extend(page_items);
            }
            count += page.count;
            scanned_count += page.scanned_count;
        }
        let output = <$output_type>::builder()
            .set_items(Some(items))
            .set_count(Some(count))
            .set_scanned_count(Some(scanned_count))
            .build();
        Ok(output)
    }};
}

/// apply common read operation settings to a builder
#[macro_export]
macro_rules! apply_read_operation {
    ($builder:expr, $read_operation:expr) => {
        $builder
            .set_consistent_read($read_operation.consistent_read)
            .set_expression_attribute_names($read_operation.expression_attribute_names)
            .set_expression_attribute_values($read_operation.expression_attribute_values)
            .set_filter_expression($read_operation.filter_expression)
            .set_select($read_operation.select)
            .table_name($read_operation.table_name)
    };
}

//! Shared building blocks for talking to the document store.
//!
//! Documents, keys, filters and sort orders are plain data here; the [`read`](crate::read)
//! and [`write`](crate::write) requests turn them into DynamoDB expressions.

/// Filters over document elements, rendered as condition and filter expressions.
pub mod condition;

/// Document identifiers and the `_id` primary key.
pub mod key;

/// Sort orders applied to documents after they are read.
pub mod sort;

use aws_sdk_dynamodb::types;
use std::collections;

/// A persisted document: top-level element names mapped to JSON values.
pub type Document = serde_json::Map<String, serde_json::Value>;

/// Element name under which every document stores its identifier.
pub const ID_ELEMENT: &str = "_id";

pub(crate) fn name_placeholder(element: &str) -> String {
    format!("#{element}")
}

fn join_expressions(left: String, operator: &str, right: String) -> String {
    match (left.is_empty(), right.is_empty()) {
        (true, _) => right,
        (_, true) => left,
        _ => format!("{left}{operator}{right}"),
    }
}

/// An expression together with the placeholders it references.
#[derive(Clone, Debug, Default, PartialEq)]
pub(crate) struct ExpressionInput {
    pub(crate) expression: String,
    pub(crate) expression_attribute_names: collections::HashMap<String, String>,
    pub(crate) expression_attribute_values: collections::HashMap<String, types::AttributeValue>,
}

impl ExpressionInput {
    pub(crate) fn join(operator: &str, inputs: Vec<Self>) -> Self {
        inputs.into_iter().fold(Self::default(), |mut joined, input| {
            joined
                .expression_attribute_names
                .extend(input.expression_attribute_names);
            joined
                .expression_attribute_values
                .extend(input.expression_attribute_values);
            joined.expression = join_expressions(joined.expression, operator, input.expression);
            joined
        })
    }

    /// Move the placeholders into a request's maps and hand back the bare expression.
    pub(crate) fn merge_into(
        self,
        names: &mut Option<collections::HashMap<String, String>>,
        values: &mut Option<collections::HashMap<String, types::AttributeValue>>,
    ) -> String {
        if !self.expression_attribute_names.is_empty() {
            names
                .get_or_insert_with(collections::HashMap::new)
                .extend(self.expression_attribute_names);
        }
        if !self.expression_attribute_values.is_empty() {
            values
                .get_or_insert_with(collections::HashMap::new)
                .extend(self.expression_attribute_values);
        }
        self.expression
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use rstest::rstest;

    fn input(expression: &str, name: &str, value: &str) -> ExpressionInput {
        ExpressionInput {
            expression: expression.to_string(),
            expression_attribute_names: collections::HashMap::from([(
                format!("#{name}"),
                name.to_string(),
            )]),
            expression_attribute_values: collections::HashMap::from([(
                format!(":{value}"),
                types::AttributeValue::S(value.to_string()),
            )]),
        }
    }

    #[rstest]
    #[case::nothing(vec![], "")]
    #[case::single(vec![input("#a = :b", "a", "b")], "#a = :b")]
    #[case::pair(
        vec![
            input("#a = :b", "a", "b"),
            input("#c > :d", "c", "d"),
        ],
        "#a = :b AND #c > :d"
    )]
    fn test_join(#[case] inputs: Vec<ExpressionInput>, #[case] expected: &str) {
        let count = inputs.len();
        let actual = ExpressionInput::join(" AND ", inputs);
        assert_eq!(actual.expression, expected);
        assert_eq!(actual.expression_attribute_names.len(), count);
        assert_eq!(actual.expression_attribute_values.len(), count);
    }

    #[test]
    fn test_merge_into_keeps_existing_placeholders() {
        let mut names = Some(collections::HashMap::from([(
            "#x".to_string(),
            "x".to_string(),
        )]));
        let mut values = None;
        let expression = input("#a = :b", "a", "b").merge_into(&mut names, &mut values);
        assert_eq!(expression, "#a = :b");
        assert_eq!(names.unwrap().len(), 2);
        assert_eq!(values.unwrap().len(), 1);
    }

    #[test]
    fn test_merge_into_leaves_empty_maps_unset() {
        let mut names = None;
        let mut values = None;
        let expression = ExpressionInput::default().merge_into(&mut names, &mut values);
        assert!(expression.is_empty());
        assert_eq!(names, None);
        assert_eq!(values, None);
    }
}

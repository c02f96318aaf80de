use crate::common;

use aws_sdk_dynamodb::types;
use serde::Serialize;
use serde_dynamo::{Error, Result, to_attribute_value};
use std::{collections, ops};

/// Logical operator joining the conditions of a [`Filter`].
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum LogicalOperator {
    /// Every condition must hold.
    And,
    /// At least one condition must hold.
    Or,
}

impl ops::Deref for LogicalOperator {
    type Target = str;

    fn deref(&self) -> &Self::Target {
        match self {
            Self::And => " AND ",
            Self::Or => " OR ",
        }
    }
}

/// Comparison applied to a single document element.
///
/// ```rust
/// use employee_crud::common::condition;
///
/// let above = condition::Condition::GreaterThan(2500);
/// let absent: condition::Condition<i64> = condition::Condition::Null;
/// ```
#[derive(Clone, Debug, PartialEq)]
pub enum Condition<T> {
    /// String element starts with the prefix.
    BeginsWith(String),
    /// Element lies between the two bounds, inclusive.
    Between(T, T),
    /// Element equals the value.
    Equals(T),
    /// Element is strictly greater than the value.
    GreaterThan(T),
    /// Element is greater than or equal to the value.
    GreaterThanOrEqual(T),
    /// Element equals one of the values.
    In(Vec<T>),
    /// Element is strictly less than the value.
    LessThan(T),
    /// Element is less than or equal to the value.
    LessThanOrEqual(T),
    /// Element differs from the value.
    NotEqual(T),
    /// Element is present.
    NotNull,
    /// Element is absent.
    Null,
}

struct Placeholders<'a> {
    field: &'a str,
    name: &'a str,
    index: &'a mut usize,
    values: collections::HashMap<String, types::AttributeValue>,
}

impl Placeholders<'_> {
    fn value<T: Serialize>(&mut self, operator: &str, value: T) -> Result<String> {
        let placeholder = format!(":{}_{}{}", self.field, operator, self.index);
        *self.index += 1;
        self.values
            .insert(placeholder.clone(), to_attribute_value(value)?);
        Ok(placeholder)
    }

    fn comparison<T: Serialize>(
        &mut self,
        operator: &str,
        symbol: &str,
        value: T,
    ) -> Result<String> {
        let placeholder = self.value(operator, value)?;
        Ok(format!("{} {} {}", self.name, symbol, placeholder))
    }
}

impl<T: Serialize> Condition<T> {
    fn render(
        self,
        field: &str,
        index: &mut usize,
    ) -> Result<(String, collections::HashMap<String, types::AttributeValue>)> {
        let name = common::name_placeholder(field);
        let mut placeholders = Placeholders {
            field,
            name: &name,
            index,
            values: collections::HashMap::new(),
        };
        let expression = match self {
            Self::BeginsWith(prefix) => {
                let value = placeholders.value("begins_with", prefix)?;
                format!("begins_with({name}, {value})")
            }
            Self::Between(low, high) => {
                let low = placeholders.value("between", low)?;
                let high = placeholders.value("between", high)?;
                format!("{name} BETWEEN {low} AND {high}")
            }
            Self::Equals(value) => placeholders.comparison("eq", "=", value)?,
            Self::GreaterThan(value) => placeholders.comparison("gt", ">", value)?,
            Self::GreaterThanOrEqual(value) => placeholders.comparison("gte", ">=", value)?,
            Self::In(values) => {
                let mut rendered = Vec::with_capacity(values.len());
                for value in values {
                    rendered.push(placeholders.value("in", value)?);
                }
                format!("{name} IN ({})", rendered.join(", "))
            }
            Self::LessThan(value) => placeholders.comparison("lt", "<", value)?,
            Self::LessThanOrEqual(value) => placeholders.comparison("lte", "<=", value)?,
            Self::NotEqual(value) => placeholders.comparison("ne", "<>", value)?,
            Self::NotNull => format!("attribute_exists({name})"),
            Self::Null => format!("attribute_not_exists({name})"),
        };
        Ok((expression, placeholders.values))
    }
}

/// A condition bound to a named field.
///
/// Filters handed to a [`Collection`](crate::collection::Collection) name entity
/// members; the collection rewrites them to persisted element names.
#[derive(Clone, Debug, PartialEq)]
pub struct FieldCondition<T> {
    /// The condition to evaluate.
    pub condition: Condition<T>,
    /// The member or element the condition applies to.
    pub field: String,
}

impl<T> FieldCondition<T> {
    /// Bind `condition` to `field`.
    pub fn new(field: impl Into<String>, condition: Condition<T>) -> Self {
        Self {
            condition,
            field: field.into(),
        }
    }
}

/// Predicate over documents, expressed as plain data.
///
/// ```rust
/// use employee_crud::common::condition::{Condition, FieldCondition, Filter, LogicalOperator};
///
/// let managers = Filter::Leaves(
///     LogicalOperator::And,
///     vec![FieldCondition::new("Department", Condition::Equals("Management"))],
/// );
/// let rich_or_young = Filter::Nested(
///     LogicalOperator::Or,
///     vec![
///         Filter::field("MonthlyIncome", Condition::GreaterThan("5000")),
///         Filter::field("BirthDate", Condition::GreaterThan("1995-01-01")),
///     ],
/// );
/// ```
#[derive(Clone, Debug, PartialEq)]
pub enum Filter<T> {
    /// Field conditions joined by the operator.
    Leaves(LogicalOperator, Vec<FieldCondition<T>>),
    /// Sub-filters joined by the operator; composite sub-filters are parenthesised.
    Nested(LogicalOperator, Vec<Filter<T>>),
}

impl<T> Filter<T> {
    /// A filter holding exactly one field condition.
    pub fn field(field: impl Into<String>, condition: Condition<T>) -> Self {
        Self::Leaves(
            LogicalOperator::And,
            vec![FieldCondition::new(field, condition)],
        )
    }

    /// Rewrite every field name, stopping at the first rejected one.
    pub fn map_fields<E>(
        self,
        rename: &mut impl FnMut(String) -> Result<String, E>,
    ) -> Result<Self, E> {
        match self {
            Self::Leaves(operator, conditions) => {
                let mut renamed = Vec::with_capacity(conditions.len());
                for FieldCondition { condition, field } in conditions {
                    renamed.push(FieldCondition {
                        condition,
                        field: rename(field)?,
                    });
                }
                Ok(Self::Leaves(operator, renamed))
            }
            Self::Nested(operator, filters) => {
                let mut renamed = Vec::with_capacity(filters.len());
                for filter in filters {
                    renamed.push(filter.map_fields(rename)?);
                }
                Ok(Self::Nested(operator, renamed))
            }
        }
    }

    fn is_composite(&self) -> bool {
        match self {
            Self::Leaves(_, conditions) => conditions.len() > 1,
            Self::Nested(_, filters) => match filters.as_slice() {
                [single] => single.is_composite(),
                _ => !filters.is_empty(),
            },
        }
    }
}

impl<T: Serialize> Filter<T> {
    fn render(self, index: &mut usize) -> Result<common::ExpressionInput> {
        let (operator, inputs) = match self {
            Self::Leaves(operator, conditions) => {
                let mut inputs = Vec::with_capacity(conditions.len());
                for FieldCondition { condition, field } in conditions {
                    let (expression, expression_attribute_values) =
                        condition.render(&field, index)?;
                    inputs.push(common::ExpressionInput {
                        expression,
                        expression_attribute_names: collections::HashMap::from([(
                            common::name_placeholder(&field),
                            field,
                        )]),
                        expression_attribute_values,
                    });
                }
                (operator, inputs)
            }
            Self::Nested(operator, filters) => {
                let wrap = filters.len() > 1;
                let mut inputs = Vec::with_capacity(filters.len());
                for filter in filters {
                    let composite = filter.is_composite();
                    let mut input = filter.render(index)?;
                    if wrap && composite {
                        input.expression = format!("({})", input.expression);
                    }
                    inputs.push(input);
                }
                (operator, inputs)
            }
        };
        Ok(common::ExpressionInput::join(&operator, inputs))
    }
}

impl<T: Serialize> TryFrom<Filter<T>> for common::ExpressionInput {
    type Error = Error;

    fn try_from(filter: Filter<T>) -> Result<Self> {
        filter.render(&mut 0)
    }
}

use crate::common;

use serde_json::Value;
use std::cmp;

/// Direction of a [`SortBy`].
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub enum SortDirection {
    /// Smallest first.
    #[default]
    Ascending,
    /// Largest first.
    Descending,
}

/// Order documents by one field.
///
/// DynamoDB scans come back in storage order, so the collection sorts the
/// persisted documents itself before mapping them back to entities. Numbers
/// compare numerically, strings lexicographically, and documents missing the
/// element sort first.
///
/// ```rust
/// use employee_crud::common::sort::SortBy;
///
/// let by_income = SortBy::ascending("MonthlyIncome");
/// ```
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct SortBy {
    /// Which way to order.
    pub direction: SortDirection,
    /// The member or element to order by.
    pub field: String,
}

impl SortBy {
    /// Order by `field`, smallest first.
    pub fn ascending(field: impl Into<String>) -> Self {
        Self {
            direction: SortDirection::Ascending,
            field: field.into(),
        }
    }

    /// Order by `field`, largest first.
    pub fn descending(field: impl Into<String>) -> Self {
        Self {
            direction: SortDirection::Descending,
            field: field.into(),
        }
    }

    pub(crate) fn sort(&self, documents: &mut [common::Document]) {
        documents.sort_by(|left, right| {
            let ordering = compare_elements(left.get(&self.field), right.get(&self.field));
            match self.direction {
                SortDirection::Ascending => ordering,
                SortDirection::Descending => ordering.reverse(),
            }
        });
    }
}

fn rank(value: &Value) -> u8 {
    match value {
        Value::Null => 0,
        Value::Number(_) => 1,
        Value::String(_) => 2,
        Value::Object(_) => 3,
        Value::Array(_) => 4,
        Value::Bool(_) => 5,
    }
}

fn compare_elements(left: Option<&Value>, right: Option<&Value>) -> cmp::Ordering {
    match (left, right) {
        (None, None) => cmp::Ordering::Equal,
        (None, Some(_)) => cmp::Ordering::Less,
        (Some(_), None) => cmp::Ordering::Greater,
        (Some(Value::Number(left)), Some(Value::Number(right))) => {
            match (left.as_i64(), right.as_i64()) {
                (Some(left), Some(right)) => left.cmp(&right),
                _ => {
                    let left = left.as_f64().unwrap_or(f64::NAN);
                    let right = right.as_f64().unwrap_or(f64::NAN);
                    left.total_cmp(&right)
                }
            }
        }
        (Some(Value::String(left)), Some(Value::String(right))) => left.cmp(right),
        (Some(Value::Bool(left)), Some(Value::Bool(right))) => left.cmp(right),
        (Some(left), Some(right)) => rank(left).cmp(&rank(right)),
    }
}

//! The demonstration: seed a fresh collection and walk it through every CRUD operation.

use crate::{
    collection::{self, Collection, Database, DeleteOutcome, ReplaceOutcome},
    common::{
        condition::{Condition, Filter},
        sort,
    },
    employee::{Department, Employee},
    error::{Error, Result},
};

use chrono::NaiveDate;

/// Collection the demonstration works on.
pub const COLLECTION_NAME: &str = "Employees";

/// Income added to Martha in the update step.
pub const RAISE: i64 = 200;

/// Everything the demonstration observed, step by step.
#[derive(Clone, Debug, PartialEq)]
pub struct Demonstration {
    /// Peter, inserted alone.
    pub peter: Employee,
    /// Martha, inserted in the batch.
    pub martha: Employee,
    /// Andrew, inserted in the batch.
    pub andrew: Employee,
    /// Documents after the inserts.
    pub count: u64,
    /// `MonthlyIncome > 2500`, ascending by `MonthlyIncome`.
    pub high_earners: Vec<Employee>,
    /// `Department == Management`.
    pub management: Vec<Employee>,
    /// `BirthDate > 1989-01-01`.
    pub born_after_1989: Vec<Employee>,
    /// Martha, looked up by identifier.
    pub martha_by_id: Option<Employee>,
    /// Replacing Martha after the raise.
    pub replaced: ReplaceOutcome,
    /// Documents after the replace.
    pub count_after_replace: u64,
    /// Deleting Andrew.
    pub deleted: DeleteOutcome,
    /// Documents after the delete.
    pub remaining: u64,
}

fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).expect("seed dates are valid calendar dates")
}

/// The three employees the demonstration seeds, none persisted yet.
pub fn employees() -> [Employee; 3] {
    [
        Employee::new("Peter", date(1980, 1, 20), 2000, Department::Management),
        Employee::new("Martha", date(1990, 3, 23), 3000, Department::HumanResources),
        Employee::new("Andrew", date(1988, 5, 6), 4000, Department::Management),
    ]
}

/// Drop and recreate the demonstration's collection.
pub async fn reset(database: &Database) -> Result<Collection<Employee>> {
    database.drop_collection(COLLECTION_NAME).await?;
    database.collection(COLLECTION_NAME).await
}

async fn find(
    employees: &Collection<Employee>,
    filter: Filter<impl serde::Serialize>,
    sort_by: Option<sort::SortBy>,
) -> Result<Vec<Employee>> {
    let options = collection::FindOptions {
        filter: Some(filter),
        sort: sort_by,
    };
    employees.find(options).await
}

/// Run the demonstration against `database`, replacing whatever its collection held.
#[cfg_attr(
    feature = "tracing",
    tracing::instrument(name = "employee_crud.seed", skip_all, fields(database = database.name()), err)
)]
pub async fn run(database: &Database) -> Result<Demonstration> {
    let employees = reset(database).await?;
    let [mut peter, martha, andrew] = self::employees();

    employees.insert_one(&mut peter).await?;
    #[cfg(feature = "tracing")]
    tracing::info!(id = ?peter.id, "inserted Peter");

    let mut batch = [martha, andrew];
    employees.insert_many(&mut batch).await?;
    #[cfg(feature = "tracing")]
    tracing::info!(inserted = batch.len(), "inserted Martha and Andrew");
    let [mut martha, andrew] = batch;

    let count = employees.count().await?;
    #[cfg(feature = "tracing")]
    tracing::info!(count, "counted employees");

    let high_earners = find(
        &employees,
        Filter::field("MonthlyIncome", Condition::GreaterThan(2500)),
        Some(sort::SortBy::ascending("MonthlyIncome")),
    )
    .await?;
    let management = find(
        &employees,
        Filter::field("Department", Condition::Equals(Department::Management)),
        None,
    )
    .await?;
    let born_after_1989 = find(
        &employees,
        Filter::field("BirthDate", Condition::GreaterThan(date(1989, 1, 1))),
        None,
    )
    .await?;
    #[cfg(feature = "tracing")]
    tracing::info!(
        high_earners = high_earners.len(),
        management = management.len(),
        born_after_1989 = born_after_1989.len(),
        "ran filtered queries"
    );

    let martha_id = martha.id.clone().ok_or(Error::MissingId)?;
    let martha_by_id = employees.find_by_id(&martha_id).await?;

    martha.monthly_income += RAISE;
    let replaced = employees.replace_one(&martha).await?;
    #[cfg(feature = "tracing")]
    tracing::info!(matched = replaced.matched, "replaced Martha");
    let count_after_replace = employees.count().await?;

    let andrew_id = andrew.id.clone().ok_or(Error::MissingId)?;
    let deleted = employees.delete_one(&andrew_id).await?;
    #[cfg(feature = "tracing")]
    tracing::info!(deleted = deleted.deleted, "deleted Andrew");

    let remaining = employees.count().await?;
    Ok(Demonstration {
        peter,
        martha,
        andrew,
        count,
        high_earners,
        management,
        born_after_1989,
        martha_by_id,
        replaced,
        count_after_replace,
        deleted,
        remaining,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_employees_are_unpersisted() {
        let employees = employees();
        assert!(employees.iter().all(|employee| employee.id.is_none()));
        let names: Vec<_> = employees.iter().map(|employee| employee.name.as_str()).collect();
        assert_eq!(names, ["Peter", "Martha", "Andrew"]);
    }

    #[test]
    fn test_dates_are_valid() {
        let [peter, martha, andrew] = employees();
        assert_eq!(peter.birth_date.to_string(), "1980-01-20");
        assert_eq!(martha.birth_date.to_string(), "1990-03-23");
        assert_eq!(andrew.birth_date.to_string(), "1988-05-06");
    }
}

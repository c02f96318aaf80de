use employee_crud::{
    collection::{Collection, Database, DeleteOutcome, FindOptions, ReplaceOutcome},
    common::{
        condition::{Condition, FieldCondition, Filter, LogicalOperator},
        key,
    },
    config,
    employee::{self, Department, Employee},
    read, seed,
};

use chrono::NaiveDate;
use serde_json::Value;

fn database() -> Database {
    employee::define_class_maps().unwrap();
    let name = format!("Test_{}", uuid::Uuid::new_v4().simple());
    let connection: config::ConnectionString = format!("localhost:8000/{name}").parse().unwrap();
    Database::connect(&connection)
}

async fn employees(database: &Database) -> Collection<Employee> {
    seed::reset(database).await.unwrap()
}

fn ids(employees: &[Employee]) -> Vec<key::DocumentId> {
    let mut ids: Vec<_> = employees
        .iter()
        .map(|employee| employee.id.clone().unwrap())
        .collect();
    ids.sort();
    ids
}

#[tokio::test]
#[ignore = "Requires DynamoDB Local on localhost:8000"]
async fn test_demonstration_observes_every_step() {
    let database = database();
    let report = seed::run(&database).await.unwrap();

    assert_eq!(report.count, 3);

    let incomes: Vec<_> = report
        .high_earners
        .iter()
        .map(|employee| employee.monthly_income)
        .collect();
    assert_eq!(incomes, vec![3000, 4000]);

    assert_eq!(
        ids(&report.management),
        ids(&[report.peter.clone(), report.andrew.clone()])
    );
    assert!(
        report
            .management
            .iter()
            .all(|employee| employee.department == Department::Management)
    );

    assert_eq!(ids(&report.born_after_1989), ids(&[report.martha.clone()]));

    let martha_by_id = report.martha_by_id.clone().unwrap();
    assert_eq!(martha_by_id.id, report.martha.id);
    assert_eq!(martha_by_id.monthly_income, 3000);
    assert!(martha_by_id.name.is_empty());

    assert_eq!(report.replaced, ReplaceOutcome { matched: 1 });
    assert_eq!(report.count_after_replace, 3);
    assert_eq!(report.deleted, DeleteOutcome { deleted: 1 });
    assert_eq!(report.remaining, 2);

    let employees = database
        .collection::<Employee>(seed::COLLECTION_NAME)
        .await
        .unwrap();
    let martha = employees
        .find_by_id(report.martha.id.as_ref().unwrap())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(martha.monthly_income, 3000 + seed::RAISE);
    let peter = employees
        .find_by_id(report.peter.id.as_ref().unwrap())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(peter.monthly_income, 2000);
    assert_eq!(peter.department, Department::Management);
    assert_eq!(
        employees
            .find_by_id(report.andrew.id.as_ref().unwrap())
            .await
            .unwrap(),
        None
    );

    database.drop_collection(seed::COLLECTION_NAME).await.unwrap();
}

#[tokio::test]
#[ignore = "Requires DynamoDB Local on localhost:8000"]
async fn test_demonstration_twice_starts_from_scratch() {
    let database = database();
    let first = seed::run(&database).await.unwrap();
    let second = seed::run(&database).await.unwrap();
    assert_eq!(first.count, 3);
    assert_eq!(second.count, 3);
    assert_eq!(second.remaining, 2);
    database.drop_collection(seed::COLLECTION_NAME).await.unwrap();
}

#[tokio::test]
#[ignore = "Requires DynamoDB Local on localhost:8000"]
async fn test_drop_missing_collection_succeeds() {
    let database = database();
    database.drop_collection("Missing").await.unwrap();
    database.drop_collection("Missing").await.unwrap();
}

#[tokio::test]
#[ignore = "Requires DynamoDB Local on localhost:8000"]
async fn test_insert_round_trips_everything_but_name() {
    let database = database();
    let employees = employees(&database).await;
    let mut peter = Employee::new(
        "Peter",
        NaiveDate::from_ymd_opt(1980, 1, 20).unwrap(),
        2000,
        Department::Management,
    );
    let id = employees.insert_one(&mut peter).await.unwrap();
    assert_eq!(peter.id.as_ref(), Some(&id));

    let stored = employees.find_by_id(&id).await.unwrap().unwrap();
    assert_eq!(
        stored,
        Employee {
            name: String::new(),
            ..peter.clone()
        }
    );
    assert!(employees.insert_one(&mut peter).await.is_err());
    assert_eq!(employees.count().await.unwrap(), 1);

    database.drop_collection(seed::COLLECTION_NAME).await.unwrap();
}

#[tokio::test]
#[ignore = "Requires DynamoDB Local on localhost:8000"]
async fn test_stored_documents_use_element_names() {
    let database = database();
    let employees = employees(&database).await;
    let mut batch = seed::employees();
    employees.insert_many(&mut batch).await.unwrap();

    let scan: read::scan::Scan<Value> = read::scan::Scan {
        read_args: read::common::ReadArgs {
            consistent_read: Some(true),
            table_name: employees.table_name().to_string(),
            ..Default::default()
        },
    };
    let items = scan.send(database.client()).await.unwrap().items.unwrap();
    assert_eq!(items.len(), 3);
    for item in items {
        let mut elements: Vec<_> = item.keys().map(String::as_str).collect();
        elements.sort_unstable();
        assert_eq!(elements, ["BirthDate", "Department", "Income", "_id"]);
    }

    database.drop_collection(seed::COLLECTION_NAME).await.unwrap();
}

#[tokio::test]
#[ignore = "Requires DynamoDB Local on localhost:8000"]
async fn test_find_combines_filters() {
    let database = database();
    let employees = employees(&database).await;
    let mut batch = seed::employees();
    employees.insert_many(&mut batch).await.unwrap();

    let filter = Filter::Leaves(
        LogicalOperator::And,
        vec![
            FieldCondition::new(
                "Department",
                Condition::Equals(Value::from("Management")),
            ),
            FieldCondition::new(
                "MonthlyIncome",
                Condition::GreaterThanOrEqual(Value::from(3000)),
            ),
        ],
    );
    let found = employees
        .find(FindOptions {
            filter: Some(filter),
            sort: None,
        })
        .await
        .unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].monthly_income, 4000);

    let none = employees
        .find_one(Filter::field("MonthlyIncome", Condition::GreaterThan(10_000)))
        .await
        .unwrap();
    assert_eq!(none, None);

    database.drop_collection(seed::COLLECTION_NAME).await.unwrap();
}

#[tokio::test]
#[ignore = "Requires DynamoDB Local on localhost:8000"]
async fn test_missing_identifier_is_a_no_op() {
    let database = database();
    let employees = employees(&database).await;
    let mut batch = seed::employees();
    employees.insert_many(&mut batch).await.unwrap();

    let mut ghost = Employee::new(
        "Ghost",
        NaiveDate::from_ymd_opt(2000, 1, 1).unwrap(),
        1,
        Department::Sales,
    );
    ghost.id = Some(key::DocumentId::generate());

    assert_eq!(
        employees.replace_one(&ghost).await.unwrap(),
        ReplaceOutcome { matched: 0 }
    );
    assert_eq!(
        employees
            .delete_one(ghost.id.as_ref().unwrap())
            .await
            .unwrap(),
        DeleteOutcome { deleted: 0 }
    );
    assert_eq!(employees.count().await.unwrap(), 3);
    assert_eq!(
        employees
            .find_by_id(ghost.id.as_ref().unwrap())
            .await
            .unwrap(),
        None
    );

    database.drop_collection(seed::COLLECTION_NAME).await.unwrap();
}

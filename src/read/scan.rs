use crate::read;

use aws_sdk_dynamodb::{Client, error, operation};
use serde::Serialize;
use serde_dynamo::{Error, Result};

/// scan operation
#[derive(Clone, Debug, Default, PartialEq)]
struct ScanInput {
    read_operation: read::common::ReadInput,
}

/// Scan every page of a table.
///
/// ```rust,no_run
/// use aws_sdk_dynamodb::{Client, types};
/// use employee_crud::read;
/// use serde_json::Value;
///
/// # async fn example(client: &Client) -> Result<(), Box<dyn std::error::Error>> {
/// let scan: read::scan::Scan<Value> = read::scan::Scan {
///     read_args: read::common::ReadArgs {
///         select: Some(types::Select::Count),
///         table_name: "EmployeeDB.Employees".to_string(),
///         ..Default::default()
///     },
/// };
/// let total = scan.send(client).await?.count;
/// # Ok(())
/// # }
/// ```
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Scan<T> {
    /// Table, filter and projection of the scan.
    pub read_args: read::common::ReadArgs<T>,
}

impl<T: Serialize> TryFrom<Scan<T>> for ScanInput {
    type Error = Error;

    fn try_from(scan: Scan<T>) -> Result<Self> {
        let read_operation = scan.read_args.try_into()?;
        Ok(Self { read_operation })
    }
}

impl<T: Serialize> Scan<T> {
    /// Execute the scan, following pagination to the end of the table.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(name = "employee_crud.scan", skip_all, err)
    )]
    pub async fn send(
        self,
        client: &Client,
    ) -> Result<operation::scan::ScanOutput, error::SdkError<operation::scan::ScanError>> {
        let scan: ScanInput = self.try_into().map_err(error::BuildError::other)?;
        let mut paginator = crate::apply_read_operation!(client.scan(), scan.read_operation)
            .into_paginator()
            .send();
        crate::get_paginated_output!(paginator, operation::scan::ScanOutput)
    }
}

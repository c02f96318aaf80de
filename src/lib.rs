#![deny(missing_docs)]
#![deny(warnings)]

//! # Employee CRUD
//!
//! A walkthrough of create, read, update and delete on a collection of
//! [`Employee`](employee::Employee) records stored in Amazon DynamoDB.
//!
//! ## Overview
//!
//! Every collection is one table keyed by the string element `_id`. Between
//! an entity and its stored document sits an explicit
//! [`ClassMap`](mapping::ClassMap): it renames members, omits members that
//! must not be persisted, and translates filters and sort orders written
//! against member names into element names.
//!
//! ```text
//! Employee { Id, Name, BirthDate, MonthlyIncome, Department }
//!        │ class map: Name omitted, MonthlyIncome → Income
//!        ▼
//! { _id, BirthDate, Income, Department }
//! ```
//!
//! ## Quick Example
//!
//! ```no_run
//! use employee_crud::{
//!     collection::{Database, FindOptions},
//!     common::{condition::{Condition, Filter}, sort::SortBy},
//!     config, employee,
//! };
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! employee::define_class_maps()?;
//! let connection: config::ConnectionString = config::DEFAULT_CONNECTION_STRING.parse()?;
//! let database = Database::connect(&connection);
//! let employees = database.collection::<employee::Employee>("Employees").await?;
//! let high_earners = employees
//!     .find(FindOptions {
//!         filter: Some(Filter::field("MonthlyIncome", Condition::GreaterThan(2500))),
//!         sort: Some(SortBy::ascending("MonthlyIncome")),
//!     })
//!     .await?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Modules
//!
//! - [`collection`]: `Database` and typed `Collection` operations
//! - [`mapping`]: class maps and the registry holding them
//! - [`common`], [`read`], [`write`], [`table`]: the DynamoDB requests the collection is built on
//! - [`seed`]: the demonstration sequence the binary runs
//!
//! ## Feature Flags
//!
//! - `tracing` (default): spans around every store request, and the binary

/// `Database` and typed `Collection` operations.
pub mod collection;

/// Documents, identifiers, conditions and sort orders shared by every request.
pub mod common;

/// Connection strings.
pub mod config;

/// The `Employee` entity and its class map.
pub mod employee;

/// The contract of a storable entity.
pub mod entity;

/// Errors raised by this crate.
pub mod error;

/// Class maps between entities and stored documents.
pub mod mapping;

/// Read operations: scan and query.
pub mod read;

/// The demonstration sequence.
pub mod seed;

/// Table lifecycle: create and delete.
pub mod table;

/// Write operations: put, delete and batch write.
pub mod write;

pub use error::{Error, Result};

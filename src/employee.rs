//! The `Employee` record and its persisted shape.
//!
//! In memory an employee carries a name; the stored document does not, and
//! stores the monthly income under `Income`:
//!
//! ```text
//! { _id: "…", BirthDate: "1990-03-23", Income: 3000, Department: "HumanResources" }
//! ```

use crate::{
    common::key,
    entity::Entity,
    mapping::{self, MappingError, Registration},
};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Department an employee belongs to; persisted as the variant name.
#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, Hash, PartialEq, Serialize)]
pub enum Department {
    /// Management.
    #[default]
    Management,
    /// Human resources.
    HumanResources,
    /// Finance.
    Finance,
    /// Engineering.
    Engineering,
    /// Sales.
    Sales,
}

/// An employee of the company.
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct Employee {
    /// Assigned on first insert.
    pub id: Option<key::DocumentId>,
    /// Not persisted; empty after a read.
    #[serde(default)]
    pub name: String,
    /// Date of birth.
    pub birth_date: NaiveDate,
    /// Gross monthly income, persisted as `Income`.
    pub monthly_income: i64,
    /// Department.
    pub department: Department,
}

impl Employee {
    /// A not yet persisted employee.
    pub fn new(
        name: impl Into<String>,
        birth_date: NaiveDate,
        monthly_income: i64,
        department: Department,
    ) -> Self {
        Self {
            id: None,
            name: name.into(),
            birth_date,
            monthly_income,
            department,
        }
    }
}

impl Entity for Employee {
    const MEMBERS: &'static [&'static str] = &[
        "Id",
        "Name",
        "BirthDate",
        "MonthlyIncome",
        "Department",
    ];

    fn id(&self) -> Option<&key::DocumentId> {
        self.id.as_ref()
    }

    fn set_id(&mut self, id: key::DocumentId) {
        self.id = Some(id);
    }
}

/// The persisted shape of [`Employee`]: no `Name`, `MonthlyIncome` stored as `Income`.
pub fn employee_class_map() -> Result<mapping::ClassMap, MappingError> {
    mapping::ClassMap::builder::<Employee>()
        .unmap_member("Name")
        .map_member("MonthlyIncome", "Income")
        .build()
}

/// Register the class maps of this crate's entities with `registry`.
///
/// Must run before the first collection is opened: a collection opened
/// earlier freezes the default mapping and this then fails with
/// [`MappingError::Conflict`]. Running it again is a no-op.
pub fn define_class_maps_in(
    registry: &mapping::ClassMapRegistry,
) -> Result<Registration, MappingError> {
    registry.register(employee_class_map()?)
}

/// [`define_class_maps_in`] the process-wide registry.
pub fn define_class_maps() -> Result<Registration, MappingError> {
    define_class_maps_in(mapping::class_maps())
}

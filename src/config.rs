//! Where the store lives and which database to use.

use crate::error::Error;

use std::{fmt, str};

/// The store the demonstration connects to when none is given.
pub const DEFAULT_CONNECTION_STRING: &str = "localhost:8000/EmployeeDB";

const DEFAULT_SCHEME: &str = "http://";

/// A parsed `[scheme://]host:port/database` connection string.
///
/// ```rust
/// use employee_crud::config::ConnectionString;
///
/// let connection: ConnectionString = "localhost:8000/EmployeeDB".parse().unwrap();
/// assert_eq!(connection.endpoint_url, "http://localhost:8000");
/// assert_eq!(connection.table_name("Employees"), "EmployeeDB.Employees");
/// ```
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct ConnectionString {
    /// Endpoint of the store, always with a scheme.
    pub endpoint_url: String,
    /// Namespace prefixed to every collection's table.
    pub database: String,
}

impl ConnectionString {
    /// The table holding `collection` in this database.
    pub fn table_name(&self, collection: &str) -> String {
        format!("{}.{}", self.database, collection)
    }
}

impl Default for ConnectionString {
    fn default() -> Self {
        Self {
            endpoint_url: format!("{DEFAULT_SCHEME}localhost:8000"),
            database: "EmployeeDB".to_string(),
        }
    }
}

fn is_name_character(character: char) -> bool {
    character.is_ascii_alphanumeric() || matches!(character, '_' | '-' | '.')
}

impl str::FromStr for ConnectionString {
    type Err = Error;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let invalid = || Error::InvalidConnectionString(value.to_string());
        let (scheme, rest) = match value.split_once("://") {
            Some(("http", rest)) => ("http://", rest),
            Some(("https", rest)) => ("https://", rest),
            Some(_) => return Err(invalid()),
            None => (DEFAULT_SCHEME, value),
        };
        let (host, database) = rest.split_once('/').ok_or_else(invalid)?;
        if host.is_empty()
            || database.is_empty()
            || !database.chars().all(is_name_character)
        {
            return Err(invalid());
        }
        Ok(Self {
            endpoint_url: format!("{scheme}{host}"),
            database: database.to_string(),
        })
    }
}

impl fmt::Display for ConnectionString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.endpoint_url, self.database)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use rstest::rstest;

    #[rstest]
    #[case::default_scheme("localhost:8000/EmployeeDB", "http://localhost:8000", "EmployeeDB")]
    #[case::explicit_http("http://db:8000/Staff", "http://db:8000", "Staff")]
    #[case::explicit_https("https://dynamodb.eu-west-1.amazonaws.com/Hr_2", "https://dynamodb.eu-west-1.amazonaws.com", "Hr_2")]
    fn test_parse(#[case] input: &str, #[case] endpoint_url: &str, #[case] database: &str) {
        let connection: ConnectionString = input.parse().unwrap();
        assert_eq!(connection.endpoint_url, endpoint_url);
        assert_eq!(connection.database, database);
    }

    #[rstest]
    #[case::no_database("localhost:8000")]
    #[case::empty_database("localhost:8000/")]
    #[case::empty_host("/EmployeeDB")]
    #[case::nested_database("localhost:8000/a/b")]
    #[case::unknown_scheme("mongodb://localhost:27017/EmployeeDB")]
    fn test_parse_rejects(#[case] input: &str) {
        assert!(matches!(
            input.parse::<ConnectionString>(),
            Err(Error::InvalidConnectionString(rejected)) if rejected == input
        ));
    }

    #[test]
    fn test_default_matches_default_connection_string() {
        let parsed: ConnectionString = DEFAULT_CONNECTION_STRING.parse().unwrap();
        assert_eq!(parsed, ConnectionString::default());
        assert_eq!(parsed.table_name("Employees"), "EmployeeDB.Employees");
    }
}

//! Resource identifier types with validation
//!
//! Newtype wrappers for the names and keys used to address Cosmos DB
//! resources. Each type ensures type safety and rejects values the service
//! would refuse, before a request is made.

use super::errors::NosqlError;
use super::result::Result;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

const MAX_RESOURCE_ID_LEN: usize = 255;
const FORBIDDEN_ID_CHARS: [char; 4] = ['/', '\\', '#', '?'];

fn validate_resource_id(kind: &str, id: &str) -> Result<()> {
    if id.trim().is_empty() {
        return Err(NosqlError::Validation(format!("{kind} cannot be empty")));
    }

    if id.chars().count() > MAX_RESOURCE_ID_LEN {
        return Err(NosqlError::Validation(format!(
            "{kind} cannot exceed {MAX_RESOURCE_ID_LEN} characters"
        )));
    }

    if let Some(c) = id.chars().find(|c| FORBIDDEN_ID_CHARS.contains(c)) {
        return Err(NosqlError::Validation(format!(
            "{kind} '{id}' contains forbidden character '{c}'"
        )));
    }

    if id.ends_with(' ') {
        return Err(NosqlError::Validation(format!(
            "{kind} '{id}' cannot end with a space"
        )));
    }

    Ok(())
}

/// Database name newtype wrapper
///
/// # Examples
///
/// ```
/// use cosmos_nosql::domain::ids::DatabaseName;
///
/// let name = DatabaseName::new("testdb").unwrap();
/// assert_eq!(name.as_str(), "testdb");
/// assert!(DatabaseName::new("a/b").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DatabaseName(String);

impl DatabaseName {
    /// Creates a new DatabaseName, rejecting names the service would refuse
    pub fn new(name: impl Into<String>) -> Result<Self> {
        let name = name.into();
        validate_resource_id("Database name", &name)?;
        Ok(Self(name))
    }

    /// Returns the name as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Container name newtype wrapper
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ContainerName(String);

impl ContainerName {
    /// Creates a new ContainerName, rejecting names the service would refuse
    pub fn new(name: impl Into<String>) -> Result<Self> {
        let name = name.into();
        validate_resource_id("Container name", &name)?;
        Ok(Self(name))
    }

    /// Returns the name as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Item identifier (the document's `id` field)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ItemId(String);

impl ItemId {
    /// Creates a new ItemId
    pub fn new(id: impl Into<String>) -> Result<Self> {
        let id = id.into();
        validate_resource_id("Item id", &id)?;
        Ok(Self(id))
    }

    /// Returns the id as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes self and returns the inner String
    pub fn into_inner(self) -> String {
        self.0
    }
}

/// Partition key path of a container definition, e.g. `/email`
///
/// # Examples
///
/// ```
/// use cosmos_nosql::domain::ids::PartitionKeyPath;
///
/// assert!(PartitionKeyPath::new("/email").is_ok());
/// assert!(PartitionKeyPath::new("email").is_err());
/// assert!(PartitionKeyPath::new("/").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PartitionKeyPath(String);

impl PartitionKeyPath {
    /// Creates a new PartitionKeyPath
    pub fn new(path: impl Into<String>) -> Result<Self> {
        let path = path.into();
        if !path.starts_with('/') {
            return Err(NosqlError::Validation(format!(
                "Partition key path '{path}' must start with '/'"
            )));
        }
        if path[1..].split('/').any(|segment| segment.trim().is_empty()) {
            return Err(NosqlError::Validation(format!(
                "Partition key path '{path}' contains an empty segment"
            )));
        }
        Ok(Self(path))
    }

    /// Parses an ordered, non-empty list of paths
    pub fn parse_all<S: AsRef<str>>(paths: &[S]) -> Result<Vec<Self>> {
        if paths.is_empty() {
            return Err(NosqlError::Validation(
                "At least one partition key path is required".to_string(),
            ));
        }
        paths.iter().map(|p| Self::new(p.as_ref())).collect()
    }

    /// Returns the path as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Field name addressed by a single-segment path (`/email` -> `email`)
    pub fn field_name(&self) -> &str {
        &self.0[1..]
    }
}

/// Partition key value used to route an item operation
///
/// Any string is accepted, including the empty string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PartitionKeyValue(String);

impl PartitionKeyValue {
    /// Creates a new PartitionKeyValue
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Returns the value as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for PartitionKeyValue {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for PartitionKeyValue {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}

impl From<&String> for PartitionKeyValue {
    fn from(value: &String) -> Self {
        Self::new(value.as_str())
    }
}

macro_rules! impl_string_traits {
    ($($ty:ident),*) => {
        $(
            impl fmt::Display for $ty {
                fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                    write!(f, "{}", self.0)
                }
            }

            impl AsRef<str> for $ty {
                fn as_ref(&self) -> &str {
                    &self.0
                }
            }
        )*
    };
}

impl_string_traits!(
    DatabaseName,
    ContainerName,
    ItemId,
    PartitionKeyPath,
    PartitionKeyValue
);

impl FromStr for DatabaseName {
    type Err = NosqlError;

    fn from_str(s: &str) -> Result<Self> {
        Self::new(s)
    }
}

impl FromStr for ContainerName {
    type Err = NosqlError;

    fn from_str(s: &str) -> Result<Self> {
        Self::new(s)
    }
}

impl FromStr for ItemId {
    type Err = NosqlError;

    fn from_str(s: &str) -> Result<Self> {
        Self::new(s)
    }
}

impl FromStr for PartitionKeyPath {
    type Err = NosqlError;

    fn from_str(s: &str) -> Result<Self> {
        Self::new(s)
    }
}

use std::fmt;

use crate::{ColumnName, ColumnNameRef, TableName, TableNameRef};

/// An error that occurred while registering the naming scheme for a legacy table
///
/// These errors indicate a misconfigured naming strategy. They are raised while
/// the table is being set up and are not meant to be retried.
#[derive(Debug, thiserror::Error)]
#[repr(transparent)]
#[error(transparent)]
pub struct Error(Box<InnerError>);

impl Error {
    /// Returns the transform error, if the naming strategy produced an empty name
    pub fn as_transform_error(&self) -> Option<&TransformError> {
        match &*self.0 {
            InnerError::Transform(e) => Some(e),
            _ => None,
        }
    }

    /// Returns the collision error, if two columns were given the same name
    pub fn as_collision_error(&self) -> Option<&CollisionError> {
        match &*self.0 {
            InnerError::Collision(e) => Some(e),
            _ => None,
        }
    }

    /// Returns true if the naming strategy produced an empty name for a column
    #[inline]
    pub fn is_transform_error(&self) -> bool {
        self.as_transform_error().is_some()
    }

    /// Returns true if two columns were given the same transformed name
    #[inline]
    pub fn is_collision_error(&self) -> bool {
        self.as_collision_error().is_some()
    }

    /// Returns true if a built-in naming strategy could not be identified
    pub fn is_unknown_strategy(&self) -> bool {
        matches!(&*self.0, InnerError::UnknownStrategy(_))
    }
}

impl<T> From<T> for Error
where
    T: Into<InnerError>,
{
    fn from(e: T) -> Self {
        Self(Box::new(e.into()))
    }
}

#[derive(Debug, thiserror::Error)]
pub(crate) enum InnerError {
    #[error(transparent)]
    Transform(#[from] TransformError),
    #[error(transparent)]
    Collision(#[from] CollisionError),
    #[error(transparent)]
    UnknownStrategy(#[from] UnknownStrategyError),
}

/// The naming strategy produced an empty name for a column
#[derive(Debug, thiserror::Error)]
#[error("naming strategy produced no name for column `{column}`{}", OnTable(.table.as_deref()))]
pub struct TransformError {
    table: Option<TableName>,
    column: ColumnName,
}

impl TransformError {
    #[inline]
    pub(crate) fn new(table: Option<TableName>, column: ColumnName) -> Self {
        Self { table, column }
    }

    /// The table being registered, if one was named
    #[inline]
    pub fn table(&self) -> Option<&TableNameRef> {
        self.table.as_deref()
    }

    /// The legacy column that could not be transformed
    #[inline]
    pub fn column(&self) -> &ColumnNameRef {
        &self.column
    }
}

/// Two legacy columns would be addressed by the same name
#[derive(Debug, thiserror::Error)]
#[error(
    "columns `{first}` and `{second}` are both addressed by `{transformed}`{}",
    OnTable(.table.as_deref())
)]
pub struct CollisionError {
    table: Option<TableName>,
    first: ColumnName,
    second: ColumnName,
    transformed: String,
}

impl CollisionError {
    #[inline]
    pub(crate) fn new(
        table: Option<TableName>,
        first: ColumnName,
        second: ColumnName,
        transformed: String,
    ) -> Self {
        Self {
            table,
            first,
            second,
            transformed,
        }
    }

    /// The table being registered, if one was named
    #[inline]
    pub fn table(&self) -> Option<&TableNameRef> {
        self.table.as_deref()
    }

    /// The two colliding columns, in column definition order
    #[inline]
    pub fn columns(&self) -> (&ColumnNameRef, &ColumnNameRef) {
        (&self.first, &self.second)
    }

    /// The transformed name both columns mapped to
    #[inline]
    pub fn transformed(&self) -> &str {
        &self.transformed
    }
}

/// The name of a built-in naming strategy was not recognized
#[derive(Debug, thiserror::Error)]
#[error("unknown naming strategy `{name}`")]
pub struct UnknownStrategyError {
    name: String,
}

impl UnknownStrategyError {
    #[inline]
    pub(crate) fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    /// The name that failed to parse
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }
}

struct OnTable<'a>(Option<&'a TableNameRef>);

impl fmt::Display for OnTable<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Some(table) => write!(f, " on table `{table}`"),
            None => Ok(()),
        }
    }
}

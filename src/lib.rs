//! Friendly attribute names over legacy database column names
//!
//! Legacy schemas often carry column names that do not fit the conventions of
//! the application reading them: `EmployeeID`, `HIRE_DATE`, `tblStatus`. This
//! crate lets application code address those columns by a transformed name,
//! such as `employee_id`, while the database keeps the legacy names.
//!
//! Three pieces make this work:
//!
//! * a [`NameMapper`], built once per table by applying a
//!   [`NamingStrategy`][naming::NamingStrategy] to the table's columns, which
//!   translates between the two naming schemes;
//! * [`rewrite()`][rewrite::rewrite()], which replaces transformed names in
//!   generated SQL with their legacy names before the statement is executed;
//! * [`TransformedAttributes`][attributes::TransformedAttributes], which reads
//!   and writes a record's attributes by transformed name.
//!
//! # Example
//!
//! ```
//! use std::collections::HashMap;
//!
//! use colalias::{
//!     naming::Builtin, LegacyTable, LegacyTableExt, NameMapper, TableNameRef,
//!     TransformOptions,
//! };
//!
//! struct Employees;
//!
//! impl LegacyTable for Employees {
//!     const TABLE_NAME: &'static TableNameRef = TableNameRef::from_static("EMPLOYEES");
//!     const COLUMN_NAMES: &'static [&'static str] = &["EmployeeID", "FullName", "HireDate"];
//!
//!     fn transform_options() -> TransformOptions {
//!         TransformOptions::new(Builtin::Underscore)
//!     }
//!
//!     fn name_mapper() -> &'static NameMapper {
//!         colalias::once_name_mapper!(Employees)
//!     }
//! }
//!
//! assert_eq!(Employees::resolve("hire_date"), "HireDate");
//! assert_eq!(
//!     Employees::rewrite_sql("SELECT full_name FROM EMPLOYEES ORDER BY hire_date"),
//!     "SELECT FullName FROM EMPLOYEES ORDER BY HireDate",
//! );
//!
//! let row = HashMap::from([("FullName".to_owned(), "Ada".to_owned())]);
//! assert_eq!(Employees::attributes(&row).get("full_name").unwrap(), "Ada");
//! ```
#![warn(missing_docs)]
#![deny(missing_debug_implementations)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod attributes;
mod error;
pub mod mapper;
pub mod naming;
pub mod rewrite;

pub use crate::{
    attributes::{AttributeStore, TransformedAttributes, TransformedAttributesMut},
    error::{CollisionError, Error, TransformError, UnknownStrategyError},
    mapper::{NameMapper, TransformOptions},
    rewrite::SqlRewrite,
};

/// The name of a database table
#[aliri_braid::braid(serde)]
pub struct TableName;

/// The legacy name of a database column
#[aliri_braid::braid(serde)]
pub struct ColumnName;

/// A table whose legacy columns are addressed by transformed names
///
/// Implementations supply the legacy column list and the options used to
/// transform it. The mapper itself is built lazily, exactly once, by the
/// [`once_name_mapper!`] macro:
///
/// ```
/// use colalias::{LegacyTable, NameMapper, TableNameRef};
///
/// struct Orders;
///
/// impl LegacyTable for Orders {
///     const TABLE_NAME: &'static TableNameRef = TableNameRef::from_static("ORDERS");
///     const COLUMN_NAMES: &'static [&'static str] = &["OrderID", "TotalAmount"];
///
///     fn name_mapper() -> &'static NameMapper {
///         colalias::once_name_mapper!(Orders)
///     }
/// }
///
/// assert_eq!(Orders::name_mapper().resolve("total_amount"), "TotalAmount");
/// ```
pub trait LegacyTable {
    /// The name of the table
    const TABLE_NAME: &'static TableNameRef;

    /// The legacy column names, in definition order
    const COLUMN_NAMES: &'static [&'static str];

    /// The options used to derive transformed names
    ///
    /// By default, every column is transformed with the
    /// [`Underscore`][naming::Builtin::Underscore] strategy. If the returned
    /// options do not name a table, [`TABLE_NAME`][LegacyTable::TABLE_NAME]
    /// is used.
    fn transform_options() -> TransformOptions {
        TransformOptions::default()
    }

    /// The name mapper for the table
    ///
    /// This should be implemented with [`once_name_mapper!`].
    fn name_mapper() -> &'static NameMapper;
}

/// Extension trait for [`LegacyTable`] types
pub trait LegacyTableExt: LegacyTable {
    /// Resolves a legacy or transformed name to the legacy column name
    #[inline]
    fn resolve(name: &str) -> &str {
        Self::name_mapper().resolve(name)
    }

    /// Rewrites generated SQL to address the table's legacy columns
    #[inline]
    fn rewrite_sql(sql: &str) -> String {
        rewrite::rewrite(sql, Self::name_mapper())
    }

    /// Read access to a record of this table by transformed name
    #[inline]
    fn attributes<S>(store: &S) -> TransformedAttributes<'_, S>
    where
        S: AttributeStore + ?Sized,
    {
        Self::name_mapper().attributes(store)
    }

    /// Read and write access to a record of this table by transformed name
    #[inline]
    fn attributes_mut<S>(store: &mut S) -> TransformedAttributesMut<'_, S>
    where
        S: AttributeStore + ?Sized,
    {
        Self::name_mapper().attributes_mut(store)
    }
}

impl<T: LegacyTable> LegacyTableExt for T {}

/// Build the [`NameMapper`] for a [`LegacyTable`] exactly once in the lifetime
/// of the program
///
/// The mapper is built the first time it is requested. Because registering a
/// table with a misconfigured naming strategy cannot be recovered from, a
/// build failure panics with the error's message.
///
/// The macro keeps one mapper per expansion site, so it should be used with a
/// concrete table type rather than inside a generic implementation.
///
/// # Example
///
/// ```
/// use colalias::{naming::Builtin, LegacyTable, NameMapper, TableNameRef, TransformOptions};
///
/// struct Customers;
///
/// impl LegacyTable for Customers {
///     const TABLE_NAME: &'static TableNameRef = TableNameRef::from_static("CUSTOMERS");
///     const COLUMN_NAMES: &'static [&'static str] = &["ROWID", "CUST_NAME"];
///
///     fn transform_options() -> TransformOptions {
///         TransformOptions::new(Builtin::LowerCamel).skip("ROWID")
///     }
///
///     fn name_mapper() -> &'static NameMapper {
///         colalias::once_name_mapper!(Customers)
///     }
/// }
///
/// let mapper = Customers::name_mapper();
/// assert_eq!(mapper.resolve("custName"), "CUST_NAME");
/// assert!(std::ptr::eq(mapper, Customers::name_mapper()));
/// ```
#[macro_export]
macro_rules! once_name_mapper {
    ($ty:ty) => {{
        static NAME_MAPPER: $crate::__private::OnceLock<$crate::NameMapper> =
            $crate::__private::OnceLock::new();

        NAME_MAPPER.get_or_init(|| $crate::__private::build_name_mapper::<$ty>())
    }};
}

#[doc(hidden)]
pub mod __private {
    #[cfg(not(feature = "once_cell"))]
    pub type OnceLock<T> = std::sync::OnceLock<T>;

    #[cfg(feature = "once_cell")]
    pub type OnceLock<T> = once_cell::sync::OnceCell<T>;

    /// Build the mapper for a table, panicking on a misconfigured strategy
    pub fn build_name_mapper<T: crate::LegacyTable + ?Sized>() -> crate::NameMapper {
        let mut options = T::transform_options();
        if options.table.is_none() {
            options.table = Some(T::TABLE_NAME.to_owned());
        }

        match crate::NameMapper::build(T::COLUMN_NAMES.iter().copied(), &options) {
            Ok(mapper) => mapper,
            Err(err) => {
                tracing::error!(
                    table = T::TABLE_NAME.as_str(),
                    exception = &err as &dyn std::error::Error,
                    "failed to register legacy table"
                );
                panic!("failed to register legacy table `{}`: {err}", T::TABLE_NAME)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::naming::{Builtin, NamingStrategy};

    struct Employees;

    impl LegacyTable for Employees {
        const TABLE_NAME: &'static TableNameRef = TableNameRef::from_static("EMPLOYEES");
        const COLUMN_NAMES: &'static [&'static str] =
            &["EmployeeID", "FullName", "HireDate", "ROWID"];

        fn transform_options() -> TransformOptions {
            TransformOptions::new(Builtin::Underscore).skip("ROWID")
        }

        fn name_mapper() -> &'static NameMapper {
            once_name_mapper!(Employees)
        }
    }

    struct Broken;

    impl LegacyTable for Broken {
        const TABLE_NAME: &'static TableNameRef = TableNameRef::from_static("BROKEN");
        const COLUMN_NAMES: &'static [&'static str] = &["FullName", "full_name"];

        fn name_mapper() -> &'static NameMapper {
            once_name_mapper!(Broken)
        }
    }

    struct Renamed;

    impl LegacyTable for Renamed {
        const TABLE_NAME: &'static TableNameRef = TableNameRef::from_static("RENAMED");
        const COLUMN_NAMES: &'static [&'static str] = &["Id"];

        fn transform_options() -> TransformOptions {
            TransformOptions::new(NamingStrategy::custom(|name: &str| name.to_lowercase()))
                .table("renamed_view")
        }

        fn name_mapper() -> &'static NameMapper {
            once_name_mapper!(Renamed)
        }
    }

    #[test]
    fn mapper_is_built_once_with_table_name() {
        let mapper = Employees::name_mapper();

        assert!(std::ptr::eq(mapper, Employees::name_mapper()));
        assert_eq!(mapper.table().map(TableNameRef::as_str), Some("EMPLOYEES"));
        assert_eq!(mapper.columns().len(), Employees::COLUMN_NAMES.len());
    }

    #[test]
    fn explicit_table_name_in_options_is_kept() {
        let mapper = Renamed::name_mapper();
        assert_eq!(
            mapper.table().map(TableNameRef::as_str),
            Some("renamed_view")
        );
        assert_eq!(Renamed::resolve("id"), "Id");
    }

    #[test]
    fn extension_methods_use_the_table_mapper() {
        assert_eq!(Employees::resolve("employee_id"), "EmployeeID");
        assert_eq!(Employees::resolve("ROWID"), "ROWID");
        assert_eq!(
            Employees::rewrite_sql("SELECT ROWID FROM EMPLOYEES WHERE employee_id = ?"),
            "SELECT ROWID FROM EMPLOYEES WHERE EmployeeID = ?"
        );
    }

    #[test]
    fn extension_accessors_use_the_table_mapper() {
        let mut row = std::collections::BTreeMap::<String, i32>::new();
        Employees::attributes_mut(&mut row).set("hire_date", 1843);

        assert_eq!(row.get("HireDate"), Some(&1843));
        assert_eq!(Employees::attributes(&row).get("hire_date"), Some(&1843));
    }

    #[test]
    #[should_panic(
        expected = "failed to register legacy table `BROKEN`: columns `FullName` and `full_name` \
                    are both addressed by `full_name` on table `BROKEN`"
    )]
    fn misconfigured_table_panics_on_first_use() {
        Broken::name_mapper();
    }
}

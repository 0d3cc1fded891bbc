//! The mapping between legacy column names and their transformed names
//!
//! A [`NameMapper`] is built once per table from the table's ordered column
//! list and a set of [`TransformOptions`]. After construction it never
//! changes, and every lookup is a read.
//!
//! ```
//! use colalias::{naming::Builtin, NameMapper, TransformOptions};
//!
//! let options = TransformOptions::new(Builtin::Underscore).skip("ID");
//! let mapper = NameMapper::build(["ID", "FullName", "TotalAmount"], &options).unwrap();
//!
//! assert_eq!(mapper.resolve("full_name"), "FullName");
//! assert_eq!(mapper.resolve("FullName"), "FullName");
//! assert_eq!(mapper.resolve("ID"), "ID");
//! assert_eq!(mapper.transformed_name("TotalAmount"), Some("total_amount"));
//! ```

use fnv::{FnvBuildHasher, FnvHashMap, FnvHashSet};
use indexmap::{map::Entry, IndexMap};

use crate::{
    error::{CollisionError, TransformError},
    naming::NamingStrategy,
    ColumnName, Error, TableName, TableNameRef,
};

/// Configuration for deriving a table's transformed names
///
/// Options can be built in code or deserialized, in which case the strategy
/// is given by the name of a [`Builtin`][crate::naming::Builtin] transform:
///
/// ```
/// use colalias::TransformOptions;
///
/// let options: TransformOptions = serde_json::from_str(
///     r#"{ "strategy": "lower_camel", "skip": ["ROWID"], "table": "EMPLOYEES" }"#,
/// ).unwrap();
///
/// assert_eq!(options.skip, ["ROWID"]);
/// assert_eq!(options.strategy.apply("HIRE_DATE").as_deref(), Some("hireDate"));
/// ```
#[derive(Clone, Debug, Default, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
#[must_use]
pub struct TransformOptions {
    /// The strategy applied to every column not listed in `skip`
    pub strategy: NamingStrategy,

    /// Legacy columns that keep their legacy name
    pub skip: Vec<String>,

    /// The table the columns belong to, used in logs and errors
    pub table: Option<TableName>,
}

impl TransformOptions {
    /// Creates options using the given naming strategy
    pub fn new(strategy: impl Into<NamingStrategy>) -> Self {
        Self {
            strategy: strategy.into(),
            ..Self::default()
        }
    }

    /// Creates options using the built-in strategy with the given name
    ///
    /// # Errors
    ///
    /// Fails if the name does not identify a [`Builtin`][crate::naming::Builtin]
    /// strategy.
    pub fn with_strategy_name(name: &str) -> Result<Self, Error> {
        let strategy: NamingStrategy = name.parse()?;
        Ok(Self::new(strategy))
    }

    /// Excludes a legacy column from transformation
    pub fn skip(mut self, column: impl Into<String>) -> Self {
        self.skip.push(column.into());
        self
    }

    /// Excludes a set of legacy columns from transformation
    pub fn skip_all<I>(mut self, columns: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<String>,
    {
        self.skip.extend(columns.into_iter().map(Into::into));
        self
    }

    /// Names the table the columns belong to
    pub fn table(mut self, table: impl Into<String>) -> Self {
        self.table = Some(TableName::new(table.into()));
        self
    }
}

/// A bidirectional mapping between legacy column names and transformed names
/// for a single table
#[derive(Clone, Debug)]
pub struct NameMapper {
    table: Option<TableName>,
    columns: Vec<String>,
    forward: IndexMap<String, String, FnvBuildHasher>,
    inverse: FnvHashMap<String, String>,
    excluded: FnvHashSet<String>,
}

impl NameMapper {
    /// Builds the mapping for a table's columns
    ///
    /// Columns are processed in the order given. A column that appears more
    /// than once is only considered the first time.
    ///
    /// # Errors
    ///
    /// Fails with a [`TransformError`] if the strategy produces no name, or an
    /// empty one, for a column that is not skipped. Fails with a
    /// [`CollisionError`] if two columns would be addressed by the same name,
    /// either because both transform to it or because one transforms to the
    /// legacy name of another.
    pub fn build<I>(columns: I, options: &TransformOptions) -> Result<Self, Error>
    where
        I: IntoIterator,
        I::Item: Into<String>,
    {
        let table = options.table.as_deref().map(TableNameRef::as_str);

        let mut seen = FnvHashSet::default();
        let columns: Vec<String> = columns
            .into_iter()
            .map(Into::into)
            .filter(|c| seen.insert(c.clone()))
            .collect();

        let excluded: FnvHashSet<String> = columns
            .iter()
            .filter(|c| options.skip.contains(c))
            .cloned()
            .collect();

        let mut forward: IndexMap<String, String, FnvBuildHasher> =
            IndexMap::with_capacity_and_hasher(columns.len(), FnvBuildHasher::default());
        let mut inverse: FnvHashMap<String, String> = FnvHashMap::default();

        for legacy in &columns {
            if excluded.contains(legacy) {
                tracing::trace!(table, legacy = legacy.as_str(), "skipping excluded column");
                continue;
            }

            let transformed = options
                .strategy
                .apply(legacy)
                .filter(|t| !t.is_empty())
                .ok_or_else(|| {
                    TransformError::new(options.table.clone(), ColumnName::new(legacy.clone()))
                })?;

            match forward.entry(transformed) {
                Entry::Occupied(existing) => {
                    return Err(CollisionError::new(
                        options.table.clone(),
                        ColumnName::new(existing.get().clone()),
                        ColumnName::new(legacy.clone()),
                        existing.key().clone(),
                    )
                    .into());
                }
                Entry::Vacant(slot) => {
                    tracing::debug!(
                        table,
                        legacy = legacy.as_str(),
                        transformed = slot.key().as_str(),
                        "mapped legacy column"
                    );
                    inverse.insert(legacy.clone(), slot.key().clone());
                    slot.insert(legacy.clone());
                }
            }
        }

        // A transformed name must not shadow the legacy name of another column,
        // skipped or not.
        let positions: FnvHashMap<&str, usize> = columns
            .iter()
            .enumerate()
            .map(|(position, column)| (column.as_str(), position))
            .collect();
        for (position, legacy) in columns.iter().enumerate() {
            let Some(transformed) = inverse.get(legacy) else {
                continue;
            };
            match positions.get(transformed.as_str()) {
                Some(&shadowed) if shadowed != position => {
                    let (first, second) = if shadowed < position {
                        (transformed, legacy)
                    } else {
                        (legacy, transformed)
                    };
                    return Err(CollisionError::new(
                        options.table.clone(),
                        ColumnName::new(first.clone()),
                        ColumnName::new(second.clone()),
                        transformed.clone(),
                    )
                    .into());
                }
                _ => {}
            }
        }

        tracing::debug!(
            table,
            columns = columns.len(),
            mapped = forward.len(),
            excluded = excluded.len(),
            "built legacy name mapping"
        );

        Ok(Self {
            table: options.table.clone(),
            columns,
            forward,
            inverse,
            excluded,
        })
    }

    /// Resolves a name to the legacy column name it addresses
    ///
    /// Transformed names resolve to their legacy column. Any other name,
    /// including a legacy name, is returned unchanged, so resolving is
    /// idempotent.
    #[inline]
    pub fn resolve<'a>(&'a self, name: &'a str) -> &'a str {
        self.forward.get(name).map_or(name, String::as_str)
    }

    /// The legacy column addressed by a transformed name
    #[inline]
    pub fn legacy_name(&self, transformed: &str) -> Option<&str> {
        self.forward.get(transformed).map(String::as_str)
    }

    /// The transformed name of a legacy column
    #[inline]
    pub fn transformed_name(&self, legacy: &str) -> Option<&str> {
        self.inverse.get(legacy).map(String::as_str)
    }

    /// Returns true if the legacy column was excluded from transformation
    #[inline]
    pub fn is_excluded(&self, legacy: &str) -> bool {
        self.excluded.contains(legacy)
    }

    /// Iterates over `(transformed, legacy)` pairs in column definition order
    pub fn iter(&self) -> impl ExactSizeIterator<Item = (&str, &str)> + '_ {
        self.forward
            .iter()
            .map(|(transformed, legacy)| {
                (transformed.as_str(), legacy.as_str())
            })
    }

    /// The number of transformed columns
    #[inline]
    pub fn len(&self) -> usize {
        self.forward.len()
    }

    /// Returns true if no column was transformed
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.forward.is_empty()
    }

    /// Every legacy column of the table, in definition order
    #[inline]
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// The table this mapping was built for, if it was named
    #[inline]
    pub fn table(&self) -> Option<&TableNameRef> {
        self.table.as_deref()
    }

    /// Finds the legacy column addressed by a field reference
    ///
    /// The field may be qualified with a table name (`employees.full_name`)
    /// and may use either the legacy or the transformed name.
    pub fn column_for(&self, field: &str) -> Option<&str> {
        let name = field.rsplit('.').next().unwrap_or(field);
        let legacy = self.resolve(name);
        self.columns
            .iter()
            .map(String::as_str)
            .find(|column| *column == legacy)
    }

    /// Returns true if every name addresses a column of the table
    ///
    /// Names may be legacy or transformed names.
    pub fn attributes_exist<I>(&self, names: I) -> bool
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        names.into_iter().all(|name| {
            let name = name.as_ref();
            self.forward.contains_key(name) || self.columns.iter().any(|c| c == name)
        })
    }

    /// Pairs caller-supplied names with argument values, translating each
    /// name to its legacy column
    ///
    /// This is the translation needed by dynamic finders, which receive
    /// attribute names from the caller and must query by legacy column.
    pub fn resolve_arguments<'a, N, V>(
        &'a self,
        names: N,
        values: impl IntoIterator<Item = V>,
    ) -> Vec<(&'a str, V)>
    where
        N: IntoIterator<Item = &'a str>,
    {
        names
            .into_iter()
            .map(|name| self.resolve(name))
            .zip(values)
            .collect()
    }
}

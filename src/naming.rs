//! Naming strategies that derive friendly attribute names from legacy column names
//!
//! A strategy is either one of the [`Builtin`] transforms, selected by name,
//! or a custom function. Strategies must produce a non-empty name for every
//! column they are applied to; registering a table fails otherwise.
//!
//! ```
//! use colalias::naming::{Builtin, NamingStrategy};
//!
//! let underscore: NamingStrategy = "underscore".parse().unwrap();
//! assert_eq!(underscore.apply("EmployeeID").as_deref(), Some("employee_id"));
//!
//! let prefixed = NamingStrategy::custom(|name: &str| {
//!     name.strip_prefix("tbl").map(|rest| rest.to_ascii_lowercase())
//! });
//! assert_eq!(prefixed.apply("tblStatus").as_deref(), Some("status"));
//! assert_eq!(prefixed.apply("Status"), None);
//! #
//! # assert_eq!(Builtin::default(), Builtin::Underscore);
//! ```

use std::{fmt, str::FromStr, sync::Arc};

use heck::{ToLowerCamelCase, ToSnakeCase, ToUpperCamelCase};

use crate::error::UnknownStrategyError;

/// A built-in naming transform
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(rename_all = "snake_case")]
#[non_exhaustive]
pub enum Builtin {
    /// `FullName` becomes `full_name`
    #[default]
    Underscore,

    /// `full_name` becomes `FullName`
    Camelize,

    /// `FullName` becomes `fullName`
    LowerCamel,

    /// `FullName` becomes `fullname`
    Downcase,

    /// `FullName` becomes `FULLNAME`
    Upcase,

    /// Names are left as they are
    Identity,
}

impl Builtin {
    /// Every built-in transform
    pub const ALL: &'static [Builtin] = &[
        Builtin::Underscore,
        Builtin::Camelize,
        Builtin::LowerCamel,
        Builtin::Downcase,
        Builtin::Upcase,
        Builtin::Identity,
    ];

    /// The configuration name of the transform
    pub const fn name(self) -> &'static str {
        match self {
            Builtin::Underscore => "underscore",
            Builtin::Camelize => "camelize",
            Builtin::LowerCamel => "lower_camel",
            Builtin::Downcase => "downcase",
            Builtin::Upcase => "upcase",
            Builtin::Identity => "identity",
        }
    }

    /// Transforms a legacy column name
    pub fn apply(self, legacy: &str) -> String {
        match self {
            Builtin::Underscore => legacy.to_snake_case(),
            Builtin::Camelize => legacy.to_upper_camel_case(),
            Builtin::LowerCamel => legacy.to_lower_camel_case(),
            Builtin::Downcase => legacy.to_lowercase(),
            Builtin::Upcase => legacy.to_uppercase(),
            Builtin::Identity => legacy.to_owned(),
        }
    }
}

impl fmt::Display for Builtin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Builtin {
    type Err = UnknownStrategyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|b| b.name() == s)
            .ok_or_else(|| UnknownStrategyError::new(s))
    }
}

type CustomFn = dyn Fn(&str) -> Option<String> + Send + Sync;

/// The transform applied to each legacy column name of a table
///
/// Strategies deserialize from the name of a [`Builtin`]. Custom strategies
/// can only be constructed in code.
#[derive(Clone, serde::Deserialize)]
#[serde(from = "Builtin")]
pub enum NamingStrategy {
    /// One of the built-in transforms
    Builtin(Builtin),

    /// A custom transform; returning `None` fails registration for that column
    Custom(Arc<CustomFn>),
}

impl NamingStrategy {
    /// Creates a strategy from a custom function
    ///
    /// The function may return either a `String` or an `Option<String>`.
    pub fn custom<F, S>(f: F) -> Self
    where
        F: Fn(&str) -> S + Send + Sync + 'static,
        S: Into<Option<String>>,
    {
        Self::Custom(Arc::new(move |name| f(name).into()))
    }

    /// Applies the strategy to a legacy column name
    ///
    /// Built-in transforms always produce a name, though that name may be
    /// empty when the column consists only of separators.
    pub fn apply(&self, legacy: &str) -> Option<String> {
        match self {
            Self::Builtin(b) => Some(b.apply(legacy)),
            Self::Custom(f) => f(legacy),
        }
    }
}

impl Default for NamingStrategy {
    #[inline]
    fn default() -> Self {
        Self::Builtin(Builtin::default())
    }
}

impl From<Builtin> for NamingStrategy {
    #[inline]
    fn from(b: Builtin) -> Self {
        Self::Builtin(b)
    }
}

impl FromStr for NamingStrategy {
    type Err = UnknownStrategyError;

    #[inline]
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse().map(Self::Builtin)
    }
}

impl fmt::Debug for NamingStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Builtin(b) => f.debug_tuple("Builtin").field(b).finish(),
            Self::Custom(_) => f.write_str("Custom(<fn>)"),
        }
    }
}

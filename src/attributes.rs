//! Attribute access by transformed name
//!
//! The host keeps attribute values keyed by legacy column name and exposes
//! them through [`AttributeStore`]. [`TransformedAttributes`] and
//! [`TransformedAttributesMut`] put a [`NameMapper`] in front of the store so
//! that every accessor accepts either the transformed or the legacy name.
//!
//! ```
//! use std::collections::HashMap;
//!
//! use colalias::{NameMapper, TransformOptions};
//!
//! let mapper = NameMapper::build(["FullName", "HireDate"], &TransformOptions::default()).unwrap();
//! let mut row = HashMap::from([("FullName".to_owned(), "Ada".to_owned())]);
//!
//! mapper.attributes_mut(&mut row).set("hire_date", "1843-01-01".to_owned());
//!
//! let attrs = mapper.attributes(&row);
//! assert_eq!(attrs.get("full_name").map(String::as_str), Some("Ada"));
//! assert!(attrs.is_present("hire_date"));
//! assert_eq!(row["HireDate"], "1843-01-01");
//! ```

use std::{
    collections::{BTreeMap, HashMap},
    fmt,
    hash::BuildHasher,
};

use serde::ser::{Serialize, SerializeMap, Serializer};

use crate::NameMapper;

/// Attribute storage keyed by legacy column name
///
/// This is implemented by the host's record type. Only reading and writing
/// are required; the presence check and the uncast read default to being
/// derived from [`read_attribute()`][AttributeStore::read_attribute()].
pub trait AttributeStore {
    /// The attribute value type
    type Value;

    /// Reads the attribute stored for a legacy column
    fn read_attribute(&self, column: &str) -> Option<&Self::Value>;

    /// Writes the attribute for a legacy column
    fn write_attribute(&mut self, column: &str, value: Self::Value);

    /// Returns true if the attribute for a legacy column holds a value
    fn attribute_present(&self, column: &str) -> bool {
        self.read_attribute(column).is_some()
    }

    /// Reads the attribute as it was stored, before any type conversion
    fn read_attribute_before_type_cast(&self, column: &str) -> Option<&Self::Value> {
        self.read_attribute(column)
    }
}

impl<V, S: BuildHasher> AttributeStore for HashMap<String, V, S> {
    type Value = V;

    #[inline]
    fn read_attribute(&self, column: &str) -> Option<&V> {
        self.get(column)
    }

    #[inline]
    fn write_attribute(&mut self, column: &str, value: V) {
        self.insert(column.to_owned(), value);
    }
}

impl<V> AttributeStore for BTreeMap<String, V> {
    type Value = V;

    #[inline]
    fn read_attribute(&self, column: &str) -> Option<&V> {
        self.get(column)
    }

    #[inline]
    fn write_attribute(&mut self, column: &str, value: V) {
        self.insert(column.to_owned(), value);
    }
}

impl NameMapper {
    /// Read access to a record's attributes by transformed name
    #[inline]
    pub fn attributes<'a, S>(&'a self, store: &'a S) -> TransformedAttributes<'a, S>
    where
        S: AttributeStore + ?Sized,
    {
        TransformedAttributes {
            mapper: self,
            store,
        }
    }

    /// Read and write access to a record's attributes by transformed name
    #[inline]
    pub fn attributes_mut<'a, S>(&'a self, store: &'a mut S) -> TransformedAttributesMut<'a, S>
    where
        S: AttributeStore + ?Sized,
    {
        TransformedAttributesMut {
            mapper: self,
            store,
        }
    }
}

/// Read access to a record's attributes by transformed name
///
/// When serialized, this produces a map holding every attribute of the record
/// under its legacy name, followed by each transformed attribute again under
/// its transformed name.
pub struct TransformedAttributes<'a, S: ?Sized> {
    mapper: &'a NameMapper,
    store: &'a S,
}

impl<'a, S> TransformedAttributes<'a, S>
where
    S: AttributeStore + ?Sized,
{
    /// Reads an attribute
    #[inline]
    pub fn get(&self, name: &str) -> Option<&'a S::Value> {
        self.store.read_attribute(self.mapper.resolve(name))
    }

    /// Returns true if the attribute holds a value
    #[inline]
    pub fn is_present(&self, name: &str) -> bool {
        self.store.attribute_present(self.mapper.resolve(name))
    }

    /// Reads an attribute before any type conversion
    #[inline]
    pub fn before_type_cast(&self, name: &str) -> Option<&'a S::Value> {
        self.store
            .read_attribute_before_type_cast(self.mapper.resolve(name))
    }

    /// Iterates over the transformed attributes that hold a value, as
    /// `(transformed name, value)` pairs
    pub fn transformed(&self) -> impl Iterator<Item = (&'a str, &'a S::Value)> + '_ {
        self.mapper.iter().filter_map(move |(transformed, legacy)| {
            self.store
                .read_attribute(legacy)
                .map(|value| (transformed, value))
        })
    }
}

impl<S> Serialize for TransformedAttributes<'_, S>
where
    S: AttributeStore + ?Sized,
    S::Value: Serialize,
{
    fn serialize<Z>(&self, serializer: Z) -> Result<Z::Ok, Z::Error>
    where
        Z: Serializer,
    {
        let mut map = serializer.serialize_map(None)?;
        for column in self.mapper.columns() {
            if let Some(value) = self.store.read_attribute(column) {
                map.serialize_entry(column, value)?;
            }
        }
        for (transformed, value) in self.transformed() {
            if self.mapper.legacy_name(transformed) != Some(transformed) {
                map.serialize_entry(transformed, value)?;
            }
        }
        map.end()
    }
}

impl<S: ?Sized> fmt::Debug for TransformedAttributes<'_, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TransformedAttributes")
            .field("table", &self.mapper.table())
            .field("store", &std::any::type_name::<S>())
            .finish()
    }
}

/// Read and write access to a record's attributes by transformed name
pub struct TransformedAttributesMut<'a, S: ?Sized> {
    mapper: &'a NameMapper,
    store: &'a mut S,
}

impl<'a, S> TransformedAttributesMut<'a, S>
where
    S: AttributeStore + ?Sized,
{
    /// Reads an attribute
    #[inline]
    pub fn get(&self, name: &str) -> Option<&S::Value> {
        self.store.read_attribute(self.mapper.resolve(name))
    }

    /// Writes an attribute
    #[inline]
    pub fn set(&mut self, name: &str, value: S::Value) {
        self.store.write_attribute(self.mapper.resolve(name), value);
    }

    /// Returns true if the attribute holds a value
    #[inline]
    pub fn is_present(&self, name: &str) -> bool {
        self.store.attribute_present(self.mapper.resolve(name))
    }

    /// Reads an attribute before any type conversion
    #[inline]
    pub fn before_type_cast(&self, name: &str) -> Option<&S::Value> {
        self.store
            .read_attribute_before_type_cast(self.mapper.resolve(name))
    }

    /// Borrows the attributes for reading
    #[inline]
    pub fn read_only(&self) -> TransformedAttributes<'_, S> {
        TransformedAttributes {
            mapper: self.mapper,
            store: &*self.store,
        }
    }
}

impl<S: ?Sized> fmt::Debug for TransformedAttributesMut<'_, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TransformedAttributesMut")
            .field("table", &self.mapper.table())
            .field("store", &std::any::type_name::<S>())
            .finish()
    }
}

//! Struct values

use indexmap::IndexMap;

use super::Value;
use crate::introspect::{Declared, Introspect};
use crate::kind::Kind;

/// A struct instance with named fields.
///
/// Uses IndexMap to preserve field order. A struct is an aggregate: it is
/// never absent, whatever its fields hold.
#[derive(Debug, Clone, PartialEq)]
pub struct StructValue {
    /// The struct's type name (e.g., "Point", "Person")
    pub type_name: String,

    /// The struct's fields in definition order
    pub fields: IndexMap<String, Value>,
}

impl StructValue {
    /// Create a new struct with no fields
    pub fn new(type_name: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            fields: IndexMap::new(),
        }
    }

    /// Add a field (builder pattern)
    pub fn with_field(mut self, name: impl Into<String>, value: Value) -> Self {
        self.fields.insert(name.into(), value);
        self
    }

    /// Get a field by name
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }
}

impl Introspect for StructValue {
    fn kind(&self) -> Kind {
        Kind::Plain
    }
}

impl Declared for StructValue {
    const KIND: Kind = Kind::Plain;
}

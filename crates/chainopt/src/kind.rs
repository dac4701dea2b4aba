//! Referenceability kinds and tracking policies

use std::fmt;

/// Structural kind of a value, as reported by [`Introspect::kind`].
///
/// Kinds are organized into three groups:
/// - Plain: values that can never be null (`Plain`, `Sequence`)
/// - Chain links: references that are dereferenced further (`Pointer`, `Dynamic`)
/// - Leaves: references that are only null-checked (`Opaque`, `Function`, `Map`, `Channel`)
///
/// [`Introspect::kind`]: crate::Introspect::kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Kind {
    /// Numbers, booleans, text, aggregates
    Plain,

    /// Growable sequence; usable even when unallocated
    Sequence,

    /// Reference that can be dereferenced one level
    Pointer,

    /// Raw address whose target cannot be interpreted
    Opaque,

    /// Callable handle
    Function,

    /// Associative map handle
    Map,

    /// Communication channel handle
    Channel,

    /// Container holding a concrete value of unknown static type
    Dynamic,

    /// Uninspectable: locked, mutably borrowed, or poisoned
    Invalid,
}

impl Kind {
    /// Check if values of this kind can be null at all
    pub fn is_reference_like(self) -> bool {
        matches!(
            self,
            Kind::Pointer
                | Kind::Opaque
                | Kind::Function
                | Kind::Map
                | Kind::Channel
                | Kind::Dynamic
        )
    }

    /// Check if this kind is dereferenced further by the detector
    pub fn is_chain_link(self) -> bool {
        matches!(self, Kind::Pointer | Kind::Dynamic)
    }

    /// Check if this kind is null-checked without recursion
    pub fn is_leaf_reference(self) -> bool {
        matches!(self, Kind::Function | Kind::Map | Kind::Channel)
    }

    /// Human-readable name
    pub fn name(self) -> &'static str {
        match self {
            Kind::Plain => "plain value",
            Kind::Sequence => "sequence",
            Kind::Pointer => "pointer",
            Kind::Opaque => "opaque pointer",
            Kind::Function => "function",
            Kind::Map => "map",
            Kind::Channel => "channel",
            Kind::Dynamic => "dynamic value",
            Kind::Invalid => "invalid value",
        }
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// How much of a reference chain a [`Tracked`](crate::Tracked) checks.
///
/// Fixed when the container is built; only the verdict is re-derived.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Policy {
    /// Never absent unless emptied explicitly
    Value,

    /// Check the stored reference itself, nothing beyond it
    Shallow,

    /// Walk the whole chain on every query
    Deep,
}

impl Policy {
    /// Whether queries under this policy consult the detector at all
    pub fn needs_check(self) -> bool {
        !matches!(self, Policy::Value)
    }
}

impl fmt::Display for Policy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Policy::Value => f.write_str("value"),
            Policy::Shallow => f.write_str("shallow"),
            Policy::Deep => f.write_str("deep"),
        }
    }
}

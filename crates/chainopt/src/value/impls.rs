//! Value trait implementations: constructors, predicates, extractors,
//! introspection, PartialEq

use std::rc::Rc;

use super::*;
use crate::introspect::{Declared, Introspect, Target};
use crate::kind::Kind;

// ═══════════════════════════════════════════════════════════════════
// Convenience Constructors
// ═══════════════════════════════════════════════════════════════════

impl Value {
    /// Create a string value
    pub fn string(s: impl Into<String>) -> Self {
        Value::String(Rc::new(s.into()))
    }

    /// Create a vec value
    pub fn vec(items: Vec<Value>) -> Self {
        Value::Vec(Some(Rc::new(items)))
    }

    /// Create an unallocated vec value
    pub fn nil_vec() -> Self {
        Value::Vec(None)
    }

    /// Create a struct value
    pub fn structure(s: StructValue) -> Self {
        Value::Struct(Rc::new(s))
    }

    /// Create a map value from entries
    pub fn map<K: Into<String>>(entries: impl IntoIterator<Item = (K, Value)>) -> Self {
        Value::Map(entries.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }

    /// Create a builtin function value
    pub fn function(f: impl Fn(Vec<Value>) -> Value + 'static) -> Self {
        Value::Function(FnRef::new(f))
    }

    /// Create a reference to a new slot holding `value`
    pub fn reference(value: Value) -> Self {
        Value::Ref(Ptr::new(value))
    }

    // ═══════════════════════════════════════════════════════════════════
    // Type Predicates
    // ═══════════════════════════════════════════════════════════════════

    /// Check if this holds no concrete value
    pub fn is_nil(&self) -> bool {
        matches!(self, Value::Nil)
    }

    /// Name of the held variant, for messages
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Nil => "nil",
            Value::Unit => "()",
            Value::Bool(_) => "bool",
            Value::Char(_) => "char",
            Value::I64(_) => "i64",
            Value::F64(_) => "f64",
            Value::String(_) => "String",
            Value::Vec(_) => "Vec",
            Value::Struct(_) => "struct",
            Value::Map(_) => "map",
            Value::Function(_) => "fn",
            Value::Channel(_) => "channel",
            Value::Ref(_) => "ref",
            Value::Opaque(_) => "opaque",
        }
    }

    // ═══════════════════════════════════════════════════════════════════
    // Extractors (return Option for safe access)
    // ═══════════════════════════════════════════════════════════════════

    /// Extract integer value
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::I64(n) => Some(*n),
            _ => None,
        }
    }

    /// Extract string slice
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s.as_str()),
            _ => None,
        }
    }

    /// Extract vec as slice; an unallocated vec is empty
    pub fn as_vec(&self) -> Option<&[Value]> {
        match self {
            Value::Vec(Some(items)) => Some(items.as_slice()),
            Value::Vec(None) => Some(&[]),
            _ => None,
        }
    }

    /// Extract the shared slot of a reference
    pub fn as_ref_ptr(&self) -> Option<&Ptr<Value>> {
        match self {
            Value::Ref(p) => Some(p),
            _ => None,
        }
    }
}

// ═══════════════════════════════════════════════════════════════════
// Introspection
// ═══════════════════════════════════════════════════════════════════

/// Presents a (possibly unallocated) vec as a sequence hop.
struct SeqView<'a>(&'a Option<Rc<Vec<Value>>>);

impl Introspect for SeqView<'_> {
    fn kind(&self) -> Kind {
        Kind::Sequence
    }

    fn is_null(&self) -> bool {
        self.0.is_none()
    }
}

impl Introspect for Value {
    fn kind(&self) -> Kind {
        Kind::Dynamic
    }

    fn is_null(&self) -> bool {
        self.is_nil()
    }

    fn with_target(&self, visit: &mut dyn FnMut(Target<'_>)) {
        match self {
            Value::Nil => visit(Target::Null),
            Value::Unit => visit(Target::Value(&())),
            Value::Bool(b) => visit(Target::Value(b)),
            Value::Char(c) => visit(Target::Value(c)),
            Value::I64(n) => visit(Target::Value(n)),
            Value::F64(n) => visit(Target::Value(n)),
            Value::String(s) => visit(Target::Value(&**s)),
            Value::Vec(items) => visit(Target::Value(&SeqView(items))),
            Value::Struct(s) => visit(Target::Value(&**s)),
            Value::Map(m) => visit(Target::Value(m)),
            Value::Function(f) => visit(Target::Value(f)),
            Value::Channel(c) => visit(Target::Value(c)),
            Value::Ref(p) => visit(Target::Value(p)),
            Value::Opaque(p) => visit(Target::Value(p)),
        }
    }
}

impl Declared for Value {
    const KIND: Kind = Kind::Dynamic;
}

// ═══════════════════════════════════════════════════════════════════
// PartialEq Implementation
// ═══════════════════════════════════════════════════════════════════
// Data compares by contents, references by identity.

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Nil, Value::Nil) => true,
            (Value::Unit, Value::Unit) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Char(a), Value::Char(b)) => a == b,
            (Value::I64(a), Value::I64(b)) => a == b,
            (Value::F64(a), Value::F64(b)) => a == b,
            (Value::String(a), Value::String(b)) => a == b,
            (Value::Vec(_), Value::Vec(_)) => self.as_vec() == other.as_vec(),
            (Value::Struct(a), Value::Struct(b)) => a == b,
            (Value::Map(a), Value::Map(b)) => a.ptr_eq(b),
            (Value::Function(a), Value::Function(b)) => a.ptr_eq(b),
            (Value::Channel(a), Value::Channel(b)) => a.ptr_eq(b),
            (Value::Ref(a), Value::Ref(b)) => a.ptr_eq(b),
            (Value::Opaque(a), Value::Opaque(b)) => a == b,
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn target_kind(value: &Value) -> Option<Kind> {
        let mut seen = None;
        value.with_target(&mut |target| {
            if let Target::Value(inner) = target {
                seen = Some(inner.kind());
            }
        });
        seen
    }

    #[test]
    fn test_targets_by_variant() {
        assert_eq!(target_kind(&Value::Nil), None);
        assert_eq!(target_kind(&Value::I64(1)), Some(Kind::Plain));
        assert_eq!(target_kind(&Value::string("s")), Some(Kind::Plain));
        assert_eq!(target_kind(&Value::nil_vec()), Some(Kind::Sequence));
        assert_eq!(target_kind(&Value::map::<&str>([])), Some(Kind::Map));
        assert_eq!(target_kind(&Value::reference(Value::Unit)), Some(Kind::Pointer));
        assert_eq!(
            target_kind(&Value::Opaque(std::ptr::null())),
            Some(Kind::Opaque)
        );
    }

    #[test]
    fn test_references_compare_by_identity() {
        let r = Value::reference(Value::I64(1));
        assert_eq!(r, r.clone());
        assert_ne!(r, Value::reference(Value::I64(1)));
    }

    #[test]
    fn test_unallocated_vec_equals_empty_vec() {
        assert_eq!(Value::nil_vec(), Value::vec(vec![]));
        assert_eq!(Value::nil_vec().as_vec(), Some(&[][..]));
    }
}

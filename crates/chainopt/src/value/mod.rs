//! Dynamically-typed values
//!
//! [`Value`] is a container holding a concrete value of unknown static type,
//! or nothing at all ([`Value::Nil`]). It is the one place where the
//! detector crosses a type-erasure boundary: a `Value` holding a reference
//! is walked into, a `Value` holding nothing is absent.

mod compound;
mod display;
mod impls;

pub use compound::StructValue;

use std::rc::Rc;

use crate::introspect::{Chan, FnRef, MapRef, Ptr};

/// Builtin function signature for [`Value::Function`]
pub type ValueFn = FnRef<Vec<Value>, Value>;

/// Runtime value of unknown static type.
///
/// Variants fall into three groups:
/// - Nothing: `Nil`
/// - Plain data: primitives, strings, sequences, structs
/// - References: maps, functions, channels, pointers, opaque addresses
#[derive(Clone, Default)]
pub enum Value {
    // ═══════════════════════════════════════════════════════════════════
    // Nothing
    // ═══════════════════════════════════════════════════════════════════
    /// Holds no concrete value
    #[default]
    Nil,

    // ═══════════════════════════════════════════════════════════════════
    // Plain Data
    // ═══════════════════════════════════════════════════════════════════
    /// The unit type `()`
    Unit,

    /// Boolean
    Bool(bool),

    /// Unicode scalar value
    Char(char),

    /// 64-bit signed integer
    I64(i64),

    /// 64-bit floating point
    F64(f64),

    /// Heap-allocated string
    String(Rc<String>),

    /// Growable sequence; `None` is an unallocated (but usable) sequence
    Vec(Option<Rc<Vec<Value>>>),

    /// Struct instance
    Struct(Rc<StructValue>),

    // ═══════════════════════════════════════════════════════════════════
    // References
    // ═══════════════════════════════════════════════════════════════════
    /// Shared string-keyed map
    Map(MapRef<String, Value>),

    /// Builtin function over argument lists
    Function(ValueFn),

    /// Channel of values
    Channel(Chan<Value>),

    /// Shared mutable slot holding another value
    Ref(Ptr<Value>),

    /// Raw address, never dereferenced
    Opaque(*const ()),
}

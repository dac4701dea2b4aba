//! Runtime introspection of reference shapes
//!
//! The detector and classifier never look at concrete types. Everything they
//! need is asked through [`Introspect`]: the kind of a value, its own null
//! state, and one level of dereference. [`Declared`] answers the same
//! questions from the type alone, for containers built without a value.

mod handles;
mod ptr;

pub use handles::{Chan, FnRef, MapRef};
pub use ptr::Ptr;

use std::cell::RefCell;
use std::collections::{BTreeMap, HashMap, VecDeque};
use std::ptr::NonNull;
use std::rc::{self, Rc};
use std::sync::{self, Arc, Mutex, RwLock};

use crate::kind::Kind;

/// The result of dereferencing one level.
#[derive(Clone, Copy)]
pub enum Target<'a> {
    /// The reference is null; there is nothing behind it
    Null,

    /// The slot behind the reference cannot be inspected right now
    Invalid,

    /// The value one level down
    Value(&'a dyn Introspect),
}

/// Capability to report a value's referenceability.
///
/// Implementations for reference shapes override [`with_target`] so the
/// detector can walk through them. The callback form lets cells and weak
/// pointers lend a temporary guard for the duration of the visit.
///
/// [`with_target`]: Introspect::with_target
pub trait Introspect {
    /// Structural kind of this value right now.
    fn kind(&self) -> Kind;

    /// Own null state. Only meaningful for reference-like kinds.
    fn is_null(&self) -> bool {
        false
    }

    /// Dereference one level and hand the result to `visit`.
    ///
    /// Values without a target report [`Target::Null`].
    fn with_target(&self, visit: &mut dyn FnMut(Target<'_>)) {
        visit(Target::Null)
    }

    /// Allocation identity of a shared pointer hop, if it has one.
    fn address(&self) -> Option<usize> {
        None
    }
}

/// Static shape of a type, known without a value.
pub trait Declared: Introspect {
    /// Kind of every value of this type
    const KIND: Kind;

    /// Kind one dereference below, when the type alone decides it
    const TARGET: Option<Kind> = None;
}

fn addr_of<T: ?Sized>(ptr: *const T) -> usize {
    ptr as *const () as usize
}

// ═══════════════════════════════════════════════════════════════════
// Plain Values and Sequences
// ═══════════════════════════════════════════════════════════════════

macro_rules! plain {
    ($($ty:ty),* $(,)?) => {
        $(
            impl Introspect for $ty {
                fn kind(&self) -> Kind {
                    Kind::Plain
                }
            }

            impl Declared for $ty {
                const KIND: Kind = Kind::Plain;
            }
        )*
    };
}

plain!(
    (),
    bool,
    char,
    i8,
    i16,
    i32,
    i64,
    i128,
    isize,
    u8,
    u16,
    u32,
    u64,
    u128,
    usize,
    f32,
    f64,
    String,
    &'static str,
);

impl<K, V> Introspect for HashMap<K, V> {
    fn kind(&self) -> Kind {
        Kind::Plain
    }
}

impl<K, V> Declared for HashMap<K, V> {
    const KIND: Kind = Kind::Plain;
}

impl<K, V> Introspect for BTreeMap<K, V> {
    fn kind(&self) -> Kind {
        Kind::Plain
    }
}

impl<K, V> Declared for BTreeMap<K, V> {
    const KIND: Kind = Kind::Plain;
}

impl<T> Introspect for Vec<T> {
    fn kind(&self) -> Kind {
        Kind::Sequence
    }
}

impl<T> Declared for Vec<T> {
    const KIND: Kind = Kind::Sequence;
}

impl<T> Introspect for VecDeque<T> {
    fn kind(&self) -> Kind {
        Kind::Sequence
    }
}

impl<T> Declared for VecDeque<T> {
    const KIND: Kind = Kind::Sequence;
}

// ═══════════════════════════════════════════════════════════════════
// Owning and Shared Pointers
// ═══════════════════════════════════════════════════════════════════

impl<T: Introspect> Introspect for Box<T> {
    fn kind(&self) -> Kind {
        Kind::Pointer
    }

    fn with_target(&self, visit: &mut dyn FnMut(Target<'_>)) {
        visit(Target::Value(&**self))
    }
}

impl<T: Introspect> Introspect for Rc<T> {
    fn kind(&self) -> Kind {
        Kind::Pointer
    }

    fn with_target(&self, visit: &mut dyn FnMut(Target<'_>)) {
        visit(Target::Value(&**self))
    }

    fn address(&self) -> Option<usize> {
        Some(addr_of(Rc::as_ptr(self)))
    }
}

impl<T: Introspect> Introspect for Arc<T> {
    fn kind(&self) -> Kind {
        Kind::Pointer
    }

    fn with_target(&self, visit: &mut dyn FnMut(Target<'_>)) {
        visit(Target::Value(&**self))
    }

    fn address(&self) -> Option<usize> {
        Some(addr_of(Arc::as_ptr(self)))
    }
}

impl<T: Introspect> Introspect for Option<Box<T>> {
    fn kind(&self) -> Kind {
        Kind::Pointer
    }

    fn is_null(&self) -> bool {
        self.is_none()
    }

    fn with_target(&self, visit: &mut dyn FnMut(Target<'_>)) {
        match self {
            Some(target) => visit(Target::Value(&**target)),
            None => visit(Target::Null),
        }
    }
}

impl<T: Introspect> Introspect for Option<Rc<T>> {
    fn kind(&self) -> Kind {
        Kind::Pointer
    }

    fn is_null(&self) -> bool {
        self.is_none()
    }

    fn with_target(&self, visit: &mut dyn FnMut(Target<'_>)) {
        match self {
            Some(target) => visit(Target::Value(&**target)),
            None => visit(Target::Null),
        }
    }

    fn address(&self) -> Option<usize> {
        self.as_ref().map(|rc| addr_of(Rc::as_ptr(rc)))
    }
}

impl<T: Introspect> Introspect for Option<Arc<T>> {
    fn kind(&self) -> Kind {
        Kind::Pointer
    }

    fn is_null(&self) -> bool {
        self.is_none()
    }

    fn with_target(&self, visit: &mut dyn FnMut(Target<'_>)) {
        match self {
            Some(target) => visit(Target::Value(&**target)),
            None => visit(Target::Null),
        }
    }

    fn address(&self) -> Option<usize> {
        self.as_ref().map(|arc| addr_of(Arc::as_ptr(arc)))
    }
}

impl<T: Introspect> Introspect for rc::Weak<T> {
    fn kind(&self) -> Kind {
        Kind::Pointer
    }

    fn is_null(&self) -> bool {
        self.strong_count() == 0
    }

    fn with_target(&self, visit: &mut dyn FnMut(Target<'_>)) {
        match self.upgrade() {
            Some(target) => visit(Target::Value(&*target)),
            None => visit(Target::Null),
        }
    }

    fn address(&self) -> Option<usize> {
        (self.strong_count() > 0).then(|| addr_of(self.as_ptr()))
    }
}

impl<T: Introspect> Introspect for sync::Weak<T> {
    fn kind(&self) -> Kind {
        Kind::Pointer
    }

    fn is_null(&self) -> bool {
        self.strong_count() == 0
    }

    fn with_target(&self, visit: &mut dyn FnMut(Target<'_>)) {
        match self.upgrade() {
            Some(target) => visit(Target::Value(&*target)),
            None => visit(Target::Null),
        }
    }

    fn address(&self) -> Option<usize> {
        (self.strong_count() > 0).then(|| addr_of(self.as_ptr()))
    }
}

macro_rules! declared_pointer {
    ($($ty:ty),* $(,)?) => {
        $(
            impl<T: Declared> Declared for $ty {
                const KIND: Kind = Kind::Pointer;
                const TARGET: Option<Kind> = Some(T::KIND);
            }
        )*
    };
}

declared_pointer!(
    Box<T>,
    Rc<T>,
    Arc<T>,
    Option<Box<T>>,
    Option<Rc<T>>,
    Option<Arc<T>>,
    rc::Weak<T>,
    sync::Weak<T>,
    RefCell<T>,
    Mutex<T>,
    RwLock<T>,
);

// ═══════════════════════════════════════════════════════════════════
// Shared Cells
// ═══════════════════════════════════════════════════════════════════
// A cell is a hop that never reads as null. While another holder has it
// mutably borrowed or locked it reports `Invalid` instead of blocking.

impl<T: Introspect> Introspect for RefCell<T> {
    fn kind(&self) -> Kind {
        match self.try_borrow() {
            Ok(_) => Kind::Pointer,
            Err(_) => Kind::Invalid,
        }
    }

    fn with_target(&self, visit: &mut dyn FnMut(Target<'_>)) {
        match self.try_borrow() {
            Ok(guard) => visit(Target::Value(&*guard)),
            Err(_) => visit(Target::Invalid),
        }
    }
}

impl<T: Introspect> Introspect for Mutex<T> {
    fn kind(&self) -> Kind {
        match self.try_lock() {
            Ok(_) => Kind::Pointer,
            Err(_) => Kind::Invalid,
        }
    }

    fn with_target(&self, visit: &mut dyn FnMut(Target<'_>)) {
        match self.try_lock() {
            Ok(guard) => visit(Target::Value(&*guard)),
            Err(_) => visit(Target::Invalid),
        }
    }
}

impl<T: Introspect> Introspect for RwLock<T> {
    fn kind(&self) -> Kind {
        match self.try_read() {
            Ok(_) => Kind::Pointer,
            Err(_) => Kind::Invalid,
        }
    }

    fn with_target(&self, visit: &mut dyn FnMut(Target<'_>)) {
        match self.try_read() {
            Ok(guard) => visit(Target::Value(&*guard)),
            Err(_) => visit(Target::Invalid),
        }
    }
}

// ═══════════════════════════════════════════════════════════════════
// Opaque Pointers
// ═══════════════════════════════════════════════════════════════════
// Only the address is checked; the target is never read.

impl<T: ?Sized> Introspect for *const T {
    fn kind(&self) -> Kind {
        Kind::Opaque
    }

    fn is_null(&self) -> bool {
        <*const T>::is_null(*self)
    }
}

impl<T: ?Sized> Declared for *const T {
    const KIND: Kind = Kind::Opaque;
}

impl<T: ?Sized> Introspect for *mut T {
    fn kind(&self) -> Kind {
        Kind::Opaque
    }

    fn is_null(&self) -> bool {
        <*mut T>::is_null(*self)
    }
}

impl<T: ?Sized> Declared for *mut T {
    const KIND: Kind = Kind::Opaque;
}

impl<T: ?Sized> Introspect for Option<NonNull<T>> {
    fn kind(&self) -> Kind {
        Kind::Opaque
    }

    fn is_null(&self) -> bool {
        self.is_none()
    }
}

impl<T: ?Sized> Declared for Option<NonNull<T>> {
    const KIND: Kind = Kind::Opaque;
}

//! Nullable, aliasable pointer

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use super::{Declared, Introspect, Target};
use crate::error::{Result, TrackError};
use crate::kind::Kind;

/// A nullable pointer to a shared, mutable slot.
///
/// Clones alias the same slot: a write through any clone is seen by all of
/// them. This is how a link in the middle of a reference chain gets nulled
/// behind a container's back.
///
/// ```
/// use chainopt::Ptr;
///
/// let p = Ptr::new(10);
/// let alias = p.clone();
///
/// alias.set(11).unwrap();
/// assert_eq!(p.get().unwrap(), 11);
/// assert!(Ptr::<i32>::null().is_null());
/// ```
pub struct Ptr<T>(Option<Rc<RefCell<T>>>);

impl<T> Ptr<T> {
    /// Allocate a new slot holding `value`
    pub fn new(value: T) -> Self {
        Self(Some(Rc::new(RefCell::new(value))))
    }

    /// A pointer to nothing
    pub fn null() -> Self {
        Self(None)
    }

    /// Check if this pointer points to nothing
    pub fn is_null(&self) -> bool {
        self.0.is_none()
    }

    /// Check if both pointers alias the same slot (two nulls are equal)
    pub fn ptr_eq(&self, other: &Self) -> bool {
        match (&self.0, &other.0) {
            (Some(a), Some(b)) => Rc::ptr_eq(a, b),
            (None, None) => true,
            _ => false,
        }
    }

    fn cell(&self) -> Result<&RefCell<T>> {
        self.0.as_deref().ok_or(TrackError::Absent)
    }

    /// Borrow the pointed-to value for the duration of `f`.
    pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> Result<R> {
        let guard = self.cell()?.try_borrow().map_err(|_| TrackError::Uninspectable {
            kind: Kind::Invalid,
        })?;
        Ok(f(&guard))
    }

    /// Mutably borrow the pointed-to value for the duration of `f`.
    pub fn with_mut<R>(&self, f: impl FnOnce(&mut T) -> R) -> Result<R> {
        let mut guard = self
            .cell()?
            .try_borrow_mut()
            .map_err(|_| TrackError::Uninspectable {
                kind: Kind::Invalid,
            })?;
        Ok(f(&mut guard))
    }

    /// Write `value` into the shared slot, visible to every alias.
    pub fn set(&self, value: T) -> Result<()> {
        self.with_mut(|slot| *slot = value)
    }

    /// Write `value` into the shared slot and return what was there.
    pub fn replace(&self, value: T) -> Result<T> {
        self.with_mut(|slot| std::mem::replace(slot, value))
    }

    /// Null this handle only; other aliases keep the slot alive.
    pub fn clear(&mut self) {
        self.0 = None;
    }

    /// Copy out the pointed-to value
    pub fn get(&self) -> Result<T>
    where
        T: Clone,
    {
        self.with(T::clone)
    }
}

impl<T> Clone for Ptr<T> {
    fn clone(&self) -> Self {
        Self(self.0.clone())
    }
}

impl<T> Default for Ptr<T> {
    fn default() -> Self {
        Self::null()
    }
}

// Prints the address only; the slot may be borrowed or part of a cycle.
impl<T> fmt::Debug for Ptr<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.0 {
            Some(rc) => write!(f, "Ptr({:p})", Rc::as_ptr(rc)),
            None => write!(f, "Ptr(null)"),
        }
    }
}

impl<T: Introspect> Introspect for Ptr<T> {
    fn kind(&self) -> Kind {
        match &self.0 {
            Some(cell) if cell.try_borrow().is_err() => Kind::Invalid,
            _ => Kind::Pointer,
        }
    }

    fn is_null(&self) -> bool {
        self.0.is_none()
    }

    fn with_target(&self, visit: &mut dyn FnMut(Target<'_>)) {
        let Some(cell) = &self.0 else {
            return visit(Target::Null);
        };
        match cell.try_borrow() {
            Ok(guard) => visit(Target::Value(&*guard)),
            Err(_) => visit(Target::Invalid),
        }
    }

    fn address(&self) -> Option<usize> {
        self.0.as_ref().map(|rc| Rc::as_ptr(rc) as *const () as usize)
    }
}

impl<T: Declared> Declared for Ptr<T> {
    const KIND: Kind = Kind::Pointer;
    const TARGET: Option<Kind> = Some(T::KIND);
}

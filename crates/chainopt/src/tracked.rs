//! The tracked optional container

use std::fmt;

use tracing::debug;

use crate::classify::{classify_declared, classify_value};
use crate::detect;
use crate::error::{raise, Result, TrackError};
use crate::introspect::{Declared, Introspect};
use crate::kind::Policy;

/// An optional value whose presence is re-checked through its reference
/// chain on every query.
///
/// The [`Policy`] is fixed when the container is built. What it decides is
/// only how far each query looks:
///
/// - `Value`: the container is present whenever it holds something.
/// - `Shallow`: present while the stored reference itself is not null.
/// - `Deep`: present while every link of the chain behind it resolves.
///
/// The container does not own what its references point to. Other holders
/// of those links may null them at any time, and the next query reflects
/// it; no mutator on the container is involved.
///
/// # Example
///
/// ```
/// use chainopt::{Policy, Ptr, Tracked};
///
/// let p = Ptr::new(10);
/// let pp = Ptr::new(p.clone());
///
/// let opt = Tracked::some(pp.clone());
/// assert_eq!(opt.policy(), Policy::Deep);
/// assert!(opt.is_some());
///
/// // Null the inner link through another alias
/// pp.set(Ptr::null()).unwrap();
/// assert!(opt.is_none());
///
/// // And point it somewhere valid again
/// pp.set(p).unwrap();
/// assert!(opt.is_some());
/// ```
pub struct Tracked<T> {
    /// Stored value; `None` once emptied
    slot: Option<T>,

    /// Fixed at construction
    policy: Policy,
}

impl<T: Declared> Tracked<T> {
    /// Create a present optional, classifying `value` by its shape.
    ///
    /// # Panics
    ///
    /// Panics if `value` is already absent under its policy (a null map,
    /// a pointer to a nulled pointer, ...) or cannot be inspected. An
    /// unallocated sequence is never absent and is accepted.
    #[track_caller]
    pub fn some(value: T) -> Self {
        match Self::try_some(value) {
            Ok(tracked) => tracked,
            Err(err) => raise(err),
        }
    }

    /// Fallible form of [`Tracked::some`].
    pub fn try_some(value: T) -> Result<Self> {
        let policy = classify_value(&value)?;
        Self::try_some_with(policy, value)
    }

    /// Classify `value` and store it, whether or not it is absent.
    ///
    /// Unlike [`Tracked::some`] this never rejects a null reference; the
    /// container simply reports it as absent.
    ///
    /// # Panics
    ///
    /// Panics if `value` cannot be inspected.
    #[track_caller]
    pub fn wrap(value: T) -> Self {
        let policy = match classify_value(&value) {
            Ok(policy) => policy,
            Err(err) => raise(err),
        };
        debug!(%policy, "wrapped value");
        Self {
            slot: Some(value),
            policy,
        }
    }

    /// Create an empty optional, classified from `T` alone.
    pub fn none() -> Self {
        Self::none_with(classify_declared::<T>())
    }
}

impl<T: Introspect> Tracked<T> {
    /// Create a present optional with an explicit policy.
    ///
    /// # Panics
    ///
    /// Panics if `value` is already absent under `policy`.
    #[track_caller]
    pub fn some_with(policy: Policy, value: T) -> Self {
        match Self::try_some_with(policy, value) {
            Ok(tracked) => tracked,
            Err(err) => raise(err),
        }
    }

    /// Fallible form of [`Tracked::some_with`].
    pub fn try_some_with(policy: Policy, value: T) -> Result<Self> {
        if detect::check(policy, &value)? {
            return Err(TrackError::AbsentAtConstruction {
                policy,
                kind: value.kind(),
            });
        }
        debug!(%policy, kind = %value.kind(), "constructed present optional");
        Ok(Self {
            slot: Some(value),
            policy,
        })
    }

    /// Create an empty optional with an explicit policy.
    pub fn none_with(policy: Policy) -> Self {
        Self { slot: None, policy }
    }

    /// The policy chosen at construction
    pub fn policy(&self) -> Policy {
        self.policy
    }

    /// Check if the optional holds nothing usable right now.
    ///
    /// # Panics
    ///
    /// Panics if a `Deep` chain is found to be cyclic.
    #[track_caller]
    pub fn is_none(&self) -> bool {
        match &self.slot {
            None => true,
            Some(value) => self.policy.is_absent_in(value),
        }
    }

    /// Check if the optional holds something usable right now.
    #[track_caller]
    pub fn is_some(&self) -> bool {
        !self.is_none()
    }

    /// Borrow the stored value if it is present right now.
    pub fn value(&self) -> Result<&T> {
        if self.is_none() {
            return Err(TrackError::Absent);
        }
        self.slot.as_ref().ok_or(TrackError::Absent)
    }

    /// Borrow the stored value.
    ///
    /// # Panics
    ///
    /// Panics if the optional is absent.
    #[track_caller]
    pub fn unwrap(&self) -> &T {
        self.expect("called `Tracked::unwrap()` on an absent value")
    }

    /// Borrow the stored value.
    ///
    /// # Panics
    ///
    /// Panics with `msg` if the optional is absent.
    #[track_caller]
    pub fn expect(&self, msg: &str) -> &T {
        match self.value() {
            Ok(value) => value,
            Err(_) => raise(TrackError::UnwrapAbsent(msg.to_string())),
        }
    }

    /// Store `value`, returning the previous value if it was present.
    ///
    /// `value` is stored even when it is itself absent, so the caller never
    /// loses a reference it handed over; the next query reports it absent.
    /// A previous value that had become absent is dropped.
    pub fn swap(&mut self, value: T) -> Option<T> {
        let previous = if self.is_some() {
            self.slot.take()
        } else {
            None
        };
        self.slot = Some(value);
        debug!(policy = %self.policy, returned = previous.is_some(), "swapped value");
        previous
    }

    /// Move the value out, leaving the optional empty.
    ///
    /// An absent optional is left exactly as it was.
    pub fn take(&mut self) -> Result<T> {
        if self.is_none() {
            return Err(TrackError::Absent);
        }
        debug!(policy = %self.policy, "took value");
        self.slot.take().ok_or(TrackError::Absent)
    }

    /// Run `f` on the value if it is present right now.
    pub fn with(&self, f: impl FnOnce(&T)) {
        if let Ok(value) = self.value() {
            f(value)
        }
    }

    /// Run `f` if the optional is absent right now.
    pub fn with_none(&self, f: impl FnOnce()) {
        if self.is_none() {
            f()
        }
    }

    /// Copy the value into `out` if it is present; report whether it was.
    pub fn assign_to(&self, out: &mut T) -> bool
    where
        T: Clone,
    {
        match self.value() {
            Ok(value) => {
                out.clone_from(value);
                true
            }
            Err(_) => false,
        }
    }

    /// The stored value, whatever the verdict on it.
    pub fn as_slot(&self) -> Option<&T> {
        self.slot.as_ref()
    }

    /// Consume the optional, returning the value if it is present.
    pub fn into_inner(mut self) -> Result<T> {
        self.take()
    }
}

impl<T: Declared> Default for Tracked<T> {
    fn default() -> Self {
        Self::none()
    }
}

impl<T: Clone> Clone for Tracked<T> {
    fn clone(&self) -> Self {
        Self {
            slot: self.slot.clone(),
            policy: self.policy,
        }
    }
}

impl<T: Introspect + fmt::Debug> fmt::Debug for Tracked<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let absent = match &self.slot {
            None => Ok(true),
            Some(value) => detect::check(self.policy, value),
        };
        f.debug_struct("Tracked")
            .field("policy", &self.policy)
            .field("absent", &absent)
            .field("slot", &self.slot)
            .finish()
    }
}

/// Classify `value` and wrap it; see [`Tracked::wrap`].
#[track_caller]
pub fn wrap<T: Declared>(value: T) -> Tracked<T> {
    Tracked::wrap(value)
}

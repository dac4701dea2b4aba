//! Tracking policy classification
//!
//! A container's policy is decided once, when it is built, from the shape
//! of the first value it is given (or from its type alone when it starts
//! empty). The rules:
//!
//! | shape | policy |
//! |---|---|
//! | plain value, sequence, aggregate | `Value` |
//! | opaque pointer, function, map, channel | `Shallow` |
//! | pointer or dynamic value whose target is plain | `Shallow` |
//! | pointer or dynamic value whose target is reference-like | `Deep` |
//! | pointer or dynamic value with no observable or declared target | `Deep` |

use tracing::trace;

use crate::error::{Result, TrackError};
use crate::introspect::{Declared, Introspect, Target};
use crate::kind::{Kind, Policy};

fn policy_for_target(target: Kind) -> Policy {
    if target.is_reference_like() {
        Policy::Deep
    } else {
        Policy::Shallow
    }
}

/// Classify a value from its runtime shape.
///
/// A pointer that is currently null has no observable target and is
/// classified `Deep`. Fails with [`TrackError::Uninspectable`] when the
/// value, or the slot one level below it, cannot be inspected.
pub fn classify(value: &dyn Introspect) -> Result<Policy> {
    classify_with(value, Policy::Deep)
}

/// Classify a value, falling back to its declared type when a pointer is
/// null and its target cannot be observed.
pub fn classify_value<T: Declared>(value: &T) -> Result<Policy> {
    classify_with(value, classify_declared::<T>())
}

/// Classify a type without a value.
pub fn classify_declared<T: Declared>() -> Policy {
    match T::KIND {
        kind if kind.is_chain_link() => T::TARGET.map_or(Policy::Deep, policy_for_target),
        kind if kind.is_reference_like() => Policy::Shallow,
        _ => Policy::Value,
    }
}

fn classify_with(value: &dyn Introspect, unobserved: Policy) -> Result<Policy> {
    let kind = value.kind();
    let policy = match kind {
        Kind::Invalid => return Err(TrackError::Uninspectable { kind }),
        _ if kind.is_chain_link() => {
            let mut target = None;
            value.with_target(&mut |hop| {
                target = match hop {
                    Target::Null => None,
                    Target::Invalid => Some(Kind::Invalid),
                    Target::Value(inner) => Some(inner.kind()),
                }
            });
            match target {
                Some(Kind::Invalid) => {
                    return Err(TrackError::Uninspectable {
                        kind: Kind::Invalid,
                    })
                }
                Some(target) => policy_for_target(target),
                None => unobserved,
            }
        }
        // Opaque pointers and leaf references
        _ if kind.is_reference_like() => Policy::Shallow,
        _ => Policy::Value,
    };
    trace!(%kind, %policy, "classified value");
    Ok(policy)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::introspect::{MapRef, Ptr};
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn test_plain_and_sequences_are_values() {
        assert_eq!(classify(&42i32), Ok(Policy::Value));
        assert_eq!(classify(&vec![Ptr::<u8>::null()]), Ok(Policy::Value));
        assert_eq!(classify_declared::<String>(), Policy::Value);
    }

    #[test]
    fn test_single_pointer_to_data_is_shallow() {
        assert_eq!(classify(&Ptr::new(1u8)), Ok(Policy::Shallow));
        assert_eq!(classify(&Box::new(1u8)), Ok(Policy::Shallow));
        assert_eq!(classify(&MapRef::<u8, u8>::new()), Ok(Policy::Shallow));
    }

    #[test]
    fn test_pointer_to_reference_is_deep() {
        let p = Ptr::new(1u8);
        assert_eq!(classify(&Ptr::new(p)), Ok(Policy::Deep));
        assert_eq!(
            classify(&Rc::new(RefCell::new(Some(Rc::new(1u8))))),
            Ok(Policy::Deep)
        );
    }

    #[test]
    fn test_null_pointer_uses_declared_target() {
        assert_eq!(classify(&Ptr::<u8>::null()), Ok(Policy::Deep));
        assert_eq!(classify_value(&Ptr::<u8>::null()), Ok(Policy::Shallow));
        assert_eq!(classify_value(&Ptr::<Ptr<u8>>::null()), Ok(Policy::Deep));
    }

    #[test]
    fn test_opaque_never_recurses() {
        let x = 0u8;
        let raw: *const u8 = &x;
        assert_eq!(classify(&raw), Ok(Policy::Shallow));
        assert_eq!(classify_declared::<*mut u8>(), Policy::Shallow);
    }

    #[test]
    fn test_borrowed_target_is_uninspectable() {
        let cell = Rc::new(RefCell::new(5u8));
        let _guard = cell.borrow_mut();
        assert_eq!(
            classify(&cell),
            Err(TrackError::Uninspectable {
                kind: Kind::Invalid
            })
        );
        assert_eq!(
            classify(&*cell),
            Err(TrackError::Uninspectable {
                kind: Kind::Invalid
            })
        );
    }
}

//! Absence detection over reference chains
//!
//! Nothing here is cached: every call walks the chain as it is right now,
//! so a link nulled through some other alias since the last query is seen
//! on the next one.

use std::collections::HashSet;

use tracing::trace;

use crate::error::{raise, Result, TrackError};
use crate::introspect::{Introspect, Target};
use crate::kind::{Kind, Policy};

/// Walk the whole chain behind `value` and report whether it ends in
/// nothing usable.
///
/// Per hop:
/// - invalid: absent
/// - opaque pointer: absent iff null, never dereferenced
/// - pointer: absent if the target is null or invalid, else recurse
/// - function, map, channel: absent iff null
/// - dynamic value: absent iff it holds nothing, else recurse into what it holds
/// - sequence, plain value: present
///
/// Fails with [`TrackError::CyclicChain`] if a shared pointer is reached
/// twice.
pub fn probe(value: &dyn Introspect) -> Result<bool> {
    Walk::default().absent(value)
}

/// Like [`probe`], but a cyclic chain is a fatal error.
#[track_caller]
pub fn is_absent(value: &dyn Introspect) -> bool {
    match probe(value) {
        Ok(absent) => absent,
        Err(err) => raise(err),
    }
}

/// Check only the reference itself.
pub fn is_null_shallow(value: &dyn Introspect) -> bool {
    value.kind() == Kind::Invalid || value.is_null()
}

/// Check `value` as far as `policy` reaches.
pub fn check(policy: Policy, value: &dyn Introspect) -> Result<bool> {
    if !policy.needs_check() {
        return Ok(false);
    }
    match policy {
        Policy::Shallow => Ok(is_null_shallow(value)),
        _ => probe(value),
    }
}

impl Policy {
    /// Whether `value` is absent as far as this policy reaches.
    #[track_caller]
    pub fn is_absent_in(self, value: &dyn Introspect) -> bool {
        match check(self, value) {
            Ok(absent) => absent,
            Err(err) => raise(err),
        }
    }
}

#[derive(Default)]
struct Walk {
    visited: HashSet<usize>,
    depth: usize,
}

impl Walk {
    fn absent(&mut self, value: &dyn Introspect) -> Result<bool> {
        let kind = value.kind();
        trace!(depth = self.depth, %kind, "probing hop");

        match kind {
            Kind::Invalid => Ok(true),
            Kind::Opaque => Ok(value.is_null()),
            _ if kind.is_leaf_reference() => Ok(value.is_null()),
            _ if kind.is_chain_link() => self.follow(value),
            _ => Ok(false),
        }
    }

    fn follow(&mut self, value: &dyn Introspect) -> Result<bool> {
        if let Some(address) = value.address() {
            if !self.visited.insert(address) {
                return Err(TrackError::CyclicChain { depth: self.depth });
            }
        }
        self.depth += 1;

        let mut verdict = Ok(true);
        value.with_target(&mut |target| {
            verdict = match target {
                Target::Null | Target::Invalid => Ok(true),
                Target::Value(inner) => self.absent(inner),
            }
        });
        verdict
    }
}

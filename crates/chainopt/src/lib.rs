//! # chainopt
//!
//! Optional values that stay honest about reference chains.
//!
//! A plain `Option<T>` says whether it holds a `T`. When `T` is a reference
//! to a reference, holding it says little: some other alias may have nulled
//! a link in the middle of the chain since it was stored. [`Tracked<T>`]
//! re-checks the chain every time it is asked.
//!
//! ## Architecture
//!
//! - **Introspection**: [`Introspect`] reports a value's [`Kind`], its own
//!   null state, and one level of dereference; [`Declared`] does the same
//!   from the type alone
//! - **Classifier**: [`classify`] picks a [`Policy`] once, at construction
//! - **Detector**: [`probe`] walks the chain on demand, never cached
//! - **Container**: [`Tracked`] combines the two into the optional API
//!
//! Reference shapes with their own null state are provided as handles:
//! [`Ptr`], [`MapRef`], [`FnRef`], [`Chan`]; [`Value`] is a dynamically
//! typed container the detector walks through.
//!
//! ## Example
//!
//! ```
//! use chainopt::{Tracked, Value};
//!
//! let slot = Value::reference(Value::I64(10));
//! let opt = Tracked::some(slot.clone());
//! assert!(opt.is_some());
//!
//! slot.as_ref_ptr().unwrap().set(Value::Nil).unwrap();
//! assert!(opt.is_none());
//! ```
//!
//! None of these types are thread-safe; a container shared between threads
//! needs outside locking.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod classify;
pub mod detect;
pub mod error;
pub mod introspect;
pub mod kind;
pub mod tracked;
pub mod value;

// Re-export main types
pub use classify::{classify, classify_declared, classify_value};
pub use detect::{is_absent, is_null_shallow, probe};
pub use error::{Result, TrackError};
pub use introspect::{Chan, Declared, FnRef, Introspect, MapRef, Ptr, Target};
pub use kind::{Kind, Policy};
pub use tracked::{wrap, Tracked};
pub use value::{StructValue, Value, ValueFn};

/// chainopt version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

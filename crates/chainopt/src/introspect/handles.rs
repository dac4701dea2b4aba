//! Leaf reference handles: maps, functions, channels
//!
//! Each handle is either null or shares its referent with every clone. The
//! detector only asks whether a handle is null; it never looks inside.

use std::cell::RefCell;
use std::fmt;
use std::hash::Hash;
use std::rc::Rc;
use std::sync::mpsc::{self, Receiver, Sender};

use indexmap::IndexMap;

use super::{Declared, Introspect};
use crate::error::{Result, TrackError};
use crate::kind::Kind;

fn busy() -> TrackError {
    TrackError::Uninspectable {
        kind: Kind::Invalid,
    }
}

// ═══════════════════════════════════════════════════════════════════
// Maps
// ═══════════════════════════════════════════════════════════════════

/// A nullable handle to a shared associative map.
///
/// Entries keep insertion order.
pub struct MapRef<K, V>(Option<Rc<RefCell<IndexMap<K, V>>>>);

impl<K: Hash + Eq, V> MapRef<K, V> {
    /// Create a handle to a new, empty map
    pub fn new() -> Self {
        Self(Some(Rc::new(RefCell::new(IndexMap::new()))))
    }

    /// Insert an entry, returning the previous value for the key
    pub fn insert(&self, key: K, value: V) -> Result<Option<V>> {
        let map = self.0.as_ref().ok_or(TrackError::Absent)?;
        let mut map = map.try_borrow_mut().map_err(|_| busy())?;
        Ok(map.insert(key, value))
    }

    /// Look up a key, cloning the value out
    pub fn get(&self, key: &K) -> Result<Option<V>>
    where
        V: Clone,
    {
        let map = self.0.as_ref().ok_or(TrackError::Absent)?;
        let map = map.try_borrow().map_err(|_| busy())?;
        Ok(map.get(key).cloned())
    }

    /// Remove a key, keeping the order of the remaining entries
    pub fn remove(&self, key: &K) -> Result<Option<V>> {
        let map = self.0.as_ref().ok_or(TrackError::Absent)?;
        let mut map = map.try_borrow_mut().map_err(|_| busy())?;
        Ok(map.shift_remove(key))
    }

    /// Number of entries
    pub fn len(&self) -> Result<usize> {
        let map = self.0.as_ref().ok_or(TrackError::Absent)?;
        let map = map.try_borrow().map_err(|_| busy())?;
        Ok(map.len())
    }

    /// Remove every entry; the map stays allocated
    pub fn clear(&self) -> Result<()> {
        let map = self.0.as_ref().ok_or(TrackError::Absent)?;
        map.try_borrow_mut().map_err(|_| busy())?.clear();
        Ok(())
    }

    /// Check if the map has no entries
    pub fn is_empty(&self) -> Result<bool> {
        self.len().map(|n| n == 0)
    }
}

impl<K, V> MapRef<K, V> {
    /// A handle to no map
    pub fn null() -> Self {
        Self(None)
    }

    /// Check if this handle refers to no map
    pub fn is_null(&self) -> bool {
        self.0.is_none()
    }

    /// Check if both handles share the same map
    pub fn ptr_eq(&self, other: &Self) -> bool {
        match (&self.0, &other.0) {
            (Some(a), Some(b)) => Rc::ptr_eq(a, b),
            (None, None) => true,
            _ => false,
        }
    }
}

impl<K: Hash + Eq, V> FromIterator<(K, V)> for MapRef<K, V> {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(Some(Rc::new(RefCell::new(iter.into_iter().collect()))))
    }
}

impl<K, V> Clone for MapRef<K, V> {
    fn clone(&self) -> Self {
        Self(self.0.clone())
    }
}

impl<K, V> Default for MapRef<K, V> {
    fn default() -> Self {
        Self::null()
    }
}

impl<K, V> fmt::Debug for MapRef<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.0 {
            Some(rc) => write!(f, "MapRef({:p})", Rc::as_ptr(rc)),
            None => write!(f, "MapRef(null)"),
        }
    }
}

impl<K, V> Introspect for MapRef<K, V> {
    fn kind(&self) -> Kind {
        Kind::Map
    }

    fn is_null(&self) -> bool {
        self.0.is_none()
    }
}

impl<K, V> Declared for MapRef<K, V> {
    const KIND: Kind = Kind::Map;
}

// ═══════════════════════════════════════════════════════════════════
// Functions
// ═══════════════════════════════════════════════════════════════════

/// A nullable handle to a shared function of one argument.
pub struct FnRef<A, R>(Option<Rc<dyn Fn(A) -> R>>);

impl<A, R> FnRef<A, R> {
    /// Wrap a function
    pub fn new(f: impl Fn(A) -> R + 'static) -> Self {
        Self(Some(Rc::new(f)))
    }

    /// A handle to no function
    pub fn null() -> Self {
        Self(None)
    }

    /// Check if this handle refers to no function
    pub fn is_null(&self) -> bool {
        self.0.is_none()
    }

    /// Call the function
    pub fn call(&self, arg: A) -> Result<R> {
        let f = self.0.as_ref().ok_or(TrackError::Absent)?;
        Ok(f(arg))
    }

    /// Check if both handles share the same function
    pub fn ptr_eq(&self, other: &Self) -> bool {
        match (&self.0, &other.0) {
            (Some(a), Some(b)) => Rc::ptr_eq(a, b),
            (None, None) => true,
            _ => false,
        }
    }
}

impl<A, R> Clone for FnRef<A, R> {
    fn clone(&self) -> Self {
        Self(self.0.clone())
    }
}

impl<A, R> Default for FnRef<A, R> {
    fn default() -> Self {
        Self::null()
    }
}

impl<A, R> fmt::Debug for FnRef<A, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_some() {
            write!(f, "<fn>")
        } else {
            write!(f, "<fn null>")
        }
    }
}

impl<A, R> Introspect for FnRef<A, R> {
    fn kind(&self) -> Kind {
        Kind::Function
    }

    fn is_null(&self) -> bool {
        self.0.is_none()
    }
}

impl<A, R> Declared for FnRef<A, R> {
    const KIND: Kind = Kind::Function;
}

// ═══════════════════════════════════════════════════════════════════
// Channels
// ═══════════════════════════════════════════════════════════════════

struct Endpoints<T> {
    tx: Sender<T>,
    rx: Receiver<T>,
}

/// A nullable handle to an unbounded FIFO channel.
///
/// The handle owns the receiving end; [`Chan::sender`] hands out senders
/// that may move to other threads.
pub struct Chan<T>(Option<Rc<Endpoints<T>>>);

impl<T> Chan<T> {
    /// Open a new channel
    pub fn new() -> Self {
        let (tx, rx) = mpsc::channel();
        Self(Some(Rc::new(Endpoints { tx, rx })))
    }

    /// A handle to no channel
    pub fn null() -> Self {
        Self(None)
    }

    /// Check if this handle refers to no channel
    pub fn is_null(&self) -> bool {
        self.0.is_none()
    }

    fn endpoints(&self) -> Result<&Endpoints<T>> {
        self.0.as_deref().ok_or(TrackError::Absent)
    }

    /// A sending end for this channel
    pub fn sender(&self) -> Result<Sender<T>> {
        Ok(self.endpoints()?.tx.clone())
    }

    /// Queue a message
    pub fn send(&self, message: T) -> Result<()> {
        // mpsc still reports a send error in its signature; the receiver
        // lives in the same allocation, so it never fires.
        self.endpoints()?
            .tx
            .send(message)
            .map_err(|_| TrackError::Absent)
    }

    /// Block until a message arrives.
    ///
    /// The handle keeps a sender of its own, so the channel never
    /// disconnects: with nothing queued and no other thread sending, this
    /// blocks forever. Use [`Chan::try_recv`] to poll.
    pub fn recv(&self) -> Result<T> {
        // Same as `send`: the held sender rules out `RecvError`.
        self.endpoints()?.rx.recv().map_err(|_| TrackError::Absent)
    }

    /// Take a queued message without blocking; `None` when the queue is empty
    pub fn try_recv(&self) -> Result<Option<T>> {
        Ok(self.endpoints()?.rx.try_recv().ok())
    }

    /// Check if both handles share the same channel
    pub fn ptr_eq(&self, other: &Self) -> bool {
        match (&self.0, &other.0) {
            (Some(a), Some(b)) => Rc::ptr_eq(a, b),
            (None, None) => true,
            _ => false,
        }
    }
}

impl<T> Clone for Chan<T> {
    fn clone(&self) -> Self {
        Self(self.0.clone())
    }
}

impl<T> Default for Chan<T> {
    fn default() -> Self {
        Self::null()
    }
}

impl<T> fmt::Debug for Chan<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.0 {
            Some(rc) => write!(f, "Chan({:p})", Rc::as_ptr(rc)),
            None => write!(f, "Chan(null)"),
        }
    }
}

impl<T> Introspect for Chan<T> {
    fn kind(&self) -> Kind {
        Kind::Channel
    }

    fn is_null(&self) -> bool {
        self.0.is_none()
    }
}

impl<T> Declared for Chan<T> {
    const KIND: Kind = Kind::Channel;
}

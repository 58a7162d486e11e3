//! The per-request variable bag shared between handlers.
//!
//! A [`Vars`] is a handle: cloning it does not copy the map, both clones see the same
//! entries. Besides string keyed [`serde_json::Value`]s it holds values keyed by their type,
//! for data that has no JSON form (connections, parsed tokens, ...). [`WrappedWriter`](crate::WrappedWriter) relies on this to make sure only one
//! bag exists per request, no matter how many times the writer gets wrapped.

use http::Extensions;
use serde_json::Value;
use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Key under which the request path is stored before any prefix stripping.
pub const ORIG_PATH: &str = "OrigPath";

/// A shared bag of per-request values, keyed by name or by type.
#[derive(Debug, Clone, Default)]
pub struct Vars {
    inner: Arc<Mutex<State>>,
}

#[derive(Debug, Default)]
struct State {
    values: HashMap<String, Value>,
    typed: Extensions,
}

impl Vars {
    /// Creates a new, empty bag.
    pub fn new() -> Self {
        Self::default()
    }

    // a poisoned lock only means a handler panicked mid-insert, the map itself is still usable
    fn lock(&self) -> MutexGuard<'_, State> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Returns a copy of the value stored under `key`.
    pub fn get(&self, key: &str) -> Option<Value> {
        self.lock().values.get(key).cloned()
    }

    /// Returns the value stored under `key` if it is a string.
    pub fn get_str(&self, key: &str) -> Option<String> {
        self.lock().values.get(key).and_then(Value::as_str).map(ToOwned::to_owned)
    }

    /// Inserts a value, returning the previous one if any.
    pub fn insert(&self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.lock().values.insert(key.into(), value.into())
    }

    /// Inserts a value only if `key` is not present yet.
    ///
    /// Returns `true` if the value was inserted.
    pub fn insert_if_absent(&self, key: impl Into<String>, value: impl Into<Value>) -> bool {
        match self.lock().values.entry(key.into()) {
            Entry::Occupied(_) => false,
            Entry::Vacant(entry) => {
                entry.insert(value.into());
                true
            }
        }
    }

    pub fn remove(&self, key: &str) -> Option<Value> {
        self.lock().values.remove(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.lock().values.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.lock().values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().values.is_empty()
    }

    /// Stores a value under its type, returning the previous value of that type if any.
    pub fn insert_typed<T: Clone + Send + Sync + 'static>(&self, value: T) -> Option<T> {
        self.lock().typed.insert(value)
    }

    /// Returns a copy of the value stored under type `T`.
    pub fn get_typed<T: Clone + Send + Sync + 'static>(&self) -> Option<T> {
        self.lock().typed.get::<T>().cloned()
    }

    pub fn remove_typed<T: Clone + Send + Sync + 'static>(&self) -> Option<T> {
        self.lock().typed.remove::<T>()
    }

    /// Returns true if both handles point at the same bag.
    pub fn ptr_eq(&self, other: &Vars) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }

    /// Returns the path submatch with the given 1-based index.
    ///
    /// Path switches store capture groups under `"1"`, `"2"`, ... in capture order.
    pub fn submatch(&self, index: usize) -> Option<String> {
        self.get_str(&index.to_string())
    }

    /// Returns the request path as it was before the first prefix stripping.
    pub fn orig_path(&self) -> Option<String> {
        self.get_str(ORIG_PATH)
    }
}

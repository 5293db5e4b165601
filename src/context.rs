use crate::fields::Fields;
use serde_json::Value;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

/// Shared key/value metadata merged into every log line.
///
/// Cloning a `LogContext` yields another handle onto the same mapping, so a
/// value set through any handle (or through any `Logger` built on it) shows
/// up in every record written afterwards. Writes are last-write-wins per key.
#[derive(Debug, Clone)]
pub struct LogContext {
    inner: Arc<RwLock<Option<Fields>>>,
}

impl LogContext {
    /// Create a context holding an empty mapping.
    pub fn new() -> Self {
        Self {
            inner: Arc::new(RwLock::new(Some(Fields::new()))),
        }
    }

    /// Reset to an empty mapping.
    pub fn clear_all(&self) {
        *self.write() = Some(Fields::new());
    }

    /// Discard the current mapping and install `ctx` in its place.
    ///
    /// The mapping is moved in, so edits the caller makes to its own copies
    /// afterwards never reach the live context. Passing `None` leaves the
    /// store unset, which reads as empty.
    pub fn replace_all_with(&self, ctx: impl Into<Option<Fields>>) {
        *self.write() = ctx.into();
    }

    /// Upsert one key, initializing the mapping first if it is unset.
    pub fn set_context(&self, key: impl Into<String>, value: impl Into<Value>) {
        self.write()
            .get_or_insert_with(Fields::new)
            .insert(key.into(), value.into());
    }

    /// Snapshot of the current mapping, or an empty one when unset.
    pub fn get_context(&self) -> Fields {
        self.read().clone().unwrap_or_default()
    }

    /// Whether two handles point at the same underlying mapping.
    pub fn shares_state_with(&self, other: &LogContext) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }

    // Lock poisoning is ignored.
    fn read(&self) -> RwLockReadGuard<'_, Option<Fields>> {
        self.inner.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Option<Fields>> {
        self.inner.write().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for LogContext {
    fn default() -> Self {
        Self::new()
    }
}

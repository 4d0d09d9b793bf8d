//! Per-dispatch context — string-keyed state shared by middleware and handlers.
//!
//! A [`Context`] carries the dispatched path, the matched route, its wildcard
//! [`Params`], and two independent key/value namespaces:
//!
//! - [`Scope::Inner`] — entries written by the dispatcher itself.
//! - [`Scope::Custom`] — entries written by application middleware.
//!
//! Every entry has a read-only flag. Once an entry is stored read-only, later
//! writes to that key are refused and [`Context::set`] returns `false`. A
//! writable entry can be overwritten and can be turned read-only on overwrite.

use std::{
    any::Any,
    collections::{HashMap, hash_map},
};

use uuid::Uuid;

use crate::router::Params;
use crate::time;

/// Which namespace of a [`Context`] an entry lives in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Scope {
    Inner,
    Custom,
}

// A stored value plus its write guard.
struct Slot {
    value: Box<dyn Any + Send + Sync>,
    read_only: bool,
}

/// Type-erased, string-keyed value map with read-only entries.
#[derive(Default)]
pub struct Store {
    map: HashMap<String, Slot>,
}

impl Store {
    pub fn new() -> Self {
        Self {
            map: HashMap::new(),
        }
    }

    /// Insert or overwrite `key`.
    ///
    /// Returns `false` and leaves the store unchanged when `key` holds a
    /// read-only entry.
    pub fn set<T>(&mut self, key: impl Into<String>, value: T, read_only: bool) -> bool
    where
        T: Send + Sync + 'static,
    {
        match self.map.entry(key.into()) {
            hash_map::Entry::Occupied(mut occupied) => {
                let slot = occupied.get_mut();
                if slot.read_only {
                    return false;
                }
                slot.value = Box::new(value);
                slot.read_only = read_only;
                true
            }
            hash_map::Entry::Vacant(vacant) => {
                vacant.insert(Slot {
                    value: Box::new(value),
                    read_only,
                });
                true
            }
        }
    }

    /// Value stored under `key`, if present and of type `T`.
    pub fn get<T>(&self, key: &str) -> Option<&T>
    where
        T: Send + Sync + 'static,
    {
        self.map
            .get(key)
            .and_then(|slot| slot.value.downcast_ref::<T>())
    }

    pub fn contains(&self, key: &str) -> bool {
        self.map.contains_key(key)
    }

    pub fn is_read_only(&self, key: &str) -> bool {
        self.map.get(key).is_some_and(|slot| slot.read_only)
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}

/// State for a single dispatch.
///
/// # Examples
///
/// ```rust
/// use sigroute::context::{Context, Scope};
///
/// let mut ctx = Context::new("get/users/7");
/// assert!(ctx.set_custom("user", 7u32, true));
/// assert!(!ctx.set_custom("user", 8u32, false));
/// assert_eq!(ctx.get_custom::<u32>("user"), Some(&7));
/// assert!(ctx.get::<u32>(Scope::Inner, "user").is_none());
/// ```
pub struct Context {
    id: Uuid,
    created_at: i64,
    path: String,
    route: Option<String>,
    params: Params,
    inner: Store,
    custom: Store,
}

impl Context {
    /// Create a fresh context for `path` with a random v4 id.
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            created_at: time::now_millis(),
            path: path.into(),
            route: None,
            params: Params::new(),
            inner: Store::new(),
            custom: Store::new(),
        }
    }

    /// Create a context for a path that matched `route`.
    pub fn with_route(path: impl Into<String>, route: impl Into<String>, params: Params) -> Self {
        let mut ctx = Self::new(path);
        ctx.route = Some(route.into());
        ctx.params = params;
        ctx
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Creation time in milliseconds since the Unix epoch.
    pub fn created_at(&self) -> i64 {
        self.created_at
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    /// The registered route string that matched, if any.
    pub fn route(&self) -> Option<&str> {
        self.route.as_deref()
    }

    pub fn params(&self) -> &Params {
        &self.params
    }

    fn store(&self, scope: Scope) -> &Store {
        match scope {
            Scope::Inner => &self.inner,
            Scope::Custom => &self.custom,
        }
    }

    fn store_mut(&mut self, scope: Scope) -> &mut Store {
        match scope {
            Scope::Inner => &mut self.inner,
            Scope::Custom => &mut self.custom,
        }
    }

    /// Write `key` in `scope`. Returns `false` if the key is read-only.
    pub fn set<T>(&mut self, scope: Scope, key: impl Into<String>, value: T, read_only: bool) -> bool
    where
        T: Send + Sync + 'static,
    {
        self.store_mut(scope).set(key, value, read_only)
    }

    pub fn get<T>(&self, scope: Scope, key: &str) -> Option<&T>
    where
        T: Send + Sync + 'static,
    {
        self.store(scope).get(key)
    }

    pub fn contains(&self, scope: Scope, key: &str) -> bool {
        self.store(scope).contains(key)
    }

    pub fn set_inner<T>(&mut self, key: impl Into<String>, value: T, read_only: bool) -> bool
    where
        T: Send + Sync + 'static,
    {
        self.set(Scope::Inner, key, value, read_only)
    }

    pub fn set_custom<T>(&mut self, key: impl Into<String>, value: T, read_only: bool) -> bool
    where
        T: Send + Sync + 'static,
    {
        self.set(Scope::Custom, key, value, read_only)
    }

    pub fn get_inner<T>(&self, key: &str) -> Option<&T>
    where
        T: Send + Sync + 'static,
    {
        self.get(Scope::Inner, key)
    }

    pub fn get_custom<T>(&self, key: &str) -> Option<&T>
    where
        T: Send + Sync + 'static,
    {
        self.get(Scope::Custom, key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ── Store ────────────────────────────────────────────────────────────────

    #[test]
    fn store_insert_then_get() {
        let mut s = Store::new();
        assert!(s.set("a", 1i32, false));
        assert_eq!(s.get::<i32>("a"), Some(&1));
        assert_eq!(s.len(), 1);
    }

    #[test]
    fn store_get_wrong_type_is_none() {
        let mut s = Store::new();
        s.set("a", 1i32, false);
        assert!(s.get::<String>("a").is_none());
    }

    #[test]
    fn store_writable_entry_is_overwritten() {
        let mut s = Store::new();
        s.set("a", 1i32, false);
        assert!(s.set("a", 2i32, false));
        assert_eq!(s.get::<i32>("a"), Some(&2));
    }

    #[test]
    fn store_read_only_entry_refuses_writes() {
        let mut s = Store::new();
        assert!(s.set("a", 1i32, true));
        assert!(!s.set("a", 2i32, false));
        assert_eq!(s.get::<i32>("a"), Some(&1));
        assert!(s.is_read_only("a"));
    }

    #[test]
    fn store_overwrite_can_lock_entry() {
        let mut s = Store::new();
        s.set("a", 1i32, false);
        assert!(s.set("a", 2i32, true));
        assert!(!s.set("a", 3i32, false));
        assert_eq!(s.get::<i32>("a"), Some(&2));
    }

    #[test]
    fn store_overwrite_may_change_type() {
        let mut s = Store::new();
        s.set("a", 1i32, false);
        s.set("a", "text".to_string(), false);
        assert_eq!(s.get::<String>("a").map(String::as_str), Some("text"));
    }

    // ── Context ──────────────────────────────────────────────────────────────

    #[test]
    fn scopes_are_independent() {
        let mut ctx = Context::new("p");
        ctx.set_inner("k", 1u8, true);
        assert!(ctx.set_custom("k", 2u8, false));
        assert_eq!(ctx.get_inner::<u8>("k"), Some(&1));
        assert_eq!(ctx.get_custom::<u8>("k"), Some(&2));
        assert!(ctx.contains(Scope::Inner, "k"));
        assert!(!ctx.contains(Scope::Custom, "missing"));
    }

    #[test]
    fn new_context_has_no_route() {
        let ctx = Context::new("get/a");
        assert_eq!(ctx.path(), "get/a");
        assert_eq!(ctx.route(), None);
        assert!(ctx.params().is_empty());
        assert!(ctx.created_at() > 0);
    }

    #[test]
    fn contexts_get_distinct_ids() {
        assert_ne!(Context::new("a").id(), Context::new("a").id());
    }

    #[test]
    fn with_route_keeps_params() {
        let mut params = Params::new();
        params.insert("id".into(), "7".into());
        let ctx = Context::with_route("get/7", "get/:id", params);
        assert_eq!(ctx.route(), Some("get/:id"));
        assert_eq!(ctx.params().get("id"), Some("7"));
    }
}

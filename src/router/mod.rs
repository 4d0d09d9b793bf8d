//! Route index — map segmented path strings to registered handlers.
//!
//! This module provides [`RouteTable`], which stores routes in two places:
//!
//! | Route kind | Example       | Storage                         | Lookup          |
//! |------------|---------------|---------------------------------|-----------------|
//! | Static     | `get/users`   | buckets keyed by signature      | binary search   |
//! | Dynamic    | `get/users/:id` | flat list sorted by signature | linear scan     |
//!
//! A route's *signature* is the first character of each of its segments, with
//! wildcard segments replaced by [`WILDCARD_SENTINEL`] (see [`signature`]).
//! Distinct static routes can share a signature (`get/a/b1` and `get/a1/b2` are
//! both `gab`), so each bucket holds every static route with that signature in
//! registration order.
//!
//! The table is not kept sorted on insert. After a batch of [`RouteTable::add_rule`]
//! calls, [`RouteTable::resort_rules`] must run before [`RouteTable::match_path`].
//!
//! Static routes are always tried first. Among dynamic routes the first one in
//! sorted order wins; routes with equal signatures keep registration order.

pub mod signature;

use thiserror::Error;
use tracing::{debug, trace, warn};

use crate::config::RouterConfig;

pub use signature::{Segment, WILDCARD_SENTINEL, compare_strings};

/// Errors produced by the route index.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RouterError {
    #[error("invalid {name}: {reason}")]
    InvalidArgument { name: &'static str, reason: String },

    #[error("route already registered: {0}")]
    DuplicateRoute(String),

    #[error("route not registered: {0}")]
    RouteNotFound(String),
}

/// A single registered route.
pub struct Route<H> {
    original: String,
    segments: Vec<Segment>,
    handler: H,
    signature: String,
}

impl<H> Route<H> {
    /// The route string exactly as it was registered.
    pub fn original(&self) -> &str {
        &self.original
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn handler(&self) -> &H {
        &self.handler
    }

    /// Sort key of this route. Contains [`WILDCARD_SENTINEL`] for dynamic routes.
    pub fn signature(&self) -> &str {
        &self.signature
    }

    pub fn is_dynamic(&self) -> bool {
        self.signature.contains(WILDCARD_SENTINEL)
    }

    // Segment equality: same count, every segment identical.
    fn equals(&self, path: &[&str]) -> bool {
        self.segments.len() == path.len()
            && self
                .segments
                .iter()
                .zip(path)
                .all(|(seg, p)| matches!(seg, Segment::Literal(lit) if lit == p))
    }

    // Wildcard equality: same count, every segment a wildcard or identical.
    // Returns the wildcard captures on success.
    fn capture(&self, path: &[&str]) -> Option<Params> {
        if self.segments.len() != path.len() {
            return None;
        }

        let mut params = Params::new();
        for (seg, p) in self.segments.iter().zip(path) {
            if !seg.accepts(p) {
                return None;
            }
            if let Segment::Wildcard(name) = seg {
                params.insert(name.clone(), (*p).to_owned());
            }
        }
        Some(params)
    }
}

// Every static route sharing one signature.
struct StaticBucket<H> {
    signature: String,
    routes: Vec<Route<H>>,
}

/// Values captured by wildcard segments, in segment order.
///
/// Keys are wildcard names with the marker stripped; `get/:id` matched against
/// `get/42` captures `id → "42"`.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Params {
    pairs: Vec<(String, String)>,
}

impl Params {
    pub fn new() -> Self {
        Self { pairs: Vec::new() }
    }

    pub fn insert(&mut self, name: String, value: String) {
        self.pairs.push((name, value));
    }

    /// Value of the first wildcard named `name`.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.pairs.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }
}

/// Result of a successful [`RouteTable::match_path`].
pub struct Matched<'a, H> {
    route: &'a Route<H>,
    params: Params,
}

impl<'a, H> Matched<'a, H> {
    pub fn handler(&self) -> &'a H {
        &self.route.handler
    }

    /// The registered route string that matched.
    pub fn route(&self) -> &'a str {
        &self.route.original
    }

    pub fn params(&self) -> &Params {
        &self.params
    }

    pub fn into_params(self) -> Params {
        self.params
    }
}

/// Signature-indexed route table.
///
/// `H` is the handler type; the table never calls it.
///
/// # Examples
///
/// ```rust
/// use sigroute::router::RouteTable;
///
/// let mut table = RouteTable::new(Some("/"), Some(":")).unwrap();
/// table.add_rule("get/a/b", 1).unwrap();
/// table.add_rule("get/a/:b", 2).unwrap();
/// table.resort_rules();
///
/// assert_eq!(table.match_path("get/a/b").map(|m| *m.handler()), Some(1));
///
/// let m = table.match_path("get/a/c").unwrap();
/// assert_eq!(m.route(), "get/a/:b");
/// assert_eq!(m.params().get("b"), Some("c"));
/// ```
pub struct RouteTable<H> {
    separator: Option<String>,
    wildcard_marker: Option<char>,
    static_buckets: Vec<StaticBucket<H>>,
    wildcard_routes: Vec<Route<H>>,
    needs_resort: bool,
}

impl<H> Default for RouteTable<H> {
    /// A table splitting on `/` with `:` as the wildcard marker.
    fn default() -> Self {
        Self {
            separator: Some("/".to_owned()),
            wildcard_marker: Some(':'),
            static_buckets: Vec::new(),
            wildcard_routes: Vec::new(),
            needs_resort: false,
        }
    }
}

impl<H> RouteTable<H> {
    /// Create an empty table.
    ///
    /// An empty `separator` is treated as no separator: every route is then a
    /// single segment.
    ///
    /// # Errors
    ///
    /// Returns [`RouterError::InvalidArgument`] if `wildcard_marker` is not
    /// exactly one character.
    pub fn new(separator: Option<&str>, wildcard_marker: Option<&str>) -> Result<Self, RouterError> {
        let separator = separator.filter(|s| !s.is_empty()).map(str::to_owned);
        let wildcard_marker = match wildcard_marker {
            Some(m) => Some(single_char(m)?),
            None => None,
        };

        Ok(Self {
            separator,
            wildcard_marker,
            static_buckets: Vec::new(),
            wildcard_routes: Vec::new(),
            needs_resort: false,
        })
    }

    /// Create an empty table from a deserialized [`RouterConfig`].
    pub fn from_config(config: &RouterConfig) -> Result<Self, RouterError> {
        Self::new(config.separator.as_deref(), config.wildcard_marker.as_deref())
    }

    pub fn separator(&self) -> Option<&str> {
        self.separator.as_deref()
    }

    pub fn wildcard_marker(&self) -> Option<char> {
        self.wildcard_marker
    }

    /// Total number of registered routes, static and dynamic.
    pub fn len(&self) -> usize {
        self.static_buckets
            .iter()
            .map(|b| b.routes.len())
            .sum::<usize>()
            + self.wildcard_routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.static_buckets.is_empty() && self.wildcard_routes.is_empty()
    }

    /// `true` when routes were added since the last [`resort_rules`](Self::resort_rules).
    pub fn needs_resort(&self) -> bool {
        self.needs_resort
    }

    /// Signatures of the static buckets in storage order.
    pub fn bucket_signatures(&self) -> impl Iterator<Item = &str> {
        self.static_buckets.iter().map(|b| b.signature.as_str())
    }

    /// Static routes, bucket by bucket.
    pub fn static_routes(&self) -> impl Iterator<Item = &Route<H>> {
        self.static_buckets.iter().flat_map(|b| b.routes.iter())
    }

    /// Dynamic routes in storage order.
    pub fn wildcard_routes(&self) -> impl Iterator<Item = &Route<H>> {
        self.wildcard_routes.iter()
    }

    // Split `route` and classify every segment.
    fn compile(&self, route: &str) -> (Vec<Segment>, String) {
        let segments: Vec<Segment> = signature::split(route, self.separator.as_deref())
            .into_iter()
            .map(|raw| Segment::parse(raw, self.wildcard_marker))
            .collect();
        let signature = signature::route_signature(&segments);
        (segments, signature)
    }

    /// Register `route` with `handler`.
    ///
    /// The table is not re-sorted; call [`resort_rules`](Self::resort_rules)
    /// before matching.
    ///
    /// # Errors
    ///
    /// Returns [`RouterError::DuplicateRoute`] if `route` is already registered.
    /// The table is left unchanged.
    pub fn add_rule(&mut self, route: &str, handler: H) -> Result<(), RouterError> {
        let (segments, signature) = self.compile(route);
        let rule = Route {
            original: route.to_owned(),
            segments,
            handler,
            signature,
        };

        let dynamic = rule.is_dynamic();
        if dynamic {
            if self.wildcard_routes.iter().any(|r| r.original == route) {
                return Err(RouterError::DuplicateRoute(route.to_owned()));
            }
            self.wildcard_routes.push(rule);
        } else {
            // Buckets may be unsorted here, so the lookup is linear.
            match self
                .static_buckets
                .iter_mut()
                .find(|b| b.signature == rule.signature)
            {
                Some(bucket) => {
                    if bucket.routes.iter().any(|r| r.original == route) {
                        return Err(RouterError::DuplicateRoute(route.to_owned()));
                    }
                    bucket.routes.push(rule);
                }
                None => self.static_buckets.push(StaticBucket {
                    signature: rule.signature.clone(),
                    routes: vec![rule],
                }),
            }
        }

        self.needs_resort = true;
        debug!(route, dynamic, "route registered");
        Ok(())
    }

    /// Remove `route` and return its handler.
    ///
    /// Removal keeps the relative order of the remaining routes. A bucket left
    /// empty is dropped.
    ///
    /// # Errors
    ///
    /// Returns [`RouterError::RouteNotFound`] if `route` is not registered.
    pub fn remove_rule(&mut self, route: &str) -> Result<H, RouterError> {
        let (_, signature) = self.compile(route);

        if signature.contains(WILDCARD_SENTINEL) {
            let pos = self
                .wildcard_routes
                .iter()
                .position(|r| r.original == route)
                .ok_or_else(|| RouterError::RouteNotFound(route.to_owned()))?;
            let removed = self.wildcard_routes.remove(pos);
            debug!(route, dynamic = true, "route removed");
            return Ok(removed.handler);
        }

        let bucket_pos = self
            .static_buckets
            .iter()
            .position(|b| b.signature == signature)
            .ok_or_else(|| RouterError::RouteNotFound(route.to_owned()))?;
        let bucket = &mut self.static_buckets[bucket_pos];
        let pos = bucket
            .routes
            .iter()
            .position(|r| r.original == route)
            .ok_or_else(|| RouterError::RouteNotFound(route.to_owned()))?;
        let removed = bucket.routes.remove(pos);
        if bucket.routes.is_empty() {
            self.static_buckets.remove(bucket_pos);
        }

        debug!(route, dynamic = false, "route removed");
        Ok(removed.handler)
    }

    /// Sort buckets and dynamic routes by signature.
    ///
    /// The sort is stable, so dynamic routes sharing a signature keep their
    /// registration order. Calling this twice in a row is a no-op the second time.
    pub fn resort_rules(&mut self) {
        self.static_buckets
            .sort_by(|a, b| compare_strings(&a.signature, &b.signature));
        self.wildcard_routes
            .sort_by(|a, b| compare_strings(&a.signature, &b.signature));
        self.needs_resort = false;

        debug!(
            buckets = self.static_buckets.len(),
            dynamic = self.wildcard_routes.len(),
            "route table sorted"
        );
    }

    /// Find the route registered for `path`.
    ///
    /// Static routes are looked up first by binary search over bucket
    /// signatures; on a miss, dynamic routes are scanned in order and the first
    /// whose segment count and literal segments agree with `path` wins.
    ///
    /// # Returns
    ///
    /// `None` when no route matches. This is a normal outcome, not an error.
    pub fn match_path(&self, path: &str) -> Option<Matched<'_, H>> {
        if self.needs_resort {
            warn!(path, "matching against a route table that has not been resorted");
        }

        let segments = signature::split(path, self.separator.as_deref());
        let sig = signature::path_signature(&segments);

        if let Ok(idx) = self
            .static_buckets
            .binary_search_by(|b| compare_strings(&b.signature, &sig))
        {
            if let Some(route) = self.static_buckets[idx]
                .routes
                .iter()
                .find(|r| r.equals(&segments))
            {
                trace!(path, route = %route.original, "static route matched");
                return Some(Matched {
                    route,
                    params: Params::new(),
                });
            }
        }

        for route in &self.wildcard_routes {
            if let Some(params) = route.capture(&segments) {
                trace!(path, route = %route.original, "dynamic route matched");
                return Some(Matched { route, params });
            }
        }

        trace!(path, "no route matched");
        None
    }
}

// Validate that `value` is exactly one character.
fn single_char(value: &str) -> Result<char, RouterError> {
    let mut chars = value.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => Ok(c),
        _ => Err(RouterError::InvalidArgument {
            name: "wildcard_marker",
            reason: format!("expected exactly one character, got {value:?}"),
        }),
    }
}

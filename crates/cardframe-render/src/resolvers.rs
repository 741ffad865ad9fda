//! Custom resource resolvers, keyed by URL scheme.
//!
//! Hosts register a resolver per scheme (`http`, `symbol`, ...) to take over
//! fetching for matching image URLs. URLs with no matching resolver pass
//! through untouched and are left to the host toolkit.

use std::collections::HashMap;
use std::sync::Arc;

use thiserror::Error;

/// A single fetch request handed to a resolver.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceRequest {
    pub url: String,
    /// Set on the automatic retry after a failed fetch; resolvers backed by
    /// an HTTP cache should revalidate instead of serving a stale entry.
    pub bypass_cache: bool,
}

impl ResourceRequest {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            bypass_cache: false,
        }
    }
}

/// Fetches the bytes behind a URL. Implementations run on a blocking worker,
/// so plain synchronous I/O is fine here.
pub trait ResourceResolver: Send + Sync {
    fn load(&self, request: &ResourceRequest) -> Result<Vec<u8>, ResolveError>;
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolveError {
    #[error("no resource at `{0}`")]
    NotFound(String),
    #[error("fetch failed: {0}")]
    Fetch(String),
    #[error("resolver task failed: {0}")]
    Task(String),
}

/// Scheme-to-resolver table. Cloning shares the registered resolvers.
#[derive(Clone, Default)]
pub struct ResourceResolvers {
    by_scheme: HashMap<String, Arc<dyn ResourceResolver>>,
}

impl ResourceResolvers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `resolver` for `scheme`. Schemes are matched
    /// case-insensitively; registering twice replaces the earlier entry.
    pub fn set(&mut self, scheme: &str, resolver: Arc<dyn ResourceResolver>) {
        self.by_scheme.insert(scheme.to_ascii_lowercase(), resolver);
    }

    pub fn get(&self, scheme: &str) -> Option<Arc<dyn ResourceResolver>> {
        self.by_scheme.get(&scheme.to_ascii_lowercase()).cloned()
    }

    /// Resolver for a full URL, selected by its scheme prefix.
    pub(crate) fn for_url(&self, url: &str) -> Option<Arc<dyn ResourceResolver>> {
        let (scheme, _) = url.split_once(':')?;
        self.get(scheme)
    }
}

impl std::fmt::Debug for ResourceResolvers {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut schemes: Vec<&str> = self.by_scheme.keys().map(String::as_str).collect();
        schemes.sort_unstable();
        f.debug_struct("ResourceResolvers")
            .field("schemes", &schemes)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FixedResolver(Vec<u8>);

    impl ResourceResolver for FixedResolver {
        fn load(&self, _request: &ResourceRequest) -> Result<Vec<u8>, ResolveError> {
            Ok(self.0.clone())
        }
    }

    #[test]
    fn schemes_match_case_insensitively() {
        let mut resolvers = ResourceResolvers::new();
        resolvers.set("Symbol", Arc::new(FixedResolver(b"ok".to_vec())));

        assert!(resolvers.get("symbol").is_some());
        assert!(resolvers.get("SYMBOL").is_some());
        assert!(resolvers.for_url("symbol:star").is_some());
        assert!(resolvers.for_url("http://example.test/x.png").is_none());
    }

    #[test]
    fn urls_without_scheme_have_no_resolver() {
        let mut resolvers = ResourceResolvers::new();
        resolvers.set("http", Arc::new(FixedResolver(Vec::new())));

        assert!(resolvers.for_url("plain-relative-path.png").is_none());
    }

    #[test]
    fn later_registration_replaces_earlier() {
        let mut resolvers = ResourceResolvers::new();
        resolvers.set("data", Arc::new(FixedResolver(b"first".to_vec())));
        resolvers.set("data", Arc::new(FixedResolver(b"second".to_vec())));

        let resolver = resolvers.get("data").expect("registered");
        let bytes = resolver
            .load(&ResourceRequest::new("data:whatever"))
            .expect("fixed resolver never fails");
        assert_eq!(bytes, b"second");
    }
}

//! Static route registry: built once at startup, read-only afterwards.

use std::sync::Arc;

use crate::route::{ErasedRoute, TopicRoute};

/// The full set of registered routes.
///
/// Matching is a linear predicate scan, acceptable for the small route
/// counts this system carries. Multiplicity is intentional: one action type
/// may fan out to several independent routes.
pub struct RouteRegistry {
    routes: Vec<Arc<dyn ErasedRoute>>,
}

impl RouteRegistry {
    /// Build a registry from an externally supplied set of routes.
    #[must_use]
    pub fn new(routes: Vec<Arc<dyn ErasedRoute>>) -> Self {
        Self { routes }
    }

    /// Start building a registry route by route.
    #[must_use]
    pub fn builder() -> RouteRegistryBuilder {
        RouteRegistryBuilder::default()
    }

    /// All routes whose predicate accepts the action type.
    ///
    /// May be empty; may hold several routes for one action type.
    #[must_use]
    pub fn matching(&self, action_type: &str) -> Vec<Arc<dyn ErasedRoute>> {
        self.routes
            .iter()
            .filter(|route| route.supports(action_type))
            .cloned()
            .collect()
    }

    /// Number of registered routes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.routes.len()
    }

    /// Whether the registry holds no routes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}

/// Builder collecting typed routes into a registry.
#[derive(Default)]
pub struct RouteRegistryBuilder {
    routes: Vec<Arc<dyn ErasedRoute>>,
}

impl RouteRegistryBuilder {
    /// Register a typed route.
    #[must_use]
    pub fn register<R>(mut self, route: R) -> Self
    where
        R: TopicRoute + 'static,
    {
        self.routes.push(Arc::new(route));
        self
    }

    /// Finish the registry. No mutation is possible afterwards.
    #[must_use]
    pub fn build(self) -> RouteRegistry {
        RouteRegistry::new(self.routes)
    }
}

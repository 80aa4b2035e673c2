//! URI versioning and the declarative route table.
//!
//! Every route is registered as `(method, path, version, handler)`. The table
//! mounts each entry under `/v<version><path>`; entries on the default
//! version are mounted on the bare `<path>` as well.

use std::collections::BTreeMap;

use axum::{
    handler::Handler,
    http::Method,
    routing::{MethodFilter, MethodRouter},
    Router,
};

/// API version encoded in the URI prefix (`/v1/...`).
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ApiVersion(u16);

impl ApiVersion {
    pub const V1: ApiVersion = ApiVersion(1);

    pub const fn new(number: u16) -> Self {
        Self(number)
    }

    /// Path prefix for this version, e.g. `/v1`.
    pub fn prefix(&self) -> String {
        format!("/v{}", self.0)
    }
}

impl Default for ApiVersion {
    fn default() -> Self {
        Self::V1
    }
}

impl core::fmt::Display for ApiVersion {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// What a route table entry serves, without the handler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteDescriptor {
    pub method: Method,
    pub path: &'static str,
    pub version: ApiVersion,
}

impl RouteDescriptor {
    /// Fully-qualified path, e.g. `/v1/health`.
    pub fn versioned_path(&self) -> String {
        format!("{}{}", self.version.prefix(), self.path)
    }
}

struct RouteEntry {
    descriptor: RouteDescriptor,
    handler: MethodRouter,
}

/// Declarative mapping from `(method, path, version)` to handler.
pub struct RouteTable {
    default_version: ApiVersion,
    entries: Vec<RouteEntry>,
}

impl RouteTable {
    pub fn new(default_version: ApiVersion) -> Self {
        Self {
            default_version,
            entries: Vec::new(),
        }
    }

    /// Register a handler.
    ///
    /// # Panics
    /// If `method` is not one axum can route on (e.g. an extension method).
    /// Route tables are built once at startup, like axum's own overlap checks.
    pub fn route<H, T>(
        mut self,
        method: Method,
        path: &'static str,
        version: ApiVersion,
        handler: H,
    ) -> Self
    where
        H: Handler<T, ()>,
        T: 'static,
    {
        let filter = match MethodFilter::try_from(method.clone()) {
            Ok(filter) => filter,
            Err(_) => panic!("cannot route on HTTP method {method}"),
        };

        self.entries.push(RouteEntry {
            descriptor: RouteDescriptor {
                method,
                path,
                version,
            },
            handler: axum::routing::on(filter, handler),
        });
        self
    }

    pub fn get<H, T>(self, path: &'static str, version: ApiVersion, handler: H) -> Self
    where
        H: Handler<T, ()>,
        T: 'static,
    {
        self.route(Method::GET, path, version, handler)
    }

    pub fn post<H, T>(self, path: &'static str, version: ApiVersion, handler: H) -> Self
    where
        H: Handler<T, ()>,
        T: 'static,
    {
        self.route(Method::POST, path, version, handler)
    }

    pub fn routes(&self) -> impl Iterator<Item = &RouteDescriptor> {
        self.entries.iter().map(|e| &e.descriptor)
    }

    /// Build the axum router.
    ///
    /// Handlers sharing a path are merged into one `MethodRouter` first, so
    /// registering GET and POST on the same path is fine; registering the same
    /// method twice on one path panics (axum's overlap rule).
    pub fn into_router(self) -> Router {
        let mut by_path: BTreeMap<String, MethodRouter> = BTreeMap::new();

        for entry in self.entries {
            let RouteEntry {
                descriptor,
                handler,
            } = entry;

            let mut paths = vec![descriptor.versioned_path()];
            if descriptor.version == self.default_version {
                paths.push(descriptor.path.to_string());
            }

            for path in paths {
                tracing::debug!("Mapped {{{}, {}}}", path, descriptor.method);
                let merged = match by_path.remove(&path) {
                    Some(existing) => existing.merge(handler.clone()),
                    None => handler.clone(),
                };
                by_path.insert(path, merged);
            }
        }

        by_path
            .into_iter()
            .fold(Router::new(), |router, (path, handler)| router.route(&path, handler))
    }
}

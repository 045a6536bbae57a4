use http::Method;
use regex::Regex;
use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::routes::{RouteMeta, ID_PARAM};

/// A problem found while compiling the routing table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableIssue {
    pub location: String,
    pub kind: String,
    pub message: String,
}

impl TableIssue {
    pub fn new(
        location: impl Into<String>,
        kind: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        TableIssue {
            location: location.into(),
            kind: kind.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for TableIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}: {}", self.kind, self.location, self.message)
    }
}

/// Result of successfully matching a request path to a route
#[derive(Debug, Clone)]
pub struct RouteMatch {
    /// The matched route metadata
    pub route: Arc<RouteMeta>,
    /// Path parameters extracted from the URL (e.g., `{id}` → `("id", "123")`)
    pub path_params: Vec<(String, String)>,
    /// Name of the handler that should process this request
    pub handler_name: String,
}

impl RouteMatch {
    /// Get a path parameter by name
    #[inline]
    #[must_use]
    pub fn get_path_param(&self, name: &str) -> Option<&str> {
        self.path_params
            .iter()
            .rfind(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    /// The positional item id, when the pattern declares one.
    #[inline]
    #[must_use]
    pub fn path_id(&self) -> Option<&str> {
        self.get_path_param(ID_PARAM)
    }
}

struct CompiledRoute {
    method: Method,
    regex: Regex,
    meta: Arc<RouteMeta>,
    param_names: Vec<String>,
}

/// Router that matches HTTP requests to routes of the table
///
/// Routes are tried in table order; the table is small and fixed at startup.
#[derive(Clone)]
pub struct Router {
    routes: Arc<Vec<CompiledRoute>>,
}

impl Router {
    /// Compile a routing table
    ///
    /// # Errors
    ///
    /// Returns an error listing every [`TableIssue`] when a pattern declares more
    /// than one placeholder, when a placeholder is not `{id}`, when two routes
    /// share a method and pattern, or when a route has no output contract for its
    /// success status.
    pub fn new(routes: Vec<RouteMeta>) -> anyhow::Result<Self> {
        let issues = check_table(&routes);
        if !issues.is_empty() {
            for issue in &issues {
                warn!(
                    location = %issue.location,
                    kind = %issue.kind,
                    message = %issue.message,
                    "Routing table issue"
                );
            }
            let listed: Vec<String> = issues.iter().map(ToString::to_string).collect();
            anyhow::bail!(
                "routing table rejected, {} issue(s) found:\n{}",
                issues.len(),
                listed.join("\n")
            );
        }

        let compiled: Vec<CompiledRoute> = routes
            .into_iter()
            .map(|route| -> anyhow::Result<CompiledRoute> {
                let (regex, param_names) = Self::path_to_regex(&route.path_pattern)?;
                Ok(CompiledRoute {
                    method: route.method.clone(),
                    regex,
                    meta: Arc::new(route),
                    param_names,
                })
            })
            .collect::<anyhow::Result<_>>()?;

        let routes_summary: Vec<String> = compiled
            .iter()
            .map(|r| format!("{} {}", r.method, r.meta.path_pattern))
            .collect();
        info!(
            routes_count = compiled.len(),
            routes_summary = ?routes_summary,
            "Routing table loaded"
        );

        Ok(Self {
            routes: Arc::new(compiled),
        })
    }

    /// Route metadata in table order.
    pub fn routes(&self) -> impl Iterator<Item = &RouteMeta> {
        self.routes.iter().map(|r| r.meta.as_ref())
    }

    /// One line per route, with the input contract rendered as JSON Schema
    /// when the route declares one.
    #[must_use]
    pub fn describe_routes(&self) -> Vec<String> {
        self.routes
            .iter()
            .map(|route| {
                let meta = &route.meta;
                let line = format!(
                    "[route] {} {} -> {} ({})",
                    route.method, meta.path_pattern, meta.handler_name, meta.success_status
                );
                match &meta.request_schema {
                    Some(schema) => format!("{line} input={}", schema.to_json_schema()),
                    None => line,
                }
            })
            .collect()
    }

    /// Print all registered routes to stdout
    pub fn dump_routes(&self) {
        println!("[routes] count={}", self.routes.len());
        for line in self.describe_routes() {
            println!("{line}");
        }
    }

    /// Match an HTTP request to a route
    ///
    /// # Returns
    ///
    /// * `Some(RouteMatch)` - If a matching route is found
    /// * `None` - If no route matches
    #[must_use]
    pub fn route(&self, method: Method, path: &str) -> Option<RouteMatch> {
        debug!(method = %method, path = %path, "Route match attempt");

        for route in self.routes.iter() {
            if route.method != method {
                continue;
            }
            let Some(captures) = route.regex.captures(path) else {
                continue;
            };
            let path_params: Vec<(String, String)> = route
                .param_names
                .iter()
                .enumerate()
                .filter_map(|(i, name)| {
                    captures
                        .get(i + 1)
                        .map(|m| (name.clone(), m.as_str().to_string()))
                })
                .collect();

            info!(
                method = %method,
                path = %path,
                handler_name = %route.meta.handler_name,
                route_pattern = %route.meta.path_pattern,
                path_params = ?path_params,
                "Route matched"
            );
            return Some(RouteMatch {
                route: Arc::clone(&route.meta),
                path_params,
                handler_name: route.meta.handler_name.clone(),
            });
        }

        debug!(method = %method, path = %path, "No route matched");
        None
    }

    /// Convert a path pattern to an anchored regex and extract parameter names
    ///
    /// Transforms patterns like `/items/{id}` into `^/items/([^/]+)$` and returns
    /// the ordered parameter names `["id"]`. Static segments are escaped.
    pub(crate) fn path_to_regex(path: &str) -> anyhow::Result<(Regex, Vec<String>)> {
        if path == "/" {
            return Ok((Regex::new(r"^/$")?, Vec::new()));
        }

        let mut pattern = String::with_capacity(path.len() + 8);
        pattern.push('^');
        let mut param_names = Vec::with_capacity(path.matches('{').count());

        for segment in path.split('/') {
            if segment.starts_with('{') && segment.ends_with('}') {
                let param_name = segment
                    .trim_start_matches('{')
                    .trim_end_matches('}')
                    .to_string();
                pattern.push_str("/([^/]+)");
                param_names.push(param_name);
            } else if !segment.is_empty() {
                pattern.push('/');
                pattern.push_str(&regex::escape(segment));
            }
        }

        pattern.push('$');
        let regex = Regex::new(&pattern)?;
        Ok((regex, param_names))
    }
}

fn check_table(routes: &[RouteMeta]) -> Vec<TableIssue> {
    let mut issues = Vec::new();
    let mut seen = HashSet::new();

    for route in routes {
        let location = format!("{} {}", route.method, route.path_pattern);
        let params = route.param_names();

        if params.len() > 1 {
            issues.push(TableIssue::new(
                &location,
                "TooManyPlaceholders",
                format!("pattern declares {} placeholders, at most one is supported", params.len()),
            ));
        }
        if let Some(name) = params.iter().find(|name| **name != ID_PARAM) {
            issues.push(TableIssue::new(
                &location,
                "UnknownPlaceholder",
                format!("placeholder '{{{name}}}' is not '{{{ID_PARAM}}}'"),
            ));
        }
        if !seen.insert((route.method.clone(), route.path_pattern.clone())) {
            issues.push(TableIssue::new(
                &location,
                "DuplicateRoute",
                "method and pattern are already routed",
            ));
        }
        if !route.responses.contains_key(&route.success_status) {
            issues.push(TableIssue::new(
                &location,
                "MissingSuccessContract",
                format!("no output schema for success status {}", route.success_status),
            ));
        }
    }

    issues
}

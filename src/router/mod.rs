//! # Router Module
//!
//! Path matching and route resolution for the item routing table.
//!
//! ## Overview
//!
//! The router is responsible for:
//! - Compiling the declarative routing table ([`crate::routes::item_routes`])
//! - Rejecting malformed tables at startup
//! - Matching incoming requests to routes
//! - Extracting the positional `{id}` segment
//!
//! ## Architecture
//!
//! The router uses a two-phase approach:
//!
//! 1. **Compilation**: at startup each path pattern (e.g. `/items/{id}`) is turned
//!    into an anchored regex that captures the placeholder segment.
//!
//! 2. **Matching**: for each request the method and path are tested against the
//!    compiled patterns in table order; the first hit wins.
//!
//! ## Example
//!
//! ```rust
//! use itemrouter::router::Router;
//! use itemrouter::routes::item_routes;
//! use http::Method;
//!
//! let router = Router::new(item_routes()).unwrap();
//! let matched = router.route(Method::GET, "/items/42").unwrap();
//! assert_eq!(matched.handler_name, "get_item");
//! assert_eq!(matched.path_id(), Some("42"));
//! ```

mod core;

pub use self::core::{RouteMatch, Router, TableIssue};

//! # itemrouter
//!
//! **itemrouter** is a small item CRUD service built around a declarative routing
//! table. Every route names its handler, its input contract, and its output
//! contracts per status code; requests are matched, validated, and dispatched
//! against that table before they ever reach the item service.
//!
//! ## Architecture
//!
//! - **[`store`]** - Item storage behind the [`store::ItemStore`] trait, with an
//!   in-memory [`store::MemoryStore`]
//! - **[`service`]** - Business operations over the store (list, find, create,
//!   update, remove)
//! - **[`schema`]** - Declarative input descriptors and JSON Schema output contracts
//! - **[`validator`]** - The generic payload validator and response contract checks
//! - **[`routes`]** - The routing table as data
//! - **[`router`]** - Path matching using regex-based matchers
//! - **[`dispatcher`]** - Validation gate, service calls, and status mapping
//! - **[`middleware`]** - Pluggable before/after hooks (tracing, metrics)
//! - **[`server`]** - HTTP hosting on `may_minihttp`
//! - **[`config`]**, **[`logging`]**, **[`cli`]** - Process plumbing
//!
//! ### Request Flow
//!
//! ```mermaid
//! sequenceDiagram
//!     participant Client
//!     participant Server as server::AppService
//!     participant Dispatcher
//!     participant Router
//!     participant Validator
//!     participant Service as ItemService
//!     participant Store as MemoryStore
//!
//!     Client->>Server: PUT /items/1 {"name":"Updated"}
//!     Server->>Server: parse_request (headers, JSON body)
//!     Server->>Dispatcher: handle(ApiRequest)
//!     Dispatcher->>Router: route(PUT, "/items/1")
//!     Router-->>Dispatcher: RouteMatch (update_item, id=1)
//!     Dispatcher->>Dispatcher: middleware before()
//!     Dispatcher->>Validator: validate(body, update_item_input)
//!     alt violations
//!         Validator-->>Dispatcher: Vec<Violation>
//!         Dispatcher-->>Server: 400 Request validation failed
//!     else valid
//!         Dispatcher->>Service: update("1", "Updated")
//!         Service->>Store: rename (write lock)
//!         Store-->>Service: Option<Item>
//!         Service-->>Dispatcher: Some(item) / None
//!         Dispatcher->>Dispatcher: check output contract
//!         Dispatcher-->>Server: 200 item / 404 Item 1 not found
//!     end
//!     Dispatcher->>Dispatcher: middleware after()
//!     Server-->>Client: HTTP response (application/json)
//! ```
//!
//! ## Quick Start
//!
//! ```rust
//! use http::Method;
//! use itemrouter::config::ServiceConfig;
//! use itemrouter::dispatcher::ApiRequest;
//! use itemrouter::App;
//! use serde_json::json;
//!
//! let app = App::build(&ServiceConfig::default()).unwrap();
//! let created = app
//!     .dispatcher
//!     .handle(ApiRequest::new(Method::POST, "/items").with_body(json!({"name": "Widget"})));
//! assert_eq!(created.status, 201);
//!
//! let listed = app.dispatcher.handle(ApiRequest::new(Method::GET, "/items"));
//! assert_eq!(listed.body.as_array().map(Vec::len), Some(1));
//! ```
//!
//! ## Running the Server
//!
//! ```bash
//! itemrouter serve --config config/config.yaml
//! curl http://localhost:8080/items
//! curl -X POST -d '{"name":"Widget"}' http://localhost:8080/items
//! curl http://localhost:8080/metrics
//! ```

pub mod app;
pub mod cli;
pub mod config;
pub mod dispatcher;
pub mod ids;
pub mod logging;
pub mod middleware;
pub mod model;
pub mod router;
pub mod routes;
pub mod schema;
pub mod server;
pub mod service;
pub mod store;
pub mod validator;

pub use app::App;
pub use dispatcher::{ApiRequest, Dispatcher, HandlerResponse};
pub use ids::{ItemId, RequestId};
pub use model::Item;
pub use router::Router;
pub use routes::{item_routes, Operation, RouteMeta};
pub use service::ItemService;
pub use store::{ItemStore, MemoryStore, StoreError};
pub use validator::{ResponseValidation, Violation, ViolationKind};

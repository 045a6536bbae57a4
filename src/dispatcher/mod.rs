//! # Dispatcher Module
//!
//! The dispatcher executes the routing table. It is the only place where route
//! matches, input contracts, service calls, and status codes meet.
//!
//! ## Request Flow
//!
//! 1. Router matches the method and path → route metadata and `{id}`
//! 2. Middleware `before` hooks run (any of them may answer early)
//! 3. The body is validated against the route's input schema; violations answer
//!    `400` and the service is never called
//! 4. The route's [`Operation`](crate::routes::Operation) runs on the item service
//! 5. Absent results become `404 {"message": "Item {id} not found"}`
//! 6. The response is checked against its declared output schema
//! 7. Middleware `after` hooks run
//!
//! ## Error Handling
//!
//! Validation failures and not-found are ordinary responses. Anything the core
//! cannot classify (a store fault, a broken response contract under
//! `enforce`) comes back from [`Dispatcher::dispatch`] as `Err`;
//! [`Dispatcher::handle`] turns that into a generic `500` without leaking detail.

mod core;

pub use self::core::{ApiRequest, Dispatcher, HandlerRequest, HandlerResponse};

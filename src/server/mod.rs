//! HTTP hosting layer
//!
//! Adapts `may_minihttp` requests to [`ApiRequest`](crate::dispatcher::ApiRequest)s
//! and writes [`HandlerResponse`](crate::dispatcher::HandlerResponse)s back as
//! JSON. The layer knows nothing about items; every business decision is made by
//! the dispatcher.

mod http_server;
mod request;
mod response;
mod service;

pub use http_server::{HttpServer, ServerHandle};
pub use request::{parse_request, strip_query, ParsedRequest, RequestBody};
pub use response::{write_handler_response, write_text};
pub use service::{health_response, AppService, Reply, REQUEST_ID_HEADER};

use std::time::Duration;

use crate::dispatcher::{HandlerRequest, HandlerResponse};

/// Hooks around every dispatched request.
///
/// `before` runs after routing and before validation; returning `Some` answers the
/// request without calling the service. `after` sees the final response, including
/// the generic `500` produced for internal faults.
pub trait Middleware: Send + Sync {
    fn before(&self, _req: &HandlerRequest) -> Option<HandlerResponse> {
        None
    }
    fn after(&self, _req: &HandlerRequest, _res: &mut HandlerResponse, _latency: Duration) {}
}

use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::time::Duration;

use super::Middleware;
use crate::dispatcher::{HandlerRequest, HandlerResponse};

/// Middleware for collecting Prometheus-compatible metrics
///
/// All counters use relaxed atomics; values are eventually consistent and cheap
/// to collect.
///
/// Metrics collected:
/// - Total dispatched request count and average latency
/// - Responses by status class (2xx, 4xx, 5xx)
/// - Validation rejections (400) and not-found outcomes (404)
/// - Top-level requests that bypass the dispatcher (`/health`, `/metrics`)
#[derive(Default)]
pub struct MetricsMiddleware {
    request_count: AtomicUsize,
    total_latency_ns: AtomicU64,
    success_count: AtomicUsize,
    client_error_count: AtomicUsize,
    server_error_count: AtomicUsize,
    validation_failures: AtomicUsize,
    not_found_count: AtomicUsize,
    top_level_requests: AtomicUsize,
}

impl MetricsMiddleware {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the total number of dispatched requests
    pub fn request_count(&self) -> usize {
        self.request_count.load(Ordering::Relaxed)
    }

    /// Mean processing time across completed requests
    ///
    /// Zero until the first request completes.
    pub fn average_latency(&self) -> Duration {
        let completed = (self.success_count.load(Ordering::Relaxed)
            + self.client_error_count.load(Ordering::Relaxed)
            + self.server_error_count.load(Ordering::Relaxed)) as u64;
        if completed == 0 {
            Duration::from_nanos(0)
        } else {
            Duration::from_nanos(self.total_latency_ns.load(Ordering::Relaxed) / completed)
        }
    }

    pub fn success_count(&self) -> usize {
        self.success_count.load(Ordering::Relaxed)
    }

    pub fn client_error_count(&self) -> usize {
        self.client_error_count.load(Ordering::Relaxed)
    }

    pub fn server_error_count(&self) -> usize {
        self.server_error_count.load(Ordering::Relaxed)
    }

    pub fn validation_failures(&self) -> usize {
        self.validation_failures.load(Ordering::Relaxed)
    }

    pub fn not_found_count(&self) -> usize {
        self.not_found_count.load(Ordering::Relaxed)
    }

    /// Increment the top-level request counter
    ///
    /// Call this for infrastructure endpoints like `/health` and `/metrics` that
    /// don't go through the dispatcher.
    pub fn inc_top_level_request(&self) {
        self.top_level_requests.fetch_add(1, Ordering::Relaxed);
    }

    pub fn top_level_request_count(&self) -> usize {
        self.top_level_requests.load(Ordering::Relaxed)
    }

    /// Render every counter in Prometheus text exposition format.
    #[must_use]
    pub fn render_prometheus(&self) -> String {
        format!(
            "# HELP itemrouter_requests_total Total number of dispatched requests\n\
             # TYPE itemrouter_requests_total counter\n\
             itemrouter_requests_total {}\n\
             # HELP itemrouter_responses_total Responses by status class\n\
             # TYPE itemrouter_responses_total counter\n\
             itemrouter_responses_total{{class=\"2xx\"}} {}\n\
             itemrouter_responses_total{{class=\"4xx\"}} {}\n\
             itemrouter_responses_total{{class=\"5xx\"}} {}\n\
             # HELP itemrouter_validation_failures_total Requests rejected by an input schema\n\
             # TYPE itemrouter_validation_failures_total counter\n\
             itemrouter_validation_failures_total {}\n\
             # HELP itemrouter_not_found_total Requests for an id with no matching item\n\
             # TYPE itemrouter_not_found_total counter\n\
             itemrouter_not_found_total {}\n\
             # HELP itemrouter_top_level_requests_total Requests served outside the dispatcher\n\
             # TYPE itemrouter_top_level_requests_total counter\n\
             itemrouter_top_level_requests_total {}\n\
             # HELP itemrouter_request_latency_seconds Average request latency in seconds\n\
             # TYPE itemrouter_request_latency_seconds gauge\n\
             itemrouter_request_latency_seconds {}\n",
            self.request_count(),
            self.success_count(),
            self.client_error_count(),
            self.server_error_count(),
            self.validation_failures(),
            self.not_found_count(),
            self.top_level_request_count(),
            self.average_latency().as_secs_f64(),
        )
    }
}

impl Middleware for MetricsMiddleware {
    fn before(&self, _req: &HandlerRequest) -> Option<HandlerResponse> {
        self.request_count.fetch_add(1, Ordering::Relaxed);
        None
    }

    fn after(&self, _req: &HandlerRequest, res: &mut HandlerResponse, latency: Duration) {
        self.total_latency_ns
            .fetch_add(latency.as_nanos() as u64, Ordering::Relaxed);
        let class = match res.status {
            200..=399 => &self.success_count,
            400..=499 => &self.client_error_count,
            _ => &self.server_error_count,
        };
        class.fetch_add(1, Ordering::Relaxed);
        match res.status {
            400 => {
                self.validation_failures.fetch_add(1, Ordering::Relaxed);
            }
            404 => {
                self.not_found_count.fetch_add(1, Ordering::Relaxed);
            }
            _ => {}
        }
    }
}

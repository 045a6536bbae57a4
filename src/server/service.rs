use http::Method;
use may_minihttp::{HttpService, Request, Response};
use serde_json::json;
use std::io;
use std::sync::Arc;
use tracing::debug;

use super::request::{parse_request, ParsedRequest, RequestBody};
use super::response::{write_handler_response, write_text};
use crate::dispatcher::{ApiRequest, Dispatcher, HandlerResponse};
use crate::ids::RequestId;
use crate::middleware::MetricsMiddleware;

const PROMETHEUS_CONTENT_TYPE: &str = "Content-Type: text/plain; version=0.0.4";

/// Header carrying a caller-chosen correlation id (lowercased by `parse_request`)
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// What the service writes back for one request
#[derive(Debug, Clone, PartialEq)]
pub enum Reply {
    Json(HandlerResponse),
    /// Prometheus exposition text
    Metrics(String),
}

/// `may_minihttp` service that feeds requests into the [`Dispatcher`]
///
/// `/health` and `/metrics` are answered here; everything else goes through
/// the routing table.
#[derive(Clone)]
pub struct AppService {
    pub dispatcher: Arc<Dispatcher>,
    pub metrics: Option<Arc<MetricsMiddleware>>,
}

impl AppService {
    #[must_use]
    pub fn new(dispatcher: Arc<Dispatcher>) -> Self {
        Self {
            dispatcher,
            metrics: None,
        }
    }

    pub fn set_metrics_middleware(&mut self, metrics: Arc<MetricsMiddleware>) {
        self.metrics = Some(metrics);
    }

    /// Decide the reply for an already parsed request.
    #[must_use]
    pub fn respond(&self, req: ParsedRequest) -> Reply {
        let ParsedRequest {
            method,
            path,
            headers,
            body,
        } = req;

        if method == "GET" && path == "/health" {
            self.count_top_level();
            return Reply::Json(health_response());
        }
        if method == "GET" && path == "/metrics" {
            if let Some(metrics) = &self.metrics {
                metrics.inc_top_level_request();
                return Reply::Metrics(metrics.render_prometheus());
            }
        }

        let Ok(method) = Method::from_bytes(method.as_bytes()) else {
            return Reply::Json(HandlerResponse::message(
                404,
                format!("No route for {method} {path}"),
            ));
        };

        let request_id =
            RequestId::from_header_or_new(headers.get(REQUEST_ID_HEADER).map(String::as_str));
        let api_request = ApiRequest::new(method, path).with_request_id(request_id);
        let api_request = match body {
            RequestBody::Empty => api_request,
            RequestBody::Json(value) => api_request.with_body(value),
            RequestBody::Malformed(reason) => {
                debug!(error = %reason, "Forwarding malformed JSON body");
                api_request.with_malformed_body(reason)
            }
        };

        Reply::Json(self.dispatcher.handle(api_request))
    }

    fn count_top_level(&self) {
        if let Some(metrics) = &self.metrics {
            metrics.inc_top_level_request();
        }
    }
}

/// Basic health check response `{ "status": "ok" }`.
#[must_use]
pub fn health_response() -> HandlerResponse {
    HandlerResponse::json(200, json!({ "status": "ok" }))
}

impl HttpService for AppService {
    fn call(&mut self, req: Request, res: &mut Response) -> io::Result<()> {
        match self.respond(parse_request(req)) {
            Reply::Json(resp) => write_handler_response(res, &resp),
            Reply::Metrics(text) => write_text(res, 200, PROMETHEUS_CONTENT_TYPE, text),
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ServiceConfig;
    use crate::dispatcher::HandlerRequest;
    use crate::middleware::Middleware;
    use crate::model::Item;
    use crate::router::Router;
    use crate::routes::item_routes;
    use crate::service::ItemService;
    use crate::store::MemoryStore;
    use crate::App;
    use parking_lot::Mutex;
    use std::collections::HashMap;

    fn seeded_app() -> App {
        let config = ServiceConfig {
            seed: vec![Item::new("1", "Item One")],
            ..ServiceConfig::default()
        };
        App::build(&config).unwrap()
    }

    fn parsed(method: &str, path: &str, body: RequestBody) -> ParsedRequest {
        ParsedRequest {
            method: method.to_string(),
            path: path.to_string(),
            headers: HashMap::new(),
            body,
        }
    }

    fn json_reply(reply: Reply) -> HandlerResponse {
        match reply {
            Reply::Json(resp) => resp,
            Reply::Metrics(text) => panic!("unexpected metrics reply: {text}"),
        }
    }

    #[test]
    fn test_junk_body_ignored_by_routes_without_input_contract() {
        let app = seeded_app();
        let service = app.http_service();
        let resp = json_reply(service.respond(parsed(
            "DELETE",
            "/items/1",
            RequestBody::parse("junk"),
        )));
        assert_eq!(resp, HandlerResponse::removed("1"));
        assert_eq!(app.dispatcher.service().count().unwrap(), 0);
    }

    #[test]
    fn test_junk_body_on_unknown_route_is_404() {
        let service = seeded_app().http_service();
        let resp = json_reply(service.respond(parsed(
            "POST",
            "/widgets",
            RequestBody::parse("junk"),
        )));
        assert_eq!(resp.status, 404);
        assert_eq!(resp.body["message"], "No route for POST /widgets");
    }

    #[test]
    fn test_junk_body_rejected_by_create_and_counted() {
        let app = seeded_app();
        let service = app.http_service();
        let resp = json_reply(service.respond(parsed(
            "POST",
            "/items",
            RequestBody::parse("{name: Widget"),
        )));
        assert_eq!(resp.status, 400);
        assert_eq!(resp.body["message"], "Request body is not valid JSON");
        assert_eq!(resp.body["violations"][0]["kind"], "malformed_json");
        assert_eq!(app.dispatcher.service().count().unwrap(), 1);
        assert_eq!(app.metrics.request_count(), 1);
        assert_eq!(app.metrics.validation_failures(), 1);
    }

    #[derive(Default)]
    struct SeenIds(Mutex<Vec<RequestId>>);

    impl Middleware for SeenIds {
        fn before(&self, req: &HandlerRequest) -> Option<HandlerResponse> {
            self.0.lock().push(req.request_id);
            None
        }
    }

    #[test]
    fn test_request_id_header_reaches_middleware() {
        let store = MemoryStore::with_items([Item::new("1", "Item One")]).unwrap();
        let mut dispatcher =
            Dispatcher::new(Router::new(item_routes()).unwrap(), ItemService::new(Arc::new(store)))
                .unwrap();
        let seen = Arc::new(SeenIds::default());
        let seen_mw: Arc<SeenIds> = Arc::clone(&seen);
        dispatcher.add_middleware(seen_mw);
        let service = AppService::new(Arc::new(dispatcher));

        let supplied = RequestId::new();
        let mut req = parsed("GET", "/items/1", RequestBody::Empty);
        req.headers
            .insert(REQUEST_ID_HEADER.to_string(), supplied.to_string());
        assert_eq!(json_reply(service.respond(req)).status, 200);

        let mut req = parsed("GET", "/items/1", RequestBody::Empty);
        req.headers
            .insert(REQUEST_ID_HEADER.to_string(), "not-a-ulid".to_string());
        let _ = service.respond(req);

        let seen = seen.0.lock();
        assert_eq!(seen.len(), 2);
        assert_eq!(seen[0], supplied);
        assert_ne!(seen[1], supplied);
    }
}

use anyhow::{anyhow, Context};
use http::Method;
use serde::Serialize;
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, error, info, info_span, warn};

use crate::ids::RequestId;
use crate::middleware::Middleware;
use crate::model::Item;
use crate::router::Router;
use crate::routes::Operation;
use crate::service::ItemService;
use crate::validator::{
    validate, ResponseContracts, ResponseValidation, Violation, ViolationKind, BODY_FIELD,
};

/// A parsed inbound request, as handed over by the hosting layer
///
/// `path_id` lets a host that already extracted the identifier pass it along;
/// when it is `None` the id captured by the router is used. A body the host
/// could not parse travels as `malformed_body` and is only rejected by routes
/// that declare an input contract.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    pub method: Method,
    pub path: String,
    pub path_id: Option<String>,
    pub body: Option<Value>,
    /// Parser error for a body that was not JSON
    pub malformed_body: Option<String>,
    /// Correlation id supplied by the caller; a fresh one is minted otherwise
    pub request_id: Option<RequestId>,
}

impl ApiRequest {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            path_id: None,
            body: None,
            malformed_body: None,
            request_id: None,
        }
    }

    #[must_use]
    pub fn with_malformed_body(mut self, reason: impl Into<String>) -> Self {
        self.malformed_body = Some(reason.into());
        self
    }

    #[must_use]
    pub fn with_request_id(mut self, id: RequestId) -> Self {
        self.request_id = Some(id);
        self
    }

    #[must_use]
    pub fn with_body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    #[must_use]
    pub fn with_path_id(mut self, id: impl Into<String>) -> Self {
        self.path_id = Some(id.into());
        self
    }
}

/// A matched request, as seen by middleware
#[derive(Debug, Clone)]
pub struct HandlerRequest {
    /// Unique request ID for tracing and correlation
    pub request_id: RequestId,
    pub method: Method,
    pub path: String,
    /// Name of the route's handler (e.g. `get_item`)
    pub handler_name: String,
    pub operation: Operation,
    /// Identifier taken from the `{id}` segment
    pub path_id: Option<String>,
    pub body: Option<Value>,
    pub malformed_body: Option<String>,
}

/// Status code and JSON body sent back to the host
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HandlerResponse {
    pub status: u16,
    pub body: Value,
}

impl HandlerResponse {
    #[must_use]
    pub fn json(status: u16, body: Value) -> Self {
        Self { status, body }
    }

    /// `{ "message": ... }` with the given status
    #[must_use]
    pub fn message(status: u16, message: impl Into<String>) -> Self {
        Self::json(status, json!({ "message": message.into() }))
    }

    #[must_use]
    pub fn not_found(id: &str) -> Self {
        Self::message(404, format!("Item {id} not found"))
    }

    #[must_use]
    pub fn removed(id: &str) -> Self {
        Self::message(200, format!("Item {id} has been removed"))
    }

    #[must_use]
    pub fn validation_failed(violations: &[Violation]) -> Self {
        Self::json(
            400,
            json!({
                "message": "Request validation failed",
                "violations": violations,
            }),
        )
    }

    /// `400` for a body that is not JSON at all
    #[must_use]
    pub fn malformed_body(reason: &str) -> Self {
        Self::json(
            400,
            json!({
                "message": "Request body is not valid JSON",
                "violations": [Violation::new(
                    BODY_FIELD,
                    ViolationKind::MalformedJson,
                    format!("request body is not valid JSON: {reason}"),
                )],
            }),
        )
    }

    /// Generic failure; carries no detail about the cause
    #[must_use]
    pub fn internal_error() -> Self {
        Self::message(500, "Internal server error")
    }

    #[must_use]
    pub fn no_route(method: &Method, path: &str) -> Self {
        Self::message(404, format!("No route for {method} {path}"))
    }
}

/// Dispatcher that runs matched routes against the item service
pub struct Dispatcher {
    router: Router,
    service: ItemService,
    contracts: ResponseContracts,
    response_validation: ResponseValidation,
    middlewares: Vec<Arc<dyn Middleware>>,
}

impl Dispatcher {
    /// Build a dispatcher over a compiled router and a service.
    ///
    /// # Errors
    ///
    /// Fails if any output schema in the routing table cannot be compiled.
    pub fn new(router: Router, service: ItemService) -> anyhow::Result<Self> {
        let routes: Vec<_> = router.routes().cloned().collect();
        let contracts =
            ResponseContracts::compile(&routes).context("failed to compile response contracts")?;
        Ok(Self {
            router,
            service,
            contracts,
            response_validation: ResponseValidation::default(),
            middlewares: Vec::new(),
        })
    }

    #[must_use]
    pub fn with_response_validation(mut self, mode: ResponseValidation) -> Self {
        self.response_validation = mode;
        self
    }

    /// Add middleware to the processing pipeline
    ///
    /// Middleware runs in the order it was added.
    pub fn add_middleware(&mut self, mw: Arc<dyn Middleware>) {
        self.middlewares.push(mw);
    }

    #[must_use]
    pub fn router(&self) -> &Router {
        &self.router
    }

    #[must_use]
    pub fn service(&self) -> &ItemService {
        &self.service
    }

    /// Dispatch one request.
    ///
    /// # Errors
    ///
    /// Returns `Err` only for faults outside the business contract; the host is
    /// expected to answer those with a generic failure.
    pub fn dispatch(&self, req: ApiRequest) -> anyhow::Result<HandlerResponse> {
        let Some(route_match) = self.router.route(req.method.clone(), &req.path) else {
            return Ok(HandlerResponse::no_route(&req.method, &req.path));
        };

        let path_id = req
            .path_id
            .or_else(|| route_match.path_id().map(ToString::to_string));

        let request = HandlerRequest {
            request_id: req.request_id.unwrap_or_default(),
            method: req.method,
            path: req.path,
            handler_name: route_match.handler_name.clone(),
            operation: route_match.route.operation,
            path_id,
            body: req.body,
            malformed_body: req.malformed_body,
        };

        let span = info_span!(
            "dispatch",
            request_id = %request.request_id,
            handler_name = %request.handler_name,
        );
        let _entered = span.enter();

        let mut early_resp: Option<HandlerResponse> = None;
        for mw in &self.middlewares {
            if early_resp.is_none() {
                early_resp = mw.before(&request);
            } else {
                mw.before(&request);
            }
        }

        let start = Instant::now();
        let outcome = match early_resp {
            Some(resp) => {
                debug!(status = resp.status, "Middleware returned early response");
                Ok(resp)
            }
            None => self.run(&request, route_match.route.request_schema.as_ref()),
        };
        let outcome = outcome.and_then(|resp| self.check_response(&request, resp));
        let latency = start.elapsed();

        match outcome {
            Ok(mut resp) => {
                self.run_after(&request, &mut resp, latency);
                Ok(resp)
            }
            Err(err) => {
                let mut resp = HandlerResponse::internal_error();
                self.run_after(&request, &mut resp, latency);
                Err(err.context(format!(
                    "{} {} ({}) failed",
                    request.method, request.path, request.handler_name
                )))
            }
        }
    }

    /// Dispatch one request, mapping internal faults to a generic `500`.
    #[must_use]
    pub fn handle(&self, req: ApiRequest) -> HandlerResponse {
        let method = req.method.clone();
        let path = req.path.clone();
        match self.dispatch(req) {
            Ok(resp) => resp,
            Err(err) => {
                error!(
                    method = %method,
                    path = %path,
                    error = ?err,
                    "Request failed with an internal fault"
                );
                HandlerResponse::internal_error()
            }
        }
    }

    fn run(
        &self,
        request: &HandlerRequest,
        schema: Option<&crate::schema::InputSchema>,
    ) -> anyhow::Result<HandlerResponse> {
        if let Some(schema) = schema {
            if let Some(reason) = &request.malformed_body {
                info!(error = %reason, "Malformed JSON body - service not called");
                return Ok(HandlerResponse::malformed_body(reason));
            }
            if let Err(violations) = validate(request.body.as_ref(), schema) {
                info!(
                    violations = ?violations,
                    "Request validation failed - service not called"
                );
                return Ok(HandlerResponse::validation_failed(&violations));
            }
        }

        let resp = match request.operation {
            Operation::ListItems => {
                let items = self.service.list_all()?;
                HandlerResponse::json(200, serde_json::to_value(items)?)
            }
            Operation::GetItem => {
                let id = require_id(request)?;
                found_or_404(id, 200, self.service.find_by_id(id)?)?
            }
            Operation::CreateItem => {
                let item = self.service.create(require_name(request)?)?;
                HandlerResponse::json(201, serde_json::to_value(item)?)
            }
            Operation::UpdateItem => {
                let id = require_id(request)?;
                let name = require_name(request)?;
                found_or_404(id, 200, self.service.update(id, name)?)?
            }
            Operation::DeleteItem => {
                let id = require_id(request)?;
                match self.service.remove(id)? {
                    Some(_) => HandlerResponse::removed(id),
                    None => {
                        info!(item_id = %id, "Item not found");
                        HandlerResponse::not_found(id)
                    }
                }
            }
        };
        Ok(resp)
    }

    fn check_response(
        &self,
        request: &HandlerRequest,
        resp: HandlerResponse,
    ) -> anyhow::Result<HandlerResponse> {
        if self.response_validation == ResponseValidation::Off {
            return Ok(resp);
        }
        match self
            .contracts
            .check(&request.handler_name, resp.status, &resp.body)
        {
            Ok(()) => Ok(resp),
            Err(details) => {
                warn!(
                    status = resp.status,
                    details = ?details,
                    mode = ?self.response_validation,
                    "Response breaks its declared contract"
                );
                if self.response_validation == ResponseValidation::Enforce {
                    Err(anyhow!(
                        "response {} breaks its contract: {}",
                        resp.status,
                        details.join("; ")
                    ))
                } else {
                    Ok(resp)
                }
            }
        }
    }

    fn run_after(&self, request: &HandlerRequest, resp: &mut HandlerResponse, latency: Duration) {
        for mw in &self.middlewares {
            mw.after(request, resp, latency);
        }
    }
}

fn require_id(request: &HandlerRequest) -> anyhow::Result<&str> {
    request
        .path_id
        .as_deref()
        .ok_or_else(|| anyhow!("route '{}' matched without an id", request.handler_name))
}

fn require_name(request: &HandlerRequest) -> anyhow::Result<String> {
    request
        .body
        .as_ref()
        .and_then(|b| b.get("name"))
        .and_then(Value::as_str)
        .map(ToString::to_string)
        .ok_or_else(|| anyhow!("validated body for '{}' lacks a name", request.handler_name))
}

fn found_or_404(id: &str, status: u16, item: Option<Item>) -> anyhow::Result<HandlerResponse> {
    match item {
        Some(item) => Ok(HandlerResponse::json(status, serde_json::to_value(item)?)),
        None => {
            info!(item_id = %id, "Item not found");
            Ok(HandlerResponse::not_found(id))
        }
    }
}

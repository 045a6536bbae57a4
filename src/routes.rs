//! The routing table, declared as data.
//!
//! Each [`RouteMeta`] ties a method and path pattern to a service [`Operation`],
//! its input contract, and its output contracts per status code. The router
//! compiles the table; the dispatcher executes it.

use http::Method;
use std::fmt;

use crate::schema::{
    create_item_input, item_list_schema, item_schema, message_schema, update_item_input,
    validation_error_schema, InputSchema, Responses,
};

/// Name of the path placeholder carrying the item id.
pub const ID_PARAM: &str = "id";

/// Service operation a route resolves to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    ListItems,
    GetItem,
    CreateItem,
    UpdateItem,
    DeleteItem,
}

impl Operation {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Operation::ListItems => "list_items",
            Operation::GetItem => "get_item",
            Operation::CreateItem => "create_item",
            Operation::UpdateItem => "update_item",
            Operation::DeleteItem => "delete_item",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone)]
pub struct RouteMeta {
    pub method: Method,
    /// Pattern such as `/items/{id}`
    pub path_pattern: String,
    pub handler_name: String,
    pub operation: Operation,
    /// Body contract; `None` means the body is not inspected
    pub request_schema: Option<InputSchema>,
    pub responses: Responses,
    pub success_status: u16,
}

impl RouteMeta {
    pub fn new(method: Method, path_pattern: &str, operation: Operation, success_status: u16) -> Self {
        Self {
            method,
            path_pattern: path_pattern.to_string(),
            handler_name: operation.as_str().to_string(),
            operation,
            request_schema: None,
            responses: Responses::new(),
            success_status,
        }
    }

    #[must_use]
    pub fn with_request_schema(mut self, schema: InputSchema) -> Self {
        self.request_schema = Some(schema);
        self
    }

    #[must_use]
    pub fn with_response(mut self, status: u16, schema: serde_json::Value) -> Self {
        self.responses.insert(status, schema);
        self
    }

    /// Placeholder names in declaration order.
    #[must_use]
    pub fn param_names(&self) -> Vec<&str> {
        self.path_pattern
            .split('/')
            .filter(|s| s.starts_with('{') && s.ends_with('}'))
            .map(|s| s.trim_start_matches('{').trim_end_matches('}'))
            .collect()
    }
}

/// The five item routes.
#[must_use]
pub fn item_routes() -> Vec<RouteMeta> {
    vec![
        RouteMeta::new(Method::GET, "/items", Operation::ListItems, 200)
            .with_response(200, item_list_schema()),
        RouteMeta::new(Method::GET, "/items/{id}", Operation::GetItem, 200)
            .with_response(200, item_schema())
            .with_response(404, message_schema()),
        RouteMeta::new(Method::POST, "/items", Operation::CreateItem, 201)
            .with_request_schema(create_item_input())
            .with_response(201, item_schema())
            .with_response(400, validation_error_schema()),
        RouteMeta::new(Method::PUT, "/items/{id}", Operation::UpdateItem, 200)
            .with_request_schema(update_item_input())
            .with_response(200, item_schema())
            .with_response(400, validation_error_schema())
            .with_response(404, message_schema()),
        RouteMeta::new(Method::DELETE, "/items/{id}", Operation::DeleteItem, 200)
            .with_response(200, message_schema())
            .with_response(404, message_schema()),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_route_declares_its_success_contract() {
        for route in item_routes() {
            assert!(
                route.responses.contains_key(&route.success_status),
                "{} has no {} contract",
                route.handler_name,
                route.success_status
            );
        }
    }

    #[test]
    fn test_param_names() {
        let routes = item_routes();
        assert!(routes[0].param_names().is_empty());
        assert_eq!(routes[1].param_names(), vec![ID_PARAM]);
    }
}

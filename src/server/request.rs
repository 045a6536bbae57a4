use may_minihttp::Request;
use serde_json::Value;
use std::collections::HashMap;
use std::io::Read;
use tracing::{debug, info};

/// What the client sent as a body
#[derive(Debug, Clone, PartialEq)]
pub enum RequestBody {
    /// No bytes, or only whitespace
    Empty,
    Json(Value),
    /// Non-empty but not JSON; carries the parser's message
    Malformed(String),
}

impl RequestBody {
    /// Classify raw body text.
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        if raw.trim().is_empty() {
            return RequestBody::Empty;
        }
        match serde_json::from_str(raw) {
            Ok(value) => RequestBody::Json(value),
            Err(e) => RequestBody::Malformed(e.to_string()),
        }
    }
}

/// Parsed HTTP request data used by `AppService`.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedRequest {
    /// HTTP method (GET, POST, etc.)
    pub method: String,
    /// Request path without the query string
    pub path: String,
    /// HTTP headers (lowercase keys)
    pub headers: HashMap<String, String>,
    pub body: RequestBody,
}

/// Drop everything from the first `?` on.
#[must_use]
pub fn strip_query(raw_path: &str) -> &str {
    raw_path.split('?').next().unwrap_or("/")
}

/// Parse an incoming HTTP request into a [`ParsedRequest`]
///
/// Headers are copied out before the body is read, since reading the body
/// consumes the request.
pub fn parse_request(req: Request) -> ParsedRequest {
    let method = req.method().to_string();
    let path = strip_query(req.path()).to_string();

    let headers: HashMap<String, String> = req
        .headers()
        .iter()
        .map(|h| {
            (
                h.name.to_ascii_lowercase(),
                String::from_utf8_lossy(h.value).to_string(),
            )
        })
        .collect();
    debug!(
        header_count = headers.len(),
        header_names = ?headers.keys().take(20).collect::<Vec<_>>(),
        "Headers extracted"
    );

    let mut raw = String::new();
    let body = match req.body().read_to_string(&mut raw) {
        Ok(size) => {
            if size > 0 {
                debug!(body_size_bytes = size, "Request body read");
            }
            RequestBody::parse(&raw)
        }
        Err(e) => RequestBody::Malformed(e.to_string()),
    };
    if let RequestBody::Malformed(reason) = &body {
        debug!(error = %reason, "JSON body parse failed");
    }

    info!(
        method = %method,
        path = %path,
        headers_count = headers.len(),
        "HTTP request parsed"
    );

    ParsedRequest {
        method,
        path,
        headers,
        body,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_strip_query() {
        assert_eq!(strip_query("/items?limit=10"), "/items");
        assert_eq!(strip_query("/items/1"), "/items/1");
    }

    #[test]
    fn test_body_classification() {
        assert_eq!(RequestBody::parse(""), RequestBody::Empty);
        assert_eq!(RequestBody::parse("  \r\n"), RequestBody::Empty);
        assert_eq!(
            RequestBody::parse(r#"{"name":"Widget"}"#),
            RequestBody::Json(json!({"name": "Widget"}))
        );
        assert_eq!(RequestBody::parse("42"), RequestBody::Json(json!(42)));
        assert!(matches!(
            RequestBody::parse("{name: Widget"),
            RequestBody::Malformed(_)
        ));
    }
}

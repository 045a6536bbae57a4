use may_minihttp::Response;
use tracing::error;

use crate::dispatcher::HandlerResponse;

pub(crate) fn status_reason(status: u16) -> &'static str {
    match status {
        200 => "OK",
        201 => "Created",
        400 => "Bad Request",
        404 => "Not Found",
        500 => "Internal Server Error",
        _ => "Unknown",
    }
}

/// Write a dispatcher response as `application/json`.
pub fn write_handler_response(res: &mut Response, resp: &HandlerResponse) {
    res.status_code(usize::from(resp.status), status_reason(resp.status));
    res.header("Content-Type: application/json");
    match serde_json::to_vec(&resp.body) {
        Ok(bytes) => res.body_vec(bytes),
        Err(e) => {
            error!(error = %e, status = resp.status, "Failed to serialize response body");
            res.status_code(500, status_reason(500));
            res.body(r#"{"message":"Internal server error"}"#);
        }
    }
}

/// Write a plain-text body, used by `/metrics`.
pub fn write_text(res: &mut Response, status: u16, content_type: &'static str, body: String) {
    res.status_code(usize::from(status), status_reason(status));
    res.header(content_type);
    res.body_vec(body.into_bytes());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_reason() {
        assert_eq!(status_reason(200), "OK");
        assert_eq!(status_reason(201), "Created");
        assert_eq!(status_reason(400), "Bad Request");
        assert_eq!(status_reason(404), "Not Found");
        assert_eq!(status_reason(500), "Internal Server Error");
    }
}

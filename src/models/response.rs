use serde::Serialize;
use warp::http::{HeaderMap, Method, StatusCode};

pub static CORS_HEADERS: [(&str, &str); 3] = [
    ("access-control-allow-origin", "*"),
    ("access-control-allow-methods", "GET, POST, OPTIONS"),
    ("access-control-allow-headers", "Content-Type"),
];

#[derive(Debug, Clone)]
pub struct HistoryRequest {
    pub method: Method,
    pub headers: HeaderMap,
}

impl HistoryRequest {
    pub fn new(method: Method, headers: HeaderMap) -> Self {
        Self { method, headers }
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|value| value.to_str().ok())
    }
}

#[derive(Debug, Serialize)]
pub struct EventsBody<'a> {
    pub events: &'a str,
}

#[derive(Debug, Serialize)]
pub struct ErrorBody<'a> {
    pub error: &'a str,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryResponse {
    pub status: StatusCode,
    pub content_type: Option<&'static str>,
    pub body: String,
}

impl HistoryResponse {
    pub fn empty() -> Self {
        Self {
            status: StatusCode::OK,
            content_type: None,
            body: String::new(),
        }
    }

    pub fn json<T: Serialize>(status: StatusCode, payload: &T) -> Self {
        // Plain string fields never fail to serialize.
        let body = serde_json::to_string(payload).unwrap_or_else(|_| "{}".to_string());
        Self {
            status,
            content_type: Some("application/json; charset=utf-8"),
            body,
        }
    }

    pub fn html(body: String) -> Self {
        Self {
            status: StatusCode::OK,
            content_type: Some("text/html; charset=utf-8"),
            body,
        }
    }

    pub fn cors_headers(&self) -> &'static [(&'static str, &'static str)] {
        &CORS_HEADERS
    }
}

use warp::http::Method;

use crate::models::response::HistoryRequest;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseFormat {
    Json,
    Html,
}

/// `Accept` decides when it names a concrete type; otherwise `GET` means
/// a browser fetch (JSON) and anything else a frame post (HTML).
pub fn negotiate(request: &HistoryRequest) -> ResponseFormat {
    if let Some(accept) = request.header("accept") {
        let accept = accept.to_ascii_lowercase();
        if accept.contains("application/json") {
            return ResponseFormat::Json;
        }
        if accept.contains("text/html") {
            return ResponseFormat::Html;
        }
    }

    if request.method == Method::GET {
        ResponseFormat::Json
    } else {
        ResponseFormat::Html
    }
}

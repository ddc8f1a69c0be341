use std::convert::Infallible;
use std::sync::Arc;

use tracing::{Instrument, info, info_span};
use uuid::Uuid;
use warp::Filter;
use warp::Reply;
use warp::http::header::{CONTENT_TYPE, HeaderValue};
use warp::http::{HeaderMap, Method};

use crate::config::Settings;
use crate::handlers::history::HistoryHandler;
use crate::models::date_context::SystemClock;
use crate::models::response::{HistoryRequest, HistoryResponse};
use crate::service::completion_provider::build_provider;
use crate::service::history_service::HistoryService;

pub fn build_handler(settings: &Settings) -> HistoryHandler {
    let provider = build_provider(&settings.provider);
    HistoryHandler::new(
        HistoryService::new(provider),
        Arc::new(SystemClock),
        settings.timezone,
        settings.public_host.clone(),
        settings.og_image_url.clone(),
    )
}

pub fn routes(
    handler: Arc<HistoryHandler>,
) -> impl Filter<Extract = (warp::reply::Response,), Error = warp::Rejection> + Clone {
    warp::path!("api" / "history")
        .and(warp::method())
        .and(warp::header::headers_cloned())
        .and(warp::any().map(move || handler.clone()))
        .and_then(serve_history)
}

async fn serve_history(
    method: Method,
    headers: HeaderMap,
    handler: Arc<HistoryHandler>,
) -> Result<warp::reply::Response, Infallible> {
    let span = info_span!("history_request", id = %Uuid::new_v4(), %method);
    let request = HistoryRequest::new(method, headers);
    let response = handler.handle(&request).instrument(span).await;
    Ok(into_reply(response))
}

fn into_reply(response: HistoryResponse) -> warp::reply::Response {
    let cors = response.cors_headers();
    let mut reply = response.body.into_response();
    *reply.status_mut() = response.status;

    let headers = reply.headers_mut();
    match response.content_type {
        Some(content_type) => {
            headers.insert(CONTENT_TYPE, HeaderValue::from_static(content_type));
        }
        None => {
            headers.remove(CONTENT_TYPE);
        }
    }
    for (name, value) in cors {
        headers.insert(*name, HeaderValue::from_static(*value));
    }
    reply
}

pub async fn run_api(settings: Settings) {
    let handler = Arc::new(build_handler(&settings));
    info!(
        addr = %settings.bind_addr,
        provider = ?settings.provider.kind,
        timezone = %settings.timezone,
        "history frame server listening"
    );

    tokio::select! {
        _ = warp::serve(routes(handler)).run(settings.bind_addr) => {}
        _ = tokio::signal::ctrl_c() => {
            info!("shutdown signal received");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::SocketAddr;
    use std::time::Duration;

    use async_trait::async_trait;
    use chrono::{TimeZone, Utc};
    use reqwest::Url;
    use warp::http::StatusCode;

    use crate::models::date_context::FixedClock;
    use crate::service::completion_provider::{CompletionError, CompletionProvider};

    struct CannedProvider;

    #[async_trait]
    impl CompletionProvider for CannedProvider {
        fn name(&self) -> &'static str {
            "canned"
        }

        async fn complete(&self, _prompt: &str) -> Result<String, CompletionError> {
            Ok("1969: Apollo 11 lands on the Moon.".to_string())
        }
    }

    fn canned_handler() -> HistoryHandler {
        HistoryHandler::new(
            HistoryService::new(Arc::new(CannedProvider)),
            Arc::new(FixedClock(Utc.with_ymd_and_hms(2024, 7, 20, 12, 0, 0).unwrap())),
            chrono_tz::Tz::UTC,
            "fallback.example".to_string(),
            Url::parse("https://og-image.vercel.app").unwrap(),
        )
    }

    async fn spawn_routes() -> SocketAddr {
        let addr = std::net::TcpListener::bind("127.0.0.1:0")
            .unwrap()
            .local_addr()
            .unwrap();
        tokio::spawn(warp::serve(routes(Arc::new(canned_handler()))).run(addr));
        for _ in 0..100 {
            if tokio::net::TcpStream::connect(addr).await.is_ok() {
                break;
            }
            tokio::time::sleep(Duration::from_millis(20)).await;
        }
        addr
    }

    #[tokio::test]
    async fn route_answers_preflight_with_cors() {
        let addr = spawn_routes().await;
        let response = reqwest::Client::new()
            .request(Method::OPTIONS, format!("http://{addr}/api/history"))
            .send()
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let headers = response.headers().clone();
        assert_eq!(headers["access-control-allow-origin"], "*");
        assert_eq!(headers["access-control-allow-methods"], "GET, POST, OPTIONS");
        assert_eq!(headers["access-control-allow-headers"], "Content-Type");
        assert!(response.text().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn route_passes_host_through_to_frame() {
        let addr = spawn_routes().await;
        let response = reqwest::Client::new()
            .post(format!("http://{addr}/api/history"))
            .header("host", "frames.example")
            .send()
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()["content-type"],
            "text/html; charset=utf-8"
        );
        let body = response.text().await.unwrap();
        assert!(body.contains(
            "property=\"fc:frame:post_url\" content=\"https://frames.example/api/history\""
        ));
    }

    #[tokio::test]
    async fn route_serves_json_to_plain_get() {
        let addr = spawn_routes().await;
        let body: serde_json::Value = reqwest::get(format!("http://{addr}/api/history"))
            .await
            .unwrap()
            .json()
            .await
            .unwrap();

        assert_eq!(body["events"], "1969: Apollo 11 lands on the Moon.");
    }

    #[tokio::test]
    async fn route_rejects_other_paths() {
        let addr = spawn_routes().await;
        let response = reqwest::get(format!("http://{addr}/api/other")).await.unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn reply_carries_cors_and_content_type() {
        let reply = into_reply(HistoryResponse::html("<html></html>".to_string()));
        assert_eq!(reply.status(), StatusCode::OK);
        let headers = reply.headers();
        assert_eq!(headers["content-type"], "text/html; charset=utf-8");
        assert_eq!(headers["access-control-allow-origin"], "*");
        assert_eq!(headers["access-control-allow-methods"], "GET, POST, OPTIONS");
        assert_eq!(headers["access-control-allow-headers"], "Content-Type");
    }

    #[test]
    fn preflight_reply_has_no_content_type() {
        let reply = into_reply(HistoryResponse::empty());
        assert_eq!(reply.status(), StatusCode::OK);
        assert!(reply.headers().get(CONTENT_TYPE).is_none());
        assert_eq!(reply.headers()["access-control-allow-origin"], "*");
    }
}

use std::sync::Arc;

use chrono_tz::Tz;
use reqwest::Url;
use tracing::{error, info};
use warp::http::{Method, StatusCode};

use crate::models::date_context::{Clock, DateContext};
use crate::models::response::{ErrorBody, EventsBody, HistoryRequest, HistoryResponse};
use crate::service::frame::{fallback_frame, history_image_url, success_frame};
use crate::service::history_service::HistoryService;
use crate::service::negotiation::{ResponseFormat, negotiate};

pub const LOAD_FAILED_MESSAGE: &str = "Failed to load history.";

pub struct HistoryHandler {
    history: HistoryService,
    clock: Arc<dyn Clock>,
    timezone: Tz,
    public_host: String,
    image_base: Url,
}

impl HistoryHandler {
    pub fn new(
        history: HistoryService,
        clock: Arc<dyn Clock>,
        timezone: Tz,
        public_host: String,
        image_base: Url,
    ) -> Self {
        Self {
            history,
            clock,
            timezone,
            public_host,
            image_base,
        }
    }

    pub fn today(&self) -> DateContext {
        DateContext::from_instant(self.clock.now(), self.timezone)
    }

    pub async fn handle(&self, request: &HistoryRequest) -> HistoryResponse {
        if request.method == Method::OPTIONS {
            return HistoryResponse::empty();
        }

        let format = negotiate(request);
        let host = request
            .header("host")
            .map(str::trim)
            .filter(|host| !host.is_empty())
            .unwrap_or(self.public_host.as_str());
        let date = self.today();

        match self.history.fetch_events(&date).await {
            Ok(events) => {
                info!(
                    provider = self.history.provider_name(),
                    month = date.month_name(),
                    day = date.day,
                    ?format,
                    "history served"
                );
                match format {
                    ResponseFormat::Json => {
                        HistoryResponse::json(StatusCode::OK, &EventsBody { events: &events })
                    }
                    ResponseFormat::Html => {
                        let image_url = history_image_url(&self.image_base, &date);
                        HistoryResponse::html(success_frame(host, &image_url))
                    }
                }
            }
            Err(err) => {
                error!(provider = self.history.provider_name(), error = %err, "Error loading history");
                match format {
                    ResponseFormat::Json => HistoryResponse::json(
                        StatusCode::INTERNAL_SERVER_ERROR,
                        &ErrorBody {
                            error: LOAD_FAILED_MESSAGE,
                        },
                    ),
                    ResponseFormat::Html => HistoryResponse::html(fallback_frame(host)),
                }
            }
        }
    }
}

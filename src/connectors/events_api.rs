//! REST client for the forecasting events API.
//!
//! One client interface, two alternate configurations:
//! - the direct third-party host (`/events/{id}/feedback` route),
//! - a localhost proxy (`/feedback` route with weight and comment).
//!
//! Each call is a single best-effort round trip: no retry, no caching,
//! no request deduplication. Fetch failures are returned as typed errors
//! so callers can tell "no events" apart from "fetch failed".

use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use crate::events::{
    split_description, Event, EventPredictions, Feedback, Prediction, UNINFORMATIVE_PRIOR,
};

/// Default API endpoints.
const DEFAULT_DIRECT_URL: &str = "https://ifgames.win/api/v2";
const DEFAULT_PROXY_URL: &str = "http://localhost:8000/api";

/// Fixed lower-bound filters the list endpoints require.
const FROM_DATE: i64 = 1;
const RESOLVED_SINCE: i64 = 1;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("failed to parse response: {0}")]
    Parse(String),

    #[error("event not found: {0}")]
    EventNotFound(String),

    #[error("feedback requires a non-empty expert id")]
    MissingExpertId,

    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },
}

/// Which deployment of the events API the client talks to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiMode {
    /// Direct third-party host; feedback goes to `/events/{id}/feedback`.
    Direct,
    /// Local proxy; feedback goes to `/feedback` with weight and comment.
    Proxy,
}

/// Client configuration: base URL plus route shape.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub base_url: String,
    pub mode: ApiMode,
}

impl ApiConfig {
    /// Direct-host configuration with the default endpoint.
    pub fn direct() -> Self {
        Self {
            base_url: DEFAULT_DIRECT_URL.to_string(),
            mode: ApiMode::Direct,
        }
    }

    /// Local-proxy configuration with the default endpoint.
    pub fn proxy() -> Self {
        Self {
            base_url: DEFAULT_PROXY_URL.to_string(),
            mode: ApiMode::Proxy,
        }
    }

    /// Reads configuration from the environment.
    ///
    /// `FORECAST_API_MODE` selects `direct` (default) or `proxy`;
    /// `FORECAST_API_URL` overrides the base URL for either mode.
    pub fn from_env() -> Self {
        let mut config = match std::env::var("FORECAST_API_MODE").as_deref() {
            Ok("proxy") => Self::proxy(),
            _ => Self::direct(),
        };
        if let Ok(url) = std::env::var("FORECAST_API_URL") {
            config.base_url = url.trim_end_matches('/').to_string();
        }
        config
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self::direct()
    }
}

/// Client for the forecasting events API.
#[derive(Debug, Clone)]
pub struct EventsApiClient {
    client: Client,
    config: ApiConfig,
}

impl EventsApiClient {
    /// Creates a client for the given configuration.
    pub fn new(config: ApiConfig) -> Self {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .build()
            .expect("Failed to create HTTP client");

        Self { client, config }
    }

    /// Returns the configured base URL.
    pub fn base_url(&self) -> &str {
        &self.config.base_url
    }

    /// Returns the configured API mode.
    pub fn mode(&self) -> ApiMode {
        self.config.mode
    }

    /// Fetches a page of not-yet-resolved events.
    pub async fn list_ongoing(&self, limit: usize, offset: usize) -> Result<Vec<Event>, ApiError> {
        let url = format!(
            "{}/events?from_date={}&offset={}&limit={}",
            self.config.base_url, FROM_DATE, offset, limit
        );
        debug!(%url, "fetching ongoing events");
        self.fetch_event_page(&url).await
    }

    /// Fetches a page of resolved events.
    pub async fn list_resolved(&self, limit: usize, offset: usize) -> Result<Vec<Event>, ApiError> {
        let url = format!(
            "{}/events/resolved?resolved_since={}&offset={}&limit={}",
            self.config.base_url, RESOLVED_SINCE, offset, limit
        );
        debug!(%url, "fetching resolved events");
        self.fetch_event_page(&url).await
    }

    async fn fetch_event_page(&self, url: &str) -> Result<Vec<Event>, ApiError> {
        let response = self.client.get(url).send().await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let message = remote_message(&response.text().await.unwrap_or_default());
            return Err(ApiError::Api { status, message });
        }

        let page: EventsPage = response
            .json()
            .await
            .map_err(|e| ApiError::Parse(format!("events page: {}", e)))?;

        Ok(page.items.into_iter().map(UpstreamEvent::into_event).collect())
    }

    /// Fetches the prediction history for one event.
    pub async fn get_predictions(&self, event_id: &str) -> Result<EventPredictions, ApiError> {
        let url = format!("{}/events/{}/predictions", self.config.base_url, event_id);
        debug!(%url, "fetching predictions");

        let response = self.client.get(&url).send().await?;

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Err(ApiError::EventNotFound(event_id.to_string()));
        }
        if !response.status().is_success() {
            let status = response.status().as_u16();
            let message = remote_message(&response.text().await.unwrap_or_default());
            return Err(ApiError::Api { status, message });
        }

        let page: PredictionsPage = response
            .json()
            .await
            .map_err(|e| ApiError::Parse(format!("predictions page: {}", e)))?;

        Ok(page.into_predictions())
    }

    /// Asks the upstream service to produce a fresh prediction for an
    /// event. Local-proxy deployments only.
    pub async fn request_prediction(&self, event_id: &str) -> Result<Event, ApiError> {
        let url = format!("{}/predict", self.config.base_url);
        let body = serde_json::json!({ "event_id": event_id });

        let response = self.client.post(&url).json(&body).send().await?;

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Err(ApiError::EventNotFound(event_id.to_string()));
        }
        if !response.status().is_success() {
            let status = response.status().as_u16();
            let message = remote_message(&response.text().await.unwrap_or_default());
            return Err(ApiError::Api { status, message });
        }

        let upstream: UpstreamEvent = response
            .json()
            .await
            .map_err(|e| ApiError::Parse(format!("predicted event: {}", e)))?;

        Ok(upstream.into_event())
    }

    /// Submits expert feedback for an event.
    ///
    /// Precondition: the feedback carries a non-empty expert id; without
    /// one this fails before any network call. A duplicate submission is
    /// a duplicate remote write; dedup is left to the service.
    pub async fn submit_feedback(&self, feedback: &Feedback) -> Result<bool, ApiError> {
        if feedback.expert_id.trim().is_empty() {
            warn!(event_id = %feedback.event_id, "feedback rejected: missing expert id");
            return Err(ApiError::MissingExpertId);
        }

        let response = match self.config.mode {
            ApiMode::Direct => {
                let url = format!(
                    "{}/events/{}/feedback",
                    self.config.base_url, feedback.event_id
                );
                let body = DirectFeedbackBody {
                    agrees: feedback.agrees,
                    expert_id: &feedback.expert_id,
                };
                self.client.post(&url).json(&body).send().await?
            }
            ApiMode::Proxy => {
                let url = format!("{}/feedback", self.config.base_url);
                let body = ProxyFeedbackBody {
                    event_id: &feedback.event_id,
                    agrees: feedback.agrees,
                    expert_weight: feedback.expert_weight.unwrap_or(1.0),
                    expert_id: &feedback.expert_id,
                    comment: feedback.comment.as_deref(),
                };
                self.client.post(&url).json(&body).send().await?
            }
        };

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Err(ApiError::EventNotFound(feedback.event_id.clone()));
        }
        if !response.status().is_success() {
            let status = response.status().as_u16();
            let message = remote_message(&response.text().await.unwrap_or_default());
            return Err(ApiError::Api { status, message });
        }

        let outcome: FeedbackOutcome = response
            .json()
            .await
            .map_err(|e| ApiError::Parse(format!("feedback response: {}", e)))?;

        debug!(
            event_id = %feedback.event_id,
            agrees = feedback.agrees,
            success = outcome.success,
            "feedback submitted"
        );
        Ok(outcome.success)
    }
}

// ============ Request Bodies ============

#[derive(Debug, Serialize)]
struct DirectFeedbackBody<'a> {
    agrees: bool,
    expert_id: &'a str,
}

#[derive(Debug, Serialize)]
struct ProxyFeedbackBody<'a> {
    event_id: &'a str,
    agrees: bool,
    expert_weight: f64,
    expert_id: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    comment: Option<&'a str>,
}

// ============ Response Types ============

#[derive(Debug, Deserialize)]
struct EventsPage {
    #[serde(default)]
    items: Vec<UpstreamEvent>,
}

/// Raw event as the API returns it, before normalization.
#[derive(Debug, Deserialize)]
struct UpstreamEvent {
    event_id: String,
    #[serde(default)]
    market_type: String,
    #[serde(default)]
    title: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    created_at: i64,
    #[serde(default)]
    start_date: i64,
    #[serde(default)]
    cutoff: i64,
    #[serde(default)]
    end_date: i64,
    #[serde(default)]
    answer: Option<String>,
    #[serde(default)]
    probability: Option<f64>,
    #[serde(default)]
    status: Option<String>,
}

impl UpstreamEvent {
    /// Normalizes into the domain [`Event`]: uninformative prior for a
    /// missing probability, description split into question and detail.
    fn into_event(self) -> Event {
        let (question, detail) = split_description(&self.description);
        Event {
            event_id: self.event_id,
            market_type: self.market_type,
            title: self.title,
            question,
            detail,
            created_at: self.created_at,
            start_date: self.start_date,
            cutoff: self.cutoff,
            end_date: self.end_date,
            answer: self.answer,
            probability: self.probability.unwrap_or(UNINFORMATIVE_PRIOR),
            status: self.status,
        }
    }
}

#[derive(Debug, Deserialize)]
struct PredictionsPage {
    #[serde(default)]
    count: Option<usize>,
    #[serde(default)]
    predictions: Vec<UpstreamPrediction>,
}

impl PredictionsPage {
    fn into_predictions(self) -> EventPredictions {
        let predictions: Vec<Prediction> = self
            .predictions
            .into_iter()
            .map(|p| Prediction {
                prediction: p.prediction.unwrap_or(UNINFORMATIVE_PRIOR),
                timestamp: p.timestamp,
                expert_id: p.expert_id,
            })
            .collect();
        EventPredictions {
            count: self.count.unwrap_or(predictions.len()),
            predictions,
        }
    }
}

#[derive(Debug, Deserialize)]
struct UpstreamPrediction {
    #[serde(default)]
    prediction: Option<f64>,
    #[serde(default)]
    timestamp: i64,
    #[serde(default)]
    expert_id: Option<String>,
}

#[derive(Debug, Deserialize)]
struct FeedbackOutcome {
    #[serde(default)]
    success: bool,
}

// ============ Helper Functions ============

/// Extracts a human-readable message from an error response body.
///
/// The API reports business-rule rejections as `{"detail": "..."}`;
/// anything else is passed through as-is.
fn remote_message(body: &str) -> String {
    if let Ok(value) = serde_json::from_str::<serde_json::Value>(body) {
        if let Some(detail) = value.get("detail").and_then(|d| d.as_str()) {
            return detail.to_string();
        }
    }
    body.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_probability_defaults_to_prior() {
        let page: EventsPage = serde_json::from_str(
            r#"{"items":[{"event_id":"e1","market_type":"Crypto",
                "description":"Will BTC reach $100k? Halving is coming.",
                "cutoff":1735689600}]}"#,
        )
        .unwrap();

        let events: Vec<Event> = page.items.into_iter().map(UpstreamEvent::into_event).collect();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].probability, UNINFORMATIVE_PRIOR);
        assert_eq!(events[0].question, "Will BTC reach $100k?");
        assert_eq!(events[0].detail, "Halving is coming.");
    }

    #[test]
    fn test_present_probability_is_kept() {
        let upstream: UpstreamEvent = serde_json::from_str(
            r#"{"event_id":"e2","probability":0.73,"description":"Will X?"}"#,
        )
        .unwrap();
        assert_eq!(upstream.into_event().probability, 0.73);
    }

    #[test]
    fn test_predictions_default_prior_and_count() {
        let page: PredictionsPage = serde_json::from_str(
            r#"{"predictions":[{"timestamp":1700000000},
                {"prediction":0.8,"timestamp":1700000100,"expert_id":"a"}]}"#,
        )
        .unwrap();

        let predictions = page.into_predictions();
        assert_eq!(predictions.count, 2);
        assert_eq!(predictions.predictions[0].prediction, UNINFORMATIVE_PRIOR);
        assert_eq!(predictions.predictions[1].prediction, 0.8);
    }

    #[test]
    fn test_explicit_count_wins_over_length() {
        let page: PredictionsPage =
            serde_json::from_str(r#"{"count":10,"predictions":[]}"#).unwrap();
        assert_eq!(page.into_predictions().count, 10);
    }

    #[test]
    fn test_feedback_body_shapes() {
        let direct = DirectFeedbackBody {
            agrees: true,
            expert_id: "expert@example.com",
        };
        assert_eq!(
            serde_json::to_string(&direct).unwrap(),
            r#"{"agrees":true,"expert_id":"expert@example.com"}"#
        );

        let proxy = ProxyFeedbackBody {
            event_id: "e1",
            agrees: false,
            expert_weight: 1.0,
            expert_id: "expert@example.com",
            comment: None,
        };
        let json = serde_json::to_string(&proxy).unwrap();
        assert!(json.contains(r#""event_id":"e1""#));
        assert!(json.contains(r#""expert_weight":1.0"#));
        assert!(!json.contains("comment"));
    }

    #[test]
    fn test_remote_message_prefers_detail_field() {
        assert_eq!(
            remote_message(r#"{"detail":"Event not active"}"#),
            "Event not active"
        );
        assert_eq!(remote_message("plain failure"), "plain failure");
    }

    #[test]
    fn test_config_defaults() {
        let direct = ApiConfig::direct();
        assert_eq!(direct.mode, ApiMode::Direct);
        assert_eq!(direct.base_url, DEFAULT_DIRECT_URL);

        let proxy = ApiConfig::proxy();
        assert_eq!(proxy.mode, ApiMode::Proxy);
        assert_eq!(proxy.base_url, DEFAULT_PROXY_URL);
    }

    #[tokio::test]
    async fn test_empty_expert_id_fails_before_network() {
        // Base URL points nowhere; a network attempt would surface as a
        // Request error, not MissingExpertId.
        let client = EventsApiClient::new(ApiConfig {
            base_url: "http://127.0.0.1:1".to_string(),
            mode: ApiMode::Direct,
        });

        let feedback = Feedback::new("e1", true, "");
        let err = client.submit_feedback(&feedback).await.unwrap_err();
        assert!(matches!(err, ApiError::MissingExpertId));
    }
}

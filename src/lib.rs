//! Forecast Desk - a terminal dashboard for forecasting events.
//!
//! This crate is a thin presentation layer over an external
//! prediction-market API: it fetches paginated event lists and per-event
//! prediction histories, renders event cards, and posts agree/disagree
//! feedback from self-declared "verified experts".
//!
//! # Architecture
//!
//! - **Connectors**: one HTTP client interface with two alternate
//!   configurations (direct third-party host or localhost proxy),
//!   returning typed errors instead of swallowing failures
//! - **Normalized domain model**: raw API payloads never leave the
//!   connectors layer; missing probabilities become the uninformative
//!   prior and descriptions are split into question and detail once,
//!   at ingestion
//! - **Verification store**: the one piece of persisted state, owned by
//!   an explicit service object with an injected storage port and a
//!   change-driven watch broadcast
//! - **View layer**: category filters, two-step feedback commit, and
//!   plain-text card rendering
//!
//! # Usage
//!
//! ```no_run
//! use forecast_desk::connectors::{ApiConfig, EventsApiClient};
//! use forecast_desk::experts::{JsonFileStorage, VerificationStore};
//! use forecast_desk::view::Dashboard;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let client = EventsApiClient::new(ApiConfig::from_env());
//!     let store = VerificationStore::new(Box::new(JsonFileStorage::new(
//!         "expert_verification.json",
//!     )))?;
//!
//!     let mut dashboard = Dashboard::new(client, store);
//!     dashboard.refresh().await?;
//!     Ok(())
//! }
//! ```

pub mod connectors;
pub mod events;
pub mod experts;
pub mod utils;
pub mod view;

// Re-export commonly used types
pub use connectors::{ApiConfig, ApiError, ApiMode, EventsApiClient};
pub use events::{Event, EventPredictions, Feedback, Prediction};
pub use experts::{ExpertProfile, ExpertVerification, Expertise, VerificationStore};
pub use view::Dashboard;

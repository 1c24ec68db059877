//! Connectors for the forecasting events API.
//!
//! This module provides the low-level HTTP client. All data fetched here
//! is normalized into domain types before any other layer consumes it.

mod events_api;

pub use events_api::{ApiConfig, ApiError, ApiMode, EventsApiClient};

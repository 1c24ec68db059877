//! Dashboard view-model: event list, category filter, feedback flow.
//!
//! Feedback is a two-step commit: an agree/disagree choice is parked
//! locally and only submitted on an explicit confirmation. The affordance
//! is gated on the verification store; an unverified user cannot even
//! park a choice. After a submission resolves, the event list is
//! re-fetched before control returns, never before.

use thiserror::Error;
use tracing::{debug, info, warn};

use crate::connectors::{ApiError, EventsApiClient};
use crate::events::{Event, EventPredictions, Feedback};
use crate::experts::VerificationStore;

/// Default page sizes, matching the upstream defaults.
const ONGOING_PAGE_SIZE: usize = 25;
const RESOLVED_PAGE_SIZE: usize = 100;

#[derive(Debug, Error)]
pub enum FeedbackError {
    #[error("only verified experts can submit feedback")]
    NotVerified,

    #[error("unknown event: {0}")]
    UnknownEvent(String),

    #[error("no feedback is awaiting confirmation")]
    NothingPending,

    #[error(transparent)]
    Api(#[from] ApiError),
}

/// An agree/disagree choice awaiting confirmation. Never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingFeedback {
    pub event_id: String,
    pub agrees: bool,
}

/// View state for the event dashboard.
pub struct Dashboard {
    client: EventsApiClient,
    store: VerificationStore,
    events: Vec<Event>,
    selected_category: Option<String>,
    pending: Option<PendingFeedback>,
}

impl Dashboard {
    pub fn new(client: EventsApiClient, store: VerificationStore) -> Self {
        Self {
            client,
            store,
            events: Vec::new(),
            selected_category: None,
            pending: None,
        }
    }

    /// The verification store backing the feedback gate.
    pub fn store(&self) -> &VerificationStore {
        &self.store
    }

    /// All currently loaded events.
    pub fn events(&self) -> &[Event] {
        &self.events
    }

    /// Replaces the event list wholesale with a fresh page of ongoing
    /// events. A fetch failure leaves the previous list in place and is
    /// surfaced to the caller so the UI can offer a retry.
    pub async fn refresh(&mut self) -> Result<(), ApiError> {
        let events = self.client.list_ongoing(ONGOING_PAGE_SIZE, 0).await?;
        info!(count = events.len(), "event list refreshed");
        self.events = events;
        Ok(())
    }

    /// Fetches resolved events for the history view.
    pub async fn load_resolved(&self) -> Result<Vec<Event>, ApiError> {
        self.client.list_resolved(RESOLVED_PAGE_SIZE, 0).await
    }

    /// Fetches the prediction history for one event.
    pub async fn load_predictions(&self, event_id: &str) -> Result<EventPredictions, ApiError> {
        self.client.get_predictions(event_id).await
    }

    /// Asks the service for a fresh model prediction on one event.
    pub async fn request_prediction(&self, event_id: &str) -> Result<Event, ApiError> {
        self.client.request_prediction(event_id).await
    }

    /// Distinct event categories, sorted for stable display.
    pub fn categories(&self) -> Vec<String> {
        let mut categories: Vec<String> = self
            .events
            .iter()
            .map(|e| e.market_type.clone())
            .filter(|c| !c.is_empty())
            .collect();
        categories.sort();
        categories.dedup();
        categories
    }

    /// Sets the category filter; `None` shows all categories.
    pub fn set_filter(&mut self, category: Option<String>) {
        debug!(?category, "category filter changed");
        self.selected_category = category;
    }

    pub fn selected_category(&self) -> Option<&str> {
        self.selected_category.as_deref()
    }

    /// Events visible under the current filter.
    pub fn filtered_events(&self) -> Vec<&Event> {
        match &self.selected_category {
            Some(category) => self
                .events
                .iter()
                .filter(|e| &e.market_type == category)
                .collect(),
            None => self.events.iter().collect(),
        }
    }

    pub fn find_event(&self, event_id: &str) -> Option<&Event> {
        self.events.iter().find(|e| e.event_id == event_id)
    }

    /// First step of the feedback commit: park an agree/disagree choice.
    ///
    /// Gated on verification; unverified users are rejected here, before
    /// any choice is recorded. A second call replaces the parked choice.
    pub fn begin_feedback(&mut self, event_id: &str, agrees: bool) -> Result<(), FeedbackError> {
        if !self.store.current().is_expert() {
            return Err(FeedbackError::NotVerified);
        }
        if self.find_event(event_id).is_none() {
            return Err(FeedbackError::UnknownEvent(event_id.to_string()));
        }

        self.pending = Some(PendingFeedback {
            event_id: event_id.to_string(),
            agrees,
        });
        Ok(())
    }

    pub fn pending_feedback(&self) -> Option<&PendingFeedback> {
        self.pending.as_ref()
    }

    /// Drops the parked choice without submitting.
    pub fn cancel_feedback(&mut self) -> Option<PendingFeedback> {
        self.pending.take()
    }

    /// Second step of the feedback commit: submit the parked choice.
    ///
    /// The verified profile's email is the submitter identity. Once the
    /// submission resolves, the event list is re-fetched (feedback can
    /// move the displayed probability upstream); a failed re-fetch is
    /// logged and does not mask a successful submission.
    pub async fn confirm_feedback(&mut self) -> Result<bool, FeedbackError> {
        let pending = self.pending.take().ok_or(FeedbackError::NothingPending)?;

        let verification = self.store.current();
        let profile = verification.profile().ok_or(FeedbackError::NotVerified)?;

        let feedback =
            Feedback::new(pending.event_id.clone(), pending.agrees, profile.email.clone())
                .with_weight(1.0);
        let accepted = self.client.submit_feedback(&feedback).await?;

        info!(
            event_id = %pending.event_id,
            agrees = pending.agrees,
            accepted,
            "feedback confirmed"
        );

        if let Err(e) = self.refresh().await {
            warn!(error = %e, "post-feedback refresh failed; event list may be stale");
        }

        Ok(accepted)
    }
}

impl std::fmt::Debug for Dashboard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dashboard")
            .field("events", &self.events.len())
            .field("selected_category", &self.selected_category)
            .field("pending", &self.pending)
            .finish()
    }
}

//! Domain model for forecasting events and their predictions.
//!
//! Upstream payloads are normalized here before any other layer sees them:
//! missing probabilities become the uninformative prior, and the combined
//! description field is split into an explicit question and detail exactly
//! once, at ingestion. Raw API shapes never leave the connectors layer.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Probability assigned to events and predictions that arrive without one.
pub const UNINFORMATIVE_PRIOR: f64 = 0.5;

/// A forecasting event: a binary/probabilistic question with a current
/// probability estimate.
///
/// Read-only from this client's perspective. The full event list is
/// replaced wholesale on every re-fetch.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Event {
    pub event_id: String,
    /// Market/category label, e.g. "Crypto" or "Finance".
    pub market_type: String,
    pub title: String,
    /// The question part of the upstream description, including the `?`.
    pub question: String,
    /// Auxiliary context that followed the question. Empty when the
    /// upstream description carried no extra context.
    pub detail: String,
    /// Unix seconds.
    pub created_at: i64,
    pub start_date: i64,
    pub cutoff: i64,
    pub end_date: i64,
    /// Resolved answer, `None` while the event is still open.
    pub answer: Option<String>,
    pub probability: f64,
    pub status: Option<String>,
}

impl Event {
    /// Returns whether the event has resolved to an answer.
    pub fn is_resolved(&self) -> bool {
        self.answer.is_some()
    }

    /// Returns the cutoff as a UTC timestamp, if it parses.
    pub fn cutoff_time(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.cutoff, 0)
    }

    /// The probability as a display percentage, e.g. 73.0 for 0.73.
    pub fn probability_percent(&self) -> f64 {
        self.probability * 100.0
    }
}

/// Splits an upstream combined description into `(question, detail)`.
///
/// The question is everything up to and including the first `?`. Text
/// after it becomes the detail. A description without a `?` is treated
/// as all question, with an empty detail.
pub fn split_description(description: &str) -> (String, String) {
    match description.find('?') {
        Some(idx) => {
            let (question, rest) = description.split_at(idx + 1);
            (question.trim().to_string(), rest.trim().to_string())
        }
        None => (description.trim().to_string(), String::new()),
    }
}

/// A historical probability estimate recorded for an event.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Prediction {
    pub prediction: f64,
    /// Unix seconds.
    pub timestamp: i64,
    pub expert_id: Option<String>,
}

impl Prediction {
    /// Returns the prediction timestamp as a UTC timestamp, if it parses.
    pub fn time(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.timestamp, 0)
    }
}

/// Prediction history for a single event.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EventPredictions {
    pub count: usize,
    pub predictions: Vec<Prediction>,
}

/// An expert's agree/disagree signal on an event's current probability.
///
/// Write-only: built immediately before submission and not retained
/// afterwards.
#[derive(Debug, Clone)]
pub struct Feedback {
    pub event_id: String,
    pub agrees: bool,
    /// Identity of the submitting expert. Must be non-empty; the client
    /// rejects feedback without it before any network call.
    pub expert_id: String,
    pub expert_weight: Option<f64>,
    pub comment: Option<String>,
}

impl Feedback {
    /// Creates a feedback record with no weight or comment.
    pub fn new(
        event_id: impl Into<String>,
        agrees: bool,
        expert_id: impl Into<String>,
    ) -> Self {
        Self {
            event_id: event_id.into(),
            agrees,
            expert_id: expert_id.into(),
            expert_weight: None,
            comment: None,
        }
    }

    /// Sets the expert weight sent on the local-proxy feedback route.
    pub fn with_weight(mut self, weight: f64) -> Self {
        self.expert_weight = Some(weight);
        self
    }

    /// Attaches a free-text comment.
    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = Some(comment.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_description_with_context() {
        let (question, detail) =
            split_description("Will Bitcoin reach $100,000 by 2025? Based on current trends.");
        assert_eq!(question, "Will Bitcoin reach $100,000 by 2025?");
        assert_eq!(detail, "Based on current trends.");
    }

    #[test]
    fn test_split_description_without_question_mark() {
        let (question, detail) = split_description("Fed cuts rates in Q2");
        assert_eq!(question, "Fed cuts rates in Q2");
        assert!(detail.is_empty());
    }

    #[test]
    fn test_split_description_question_only() {
        let (question, detail) = split_description("Will it rain tomorrow?");
        assert_eq!(question, "Will it rain tomorrow?");
        assert!(detail.is_empty());
    }

    #[test]
    fn test_probability_percent() {
        let event = Event {
            event_id: "e1".to_string(),
            market_type: "Crypto".to_string(),
            title: String::new(),
            question: "Will X happen?".to_string(),
            detail: String::new(),
            created_at: 0,
            start_date: 0,
            cutoff: 1735689600,
            end_date: 0,
            answer: None,
            probability: 0.731,
            status: None,
        };
        assert!((event.probability_percent() - 73.1).abs() < 1e-9);
        assert!(!event.is_resolved());
        assert!(event.cutoff_time().is_some());
    }

    #[test]
    fn test_feedback_builder() {
        let feedback = Feedback::new("e1", true, "expert@example.com")
            .with_weight(1.0)
            .with_comment("agree with the estimate");
        assert_eq!(feedback.event_id, "e1");
        assert!(feedback.agrees);
        assert_eq!(feedback.expert_weight, Some(1.0));
        assert_eq!(feedback.comment.as_deref(), Some("agree with the estimate"));
    }
}

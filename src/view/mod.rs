//! View layer: dashboard state and plain-text rendering.
//!
//! Orchestrates the events client and the verification store. Rendering
//! is deliberately plain text; there is no styling system.

mod dashboard;
pub mod render;

pub use dashboard::{Dashboard, FeedbackError, PendingFeedback};

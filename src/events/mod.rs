//! Domain model for the forecasting dashboard.
//!
//! All upstream API payloads are normalized into these types before
//! being consumed by the view layer. Raw response shapes never drive
//! rendering or feedback logic directly.

mod model;

pub use model::{
    split_description,
    Event,
    EventPredictions,
    Feedback,
    Prediction,
    UNINFORMATIVE_PRIOR,
};

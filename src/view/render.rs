//! Plain-text rendering of event cards and history listings.

use chrono::{DateTime, Utc};

use crate::events::{Event, EventPredictions};

fn format_day(ts: i64) -> String {
    DateTime::<Utc>::from_timestamp(ts, 0)
        .map(|t| t.format("%Y-%m-%d").to_string())
        .unwrap_or_else(|| "unknown".to_string())
}

/// One-line card for the event list.
pub fn event_card(event: &Event) -> String {
    format!(
        "[{}] ({}) {} — {:.1}% (cutoff {})",
        event.event_id,
        if event.market_type.is_empty() {
            "Uncategorized"
        } else {
            &event.market_type
        },
        event.question,
        event.probability_percent(),
        format_day(event.cutoff),
    )
}

/// Multi-line detail view for a single event.
pub fn event_detail(event: &Event) -> String {
    let mut lines = vec![
        format!("Event:       {}", event.event_id),
        format!("Category:    {}", event.market_type),
        format!("Question:    {}", event.question),
    ];
    if !event.detail.is_empty() {
        lines.push(format!("Context:     {}", event.detail));
    }
    lines.push(format!("Prediction:  {:.1}%", event.probability_percent()));
    lines.push(format!("Cutoff:      {}", format_day(event.cutoff)));
    if let Some(status) = &event.status {
        lines.push(format!("Status:      {}", status));
    }
    if let Some(answer) = &event.answer {
        lines.push(format!("Resolved:    {}", answer));
    }
    lines.join("\n")
}

/// Prediction history for one event.
pub fn prediction_history(predictions: &EventPredictions) -> String {
    let mut lines = vec![format!("{} prediction(s)", predictions.count)];
    for p in &predictions.predictions {
        let when = p
            .time()
            .map(|t| t.format("%Y-%m-%d %H:%M").to_string())
            .unwrap_or_else(|| "unknown".to_string());
        let who = p.expert_id.as_deref().unwrap_or("model");
        lines.push(format!("  {:.1}% @ {} by {}", p.prediction * 100.0, when, who));
    }
    lines.join("\n")
}

/// Resolved-events listing for the history view.
pub fn resolved_history(events: &[Event]) -> String {
    if events.is_empty() {
        return "No resolved events.".to_string();
    }
    events
        .iter()
        .map(|e| {
            format!(
                "[{}] {} — predicted {:.1}%, resolved: {}",
                e.event_id,
                e.question,
                e.probability_percent(),
                e.answer.as_deref().unwrap_or("unknown"),
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn event() -> Event {
        Event {
            event_id: "e1".to_string(),
            market_type: "Crypto".to_string(),
            title: String::new(),
            question: "Will BTC reach $100k?".to_string(),
            detail: "Halving is coming.".to_string(),
            created_at: 0,
            start_date: 0,
            cutoff: 1735689600,
            end_date: 0,
            answer: None,
            probability: 0.731,
            status: None,
        }
    }

    #[test]
    fn test_card_shows_question_and_percentage() {
        let card = event_card(&event());
        assert!(card.contains("Will BTC reach $100k?"));
        assert!(card.contains("73.1%"));
        assert!(card.contains("Crypto"));
    }

    #[test]
    fn test_detail_includes_context_when_present() {
        let detail = event_detail(&event());
        assert!(detail.contains("Halving is coming."));

        let mut bare = event();
        bare.detail = String::new();
        assert!(!event_detail(&bare).contains("Context:"));
    }

    #[test]
    fn test_resolved_history_lists_answers() {
        let mut resolved = event();
        resolved.answer = Some("Yes".to_string());
        let listing = resolved_history(&[resolved]);
        assert!(listing.contains("resolved: Yes"));

        assert_eq!(resolved_history(&[]), "No resolved events.");
    }
}

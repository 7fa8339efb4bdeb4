//! Search pipeline primitives
//!
//! Debounced text input with distinct-until-changed, and latest-wins
//! supervision of list requests. Timers live in the UI; these types only
//! decide which value or response is still relevant.

use std::sync::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::core::filter::DeclarationFilter;

/// Quiet period before a typed search is applied
pub const SEARCH_DEBOUNCE_MS: u32 = 300;

/// Identifies one request or one debounced input
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticket(u64);

/// Latest-wins generation counter: only the newest ticket is current
#[derive(Debug, Default)]
pub struct LatestRequest {
    generation: AtomicU64,
}

impl LatestRequest {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new request, making every older ticket stale
    pub fn begin(&self) -> Ticket {
        Ticket(self.generation.fetch_add(1, Ordering::SeqCst) + 1)
    }

    pub fn is_current(&self, ticket: Ticket) -> bool {
        self.generation.load(Ordering::SeqCst) == ticket.0
    }
}

/// Debounce with distinct-until-changed.
///
/// Each keystroke calls [`push`](Self::push); after the quiet period the UI
/// calls [`settle`](Self::settle) with the ticket and current value. Only the
/// last keystroke's ticket settles, and only when the value differs from the
/// last one emitted.
#[derive(Debug)]
pub struct DebouncedInput<T> {
    pending: LatestRequest,
    last_emitted: Mutex<Option<T>>,
}

impl<T> Default for DebouncedInput<T> {
    fn default() -> Self {
        Self {
            pending: LatestRequest::new(),
            last_emitted: Mutex::new(None),
        }
    }
}

impl<T: Clone + PartialEq> DebouncedInput<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed with the value already applied, so settling it again is a no-op
    pub fn with_initial(value: T) -> Self {
        Self {
            pending: LatestRequest::new(),
            last_emitted: Mutex::new(Some(value)),
        }
    }

    pub fn push(&self) -> Ticket {
        self.pending.begin()
    }

    pub fn settle(&self, ticket: Ticket, value: T) -> Option<T> {
        if !self.pending.is_current(ticket) {
            return None;
        }
        let mut last = self
            .last_emitted
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        if last.as_ref() == Some(&value) {
            return None;
        }
        *last = Some(value.clone());
        Some(value)
    }
}

/// Every input of the declaration list, combined into one value.
///
/// Any change (including a reload) produces a new value, which restarts the
/// list request.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterInputs {
    /// Already debounced search text
    pub search: String,
    pub type_label: String,
    pub level_label: String,
    pub date_from: String,
    pub date_to: String,
    /// Bumped to force a reload with unchanged filters
    pub reload: u32,
}

impl FilterInputs {
    pub fn to_filter(&self) -> DeclarationFilter {
        DeclarationFilter::from_inputs(
            &self.search,
            &self.type_label,
            &self.level_label,
            &self.date_from,
            &self.date_to,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::PollutionType;

    #[test]
    fn test_latest_request_wins() {
        let latest = LatestRequest::new();
        let first = latest.begin();
        let second = latest.begin();

        assert!(!latest.is_current(first));
        assert!(latest.is_current(second));
    }

    #[test]
    fn test_only_last_keystroke_settles() {
        let input = DebouncedInput::new();
        let a = input.push();
        let b = input.push();

        assert_eq!(input.settle(a, "pl".to_string()), None);
        assert_eq!(input.settle(b, "plastique".to_string()), Some("plastique".to_string()));
    }

    #[test]
    fn test_distinct_until_changed() {
        let input = DebouncedInput::with_initial(String::new());

        let t = input.push();
        assert_eq!(input.settle(t, String::new()), None);

        let t = input.push();
        assert_eq!(input.settle(t, "eau".to_string()), Some("eau".to_string()));

        // Typing then deleting back to the same text emits nothing
        let t = input.push();
        assert_eq!(input.settle(t, "eau".to_string()), None);
    }

    #[test]
    fn test_reload_changes_combined_inputs() {
        let base = FilterInputs {
            type_label: "Eau".to_string(),
            ..Default::default()
        };
        let reloaded = FilterInputs {
            reload: 1,
            ..base.clone()
        };

        assert_ne!(base, reloaded);
        assert_eq!(base.to_filter(), reloaded.to_filter());
        assert_eq!(base.to_filter().pollution_type, Some(PollutionType::Eau));
    }
}

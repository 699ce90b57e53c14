//! Free-text search over card fields, with input debouncing.

use crate::types::CardItem;
use std::time::Duration;
use tokio::time::Instant;

/// How long search input must stay idle before the term is applied.
pub const SEARCH_DEBOUNCE: Duration = Duration::from_millis(250);

/// Case-insensitive substring match across every field of a card.
pub fn matches_search(card: &CardItem, term: &str) -> bool {
    let needle = term.trim().to_lowercase();
    if needle.is_empty() {
        return true;
    }
    if card.title.to_lowercase().contains(&needle) {
        return true;
    }
    card.fields
        .values()
        .any(|f| f.value.display().to_lowercase().contains(&needle))
}

/// Holds the latest raw search input until it has been idle for
/// [`SEARCH_DEBOUNCE`], so the board is not re-filtered on every keystroke.
#[derive(Debug, Default)]
pub struct SearchDebouncer {
    pending: Option<String>,
    due: Option<Instant>,
}

impl SearchDebouncer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a keystroke's worth of input; restarts the idle timer.
    pub fn submit(&mut self, term: impl Into<String>) {
        self.pending = Some(term.into());
        self.due = Some(Instant::now() + SEARCH_DEBOUNCE);
    }

    /// Whether input is waiting for its idle period to elapse.
    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Release the pending term if its idle period has elapsed by `now`.
    pub fn poll(&mut self, now: Instant) -> Option<String> {
        match self.due {
            Some(due) if now >= due => {
                self.due = None;
                self.pending.take()
            }
            _ => None,
        }
    }

    /// Wait out the idle period and release the pending term.
    pub async fn settled(&mut self) -> Option<String> {
        let due = self.due?;
        tokio::time::sleep_until(due).await;
        self.poll(Instant::now())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::CardValue;

    fn card() -> CardItem {
        CardItem::new("r1", "todo", "Implement user authentication")
            .with_field("notes", "Notes", CardValue::text("OAuth flow pending"))
    }

    #[test]
    fn test_search_matches_case_insensitively() {
        assert!(matches_search(&card(), "auth"));
        assert!(matches_search(&card(), "AUTH"));
        assert!(matches_search(&card(), "oauth"));
        assert!(!matches_search(&card(), "billing"));
    }

    #[test]
    fn test_empty_term_matches_everything() {
        assert!(matches_search(&card(), ""));
        assert!(matches_search(&card(), "   "));
    }

    #[tokio::test(start_paused = true)]
    async fn test_debouncer_releases_after_idle_period() {
        let mut debouncer = SearchDebouncer::new();
        debouncer.submit("au");
        assert!(debouncer.is_pending());

        // Not yet idle long enough
        assert!(debouncer.poll(Instant::now()).is_none());

        tokio::time::advance(SEARCH_DEBOUNCE).await;
        assert_eq!(debouncer.poll(Instant::now()).as_deref(), Some("au"));
        assert!(!debouncer.is_pending());
    }

    #[tokio::test(start_paused = true)]
    async fn test_newer_input_restarts_the_timer() {
        let mut debouncer = SearchDebouncer::new();
        debouncer.submit("au");

        tokio::time::advance(Duration::from_millis(200)).await;
        debouncer.submit("auth");

        // 200ms after the first keystroke, 0ms after the second: nothing due
        assert!(debouncer.poll(Instant::now()).is_none());

        tokio::time::advance(SEARCH_DEBOUNCE).await;
        assert_eq!(debouncer.poll(Instant::now()).as_deref(), Some("auth"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_settled_waits_for_the_deadline() {
        let mut debouncer = SearchDebouncer::new();
        debouncer.submit("auth");
        assert_eq!(debouncer.settled().await.as_deref(), Some("auth"));
        assert!(debouncer.settled().await.is_none());
    }
}

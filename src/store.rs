use std::sync::Arc;

use tokio::sync::watch;

use crate::model::AppEntry;

/// An immutable view of the published entries
pub type FeedSnapshot = Arc<Vec<AppEntry>>;

/// State container holding the feed entries currently published to the screen.
///
/// The list can only be swapped as a whole, every replacement is notified to the subscribers. Clones share the same
/// state.
#[derive(Clone)]
pub struct FeedStore {
    sender: Arc<watch::Sender<FeedSnapshot>>,
}

impl Default for FeedStore {
    fn default() -> Self {
        Self::new()
    }
}

impl FeedStore {
    /// Creates a new, empty store
    pub fn new() -> Self {
        let (sender, _) = watch::channel(FeedSnapshot::default());
        Self {
            sender: Arc::new(sender),
        }
    }

    /// Retrieves the current entries
    pub fn snapshot(&self) -> FeedSnapshot {
        self.sender.borrow().clone()
    }

    /// Replaces the published entries with the given ones, notifying subscribers
    pub fn replace(&self, entries: Vec<AppEntry>) {
        tracing::debug!("Publishing {} feed entries", entries.len());
        self.sender.send_replace(Arc::new(entries));
    }

    /// Subscribes to the store, the receiver observes every further replacement
    pub fn subscribe(&self) -> watch::Receiver<FeedSnapshot> {
        self.sender.subscribe()
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn entry(name: &str) -> AppEntry {
        AppEntry {
            copyright: format!("© {name}"),
            name: name.into(),
            artwork_url: format!("http://x/{name}.png"),
            release_date: String::from("2021-01-01"),
        }
    }

    #[test]
    fn test_new_store_is_empty() {
        let store = FeedStore::new();
        assert!(store.snapshot().is_empty());
    }

    #[test]
    fn test_replace_swaps_the_whole_list() {
        let store = FeedStore::new();
        store.replace(vec![entry("a"), entry("b")]);
        let first = store.snapshot();
        store.replace(vec![entry("c")]);

        // Previous snapshots are untouched
        assert_eq!(first.as_slice(), &[entry("a"), entry("b")]);
        assert_eq!(store.snapshot().as_slice(), &[entry("c")]);
    }

    #[test]
    fn test_clones_share_state() {
        let store = FeedStore::new();
        let other = store.clone();
        other.replace(vec![entry("a")]);
        assert_eq!(store.snapshot().len(), 1);
    }

    #[tokio::test]
    async fn test_subscribers_are_notified() {
        let store = FeedStore::new();
        let mut rx = store.subscribe();
        assert!(!rx.has_changed().unwrap());

        store.replace(vec![entry("a")]);
        rx.changed().await.unwrap();
        assert_eq!(rx.borrow_and_update().as_slice(), &[entry("a")]);
        assert!(!rx.has_changed().unwrap());
    }
}

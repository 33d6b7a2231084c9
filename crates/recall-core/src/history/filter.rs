//! Mode-gated filtering decorator over a backing history store.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::classifier::Classifier;
use crate::error::Result;
use crate::history::store::HistoryStore;

/// Filters an arbitrary backing history store down to human-typed entries.
///
/// Writes are gated twice: by the user-input mode flag, which automation
/// flips off around injected input, and by the content classifier, which
/// catches generated text written while the flag is still on. Reads are a
/// lazy filtered view of the backing store's sequence.
///
/// The wrapper holds a shared reference to the backing store and delegates
/// to it; it never owns the store's lifecycle. It also implements
/// [`HistoryStore`] itself, so it substitutes anywhere a backing store is
/// expected.
///
/// Dropped entries are dropped silently. Only backing-store failures
/// propagate to the caller, untranslated.
pub struct FilteringHistory {
    backing: Arc<dyn HistoryStore>,
    classifier: Classifier,
    user_input_mode: AtomicBool,
}

impl FilteringHistory {
    /// Wraps a backing store with the default classifier.
    ///
    /// The wrapper starts in user-input mode.
    pub fn new(backing: Arc<dyn HistoryStore>) -> Self {
        Self::with_classifier(backing, Classifier::default())
    }

    /// Wraps a backing store with a custom-tuned classifier.
    pub fn with_classifier(backing: Arc<dyn HistoryStore>, classifier: Classifier) -> Self {
        Self {
            backing,
            classifier,
            user_input_mode: AtomicBool::new(true),
        }
    }

    /// Sets whether the next writes are attributable to a human typing at
    /// the prompt.
    ///
    /// Automation must flip this off before injecting input into the shared
    /// channel and restore it afterward, including on failure paths. Prefer
    /// [`FilteringHistory::automated`], which restores the flag on every
    /// exit path.
    pub fn set_user_input_mode(&self, enabled: bool) {
        self.user_input_mode.store(enabled, Ordering::SeqCst);
    }

    /// Reads the current user-input mode.
    pub fn is_user_input_mode(&self) -> bool {
        self.user_input_mode.load(Ordering::SeqCst)
    }

    /// Enters automated mode for the lifetime of the returned guard.
    ///
    /// User-input mode is restored when the guard drops, which covers early
    /// returns, `?` propagation, and unwinding panics.
    pub fn automated(&self) -> AutomatedModeGuard<'_> {
        self.set_user_input_mode(false);
        AutomatedModeGuard { history: self }
    }

    /// Stores one entry if it is attributable to the user.
    ///
    /// Entries written while automation holds the input channel, and entries
    /// whose content classifies as system-generated, are not recorded. User
    /// entries reach the backing store unmodified.
    ///
    /// # Errors
    ///
    /// Only backing-store failures; filtering itself never fails.
    pub fn store_string(&self, entry: &str) -> Result<()> {
        if !self.is_user_input_mode() {
            tracing::debug!("dropping history entry written outside user input mode");
            return Ok(());
        }

        if self.classifier.is_system_generated(entry) {
            tracing::debug!(len = entry.len(), "dropping system-generated history entry");
            return Ok(());
        }

        self.backing.store_string(entry)
    }

    /// Lazily yields the backing store's entries, skipping system-generated
    /// ones.
    ///
    /// Relative order is the backing store's own; `Err` items from the
    /// backing iterator pass through unmodified. Consumers terminate early
    /// by dropping the iterator.
    pub fn load_history_strings(&self) -> Box<dyn Iterator<Item = Result<String>> + Send + '_> {
        let classifier = self.classifier.clone();
        Box::new(
            self.backing
                .load_history_strings()
                .filter(move |item| match item {
                    Ok(entry) => !classifier.is_system_generated(entry),
                    Err(_) => true,
                }),
        )
    }
}

impl HistoryStore for FilteringHistory {
    fn store_string(&self, entry: &str) -> Result<()> {
        FilteringHistory::store_string(self, entry)
    }

    fn load_history_strings(&self) -> Box<dyn Iterator<Item = Result<String>> + Send + '_> {
        FilteringHistory::load_history_strings(self)
    }
}

/// Holds the wrapped history in automated mode until dropped.
///
/// Returned by [`FilteringHistory::automated`].
pub struct AutomatedModeGuard<'a> {
    history: &'a FilteringHistory,
}

impl Drop for AutomatedModeGuard<'_> {
    fn drop(&mut self) {
        self.history.set_user_input_mode(true);
    }
}

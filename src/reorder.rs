//! Client-side reorder protocol: optimistic ordering with debounced persistence.
//!
//! A drag updates the in-memory ordering immediately — the UI never waits on
//! the network — and schedules a persistence call. Further drags inside the
//! debounce window supersede the pending ordering, so only the latest full
//! ordering is ever sent. A failed send keeps the optimistic state and logs
//! the error; the ordering is not retried (at-most-once policy — the data is
//! low-stakes personal bookmarks and the next drag resyncs everything).

use std::time::{Duration, Instant};

use crate::types::settings::SortMode;

/// Default debounce window between the last drag and the persistence call.
pub const REORDER_DEBOUNCE: Duration = Duration::from_millis(1500);

/// Destination for a debounced ordering, typically an HTTP call to
/// `PATCH /links/reorder`.
pub trait ReorderSink {
    fn persist(&mut self, ordered_ids: &[String]) -> Result<(), String>;
}

/// In-memory view of the link grid's ordering and active sort mode.
///
/// Tracks the optimistic ordering, the pending (not yet persisted) ordering,
/// and the sort-mode state machine: any mode flips to `Custom` on a manual
/// drag; all other transitions are explicit user settings actions.
pub struct LinkBoard {
    order: Vec<String>,
    sort_mode: SortMode,
    pending: Option<Vec<String>>,
    deadline: Option<Instant>,
    window: Duration,
}

impl LinkBoard {
    /// Creates a board over the given ordering with the default debounce window.
    pub fn new(order: Vec<String>, sort_mode: SortMode) -> Self {
        Self::with_window(order, sort_mode, REORDER_DEBOUNCE)
    }

    /// Creates a board with a custom debounce window (tests use short windows).
    pub fn with_window(order: Vec<String>, sort_mode: SortMode, window: Duration) -> Self {
        Self {
            order,
            sort_mode,
            pending: None,
            deadline: None,
            window,
        }
    }

    /// Current optimistic ordering.
    pub fn order(&self) -> &[String] {
        &self.order
    }

    /// Active sort mode.
    pub fn sort_mode(&self) -> SortMode {
        self.sort_mode
    }

    /// Ordering scheduled for persistence, if any.
    pub fn pending(&self) -> Option<&[String]> {
        self.pending.as_deref()
    }

    /// Explicit user-selected sort mode change (settings action).
    pub fn set_sort_mode(&mut self, mode: SortMode) {
        self.sort_mode = mode;
    }

    /// Applies a drag from one index to another.
    ///
    /// The in-memory ordering updates immediately, the sort mode flips to
    /// `Custom` as part of the same action, and the debounce timer resets so
    /// this ordering supersedes any pending one. Out-of-range indices are
    /// ignored.
    pub fn drag(&mut self, from: usize, to: usize, now: Instant) {
        if from >= self.order.len() || to >= self.order.len() {
            return;
        }
        let item = self.order.remove(from);
        self.order.insert(to, item);

        // Manual placement makes the persisted positions authoritative again.
        self.sort_mode = SortMode::Custom;

        self.pending = Some(self.order.clone());
        self.deadline = Some(now + self.window);
    }

    /// Replaces the ordering wholesale (e.g. after a fresh list from the
    /// server). Clears any pending persistence.
    pub fn reset(&mut self, order: Vec<String>) {
        self.order = order;
        self.pending = None;
        self.deadline = None;
    }

    /// Sends the pending ordering through the sink if the debounce window has
    /// elapsed. Returns `true` when a send was attempted.
    ///
    /// On sink failure the optimistic ordering is retained and the error is
    /// logged; the ordering is dropped from the pending slot rather than
    /// retried.
    pub fn flush_due<S: ReorderSink>(&mut self, now: Instant, sink: &mut S) -> bool {
        let due = matches!(self.deadline, Some(d) if now >= d);
        if !due {
            return false;
        }

        let Some(ordering) = self.pending.take() else {
            self.deadline = None;
            return false;
        };
        self.deadline = None;

        if let Err(e) = sink.persist(&ordering) {
            tracing::warn!(error = %e, "failed to persist link ordering; keeping optimistic state");
        }
        true
    }
}

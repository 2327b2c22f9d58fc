//! Current-branch broadcast: a cached value plus a registry of subscribers.

use std::sync::Mutex;

use tokio::sync::mpsc::{self, UnboundedSender};
use tokio::task::AbortHandle;
use tokio_stream::wrappers::UnboundedReceiverStream;

use super::model::Branch;

/// Stream of current-branch values handed to one subscriber.
///
/// Ends when the broadcast is closed.
pub type BranchSubscription = UnboundedReceiverStream<Branch>;

#[derive(Default)]
struct State {
    latest: Option<Branch>,
    subscribers: Vec<UnboundedSender<Branch>>,
    seed_claimed: bool,
    seed_task: Option<AbortHandle>,
    closed: bool,
}

impl State {
    fn deliver(&mut self, branch: Branch) -> bool {
        if self.closed {
            return false;
        }
        self.subscribers.retain(|tx| tx.send(branch.clone()).is_ok());
        self.latest = Some(branch);
        true
    }
}

/// Multicasts the most recently known checked-out branch.
///
/// New subscribers first receive the cached value, if any, then every later
/// publication. After [`CurrentBranchBroadcast::close`] existing subscriptions
/// end and new ones finish immediately.
#[derive(Default)]
pub struct CurrentBranchBroadcast {
    state: Mutex<State>,
}

impl CurrentBranchBroadcast {
    /// Creates an open, unseeded broadcast.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a subscriber.
    pub fn subscribe(&self) -> BranchSubscription {
        let (tx, rx) = mpsc::unbounded_channel();
        let mut state = self.state.lock().expect("broadcast lock poisoned");
        if !state.closed {
            if let Some(latest) = &state.latest {
                // The receiver is alive; this cannot fail.
                let _ = tx.send(latest.clone());
            }
            state.subscribers.push(tx);
        }
        UnboundedReceiverStream::new(rx)
    }

    /// Caches `branch` and delivers it to every live subscriber.
    ///
    /// Returns `false` when the broadcast is closed.
    pub fn publish(&self, branch: Branch) -> bool {
        let mut state = self.state.lock().expect("broadcast lock poisoned");
        state.deliver(branch)
    }

    /// Publishes a seed value unless something was already published.
    pub fn publish_seed(&self, branch: Branch) -> bool {
        let mut state = self.state.lock().expect("broadcast lock poisoned");
        state.seed_task = None;
        if state.latest.is_some() {
            return false;
        }
        state.deliver(branch)
    }

    /// The cached value.
    #[must_use]
    pub fn latest(&self) -> Option<Branch> {
        self.state.lock().expect("broadcast lock poisoned").latest.clone()
    }

    /// Claims the one-time seeding slot.
    ///
    /// Returns `true` to exactly one caller while the broadcast is open and
    /// unseeded.
    pub fn claim_seed(&self) -> bool {
        let mut state = self.state.lock().expect("broadcast lock poisoned");
        if state.closed || state.seed_claimed || state.latest.is_some() {
            return false;
        }
        state.seed_claimed = true;
        true
    }

    /// Gives the seeding slot back after a failed seed so a later access retries.
    pub fn release_seed(&self) {
        let mut state = self.state.lock().expect("broadcast lock poisoned");
        state.seed_claimed = false;
        state.seed_task = None;
    }

    /// Keeps the seeding task so closing can abort it.
    pub fn track_seed_task(&self, task: AbortHandle) {
        let mut state = self.state.lock().expect("broadcast lock poisoned");
        if state.closed {
            task.abort();
        } else {
            state.seed_task = Some(task);
        }
    }

    /// Ends every subscription and refuses further publications.
    pub fn close(&self) {
        let mut state = self.state.lock().expect("broadcast lock poisoned");
        state.closed = true;
        state.subscribers.clear();
        if let Some(task) = state.seed_task.take() {
            task.abort();
        }
    }

    /// Whether [`CurrentBranchBroadcast::close`] has run.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.state.lock().expect("broadcast lock poisoned").closed
    }
}

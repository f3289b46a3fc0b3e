//! Undo/redo history with transactional batching
//!
//! [`HistoryManager`] owns the undo and redo stacks of one editing session.
//! Outside a transaction every pushed action becomes its own undo step.
//! Inside a transaction pushes are coalesced into a pending list (see
//! [`update_transaction_actions`]) and only reach the undo stack when the
//! transaction commits, so a whole drag or color scrub undoes in one step.
//!
//! Stack bookkeeping happens under a short synchronous lock and never spans
//! an await. Mirroring to source is handed to a background task in commit
//! order: callers never wait for a write, and a failed write is reported as a
//! [`Notification`] without rolling the stacks back. [`HistoryManager::flush`]
//! waits for the writes handed off so far.

use crate::code::CodeWriter;
use crate::error::{EngineError, Result};
use crate::notify::{Notification, Notifications};
use crate::settings::DEFAULT_HISTORY_LIMIT;
use crate::telemetry::Telemetry;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::sync::{Arc, OnceLock};
use tessera_core::action::{Action, ActionKind};
use tessera_core::identity::IdGenerator;
use tessera_core::inverse::{clean_for_redo, invert};
use tessera_core::merge::update_transaction_actions;
use tokio::sync::{mpsc, oneshot, watch};

/// Whether pushes are being coalesced
#[derive(Debug, Clone, Default, PartialEq, Eq)]
enum TransactionState {
    #[default]
    NotInTransaction,
    InTransaction { actions: Vec<Action> },
}

#[derive(Debug, Default)]
struct HistoryState {
    undo_stack: Vec<Action>,
    redo_stack: Vec<Action>,
    transaction: TransactionState,
}

impl HistoryState {
    fn snapshot(&self) -> HistorySnapshot {
        HistorySnapshot {
            can_undo: !self.undo_stack.is_empty(),
            can_redo: !self.redo_stack.is_empty(),
            undo_len: self.undo_stack.len(),
            redo_len: self.redo_stack.len(),
            in_transaction: matches!(self.transaction, TransactionState::InTransaction { .. }),
        }
    }

    /// Drop the oldest undo entries beyond `limit` (0 = unbounded)
    fn trim(&mut self, limit: usize) {
        if limit > 0 && self.undo_stack.len() > limit {
            let excess = self.undo_stack.len() - limit;
            self.undo_stack.drain(0..excess);
            tracing::debug!(dropped = excess, "Trimmed undo history");
        }
    }
}

/// Work for the source mirroring task
enum MirrorJob {
    Write(Action),
    Flush(oneshot::Sender<()>),
}

/// Write queued actions one at a time, reporting failures as notifications
async fn run_mirror(
    writer: Arc<dyn CodeWriter>,
    notifications: Notifications,
    mut receiver: mpsc::UnboundedReceiver<MirrorJob>,
) {
    while let Some(job) = receiver.recv().await {
        match job {
            MirrorJob::Write(action) => {
                let kind = action.kind();
                if let Err(e) = writer.write(action).await {
                    tracing::warn!(%kind, "Failed to write code: {e:#}");
                    notifications.push(Notification::error(format!(
                        "Failed to write code for {kind}: {e}"
                    )));
                }
            }
            MirrorJob::Flush(done) => {
                let _ = done.send(());
            }
        }
    }
}

/// Observable summary of the history, for enabling undo/redo controls
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistorySnapshot {
    pub can_undo: bool,
    pub can_redo: bool,
    pub undo_len: usize,
    pub redo_len: usize,
    pub in_transaction: bool,
}

/// Persisted form of a session's history
///
/// Open transactions are never persisted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryRecord {
    pub undo_stack: Vec<Action>,
    pub redo_stack: Vec<Action>,
}

/// The undo/redo stacks of one editing session
pub struct HistoryManager {
    state: Mutex<HistoryState>,
    writer: Arc<dyn CodeWriter>,
    mirror: OnceLock<mpsc::UnboundedSender<MirrorJob>>,
    telemetry: Arc<dyn Telemetry>,
    ids: Arc<dyn IdGenerator>,
    notifications: Notifications,
    changes: watch::Sender<HistorySnapshot>,
    limit: usize,
}

impl HistoryManager {
    pub fn new(
        writer: Arc<dyn CodeWriter>,
        telemetry: Arc<dyn Telemetry>,
        ids: Arc<dyn IdGenerator>,
    ) -> Self {
        let (changes, _) = watch::channel(HistorySnapshot::default());
        Self {
            state: Mutex::new(HistoryState::default()),
            writer,
            mirror: OnceLock::new(),
            telemetry,
            ids,
            notifications: Notifications::default(),
            changes,
            limit: DEFAULT_HISTORY_LIMIT,
        }
    }

    /// Keep at most `limit` undo entries (0 = unbounded)
    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }

    /// Report mirroring failures into `notifications`
    pub fn with_notifications(mut self, notifications: Notifications) -> Self {
        self.notifications = notifications;
        self
    }

    pub fn notifications(&self) -> &Notifications {
        &self.notifications
    }

    pub fn id_generator(&self) -> &Arc<dyn IdGenerator> {
        &self.ids
    }

    // ========================================================================
    // Recording
    // ========================================================================

    /// Record an action
    ///
    /// Inside a transaction the action is merged into the pending list.
    /// Otherwise it becomes the new top of the undo stack, the redo stack is
    /// cleared and the action is queued for writing to source.
    ///
    /// Invalid actions are rejected without touching the stacks.
    pub async fn push(&self, action: Action) -> Result<()> {
        let kind = action.kind();
        if let Err(source) = action.validate() {
            tracing::error!(%kind, "Rejected action: {source}");
            return Err(EngineError::InvalidAction { kind, source });
        }

        {
            let mut state = self.state.lock();
            if let TransactionState::InTransaction { actions } = &mut state.transaction {
                update_transaction_actions(actions, action);
                tracing::debug!(%kind, pending = actions.len(), "Merged into transaction");
                return Ok(());
            }
        }

        self.commit_push(action);
        Ok(())
    }

    /// The non-transactional push path
    fn commit_push(&self, action: Action) {
        let kind = action.kind();
        {
            let mut state = self.state.lock();
            state.redo_stack.clear();
            state.undo_stack.push(action.clone());
            state.trim(self.limit);
            tracing::debug!(%kind, undo = state.undo_stack.len(), "Pushed action");
        }
        self.publish();

        self.mirror(action);
        self.telemetry.capture(kind.as_str(), None);
    }

    /// Queue an action to be written to source
    ///
    /// Must be called from within a tokio runtime; the writer task is started
    /// on first use.
    pub(crate) fn mirror(&self, action: Action) {
        let kind = action.kind();
        if self.mirror_sender().send(MirrorJob::Write(action)).is_err() {
            tracing::error!(%kind, "Source writer stopped, change not written");
            self.notifications.push(Notification::error(format!(
                "Failed to write code for {kind}: writer stopped"
            )));
        }
    }

    /// Wait until every write handed off so far has finished
    pub async fn flush(&self) {
        let (done, finished) = oneshot::channel();
        if self.mirror_sender().send(MirrorJob::Flush(done)).is_ok() {
            let _ = finished.await;
        }
    }

    fn mirror_sender(&self) -> &mpsc::UnboundedSender<MirrorJob> {
        self.mirror.get_or_init(|| {
            let (sender, receiver) = mpsc::unbounded_channel();
            tokio::spawn(run_mirror(
                self.writer.clone(),
                self.notifications.clone(),
                receiver,
            ));
            sender
        })
    }

    // ========================================================================
    // Transactions
    // ========================================================================

    /// Begin coalescing pushes
    ///
    /// Starting a transaction while one is open keeps the pending actions.
    pub fn start_transaction(&self) {
        {
            let mut state = self.state.lock();
            if matches!(state.transaction, TransactionState::InTransaction { .. }) {
                tracing::debug!("Transaction already open");
                return;
            }
            state.transaction = TransactionState::InTransaction {
                actions: Vec::new(),
            };
        }
        tracing::debug!("Started transaction");
        self.publish();
    }

    /// Flush the pending actions onto the undo stack, in order
    pub async fn commit_transaction(&self) {
        let pending = {
            let mut state = self.state.lock();
            match std::mem::take(&mut state.transaction) {
                TransactionState::NotInTransaction => return,
                TransactionState::InTransaction { actions } => actions,
            }
        };

        tracing::debug!(actions = pending.len(), "Committing transaction");
        if pending.is_empty() {
            self.publish();
            return;
        }
        for action in pending {
            self.commit_push(action);
        }
    }

    pub fn is_in_transaction(&self) -> bool {
        matches!(
            self.state.lock().transaction,
            TransactionState::InTransaction { .. }
        )
    }

    // ========================================================================
    // Undo / redo
    // ========================================================================

    /// Step back one entry
    ///
    /// Returns the inverse action for the caller to apply, or `None` when
    /// there is nothing to undo. The original action moves to the redo stack.
    pub async fn undo(&self) -> Option<Action> {
        self.commit_transaction().await;

        let inverse = {
            let mut state = self.state.lock();
            let top = state.undo_stack.pop()?;
            let inverse = invert(&top);
            state.redo_stack.push(top);
            tracing::debug!(kind = %inverse.kind(), "Undo");
            inverse
        };
        self.publish();
        Some(inverse)
    }

    /// Step forward one entry
    ///
    /// Returns the forward action (with fresh identities where elements are
    /// recreated) for the caller to apply, or `None` when there is nothing to
    /// redo. The returned action becomes the new undo top.
    pub async fn redo(&self) -> Option<Action> {
        self.commit_transaction().await;

        let forward = {
            let mut state = self.state.lock();
            let top = state.redo_stack.pop()?;
            let forward = clean_for_redo(&top, self.ids.as_ref());
            state.undo_stack.push(forward.clone());
            state.trim(self.limit);
            tracing::debug!(kind = %forward.kind(), "Redo");
            forward
        };
        self.publish();
        Some(forward)
    }

    /// Empty both stacks
    ///
    /// An open transaction is left as it is.
    pub fn clear(&self) {
        {
            let mut state = self.state.lock();
            state.undo_stack.clear();
            state.redo_stack.clear();
        }
        tracing::debug!("Cleared history");
        self.publish();
    }

    // ========================================================================
    // Introspection
    // ========================================================================

    pub fn snapshot(&self) -> HistorySnapshot {
        self.state.lock().snapshot()
    }

    /// Receive a new snapshot after every stack or transaction change
    pub fn subscribe(&self) -> watch::Receiver<HistorySnapshot> {
        self.changes.subscribe()
    }

    pub fn can_undo(&self) -> bool {
        !self.state.lock().undo_stack.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.state.lock().redo_stack.is_empty()
    }

    /// Kind of the action the next undo would revert
    pub fn peek_undo(&self) -> Option<ActionKind> {
        self.state.lock().undo_stack.last().map(Action::kind)
    }

    /// Kind of the action the next redo would reapply
    pub fn peek_redo(&self) -> Option<ActionKind> {
        self.state.lock().redo_stack.last().map(Action::kind)
    }

    /// Copy of the undo stack, oldest first
    pub fn undo_stack(&self) -> Vec<Action> {
        self.state.lock().undo_stack.clone()
    }

    /// Copy of the redo stack, oldest first
    pub fn redo_stack(&self) -> Vec<Action> {
        self.state.lock().redo_stack.clone()
    }

    // ========================================================================
    // Persistence
    // ========================================================================

    /// Export both stacks
    pub fn to_record(&self) -> HistoryRecord {
        let state = self.state.lock();
        HistoryRecord {
            undo_stack: state.undo_stack.clone(),
            redo_stack: state.redo_stack.clone(),
        }
    }

    /// Replace both stacks with a saved record, closing any open transaction
    pub fn restore(&self, record: HistoryRecord) {
        {
            let mut state = self.state.lock();
            state.undo_stack = record.undo_stack;
            state.redo_stack = record.redo_stack;
            state.transaction = TransactionState::NotInTransaction;
            state.trim(self.limit);
            tracing::info!(
                undo = state.undo_stack.len(),
                redo = state.redo_stack.len(),
                "Restored history"
            );
        }
        self.publish();
    }

    fn publish(&self) {
        let snapshot = self.snapshot();
        self.changes.send_replace(snapshot);
    }
}

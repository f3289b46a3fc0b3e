//! The editing session facade

use crate::code::{CodeWriter, WriteQueue};
use crate::colors::{ColorRegistry, ThemeColors};
use crate::dispatch::ActionDispatcher;
use crate::error::Result;
use crate::history::{HistoryManager, HistorySnapshot};
use crate::notify::Notifications;
use crate::settings::EngineSettings;
use crate::surface::SurfaceResolver;
use crate::telemetry::{NoopTelemetry, Telemetry, TracingTelemetry};
use serde_json::json;
use std::sync::Arc;
use tessera_core::action::Action;
use tessera_core::identity::{IdGenerator, RandomIds};
use tokio::sync::{Mutex, watch};

/// One editing session: history plus live dispatch
///
/// `run`, `undo`, `redo` and `commit_transaction` are serialized, so a
/// second request waits until the first has finished dispatching. None of
/// them wait for source writes; use [`Engine::flush`] for that.
pub struct Engine {
    history: HistoryManager,
    dispatcher: ActionDispatcher,
    telemetry: Arc<dyn Telemetry>,
    settings: EngineSettings,
    gate: Mutex<()>,
}

impl Engine {
    /// Start building a session over `frames`, mirroring into `writer`
    pub fn builder(frames: Arc<dyn SurfaceResolver>, writer: Arc<dyn CodeWriter>) -> EngineBuilder {
        EngineBuilder::new(frames, writer)
    }

    // ========================================================================
    // Actions
    // ========================================================================

    /// Record an action and apply it to the live frames
    ///
    /// Invalid actions are rejected before anything changes. Frame failures
    /// are logged and do not undo the recorded entry.
    pub async fn run(&self, action: Action) -> Result<()> {
        let _turn = self.gate.lock().await;

        self.history.push(action.clone()).await?;
        if let Err(e) = self.dispatcher.dispatch(&action).await {
            tracing::error!(kind = %action.kind(), "Failed to apply action: {e}");
        }
        Ok(())
    }

    /// Undo the latest entry
    ///
    /// Returns the applied inverse, or `None` when there was nothing to undo.
    pub async fn undo(&self) -> Option<Action> {
        let _turn = self.gate.lock().await;

        let action = self.history.undo().await?;
        self.apply(&action, "undo").await;
        Some(action)
    }

    /// Redo the latest undone entry
    ///
    /// Returns the applied forward action, or `None` when there was nothing
    /// to redo.
    pub async fn redo(&self) -> Option<Action> {
        let _turn = self.gate.lock().await;

        let action = self.history.redo().await?;
        self.apply(&action, "redo").await;
        Some(action)
    }

    /// Dispatch, mirror and report a history step
    async fn apply(&self, action: &Action, event: &str) {
        let kind = action.kind();
        if let Err(e) = self.dispatcher.dispatch(action).await {
            tracing::error!(%kind, "Failed to {event}: {e}");
        }
        self.history.mirror(action.clone());
        self.telemetry.capture(event, Some(json!({ "type": kind })));
    }

    /// Wait for every queued source write to finish
    pub async fn flush(&self) {
        self.history.flush().await;
    }

    // ========================================================================
    // Transactions
    // ========================================================================

    pub fn start_transaction(&self) {
        self.history.start_transaction();
    }

    pub async fn commit_transaction(&self) {
        let _turn = self.gate.lock().await;
        self.history.commit_transaction().await;
    }

    /// Drop all history, e.g. when the project closes
    pub fn clear(&self) {
        self.history.clear();
        tracing::info!("Session history cleared");
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    pub fn history(&self) -> &HistoryManager {
        &self.history
    }

    pub fn notifications(&self) -> &Notifications {
        self.history.notifications()
    }

    pub fn settings(&self) -> &EngineSettings {
        &self.settings
    }

    pub fn snapshot(&self) -> HistorySnapshot {
        self.history.snapshot()
    }

    pub fn subscribe(&self) -> watch::Receiver<HistorySnapshot> {
        self.history.subscribe()
    }
}

/// Wires an [`Engine`] from its collaborators
pub struct EngineBuilder {
    frames: Arc<dyn SurfaceResolver>,
    writer: Arc<dyn CodeWriter>,
    colors: Arc<dyn ColorRegistry>,
    telemetry: Arc<dyn Telemetry>,
    ids: Arc<dyn IdGenerator>,
    settings: EngineSettings,
}

impl EngineBuilder {
    pub fn new(frames: Arc<dyn SurfaceResolver>, writer: Arc<dyn CodeWriter>) -> Self {
        Self {
            frames,
            writer,
            colors: Arc::new(ThemeColors::new()),
            telemetry: Arc::new(TracingTelemetry),
            ids: Arc::new(RandomIds),
            settings: EngineSettings::default(),
        }
    }

    pub fn colors(mut self, colors: Arc<dyn ColorRegistry>) -> Self {
        self.colors = colors;
        self
    }

    pub fn telemetry(mut self, telemetry: Arc<dyn Telemetry>) -> Self {
        self.telemetry = telemetry;
        self
    }

    pub fn ids(mut self, ids: Arc<dyn IdGenerator>) -> Self {
        self.ids = ids;
        self
    }

    pub fn settings(mut self, settings: EngineSettings) -> Self {
        self.settings = settings;
        self
    }

    /// Build the session
    ///
    /// Inside a tokio runtime, source writes go through a [`WriteQueue`].
    /// Outside one they are written directly.
    pub fn build(self) -> Engine {
        let settings = self.settings;

        let writer: Arc<dyn CodeWriter> = if tokio::runtime::Handle::try_current().is_ok() {
            Arc::new(WriteQueue::new(self.writer, settings.write_spacing()))
        } else {
            tracing::warn!("No tokio runtime, source writes are not queued");
            self.writer
        };

        let telemetry: Arc<dyn Telemetry> = if settings.telemetry_enabled {
            self.telemetry
        } else {
            Arc::new(NoopTelemetry)
        };

        let history = HistoryManager::new(writer, telemetry.clone(), self.ids)
            .with_limit(settings.history_limit)
            .with_notifications(Notifications::with_limit(settings.notification_limit));

        tracing::info!(
            history_limit = settings.history_limit,
            telemetry = settings.telemetry_enabled,
            "Engine ready"
        );

        Engine {
            history,
            dispatcher: ActionDispatcher::new(self.frames, self.colors),
            telemetry,
            settings,
            gate: Mutex::new(()),
        }
    }
}

//! # Tessera Engine
//!
//! The action and history engine of the Tessera visual editor.
//!
//! An [`Engine`] is one editing session. Each user edit is run as an
//! [`Action`](tessera_core::action::Action): it is recorded in the
//! [`HistoryManager`], applied to the live frames by the
//! [`ActionDispatcher`], and mirrored into source files by a
//! [`CodeWriter`]. Undo and redo derive the opposite or forward action from
//! the history and run it through the same pipeline.
//!
//! Every collaborator is injected through [`EngineBuilder`]:
//!
//! - [`SurfaceResolver`] finds the [`LiveSurface`] of a frame
//! - [`CodeWriter`] writes source ([`SourceWriter`] is the stock one)
//! - [`ColorRegistry`] resolves theme colors in style edits
//! - [`Telemetry`] receives usage events
//! - [`IdGenerator`](tessera_core::identity::IdGenerator) mints element ids

pub mod code;
pub mod colors;
pub mod dispatch;
pub mod engine;
pub mod history;
pub mod notify;
pub mod settings;
pub mod surface;
pub mod telemetry;

mod error;

pub use code::{CodeWriter, SourceWriter, WriteQueue};
pub use colors::{ColorRegistry, ThemeColors};
pub use dispatch::ActionDispatcher;
pub use engine::{Engine, EngineBuilder};
pub use error::{DispatchError, EngineError, Result};
pub use history::{HistoryManager, HistoryRecord, HistorySnapshot};
pub use notify::{Notification, NotificationLevel, Notifications};
pub use settings::EngineSettings;
pub use surface::{FrameRegistry, LiveSurface, SurfaceFuture, SurfaceResolver};
pub use telemetry::{NoopTelemetry, Telemetry, TracingTelemetry};

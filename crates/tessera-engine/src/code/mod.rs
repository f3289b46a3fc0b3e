//! Mirroring committed actions into source files
//!
//! The history manager hands every committed action (and every undo/redo
//! result) to a [`CodeWriter`]. [`SourceWriter`] is the stock writer: it
//! turns actions into per-element [`CodeEditRequest`]s, asks a
//! [`SourceTransformer`] to rewrite the affected files, and stores the result
//! through a [`FileStore`]. [`WriteQueue`] serializes writes so that two
//! rewrites of the same file never interleave.

mod queue;
mod request;
mod source;

pub use queue::WriteQueue;
pub use request::{CodeEditRequest, StructureChange, edit_requests};
pub use source::{FileStore, FsFileStore, SourceTransformer, SourceWriter};

use futures::future::BoxFuture;
use tessera_core::action::Action;

/// Mirrors an action's effect into source code
pub trait CodeWriter: Send + Sync {
    fn write(&self, action: Action) -> BoxFuture<'_, anyhow::Result<()>>;
}

//! Writing source files for committed actions

use super::{CodeEditRequest, CodeWriter, edit_requests};
use anyhow::{Context, anyhow, bail};
use futures::future::BoxFuture;
use std::path::{Component, Path, PathBuf};
use std::sync::Arc;
use tessera_core::action::{Action, CodeDiff};

/// Project file access
pub trait FileStore: Send + Sync {
    /// Read a file relative to the project root
    fn read<'a>(&'a self, path: &'a str) -> BoxFuture<'a, anyhow::Result<String>>;

    /// Replace a file relative to the project root
    fn write<'a>(&'a self, path: &'a str, content: String) -> BoxFuture<'a, anyhow::Result<()>>;
}

/// Rewrites source files for a batch of element edits
///
/// This is the parse/patch/print step; it returns one whole-file diff per
/// file it touched.
pub trait SourceTransformer: Send + Sync {
    fn transform(
        &self,
        requests: Vec<CodeEditRequest>,
    ) -> BoxFuture<'_, anyhow::Result<Vec<CodeDiff>>>;
}

/// [`CodeWriter`] backed by a file store and a source transformer
pub struct SourceWriter {
    files: Arc<dyn FileStore>,
    transformer: Arc<dyn SourceTransformer>,
}

impl SourceWriter {
    pub fn new(files: Arc<dyn FileStore>, transformer: Arc<dyn SourceTransformer>) -> Self {
        Self { files, transformer }
    }

    async fn write_diffs(&self, diffs: &[CodeDiff]) -> anyhow::Result<()> {
        for diff in diffs {
            match self.files.read(&diff.path).await {
                Ok(current) if current != diff.original => {
                    tracing::warn!(path = %diff.path, "File changed since the diff was computed, overwriting");
                }
                Ok(_) => {}
                Err(e) => tracing::debug!(path = %diff.path, "Writing new file: {e:#}"),
            }

            self.files
                .write(&diff.path, diff.generated.clone())
                .await
                .with_context(|| format!("Failed to write {}", diff.path))?;
        }
        Ok(())
    }

    async fn write_action(&self, action: Action) -> anyhow::Result<()> {
        if let Action::WriteCode(code) = &action {
            return self.write_diffs(&code.diffs).await;
        }

        let kind = action.kind();
        let requests = edit_requests(&action);
        if requests.is_empty() {
            tracing::debug!(%kind, "Nothing to write");
            return Ok(());
        }

        let diffs = self
            .transformer
            .transform(requests)
            .await
            .with_context(|| format!("Failed to transform source for {kind}"))?;
        if diffs.is_empty() {
            bail!("No code diffs produced for {kind}");
        }

        self.write_diffs(&diffs).await?;
        tracing::debug!(%kind, files = diffs.len(), "Wrote source");
        Ok(())
    }
}

impl CodeWriter for SourceWriter {
    fn write(&self, action: Action) -> BoxFuture<'_, anyhow::Result<()>> {
        Box::pin(self.write_action(action))
    }
}

/// [`FileStore`] over a project directory on disk
#[derive(Debug, Clone)]
pub struct FsFileStore {
    root: PathBuf,
}

impl FsFileStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Resolve a project-relative path, refusing anything outside the root
    fn resolve(&self, path: &str) -> anyhow::Result<PathBuf> {
        let relative = Path::new(path);
        if path.is_empty() {
            return Err(anyhow!("Empty path"));
        }
        for component in relative.components() {
            match component {
                Component::Normal(_) | Component::CurDir => {}
                Component::ParentDir | Component::RootDir | Component::Prefix(_) => {
                    bail!("Path escapes the project root: {path}");
                }
            }
        }
        Ok(self.root.join(relative))
    }

    async fn read_file(&self, path: &str) -> anyhow::Result<String> {
        let full = self.resolve(path)?;
        tokio::fs::read_to_string(&full)
            .await
            .with_context(|| format!("Failed to read {}", full.display()))
    }

    async fn write_file(&self, path: &str, content: String) -> anyhow::Result<()> {
        let full = self.resolve(path)?;
        if let Some(parent) = full.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(&full, content)
            .await
            .with_context(|| format!("Failed to write {}", full.display()))
    }
}

impl FileStore for FsFileStore {
    fn read<'a>(&'a self, path: &'a str) -> BoxFuture<'a, anyhow::Result<String>> {
        Box::pin(self.read_file(path))
    }

    fn write<'a>(&'a self, path: &'a str, content: String) -> BoxFuture<'a, anyhow::Result<()>> {
        Box::pin(self.write_file(path, content))
    }
}

//! Serialized source writes
//!
//! Source rewrites are whole-file, so two writes racing on the same file
//! would lose one of them. The queue runs writes one at a time in
//! submission order on a background task.

use super::CodeWriter;
use anyhow::anyhow;
use futures::future::BoxFuture;
use std::sync::Arc;
use std::time::Duration;
use tessera_core::action::Action;
use tokio::sync::{mpsc, oneshot};
use tokio::time::Instant;

/// A write waiting for its turn
struct Job {
    action: Action,
    respond: oneshot::Sender<anyhow::Result<()>>,
}

/// [`CodeWriter`] that funnels every write through one background task
///
/// Cloning shares the queue. The task ends once every handle is dropped.
/// Must be created inside a tokio runtime.
#[derive(Clone)]
pub struct WriteQueue {
    sender: mpsc::UnboundedSender<Job>,
}

impl WriteQueue {
    /// Wrap `inner`, pausing `spacing` between consecutive writes
    pub fn new(inner: Arc<dyn CodeWriter>, spacing: Duration) -> Self {
        let (sender, receiver) = mpsc::unbounded_channel();
        tokio::spawn(run_queue(inner, receiver, spacing));
        Self { sender }
    }

    async fn submit(&self, action: Action) -> anyhow::Result<()> {
        let (respond, rx) = oneshot::channel();
        self.sender
            .send(Job { action, respond })
            .map_err(|_| anyhow!("Write queue is closed"))?;
        rx.await.map_err(|_| anyhow!("Write queue dropped the request"))?
    }
}

impl CodeWriter for WriteQueue {
    fn write(&self, action: Action) -> BoxFuture<'_, anyhow::Result<()>> {
        Box::pin(self.submit(action))
    }
}

async fn run_queue(
    inner: Arc<dyn CodeWriter>,
    mut receiver: mpsc::UnboundedReceiver<Job>,
    spacing: Duration,
) {
    let mut last_write: Option<Instant> = None;

    while let Some(Job { action, respond }) = receiver.recv().await {
        if let Some(finished) = last_write {
            let ready_at = finished + spacing;
            if ready_at > Instant::now() {
                tokio::time::sleep_until(ready_at).await;
            }
        }

        let kind = action.kind();
        let result = inner.write(action).await;
        if let Err(e) = &result {
            tracing::warn!(%kind, "Queued write failed: {e:#}");
        }
        last_write = Some(Instant::now());

        // The caller may have stopped waiting
        let _ = respond.send(result);
    }

    tracing::debug!("Write queue closed");
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use parking_lot::Mutex;
    use tessera_core::action::{CodeDiff, WriteCodeAction};

    /// Records the order writes complete in, optionally failing some paths
    #[derive(Default)]
    struct Recorder {
        paths: Mutex<Vec<String>>,
    }

    impl CodeWriter for Recorder {
        fn write(&self, action: Action) -> BoxFuture<'_, anyhow::Result<()>> {
            Box::pin(async move {
                let Action::WriteCode(code) = action else {
                    return Ok(());
                };
                let path = code.diffs[0].path.clone();
                tokio::task::yield_now().await;
                if path.starts_with("bad") {
                    return Err(anyhow!("cannot write {path}"));
                }
                self.paths.lock().push(path);
                Ok(())
            })
        }
    }

    fn write_code(path: &str) -> Action {
        Action::WriteCode(WriteCodeAction {
            diffs: vec![CodeDiff::new(path, "", "x")],
        })
    }

    #[tokio::test]
    async fn test_writes_run_in_submission_order() {
        let recorder = Arc::new(Recorder::default());
        let queue = WriteQueue::new(recorder.clone(), Duration::ZERO);

        let writes = ["a", "b", "c"].map(|p| queue.write(write_code(p)));
        for result in futures::future::join_all(writes).await {
            result.unwrap();
        }

        assert_eq!(*recorder.paths.lock(), vec!["a", "b", "c"]);
    }

    #[tokio::test]
    async fn test_each_caller_gets_its_own_result() {
        let queue = WriteQueue::new(Arc::new(Recorder::default()), Duration::ZERO);

        let (good, bad) = tokio::join!(
            queue.write(write_code("good")),
            queue.write(write_code("bad.tsx"))
        );
        assert!(good.is_ok());
        assert!(bad.unwrap_err().to_string().contains("bad.tsx"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_spacing_between_writes() {
        let queue = WriteQueue::new(Arc::new(Recorder::default()), Duration::from_millis(300));

        let start = Instant::now();
        queue.write(write_code("a")).await.unwrap();
        queue.write(write_code("b")).await.unwrap();

        assert!(start.elapsed() >= Duration::from_millis(300));
    }
}

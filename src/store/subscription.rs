// src/store/subscription.rs

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::{error::AppError, models::post::Post, store::PostStore};

/// Live query over the `posts` collection.
///
/// A background task refreshes the ordered list on an interval and pushes
/// whole snapshots into a watch channel; consumers always replace their
/// entire cache with the latest snapshot (last-write-wins from the remote
/// side). A refresh failure is logged and the previous snapshot stands.
///
/// The handle owns the task: `shutdown()` (or dropping the handle) tears
/// the subscription down deterministically.
pub struct PostSubscription {
    rx: watch::Receiver<Vec<Post>>,
    task: JoinHandle<()>,
}

pub fn subscribe_posts(store: Arc<dyn PostStore>, interval: Duration) -> PostSubscription {
    let (tx, rx) = watch::channel(Vec::new());

    let task = tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        loop {
            ticker.tick().await;
            match store.list_posts().await {
                Ok(snapshot) => {
                    tx.send_if_modified(|current| {
                        if *current != snapshot {
                            *current = snapshot;
                            true
                        } else {
                            false
                        }
                    });
                }
                Err(e) => {
                    tracing::warn!("posts refresh failed, keeping last snapshot: {}", e);
                }
            }
        }
    });

    PostSubscription { rx, task }
}

impl PostSubscription {
    /// Most recent snapshot without waiting.
    pub fn latest(&self) -> Vec<Post> {
        self.rx.borrow().clone()
    }

    /// Waits for the next snapshot that differs from the current one.
    pub async fn changed(&mut self) -> Result<Vec<Post>, AppError> {
        self.rx
            .changed()
            .await
            .map_err(|_| AppError::Internal("post subscription closed".to_string()))?;
        Ok(self.rx.borrow_and_update().clone())
    }

    /// Tears the subscription down. Equivalent to dropping the handle,
    /// spelled out for view teardown sites.
    pub fn shutdown(self) {
        drop(self);
    }
}

impl Drop for PostSubscription {
    fn drop(&mut self) {
        self.task.abort();
    }
}

//! Fixed-size worker pool resolving filter list titles
//!
//! A producer feeds every URL into a bounded channel and then closes it.
//! Workers take URLs from the shared receiver until the channel is drained,
//! resolve titles and record them in one shared mapping. Waiting for every
//! worker to finish is the only synchronization point; the mapping is
//! complete once [`TitlePool::enrich`] returns.

use std::sync::{Arc, Mutex};

use futures::future::join_all;
use indicatif::ProgressBar;
use tokio::sync::{mpsc, Mutex as AsyncMutex};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use super::config::PoolConfig;
use super::{resolve_title, TitleMapping};
use crate::app::client::ListSource;

type SharedReceiver = Arc<AsyncMutex<mpsc::Receiver<String>>>;

/// Pool of title workers sharing one list source
pub struct TitlePool {
    source: Arc<dyn ListSource>,
    config: PoolConfig,
    progress: ProgressBar,
}

impl TitlePool {
    /// Create a pool without visible progress
    pub fn new(source: Arc<dyn ListSource>, config: PoolConfig) -> Self {
        Self {
            source,
            config,
            progress: ProgressBar::hidden(),
        }
    }

    /// Report each resolved URL on this progress bar
    pub fn with_progress(mut self, progress: ProgressBar) -> Self {
        self.progress = progress;
        self
    }

    /// Resolve titles for all `urls`
    ///
    /// Every URL that yields a title, declared or derived, appears in the
    /// result. Fetch failures never abort the pool.
    pub async fn enrich(&self, urls: &[String]) -> TitleMapping {
        if urls.is_empty() {
            return TitleMapping::new();
        }

        let worker_count = self.config.effective_workers().max(1);
        let titles = Arc::new(Mutex::new(TitleMapping::new()));

        info!(
            "Resolving titles for {} lists with {} workers",
            urls.len(),
            worker_count
        );
        self.progress.set_length(urls.len() as u64);

        let (tx, rx) = mpsc::channel(self.config.queue_capacity.max(1));
        let rx: SharedReceiver = Arc::new(AsyncMutex::new(rx));

        let handles: Vec<JoinHandle<usize>> = (0..worker_count)
            .map(|worker_id| {
                let worker = TitleWorker {
                    id: worker_id,
                    source: Arc::clone(&self.source),
                    receiver: Arc::clone(&rx),
                    titles: Arc::clone(&titles),
                    progress: self.progress.clone(),
                };
                tokio::spawn(worker.run())
            })
            .collect();

        for url in urls {
            if tx.send(url.clone()).await.is_err() {
                warn!("All title workers stopped before the queue was drained");
                break;
            }
        }
        drop(tx);

        for result in join_all(handles).await {
            match result {
                Ok(resolved) => debug!("Title worker finished after {} lists", resolved),
                Err(e) => warn!("Title worker panicked: {}", e),
            }
        }
        self.progress.finish_and_clear();

        let mapping = match Arc::try_unwrap(titles) {
            Ok(mutex) => mutex.into_inner().unwrap_or_else(|p| p.into_inner()),
            Err(shared) => shared.lock().unwrap_or_else(|p| p.into_inner()).clone(),
        };
        info!("Resolved {} of {} titles", mapping.len(), urls.len());
        mapping
    }
}

struct TitleWorker {
    id: usize,
    source: Arc<dyn ListSource>,
    receiver: SharedReceiver,
    titles: Arc<Mutex<TitleMapping>>,
    progress: ProgressBar,
}

impl TitleWorker {
    /// Process URLs until the channel is closed and empty
    async fn run(self) -> usize {
        let mut processed = 0;
        loop {
            // Hold the receiver lock only while taking the next URL
            let next = self.receiver.lock().await.recv().await;
            let Some(url) = next else {
                break;
            };

            match resolve_title(self.source.as_ref(), &url).await {
                Some(title) => {
                    self.titles
                        .lock()
                        .unwrap_or_else(|p| p.into_inner())
                        .insert(url, title);
                }
                None => debug!("Worker {}: no title for {}", self.id, url),
            }

            processed += 1;
            self.progress.inc(1);
        }
        processed
    }
}

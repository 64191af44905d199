use crate::cache::PageCache;
use crate::classify::{classify, ImageInfo, PageStatus};
use crate::error::Result;
use crate::page_id::PageId;
use crate::provider::Provider;
use futures::future::join_all;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

pub type ProgressCallback = Arc<dyn Fn(usize, String) + Send + Sync>;

/// One classified page: the status plus, for OK pages, the extracted image.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRecord {
    pub page: PageId,
    pub status: PageStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<ImageInfo>,
}

/// Runs fetch + classify over a list of page identifiers.
///
/// Per-page failures (fetch or structure) collapse to the ERROR status so
/// one bad page never aborts a run; only archive- and store-level errors are
/// fatal to the caller.
pub struct Runner {
    cache: Arc<PageCache>,
    image_prefix: String,
    progress_callback: Option<ProgressCallback>,
}

impl Runner {
    pub fn new(cache: Arc<PageCache>, provider: &Provider) -> Self {
        Self {
            cache,
            image_prefix: provider.image_prefix.clone(),
            progress_callback: None,
        }
    }

    pub fn with_progress_callback(mut self, callback: ProgressCallback) -> Self {
        self.progress_callback = Some(callback);
        self
    }

    /// Classify every identifier, in input order. `workers == 1` runs
    /// sequentially; larger counts use a bounded worker pool. Either way the
    /// returned records follow the input sequence, so grouping stays
    /// deterministic across runs.
    pub async fn run(&self, ids: Vec<PageId>, workers: usize) -> Result<Vec<PageRecord>> {
        info!("Classifying {} pages with {} workers", ids.len(), workers);

        let records = if workers <= 1 {
            self.run_sequential(ids).await
        } else {
            self.run_pooled(ids, workers).await?
        };

        let errors = records
            .iter()
            .filter(|r| r.status == PageStatus::Error)
            .count();
        info!("Run complete: {} pages, {} errors", records.len(), errors);

        Ok(records)
    }

    async fn run_sequential(&self, ids: Vec<PageId>) -> Vec<PageRecord> {
        let mut records = Vec::with_capacity(ids.len());
        for id in ids {
            if let Some(ref callback) = self.progress_callback {
                callback(0, id.to_string());
            }
            records.push(classify_one(&self.cache, &self.image_prefix, id).await);
        }
        records
    }

    async fn run_pooled(&self, ids: Vec<PageId>, workers: usize) -> Result<Vec<PageRecord>> {
        let total = ids.len();
        let queue: Arc<Mutex<VecDeque<(usize, PageId)>>> =
            Arc::new(Mutex::new(ids.into_iter().enumerate().collect()));
        let results: Arc<Mutex<Vec<(usize, PageRecord)>>> =
            Arc::new(Mutex::new(Vec::with_capacity(total)));

        let mut handles = Vec::with_capacity(workers);
        for worker_id in 0..workers {
            let cache = self.cache.clone();
            let image_prefix = self.image_prefix.clone();
            let queue = queue.clone();
            let results = results.clone();
            let progress_cb = self.progress_callback.clone();

            handles.push(tokio::spawn(async move {
                debug!("Worker {} started", worker_id);
                loop {
                    let item = {
                        let mut queue = queue.lock().await;
                        queue.pop_front()
                    };
                    let (index, id) = match item {
                        Some(item) => item,
                        // The queue only drains, so an empty pop means done.
                        None => break,
                    };

                    if let Some(ref callback) = progress_cb {
                        callback(worker_id, id.to_string());
                    }

                    let record = classify_one(&cache, &image_prefix, id).await;
                    results.lock().await.push((index, record));
                }
                debug!("Worker {} finished", worker_id);
            }));
        }

        for joined in join_all(handles).await {
            joined?;
        }

        // Completion order depends on the pool; restore input order before
        // anything derives groups from the records.
        let mut indexed = Arc::try_unwrap(results)
            .expect("all workers joined")
            .into_inner();
        indexed.sort_by_key(|(index, _)| *index);

        Ok(indexed.into_iter().map(|(_, record)| record).collect())
    }
}

async fn classify_one(cache: &PageCache, image_prefix: &str, id: PageId) -> PageRecord {
    let html = match cache.get(id.as_str()).await {
        Ok(html) => html,
        Err(e) => {
            warn!("Fetch failed for {}: {}", id, e);
            return PageRecord {
                page: id,
                status: PageStatus::Error,
                image: None,
            };
        }
    };

    match classify(&html, image_prefix) {
        Ok(classification) => PageRecord {
            page: id,
            status: classification.status,
            image: classification.image,
        },
        Err(e) => {
            warn!("Classification failed for {}: {}", id, e);
            PageRecord {
                page: id,
                status: PageStatus::Error,
                image: None,
            }
        }
    }
}

use crate::cache::PageCache;
use crate::classify::PageStatus;
use crate::error::Result;
use crate::page_id::PageId;
use crate::provider::Provider;
use crate::run::PageRecord;
use std::fs;
use std::path::PathBuf;
use tracing::{debug, info, warn};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DownloadOutcome {
    Downloaded(PathBuf),
    /// File was already on disk and `overwrite` was off.
    SkippedExisting(PathBuf),
    Failed(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadResult {
    pub page: PageId,
    pub outcome: DownloadOutcome,
}

impl DownloadResult {
    pub fn status(&self) -> PageStatus {
        match self.outcome {
            DownloadOutcome::Failed(_) => PageStatus::ErrorDownloading,
            _ => PageStatus::Ok,
        }
    }
}

/// Download the image of every OK record into the provider's image
/// directory, sequentially. Existing files are kept unless `overwrite` is
/// set; a failed download is recorded per page and never aborts the pass.
pub async fn download_images(
    cache: &PageCache,
    provider: &Provider,
    records: &[PageRecord],
    overwrite: bool,
) -> Result<Vec<DownloadResult>> {
    let img_dir = provider.img_dir();
    fs::create_dir_all(&img_dir)?;

    let mut results = Vec::new();
    for record in records {
        let image = match &record.image {
            Some(image) => image,
            None => continue,
        };

        let file_name = image.href.rsplit('/').next().unwrap_or(&image.href);
        let target = img_dir.join(file_name);

        if !overwrite && target.is_file() {
            debug!("Skipping {} (exists on FS)", target.display());
            results.push(DownloadResult {
                page: record.page.clone(),
                outcome: DownloadOutcome::SkippedExisting(target),
            });
            continue;
        }

        let outcome = match fetch_image(cache, provider, &image.href, &target).await {
            Ok(len) => {
                info!("Downloaded {} ({} bytes)", target.display(), len);
                DownloadOutcome::Downloaded(target)
            }
            Err(e) => {
                warn!("Download failed for {}: {}", record.page, e);
                DownloadOutcome::Failed(e.to_string())
            }
        };
        results.push(DownloadResult {
            page: record.page.clone(),
            outcome,
        });
    }

    Ok(results)
}

async fn fetch_image(
    cache: &PageCache,
    provider: &Provider,
    href: &str,
    target: &std::path::Path,
) -> Result<usize> {
    let url = provider.resolve(href)?;
    let response = cache.client().get(&url).send().await?;
    let status = response.status();
    if !status.is_success() {
        return Err(crate::error::ScrapeError::Fetch {
            url,
            status: status.as_u16(),
        });
    }
    let bytes = response.bytes().await?;
    fs::write(target, &bytes)?;
    Ok(bytes.len())
}

use serde::{Deserialize, Serialize};
use skywall_scraper::classify::{ImageInfo, PageStatus};
use skywall_scraper::page_id::PageId;
use skywall_scraper::provider::Provider;
use skywall_scraper::run::PageRecord;
use std::fs;
use std::path::PathBuf;
use thiserror::Error;
use tracing::info;

pub const STATUS_FILE: &str = "STATUS.json";
pub const GROUPS_FILE: &str = "STATUS_GROUPS.json";
pub const IMAGES_FILE: &str = "IMAGES.json";

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, StoreError>;

/// One row of the persisted status map.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusEntry {
    pub page: PageId,
    pub status: PageStatus,
}

/// One group of the persisted group map: every page sharing a status, in
/// the order the status map assigned it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusGroup {
    pub status: PageStatus,
    pub pages: Vec<PageId>,
}

/// Image metadata for one OK page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageEntry {
    pub page: PageId,
    pub image: ImageInfo,
}

/// Persisted status/group maps under `<cache_root>/<short_name>/`.
///
/// Every save fully overwrites the previous run; page content never changes
/// once published, so there is no merge path. Entry lists are written in
/// run order, which keeps the persisted bytes identical across runs over
/// unchanged caches.
pub struct StatusStore {
    data_dir: PathBuf,
    page_dir: PathBuf,
}

impl StatusStore {
    pub fn new(provider: &Provider) -> Self {
        Self {
            data_dir: provider.data_dir(),
            page_dir: provider.page_dir(),
        }
    }

    pub fn status_path(&self) -> PathBuf {
        self.data_dir.join(STATUS_FILE)
    }

    pub fn groups_path(&self) -> PathBuf {
        self.data_dir.join(GROUPS_FILE)
    }

    pub fn images_path(&self) -> PathBuf {
        self.data_dir.join(IMAGES_FILE)
    }

    /// Where the raw page for `id` lives on disk. Part of the surface the
    /// gallery layer consumes.
    pub fn cached_page_path(&self, id: &PageId) -> PathBuf {
        self.page_dir.join(id.as_str())
    }

    /// Persist a full run, replacing whatever a previous run wrote.
    pub fn save(&self, records: &[PageRecord]) -> Result<()> {
        fs::create_dir_all(&self.data_dir)?;

        let statuses: Vec<StatusEntry> = records
            .iter()
            .map(|r| StatusEntry {
                page: r.page.clone(),
                status: r.status,
            })
            .collect();
        let groups = group_records(records);
        let images: Vec<ImageEntry> = records
            .iter()
            .filter_map(|r| {
                r.image.as_ref().map(|image| ImageEntry {
                    page: r.page.clone(),
                    image: image.clone(),
                })
            })
            .collect();

        fs::write(self.status_path(), serde_json::to_vec_pretty(&statuses)?)?;
        fs::write(self.groups_path(), serde_json::to_vec_pretty(&groups)?)?;
        fs::write(self.images_path(), serde_json::to_vec_pretty(&images)?)?;

        info!(
            "Persisted {} statuses in {} groups to {}",
            statuses.len(),
            groups.len(),
            self.data_dir.display()
        );
        Ok(())
    }

    pub fn load_status(&self) -> Result<Vec<StatusEntry>> {
        let bytes = fs::read(self.status_path())?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    pub fn load_groups(&self) -> Result<Vec<StatusGroup>> {
        let bytes = fs::read(self.groups_path())?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    pub fn load_images(&self) -> Result<Vec<ImageEntry>> {
        let bytes = fs::read(self.images_path())?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    /// Ordered identifiers sharing `status`. Part of the surface the
    /// gallery layer consumes; an absent group is an empty list.
    pub fn list(&self, status: PageStatus) -> Result<Vec<PageId>> {
        let groups = self.load_groups()?;
        Ok(groups
            .into_iter()
            .find(|g| g.status == status)
            .map(|g| g.pages)
            .unwrap_or_default())
    }
}

/// Group records by status. Groups appear in first-assignment order and
/// each group's pages keep the status map's order, so the result is a
/// deterministic function of the input sequence.
pub fn group_records(records: &[PageRecord]) -> Vec<StatusGroup> {
    let mut groups: Vec<StatusGroup> = Vec::new();
    for record in records {
        match groups.iter_mut().find(|g| g.status == record.status) {
            Some(group) => group.pages.push(record.page.clone()),
            None => groups.push(StatusGroup {
                status: record.status,
                pages: vec![record.page.clone()],
            }),
        }
    }
    groups
}

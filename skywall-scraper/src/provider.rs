use crate::error::{Result, ScrapeError};
use crate::page_id::PageId;
use std::path::{Path, PathBuf};
use url::Url;

/// Configuration for one image source.
///
/// Constructed once and passed to each component; there is no process-wide
/// provider state.
#[derive(Debug, Clone)]
pub struct Provider {
    /// Directory name under the cache root, e.g. `apod`.
    pub short_name: String,
    /// Base URL every page and image path is joined against.
    pub base_url: String,
    pub archive_name: String,
    pub full_archive_name: String,
    /// Hrefs outside this prefix never point at a usable wallpaper.
    pub image_prefix: String,
    pub cache_root: PathBuf,
}

impl Provider {
    pub fn apod(cache_root: impl AsRef<Path>) -> Self {
        Provider {
            short_name: "apod".to_string(),
            base_url: "https://apod.nasa.gov/apod/".to_string(),
            archive_name: "archivepix.html".to_string(),
            full_archive_name: "archivepixFull.html".to_string(),
            image_prefix: "image/".to_string(),
            cache_root: cache_root.as_ref().to_path_buf(),
        }
    }

    pub fn data_dir(&self) -> PathBuf {
        self.cache_root.join(&self.short_name)
    }

    pub fn page_dir(&self) -> PathBuf {
        self.data_dir().join("pages")
    }

    pub fn img_dir(&self) -> PathBuf {
        self.data_dir().join("imgs")
    }

    pub fn page_url(&self, name: &str) -> String {
        format!("{}{}", self.base_url, name)
    }

    pub fn page_path(&self, id: &PageId) -> PathBuf {
        self.page_dir().join(id.as_str())
    }

    /// Resolve a relative image href against the base URL.
    pub fn resolve(&self, href: &str) -> Result<String> {
        let base = Url::parse(&self.base_url)
            .map_err(|e| ScrapeError::Parse(format!("bad base URL {}: {}", self.base_url, e)))?;
        let resolved = base
            .join(href)
            .map_err(|e| ScrapeError::Parse(format!("bad href {}: {}", href, e)))?;
        Ok(resolved.to_string())
    }
}

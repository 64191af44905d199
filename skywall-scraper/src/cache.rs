use crate::error::{Result, ScrapeError};
use crate::provider::Provider;
use reqwest::Client;
use std::fs;
use std::path::PathBuf;
use tracing::{debug, info};

/// Write-once on-disk store of raw fetched pages.
///
/// A file present under the page directory is authoritative: the source is
/// static historical content, so cached entries are never re-fetched or
/// invalidated. Bytes that are not valid UTF-8 are replaced during decoding
/// rather than surfaced as errors.
pub struct PageCache {
    client: Client,
    base_url: String,
    page_dir: PathBuf,
}

impl PageCache {
    pub fn new(provider: &Provider) -> Self {
        Self::with_timeout(provider, 10)
    }

    pub fn with_timeout(provider: &Provider, timeout_secs: u64) -> Self {
        let client = Client::builder()
            .user_agent("Skywall/0.2 (https://github.com/skywall-project/skywall)")
            .timeout(std::time::Duration::from_secs(timeout_secs))
            .connect_timeout(std::time::Duration::from_secs(timeout_secs.div_ceil(2)))
            .redirect(reqwest::redirect::Policy::limited(5))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            client,
            base_url: provider.base_url.clone(),
            page_dir: provider.page_dir(),
        }
    }

    pub fn path_for(&self, name: &str) -> PathBuf {
        self.page_dir.join(name)
    }

    /// Return the decoded text of `name`, fetching and caching it on a miss.
    pub async fn get(&self, name: &str) -> Result<String> {
        let path = self.path_for(name);
        if path.is_file() {
            debug!("Cache hit for {}", name);
            let bytes = fs::read(&path)?;
            return Ok(String::from_utf8_lossy(&bytes).into_owned());
        }

        let url = format!("{}{}", self.base_url, name);
        debug!("Cache miss for {}, fetching {}", name, url);

        let response = self.client.get(&url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(ScrapeError::Fetch {
                url,
                status: status.as_u16(),
            });
        }

        let bytes = response.bytes().await?;
        fs::create_dir_all(&self.page_dir)?;
        fs::write(&path, &bytes)?;
        info!("Cached {} ({} bytes)", name, bytes.len());

        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }

    pub(crate) fn client(&self) -> &Client {
        &self.client
    }
}

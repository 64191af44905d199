pub mod archive;
pub mod cache;
pub mod classify;
pub mod download;
pub mod error;
pub mod page_id;
pub mod provider;
pub mod run;

pub use cache::PageCache;
pub use classify::{Classification, ImageInfo, PageStatus};
pub use error::ScrapeError;
pub use page_id::PageId;
pub use provider::Provider;
pub use run::PageRecord;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ScrapeError {
    #[error("fetch of {url} returned HTTP {status}")]
    Fetch { url: String, status: u16 },

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("unexpected page structure: {0}")]
    Structure(String),

    #[error("archive parse error: {0}")]
    Parse(String),

    #[error("invalid page name: {0}")]
    PageName(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("task join error: {0}")]
    Join(#[from] tokio::task::JoinError),
}

pub type Result<T> = std::result::Result<T, ScrapeError>;

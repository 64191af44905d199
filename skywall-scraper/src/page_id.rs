use crate::error::{Result, ScrapeError};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// strftime pattern shared by day-page URLs and cache file names.
pub const PAGE_NAME_FORMAT: &str = "ap%y%m%d.html";

/// Identifier of one day page, e.g. `ap230401.html` for 2023-04-01.
///
/// The mapping between identifiers and dates is a bijection: chrono's `%y`
/// puts two-digit years 00-68 in the 2000s and 69-99 in the 1900s, which
/// covers the archive's full range.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PageId(String);

impl PageId {
    pub fn new(name: impl Into<String>) -> Self {
        PageId(name.into())
    }

    pub fn from_date(date: NaiveDate) -> Self {
        PageId(date.format(PAGE_NAME_FORMAT).to_string())
    }

    /// Inverse of [`PageId::from_date`]. Fails for names that are not
    /// well-formed day-page identifiers.
    pub fn date(&self) -> Result<NaiveDate> {
        NaiveDate::parse_from_str(&self.0, PAGE_NAME_FORMAT)
            .map_err(|e| ScrapeError::PageName(format!("{}: {}", self.0, e)))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for PageId {
    fn from(name: &str) -> Self {
        PageId(name.to_string())
    }
}

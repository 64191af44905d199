use crate::cache::PageCache;
use crate::error::{Result, ScrapeError};
use crate::page_id::PageId;
use crate::provider::Provider;
use scraper::{Html, Selector};
use tracing::info;

/// Fetch the archive index through the cache and return its day pages in
/// document order. `full` selects the complete historical index over the
/// recent one; both parse the same way.
pub async fn list_pages(cache: &PageCache, provider: &Provider, full: bool) -> Result<Vec<PageId>> {
    let name = if full {
        &provider.full_archive_name
    } else {
        &provider.archive_name
    };

    let html = cache.get(name).await?;
    let pages = parse_archive(&html)?;
    info!("Archive {} lists {} pages", name, pages.len());
    Ok(pages)
}

/// The archive lists every day page as a first-level bold link directly
/// under the body. An index without that region is unrecognized and fatal.
pub fn parse_archive(html: &str) -> Result<Vec<PageId>> {
    let document = Html::parse_document(html);
    let selector = Selector::parse("body > b > a[href]").unwrap();

    let pages: Vec<PageId> = document
        .select(&selector)
        .filter_map(|element| element.value().attr("href"))
        .map(PageId::from)
        .collect();

    if pages.is_empty() {
        return Err(ScrapeError::Parse(
            "no first-level bold links under the archive body".to_string(),
        ));
    }

    Ok(pages)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_preserves_document_order() {
        let html = r#"<html><body><b>
            <a href="ap230402.html">April 2</a><br>
            <a href="ap230401.html">April 1</a><br>
            <a href="ap230331.html">March 31</a><br>
        </b></body></html>"#;

        let pages = parse_archive(html).unwrap();
        assert_eq!(
            pages,
            vec![
                PageId::new("ap230402.html"),
                PageId::new("ap230401.html"),
                PageId::new("ap230331.html"),
            ]
        );
    }

    #[test]
    fn test_links_outside_bold_region_are_ignored() {
        let html = r#"<html><body>
            <p><a href="lib/about.html">About</a></p>
            <b><a href="ap230401.html">April 1</a></b>
        </body></html>"#;

        let pages = parse_archive(html).unwrap();
        assert_eq!(pages, vec![PageId::new("ap230401.html")]);
    }

    #[test]
    fn test_missing_region_is_parse_error() {
        let err = parse_archive("<html><body><p>nothing here</p></body></html>").unwrap_err();
        assert!(matches!(err, ScrapeError::Parse(_)));
    }
}

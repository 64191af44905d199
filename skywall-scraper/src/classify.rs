use crate::error::{Result, ScrapeError};
use scraper::{ElementRef, Html, Selector};
use serde::{Deserialize, Serialize};

/// Outcome tag assigned to one day page.
///
/// The integer codes are the values persisted to the status database. The
/// enumeration is flat: skip-like variants are terminal classifications,
/// not refinements of a generic skip.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PageStatus {
    Unprocessed,
    Ok,
    /// Horizontal page layout, meaning a portrait image we can't use.
    Horizontal,
    /// Legacy page layout; those images are too small for wallpapers.
    Old,
    Gif,
    Video,
    Skip,
    Iframe,
    Object,
    Embed,
    Applet,
    Error,
    ErrorDownloading,
}

impl PageStatus {
    pub fn code(&self) -> u16 {
        match self {
            PageStatus::Unprocessed => 0,
            PageStatus::Ok => 1,
            PageStatus::Horizontal => 2,
            PageStatus::Old => 3,
            PageStatus::Gif => 4,
            PageStatus::Video => 5,
            PageStatus::Skip => 6,
            PageStatus::Iframe => 10,
            PageStatus::Object => 11,
            PageStatus::Embed => 12,
            PageStatus::Applet => 13,
            PageStatus::Error => 100,
            PageStatus::ErrorDownloading => 101,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PageStatus::Unprocessed => "UNPROCESSED",
            PageStatus::Ok => "OK",
            PageStatus::Horizontal => "HORIZONTAL",
            PageStatus::Old => "OLD",
            PageStatus::Gif => "GIF",
            PageStatus::Video => "VIDEO",
            PageStatus::Skip => "SKIP",
            PageStatus::Iframe => "IFRAME",
            PageStatus::Object => "OBJECT",
            PageStatus::Embed => "EMBED",
            PageStatus::Applet => "APPLET",
            PageStatus::Error => "ERROR",
            PageStatus::ErrorDownloading => "ERROR_DOWNLOADING",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_uppercase().as_str() {
            "UNPROCESSED" => Some(PageStatus::Unprocessed),
            "OK" => Some(PageStatus::Ok),
            "HORIZONTAL" => Some(PageStatus::Horizontal),
            "OLD" => Some(PageStatus::Old),
            "GIF" => Some(PageStatus::Gif),
            "VIDEO" => Some(PageStatus::Video),
            "SKIP" => Some(PageStatus::Skip),
            "IFRAME" => Some(PageStatus::Iframe),
            "OBJECT" => Some(PageStatus::Object),
            "EMBED" => Some(PageStatus::Embed),
            "APPLET" => Some(PageStatus::Applet),
            "ERROR" => Some(PageStatus::Error),
            "ERROR_DOWNLOADING" => Some(PageStatus::ErrorDownloading),
            _ => None,
        }
    }
}

/// Image metadata extracted from an OK page. Only `href` is guaranteed;
/// title, credit and explanation are best-effort enrichment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageInfo {
    pub href: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub credit: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub explanation: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classification {
    pub status: PageStatus,
    /// Present exactly when `status == PageStatus::Ok`.
    pub image: Option<ImageInfo>,
}

impl Classification {
    fn skipped(status: PageStatus) -> Self {
        Classification {
            status,
            image: None,
        }
    }
}

/// Result of the structural skip checks that precede link extraction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipCheck {
    NotSkipped,
    Skipped(PageStatus),
}

const VIDEO_EXTENSIONS: &[&str] = &["mp4", "mov", "mpg", "wmv"];
const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png"];

fn selector(css: &str) -> Selector {
    // All selectors in this module are fixed literals.
    Selector::parse(css).unwrap()
}

/// Expect exactly one match for `css` under `scope`. Zero or many matches
/// mean the page doesn't follow the layout this branch was tuned for.
fn select_one<'a>(scope: ElementRef<'a>, css: &str) -> Result<ElementRef<'a>> {
    let sel = selector(css);
    let mut matches = scope.select(&sel);
    let first = matches
        .next()
        .ok_or_else(|| ScrapeError::Structure(format!("no match for `{}`", css)))?;
    if matches.next().is_some() {
        return Err(ScrapeError::Structure(format!(
            "more than one match for `{}`",
            css
        )));
    }
    Ok(first)
}

/// Structural checks for layouts without a usable static image, in the
/// priority order the archive's history dictates.
pub fn should_skip(document: &Html) -> Result<SkipCheck> {
    // Legacy format predating the centered layout.
    if document.select(&selector("body > center")).next().is_none() {
        return Ok(SkipCheck::Skipped(PageStatus::Old));
    }

    // A table at the top level is the horizontal layout.
    if document.select(&selector("body > table")).next().is_some() {
        return Ok(SkipCheck::Skipped(PageStatus::Horizontal));
    }

    let lead = lead_paragraph(document)?;
    for (css, status) in [
        ("iframe", PageStatus::Iframe),
        ("object", PageStatus::Object),
        ("embed", PageStatus::Embed),
        ("applet", PageStatus::Applet),
    ] {
        if lead.select(&selector(css)).next().is_some() {
            return Ok(SkipCheck::Skipped(status));
        }
    }

    Ok(SkipCheck::NotSkipped)
}

/// Classify one day page's markup.
///
/// Ordered decision chain, first match wins: legacy layout, horizontal
/// layout, embedded non-static content, then the lead anchor's href decides
/// between GIF, VIDEO, SKIP and OK. Structure errors propagate; the
/// orchestrator downgrades them to ERROR per page.
pub fn classify(html: &str, image_prefix: &str) -> Result<Classification> {
    let document = Html::parse_document(html);

    if let SkipCheck::Skipped(status) = should_skip(&document)? {
        return Ok(Classification::skipped(status));
    }

    let lead = lead_paragraph(&document)?;
    let anchor = select_one(lead, "a[href]")?;
    let href = anchor
        .value()
        .attr("href")
        .expect("selector guarantees an href")
        .to_string();

    let extension = href.rsplit('.').next().unwrap_or("").to_lowercase();
    if extension == "gif" {
        return Ok(Classification::skipped(PageStatus::Gif));
    }
    if VIDEO_EXTENSIONS.contains(&extension.as_str()) {
        return Ok(Classification::skipped(PageStatus::Video));
    }
    if !IMAGE_EXTENSIONS.contains(&extension.as_str()) {
        return Ok(Classification::skipped(PageStatus::Skip));
    }
    if !href.starts_with(image_prefix) {
        return Ok(Classification::skipped(PageStatus::Skip));
    }

    Ok(Classification {
        status: PageStatus::Ok,
        image: Some(ImageInfo {
            href,
            title: extract_title(&document),
            credit: None,
            explanation: None,
        }),
    })
}

/// Last paragraph of the lead block, where the image link historically
/// lives.
fn lead_paragraph(document: &Html) -> Result<ElementRef<'_>> {
    let root = document.root_element();
    select_one(root, "body > center:first-child > p:last-child")
}

/// Best-effort: the title is the first bold run of the second centered
/// block. Pages that deviate simply get no title.
fn extract_title(document: &Html) -> Option<String> {
    let center = document.select(&selector("body > center")).nth(1)?;
    let bold = center.select(&selector("b")).next()?;
    let text = bold.text().collect::<String>().trim().to_string();
    if text.is_empty() {
        None
    } else {
        Some(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PREFIX: &str = "image/";

    fn day_page(lead_extra: &str, href: &str) -> String {
        format!(
            r#"<html><body>
            <center>
                <p>Astronomy Picture of the Day</p>
                <p>{}<a href="{}"><img src="thumb.jpg"></a></p>
            </center>
            <center><b> A Galaxy Far Away </b><br>Credit: Someone</center>
            <p><b>Explanation:</b> words</p>
            </body></html>"#,
            lead_extra, href
        )
    }

    #[test]
    fn test_no_center_block_is_old() {
        let html = "<html><body><p><a href='image/x.jpg'>x</a></p></body></html>";
        let c = classify(html, PREFIX).unwrap();
        assert_eq!(c.status, PageStatus::Old);
        assert!(c.image.is_none());
    }

    #[test]
    fn test_top_level_table_is_horizontal() {
        let html = r#"<html><body>
            <center><p><a href="image/x.jpg">x</a></p></center>
            <table><tr><td>side by side</td></tr></table>
        </body></html>"#;
        let c = classify(html, PREFIX).unwrap();
        assert_eq!(c.status, PageStatus::Horizontal);
    }

    #[test]
    fn test_iframe_wins_regardless_of_other_content() {
        let html = day_page("<iframe src=\"player.html\"></iframe>", "image/x.jpg");
        let c = classify(&html, PREFIX).unwrap();
        assert_eq!(c.status, PageStatus::Iframe);
        assert!(c.image.is_none());
    }

    #[test]
    fn test_embedded_content_priority_order() {
        // iframe outranks embed when both are present.
        let html = day_page(
            "<iframe src=\"a.html\"></iframe><embed src=\"b.swf\">",
            "image/x.jpg",
        );
        assert_eq!(classify(&html, PREFIX).unwrap().status, PageStatus::Iframe);

        let html = day_page("<embed src=\"b.swf\">", "image/x.jpg");
        assert_eq!(classify(&html, PREFIX).unwrap().status, PageStatus::Embed);

        let html = day_page("<applet code=\"orbit\"></applet>", "image/x.jpg");
        assert_eq!(classify(&html, PREFIX).unwrap().status, PageStatus::Applet);

        let html = day_page("<object data=\"movie\"></object>", "image/x.jpg");
        assert_eq!(classify(&html, PREFIX).unwrap().status, PageStatus::Object);
    }

    #[test]
    fn test_gif_href_is_gif() {
        let html = day_page("", "image/anim.gif");
        assert_eq!(classify(&html, PREFIX).unwrap().status, PageStatus::Gif);
    }

    #[test]
    fn test_video_extensions() {
        for ext in ["mp4", "mov", "mpg", "wmv"] {
            let html = day_page("", &format!("image/clip.{}", ext));
            assert_eq!(
                classify(&html, PREFIX).unwrap().status,
                PageStatus::Video,
                "extension {}",
                ext
            );
        }
    }

    #[test]
    fn test_unknown_extension_is_skip() {
        let html = day_page("", "image/readme.txt");
        assert_eq!(classify(&html, PREFIX).unwrap().status, PageStatus::Skip);
    }

    #[test]
    fn test_href_outside_image_prefix_is_skip() {
        let html = day_page("", "calendar/allyears.jpg");
        assert_eq!(classify(&html, PREFIX).unwrap().status, PageStatus::Skip);
    }

    #[test]
    fn test_good_page_is_ok_with_href() {
        let html = day_page("", "image/foo.jpg");
        let c = classify(&html, PREFIX).unwrap();
        assert_eq!(c.status, PageStatus::Ok);
        let image = c.image.unwrap();
        assert_eq!(image.href, "image/foo.jpg");
        assert_eq!(image.title.as_deref(), Some("A Galaxy Far Away"));
    }

    #[test]
    fn test_title_is_best_effort() {
        let html = r#"<html><body>
            <center><p>header</p><p><a href="image/foo.png">x</a></p></center>
        </body></html>"#;
        let c = classify(html, PREFIX).unwrap();
        assert_eq!(c.status, PageStatus::Ok);
        assert_eq!(c.image.unwrap().title, None);
    }

    #[test]
    fn test_two_anchors_is_structure_error() {
        let html = day_page("<a href=\"image/other.jpg\">also</a>", "image/foo.jpg");
        let err = classify(&html, PREFIX).unwrap_err();
        assert!(matches!(err, ScrapeError::Structure(_)));
    }

    #[test]
    fn test_missing_lead_paragraph_is_structure_error() {
        let html = "<html><body><center>no paragraphs</center></body></html>";
        let err = classify(html, PREFIX).unwrap_err();
        assert!(matches!(err, ScrapeError::Structure(_)));
    }

    #[test]
    fn test_status_codes_are_stable() {
        assert_eq!(PageStatus::Unprocessed.code(), 0);
        assert_eq!(PageStatus::Ok.code(), 1);
        assert_eq!(PageStatus::Horizontal.code(), 2);
        assert_eq!(PageStatus::Iframe.code(), 10);
        assert_eq!(PageStatus::Applet.code(), 13);
        assert_eq!(PageStatus::Error.code(), 100);
    }

    #[test]
    fn test_status_name_round_trip() {
        for status in [
            PageStatus::Unprocessed,
            PageStatus::Ok,
            PageStatus::Horizontal,
            PageStatus::Old,
            PageStatus::Gif,
            PageStatus::Video,
            PageStatus::Skip,
            PageStatus::Iframe,
            PageStatus::Object,
            PageStatus::Embed,
            PageStatus::Applet,
            PageStatus::Error,
            PageStatus::ErrorDownloading,
        ] {
            assert_eq!(PageStatus::from_str(status.as_str()), Some(status));
        }
        assert_eq!(PageStatus::from_str("NOPE"), None);
    }
}

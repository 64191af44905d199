use skywall::handlers::*;
use skywall_scraper::classify::PageStatus;
use std::path::PathBuf;

#[test]
fn test_expand_cache_dir_plain_path() {
    let path = expand_cache_dir("/tmp/skywall-cache");
    assert_eq!(path, PathBuf::from("/tmp/skywall-cache"));
}

#[test]
fn test_expand_cache_dir_tilde() {
    let path = expand_cache_dir("~/.cache/skywall/");
    assert!(path.to_string_lossy().ends_with(".cache/skywall/"));
    if std::env::var_os("HOME").is_some() {
        // shellexpand resolved the tilde into something absolute.
        assert!(!path.to_string_lossy().starts_with('~'));
    }
}

#[test]
fn test_parse_status_arg_known_names() {
    assert_eq!(parse_status_arg("OK"), Some(PageStatus::Ok));
    assert_eq!(parse_status_arg("ok"), Some(PageStatus::Ok));
    assert_eq!(parse_status_arg("horizontal"), Some(PageStatus::Horizontal));
    assert_eq!(
        parse_status_arg("error_downloading"),
        Some(PageStatus::ErrorDownloading)
    );
}

#[test]
fn test_parse_status_arg_unknown() {
    assert_eq!(parse_status_arg("wibble"), None);
    assert_eq!(parse_status_arg(""), None);
}

#[test]
fn test_db_path() {
    let path = db_path(&PathBuf::from("/var/cache/skywall"));
    assert_eq!(path, PathBuf::from("/var/cache/skywall/skywall.db"));
}

// Tests for the SQLite status database

use skywall_core::data::Database;
use skywall_scraper::classify::PageStatus;
use skywall_scraper::page_id::PageId;
use skywall_scraper::run::PageRecord;
use tempfile::TempDir;

fn record(page: &str, status: PageStatus) -> PageRecord {
    PageRecord {
        page: PageId::new(page),
        status,
        image: None,
    }
}

fn create_test_db() -> (TempDir, Database) {
    let temp_dir = TempDir::new().unwrap();
    let db_path = temp_dir.path().join("test.db");
    let db = Database::new(&db_path).unwrap();
    (temp_dir, db)
}

// ============================================================================
// Database Creation Tests
// ============================================================================

#[test]
fn test_database_creation() {
    let temp_dir = TempDir::new().unwrap();
    let db_path = temp_dir.path().join("test.db");

    let db = Database::new(&db_path);
    assert!(db.is_ok());
    assert!(db_path.exists());
}

#[test]
fn test_database_exists() {
    let temp_dir = TempDir::new().unwrap();
    let db_path = temp_dir.path().join("test.db");

    assert!(!Database::exists(&db_path));

    let _db = Database::new(&db_path).unwrap();
    assert!(Database::exists(&db_path));
}

#[test]
fn test_database_drop() {
    let temp_dir = TempDir::new().unwrap();
    let db_path = temp_dir.path().join("test.db");

    let _db = Database::new(&db_path).unwrap();
    assert!(Database::exists(&db_path));

    Database::drop(&db_path).unwrap();
    assert!(!Database::exists(&db_path));
}

// ============================================================================
// Rebuild Tests
// ============================================================================

#[test]
fn test_rebuild_inserts_rows() {
    let (_temp_dir, mut db) = create_test_db();

    let inserted = db
        .rebuild(&[
            record("ap230401.html", PageStatus::Ok),
            record("ap230402.html", PageStatus::Old),
        ])
        .unwrap();

    assert_eq!(inserted, 2);
    assert_eq!(
        db.get_status("ap230401.html").unwrap().as_deref(),
        Some("OK")
    );
    assert_eq!(
        db.get_status("ap230402.html").unwrap().as_deref(),
        Some("OLD")
    );
    assert_eq!(db.get_status("ap230403.html").unwrap(), None);
}

#[test]
fn test_rebuild_replaces_previous_rows() {
    let (_temp_dir, mut db) = create_test_db();

    db.rebuild(&[record("ap230401.html", PageStatus::Ok)])
        .unwrap();
    db.rebuild(&[record("ap230402.html", PageStatus::Error)])
        .unwrap();

    // The first run's row is gone; rebuild is drop-and-recreate.
    assert_eq!(db.get_status("ap230401.html").unwrap(), None);
    assert_eq!(
        db.get_status("ap230402.html").unwrap().as_deref(),
        Some("ERROR")
    );
}

#[test]
fn test_rebuild_skips_undated_identifiers() {
    let (_temp_dir, mut db) = create_test_db();

    let inserted = db
        .rebuild(&[
            record("ap230401.html", PageStatus::Ok),
            record("not-a-day-page.html", PageStatus::Error),
        ])
        .unwrap();

    assert_eq!(inserted, 1);
}

#[test]
fn test_status_int_codes_are_persisted() {
    let (_temp_dir, mut db) = create_test_db();
    db.rebuild(&[record("ap230401.html", PageStatus::Iframe)])
        .unwrap();

    let code: i64 = db
        .get_connection()
        .query_row(
            "SELECT status_int FROM page_status WHERE f_name = 'ap230401.html'",
            [],
            |row| row.get(0),
        )
        .unwrap();
    assert_eq!(code, 10);
}

// ============================================================================
// Query Tests
// ============================================================================

#[test]
fn test_count_by_status() {
    let (_temp_dir, mut db) = create_test_db();
    db.rebuild(&[
        record("ap230401.html", PageStatus::Ok),
        record("ap230402.html", PageStatus::Ok),
        record("ap230403.html", PageStatus::Horizontal),
    ])
    .unwrap();

    let counts = db.count_by_status().unwrap();
    assert_eq!(counts[0], ("OK".to_string(), 2));
    assert_eq!(counts[1], ("HORIZONTAL".to_string(), 1));
}

#[test]
fn test_pages_with_status_newest_first() {
    let (_temp_dir, mut db) = create_test_db();
    db.rebuild(&[
        record("ap230401.html", PageStatus::Ok),
        record("ap230403.html", PageStatus::Ok),
        record("ap230402.html", PageStatus::Old),
    ])
    .unwrap();

    let ok = db.pages_with_status("OK").unwrap();
    assert_eq!(ok, vec!["ap230403.html", "ap230401.html"]);
}

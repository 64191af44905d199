use rusqlite::{params, Connection, OptionalExtension, Result};
use skywall_scraper::run::PageRecord;
use std::fs;
use std::path::Path;
use tracing::warn;

/// SQLite mirror of the status map, one row per classified page.
///
/// Rebuilt wholesale on every classification run, matching the status
/// store's overwrite semantics.
pub struct Database {
    conn: Connection,
}

impl Database {
    pub fn drop(path: &Path) -> std::io::Result<()> {
        fs::remove_file(path)
    }

    pub fn exists(path: &Path) -> bool {
        path.exists()
    }

    pub fn new(path: &Path) -> Result<Self> {
        let conn = Connection::open(path)?;

        conn.execute_batch(
            "
            PRAGMA journal_mode = WAL;
            PRAGMA synchronous = NORMAL;
            PRAGMA temp_store = MEMORY;
            ",
        )?;

        let db = Database { conn };
        db.init_schema()?;
        Ok(db)
    }

    fn init_schema(&self) -> Result<()> {
        self.conn.execute_batch(
            "
            CREATE TABLE IF NOT EXISTS page_status (
                date TEXT PRIMARY KEY,
                f_name TEXT UNIQUE NOT NULL,
                status TEXT NOT NULL CHECK(status IN (
                    'UNPROCESSED', 'OK', 'HORIZONTAL', 'OLD', 'GIF', 'VIDEO',
                    'SKIP', 'IFRAME', 'OBJECT', 'EMBED', 'APPLET',
                    'ERROR', 'ERROR_DOWNLOADING'
                )),
                status_int INTEGER NOT NULL
            );

            CREATE INDEX IF NOT EXISTS idx_page_status_status ON page_status(status);
            ",
        )?;
        Ok(())
    }

    /// Drop and refill the status table from one run's records, in a single
    /// transaction. Identifiers that don't encode a date can't be keyed and
    /// are skipped.
    pub fn rebuild(&mut self, records: &[PageRecord]) -> Result<usize> {
        self.conn
            .execute_batch("DROP TABLE IF EXISTS page_status;")?;
        self.init_schema()?;

        let tx = self.conn.transaction()?;
        let mut inserted = 0;
        {
            let mut stmt = tx.prepare(
                "INSERT INTO page_status (date, f_name, status, status_int)
                 VALUES (?1, ?2, ?3, ?4)",
            )?;

            for record in records {
                let date = match record.page.date() {
                    Ok(date) => date,
                    Err(e) => {
                        warn!("Skipping db row for {}: {}", record.page, e);
                        continue;
                    }
                };
                stmt.execute(params![
                    date.format("%Y-%m-%d").to_string(),
                    record.page.as_str(),
                    record.status.as_str(),
                    record.status.code(),
                ])?;
                inserted += 1;
            }
        }
        tx.commit()?;

        Ok(inserted)
    }

    pub fn get_status(&self, f_name: &str) -> Result<Option<String>> {
        let mut stmt = self
            .conn
            .prepare("SELECT status FROM page_status WHERE f_name = ?1")?;
        stmt.query_row(params![f_name], |row| row.get(0)).optional()
    }

    pub fn count_by_status(&self) -> Result<Vec<(String, i64)>> {
        let mut stmt = self.conn.prepare(
            "SELECT status, COUNT(*) FROM page_status GROUP BY status ORDER BY COUNT(*) DESC",
        )?;

        let counts = stmt
            .query_map([], |row| Ok((row.get(0)?, row.get(1)?)))?
            .collect::<Result<Vec<_>>>()?;

        Ok(counts)
    }

    /// Identifiers with `status`, newest first.
    pub fn pages_with_status(&self, status: &str) -> Result<Vec<String>> {
        let mut stmt = self.conn.prepare(
            "SELECT f_name FROM page_status WHERE status = ?1 ORDER BY date DESC",
        )?;

        let pages = stmt
            .query_map(params![status], |row| row.get(0))?
            .collect::<Result<Vec<_>>>()?;

        Ok(pages)
    }

    pub fn get_connection(&self) -> &Connection {
        &self.conn
    }
}

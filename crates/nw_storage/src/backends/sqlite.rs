use async_trait::async_trait;
use nw_core::{Error, NewsItem, NewsStore, Result, SaveOutcome};
use sqlx::sqlite::{SqliteConnectOptions, SqliteConnection, SqliteJournalMode};
use sqlx::{ConnectOptions, Connection, Row};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, warn};

const MIGRATIONS: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS noticias (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        fonte TEXT,
        titulo TEXT,
        resumo TEXT
    )
    "#,
    // Databases written before the unique index existed may hold exact duplicates.
    r#"
    DELETE FROM noticias
    WHERE id NOT IN (SELECT MIN(id) FROM noticias GROUP BY fonte, titulo, resumo)
    "#,
    r#"
    CREATE UNIQUE INDEX IF NOT EXISTS noticias_natural_key
    ON noticias (fonte, titulo, resumo)
    "#,
];

/// SQLite-backed store. Every operation opens and closes its own
/// connection, so readers and the ingestion writer share no state.
pub struct SQLiteStorage {
    options: SqliteConnectOptions,
    db_path: PathBuf,
}

impl SQLiteStorage {
    pub fn get_error_message() -> &'static str {
        "SQLite database should be writable at ./noticias.db"
    }

    pub fn new_with_path(db_path: &Path) -> Result<Self> {
        if let Some(parent) = db_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .map_err(|e| Error::Storage(format!("Failed to create database directory: {}", e)))?;
        }

        let options = SqliteConnectOptions::new()
            .filename(db_path)
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .busy_timeout(Duration::from_secs(5));

        Ok(Self {
            options,
            db_path: db_path.to_path_buf(),
        })
    }

    pub fn get_db_path(&self) -> &Path {
        &self.db_path
    }

    async fn connect(&self) -> Result<SqliteConnection> {
        self.options
            .connect()
            .await
            .map_err(|e| Error::Storage(format!("Failed to connect to database: {}", e)))
    }

    async fn insert(&self, source: &str, title: &str, summary: &str) -> Result<SaveOutcome> {
        let mut conn = self.connect().await?;
        let result = sqlx::query("INSERT OR IGNORE INTO noticias (fonte, titulo, resumo) VALUES (?, ?, ?)")
            .bind(source)
            .bind(title)
            .bind(summary)
            .execute(&mut conn)
            .await;
        close(conn).await;

        let result = result.map_err(|e| Error::Storage(format!("Failed to store item: {}", e)))?;
        Ok(if result.rows_affected() == 0 {
            SaveOutcome::Duplicate
        } else {
            SaveOutcome::Inserted
        })
    }
}

async fn close(conn: SqliteConnection) {
    if let Err(e) = conn.close().await {
        debug!(error = %e, "closing sqlite connection failed");
    }
}

#[async_trait]
impl NewsStore for SQLiteStorage {
    async fn init(&self) -> Result<()> {
        let mut conn = self.connect().await?;
        for (i, migration) in MIGRATIONS.iter().enumerate() {
            if let Err(e) = sqlx::query(migration).execute(&mut conn).await {
                close(conn).await;
                return Err(Error::Storage(format!("Failed to run migration {}: {}", i, e)));
            }
        }
        close(conn).await;
        Ok(())
    }

    async fn save(&self, source: &str, title: &str, summary: &str) -> SaveOutcome {
        match self.insert(source, title, summary).await {
            Ok(outcome) => outcome,
            Err(e) => {
                warn!(kind = "storage", source, title, error = %e, "failed to save item");
                SaveOutcome::Failed
            }
        }
    }

    async fn load_all(&self) -> Result<Vec<NewsItem>> {
        let mut conn = self.connect().await?;
        let rows = sqlx::query("SELECT id, fonte, titulo, resumo FROM noticias ORDER BY id DESC")
            .fetch_all(&mut conn)
            .await;
        close(conn).await;

        let rows = rows.map_err(|e| Error::Storage(format!("Failed to load items: {}", e)))?;
        rows.into_iter()
            .map(|row| {
                Ok(NewsItem {
                    id: row.try_get("id").map_err(column_error)?,
                    source: row.try_get::<Option<String>, _>("fonte").map_err(column_error)?.unwrap_or_default(),
                    title: row.try_get::<Option<String>, _>("titulo").map_err(column_error)?.unwrap_or_default(),
                    summary: row.try_get::<Option<String>, _>("resumo").map_err(column_error)?.unwrap_or_default(),
                })
            })
            .collect()
    }

    async fn prune(&self, keep: usize) -> Result<u64> {
        let mut conn = self.connect().await?;
        let result = sqlx::query(
            r#"
            DELETE FROM noticias
            WHERE id NOT IN (SELECT id FROM noticias ORDER BY id DESC LIMIT ?)
            "#,
        )
        .bind(keep as i64)
        .execute(&mut conn)
        .await;
        close(conn).await;

        result
            .map(|r| r.rows_affected())
            .map_err(|e| Error::Storage(format!("Failed to prune items: {}", e)))
    }
}

fn column_error(e: sqlx::Error) -> Error {
    Error::Storage(format!("Unexpected row shape: {}", e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    async fn storage_in(dir: &tempfile::TempDir) -> SQLiteStorage {
        let storage = SQLiteStorage::new_with_path(&dir.path().join("test.db")).unwrap();
        storage.init().await.unwrap();
        storage
    }

    #[tokio::test]
    async fn test_save_twice_keeps_one_row() {
        let temp_dir = tempdir().unwrap();
        let storage = storage_in(&temp_dir).await;

        assert_eq!(storage.save("G1", "T", "S").await, SaveOutcome::Inserted);
        assert_eq!(storage.save("G1", "T", "S").await, SaveOutcome::Duplicate);

        let items = storage.load_all().await.unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].source, "G1");
        assert_eq!(items[0].title, "T");
        assert_eq!(items[0].summary, "S");
    }

    #[tokio::test]
    async fn test_load_all_newest_first() {
        let temp_dir = tempdir().unwrap();
        let storage = storage_in(&temp_dir).await;

        storage.save("G1", "first", "a").await;
        storage.save("UOL", "second", "b").await;
        storage.save("Globo", "third", "c").await;

        let items = storage.load_all().await.unwrap();
        let titles: Vec<_> = items.iter().map(|i| i.title.as_str()).collect();
        assert_eq!(titles, vec!["third", "second", "first"]);
        assert!(items.windows(2).all(|w| w[0].id > w[1].id));
    }

    #[tokio::test]
    async fn test_init_is_idempotent() {
        let temp_dir = tempdir().unwrap();
        let storage = storage_in(&temp_dir).await;
        storage.save("G1", "T", "S").await;

        storage.init().await.unwrap();
        let reopened = storage_in(&temp_dir).await;
        assert_eq!(reopened.load_all().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_init_collapses_legacy_duplicates() {
        let temp_dir = tempdir().unwrap();
        let storage = SQLiteStorage::new_with_path(&temp_dir.path().join("legacy.db")).unwrap();

        let mut conn = storage.connect().await.unwrap();
        sqlx::query(MIGRATIONS[0]).execute(&mut conn).await.unwrap();
        for (fonte, titulo, resumo) in [
            ("G1", "T", "S"),
            ("G1", "T", "S"),
            ("UOL", "U", "V"),
            ("G1", "T", "S"),
            ("UOL", "U", "V"),
            ("Globo", "T", "S"),
        ] {
            sqlx::query("INSERT INTO noticias (fonte, titulo, resumo) VALUES (?, ?, ?)")
                .bind(fonte)
                .bind(titulo)
                .bind(resumo)
                .execute(&mut conn)
                .await
                .unwrap();
        }
        close(conn).await;

        storage.init().await.unwrap();
        let items = storage.load_all().await.unwrap();
        let rows: Vec<_> = items
            .iter()
            .map(|i| (i.id, i.source.as_str(), i.title.as_str()))
            .collect();
        assert_eq!(rows, vec![(6, "Globo", "T"), (3, "UOL", "U"), (1, "G1", "T")]);

        assert_eq!(storage.save("G1", "T", "S").await, SaveOutcome::Duplicate);
        assert_eq!(storage.save("UOL", "U", "V").await, SaveOutcome::Duplicate);
        assert_eq!(storage.load_all().await.unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_same_text_under_another_source_is_kept() {
        let temp_dir = tempdir().unwrap();
        let storage = storage_in(&temp_dir).await;

        storage.save("G1", "T", "S").await;
        assert_eq!(storage.save("Globo", "T", "S").await, SaveOutcome::Inserted);
        assert_eq!(storage.load_all().await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_prune_keeps_newest() {
        let temp_dir = tempdir().unwrap();
        let storage = storage_in(&temp_dir).await;
        for i in 0..5 {
            storage.save("G1", &format!("title {}", i), "s").await;
        }

        assert_eq!(storage.prune(2).await.unwrap(), 3);
        let items = storage.load_all().await.unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].title, "title 4");
        assert_eq!(items[1].title, "title 3");
    }

    #[tokio::test]
    async fn test_save_without_schema_reports_failure() {
        let temp_dir = tempdir().unwrap();
        let storage = SQLiteStorage::new_with_path(&temp_dir.path().join("empty.db")).unwrap();
        assert_eq!(storage.save("G1", "T", "S").await, SaveOutcome::Failed);
    }
}

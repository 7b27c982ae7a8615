use crate::store::{ReportSlot, queries};
use anyhow::{Context, Result};
use chrono::Utc;
use rusqlite::{Connection, OptionalExtension, params};
use std::fs;
use std::path::{Path, PathBuf};

pub const REPORTS_KEY: &str = "healthwatch_reports_v1";

/// A single key in a SQLite-backed key-value table.
pub struct SqliteSlot {
    conn: Connection,
    path: PathBuf,
    key: String,
}

impl SqliteSlot {
    pub fn open(path: &Path) -> Result<Self> {
        Self::open_with_key(path, REPORTS_KEY)
    }

    pub fn open_with_key(path: &Path, key: &str) -> Result<Self> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create DB directory: {}", parent.display()))?;
        }

        let conn = Connection::open(path)
            .with_context(|| format!("Failed to open SQLite DB: {}", path.display()))?;

        let slot = Self {
            conn,
            path: path.to_path_buf(),
            key: key.to_string(),
        };
        slot.init_schema()?;

        Ok(slot)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn init_schema(&self) -> Result<()> {
        queries::schema_statements()
            .iter()
            .try_for_each(|statement| {
                self.conn
                    .execute(statement, [])
                    .context("Failed to initialize schema")
                    .map(|_| ())
            })
    }
}

impl ReportSlot for SqliteSlot {
    fn read(&self) -> Result<Option<String>> {
        self.conn
            .query_row(queries::SELECT_VALUE, params![&self.key], |row| row.get(0))
            .optional()
            .with_context(|| format!("Failed to read key {}", self.key))
    }

    fn write(&self, value: &str) -> Result<()> {
        self.conn
            .execute(
                queries::UPSERT_VALUE,
                params![&self.key, value, Utc::now().timestamp()],
            )
            .with_context(|| format!("Failed to write key {}", self.key))?;

        Ok(())
    }
}

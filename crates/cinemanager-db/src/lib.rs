// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result, anyhow, bail};
use cinemanager_app::KeyValueStore;
use rusqlite::{Connection, OptionalExtension, params};
use std::collections::BTreeSet;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;
use tracing::debug;

pub const APP_NAME: &str = "cinemanager";
pub const DB_PATH_ENV: &str = "CINEMANAGER_DB_PATH";

const REQUIRED_SCHEMA: &[(&str, &[&str])] = &[("kv", &["key", "value", "updated_at"])];

pub struct Store {
    conn: Connection,
}

impl Store {
    pub fn open(path: &Path) -> Result<Self> {
        let printable = path.to_string_lossy().to_string();
        validate_db_path(&printable)?;
        let conn = Connection::open(path)
            .with_context(|| format!("open database at {}", path.display()))?;
        configure_connection(&conn)?;
        debug!(path = %path.display(), "database opened");
        Ok(Self { conn })
    }

    pub fn open_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().context("open in-memory database")?;
        configure_connection(&conn)?;
        Ok(Self { conn })
    }

    pub fn raw_connection(&self) -> &Connection {
        &self.conn
    }

    /// Creates the schema on an empty database, or checks that an existing
    /// one carries every required column.
    pub fn bootstrap(&self) -> Result<()> {
        if has_user_tables(&self.conn)? {
            validate_schema(&self.conn)?;
        } else {
            self.conn
                .execute_batch(include_str!("sql/schema.sql"))
                .context("create schema")?;
        }
        Ok(())
    }

    pub fn get_raw(&self, key: &str) -> Result<Option<String>> {
        self.conn
            .query_row(
                "SELECT value FROM kv WHERE key = ?",
                params![key],
                |row| row.get::<_, String>(0),
            )
            .optional()
            .with_context(|| format!("read key {key}"))
    }

    pub fn put_raw(&self, key: &str, value: &str) -> Result<()> {
        let now = now_rfc3339()?;
        self.conn
            .execute(
                "
                INSERT INTO kv (key, value, updated_at)
                VALUES (?, ?, ?)
                ON CONFLICT(key) DO UPDATE SET
                  value = excluded.value,
                  updated_at = excluded.updated_at
                ",
                params![key, value, now],
            )
            .with_context(|| format!("write key {key} -- check the disk has space and retry"))?;
        Ok(())
    }

    pub fn updated_at(&self, key: &str) -> Result<Option<OffsetDateTime>> {
        let raw = self
            .conn
            .query_row(
                "SELECT updated_at FROM kv WHERE key = ?",
                params![key],
                |row| row.get::<_, String>(0),
            )
            .optional()
            .with_context(|| format!("read timestamp for key {key}"))?;
        raw.map(|value| {
            OffsetDateTime::parse(&value, &Rfc3339)
                .with_context(|| format!("key {key} has invalid timestamp {value:?}"))
        })
        .transpose()
    }

    pub fn keys(&self) -> Result<Vec<String>> {
        let mut stmt = self
            .conn
            .prepare("SELECT key FROM kv ORDER BY key ASC")
            .context("prepare key listing")?;
        let rows = stmt
            .query_map([], |row| row.get::<_, String>(0))
            .context("list keys")?;
        rows.collect::<rusqlite::Result<Vec<_>>>()
            .context("collect keys")
    }
}

impl KeyValueStore for Store {
    fn get(&self, key: &str) -> Result<Option<String>> {
        self.get_raw(key)
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.put_raw(key, value)
    }
}

fn data_dir() -> Result<PathBuf> {
    let data_root = dirs::data_local_dir().ok_or_else(|| {
        anyhow!("cannot resolve data directory; set {DB_PATH_ENV} to a writable database path")
    })?;
    let app_dir = data_root.join(APP_NAME);
    fs::create_dir_all(&app_dir)
        .with_context(|| format!("create data directory {}", app_dir.display()))?;
    Ok(app_dir)
}

pub fn default_db_path() -> Result<PathBuf> {
    if let Some(override_path) = env::var_os(DB_PATH_ENV) {
        return Ok(PathBuf::from(override_path));
    }
    Ok(data_dir()?.join(format!("{APP_NAME}.db")))
}

/// Log file path, next to the default database.
pub fn default_log_path() -> Result<PathBuf> {
    Ok(data_dir()?.join(format!("{APP_NAME}.log")))
}

pub fn default_export_dir() -> Result<PathBuf> {
    if let Some(downloads) = dirs::download_dir() {
        return Ok(downloads);
    }
    data_dir()
}

pub fn validate_db_path(path: &str) -> Result<()> {
    if path.is_empty() {
        bail!("database path must not be empty");
    }
    if path == ":memory:" {
        return Ok(());
    }

    if let Some(index) = path.find("://")
        && index > 0
    {
        let scheme = &path[..index];
        if scheme.chars().all(char::is_alphabetic) {
            bail!(
                "database path {path:?} looks like a URI ({scheme}://); pass a filesystem path instead"
            );
        }
    }

    if path.starts_with("file:") {
        bail!("database path {path:?} uses file: URI syntax; pass a plain filesystem path");
    }

    if path.contains('?') {
        bail!(
            "database path {path:?} contains '?'; remove query parameters and use a plain file path"
        );
    }

    Ok(())
}

fn has_user_tables(conn: &Connection) -> Result<bool> {
    let count: i64 = conn
        .query_row(
            "
            SELECT COUNT(*)
            FROM sqlite_master
            WHERE type = 'table'
              AND name NOT LIKE 'sqlite_%'
            ",
            [],
            |row| row.get(0),
        )
        .context("count user tables")?;
    Ok(count > 0)
}

fn validate_schema(conn: &Connection) -> Result<()> {
    for (table, required_columns) in REQUIRED_SCHEMA {
        let columns = table_columns(conn, table)?;
        if columns.is_empty() {
            bail!(
                "database is missing required table `{table}`; point {DB_PATH_ENV} at a cinemanager database"
            );
        }

        let missing: Vec<&str> = required_columns
            .iter()
            .copied()
            .filter(|column| !columns.contains(*column))
            .collect();
        if !missing.is_empty() {
            bail!(
                "table `{table}` is missing required columns: {}; move the file aside and relaunch",
                missing.join(", ")
            );
        }
    }
    Ok(())
}

fn table_columns(conn: &Connection, table: &str) -> Result<BTreeSet<String>> {
    let mut stmt = conn
        .prepare(&format!("PRAGMA table_info({table})"))
        .with_context(|| format!("inspect columns for {table}"))?;
    let rows = stmt
        .query_map([], |row| row.get::<_, String>(1))
        .with_context(|| format!("query column info for {table}"))?;
    rows.collect::<rusqlite::Result<BTreeSet<_>>>()
        .with_context(|| format!("collect columns for {table}"))
}

fn configure_connection(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "
        PRAGMA journal_mode = WAL;
        PRAGMA synchronous = NORMAL;
        PRAGMA busy_timeout = 5000;
        ",
    )
    .context("configure sqlite pragmas")
}

fn now_rfc3339() -> Result<String> {
    OffsetDateTime::now_utc()
        .format(&Rfc3339)
        .context("format current timestamp")
}

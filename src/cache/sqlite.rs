//! SQLite geometry cache.
//!
//! Uses a single writer connection behind a mutex and a pool of read-only
//! connections. The database runs in WAL mode, so readers see the last
//! committed row for a key and never wait on the writer. `synchronous = FULL`
//! makes each committed upsert durable before `store` returns.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::Duration;

use rusqlite::{Connection, OpenFlags, OptionalExtension, params};
use tracing::{debug, info};

use super::{CacheEntry, CacheKey, unix_now};
use crate::error::CacheError;
use crate::geometry::PathGeometry;
use crate::location::Location;
use crate::traits::GeometryCache;

const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

const SCHEMA: &str = "CREATE TABLE IF NOT EXISTS route_geometry (
    origin      TEXT    NOT NULL,
    destination TEXT    NOT NULL,
    geometry    TEXT    NOT NULL,
    stored_at   INTEGER NOT NULL,
    PRIMARY KEY (origin, destination)
);";

/// Geometry cache persisted in an SQLite database file.
pub struct SqliteGeometryCache {
    path: PathBuf,
    writer: Mutex<Connection>,
    readers: Mutex<Vec<Connection>>,
}

impl SqliteGeometryCache {
    /// Open (or create) the cache database at `path`.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, CacheError> {
        let path = path.as_ref().to_path_buf();
        if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }

        let conn = Connection::open(&path)?;
        conn.busy_timeout(BUSY_TIMEOUT)?;
        conn.pragma_update_and_check(None, "journal_mode", "WAL", |row| row.get::<_, String>(0))?;
        conn.pragma_update(None, "synchronous", "FULL")?;
        conn.execute_batch(SCHEMA)?;

        let count: i64 =
            conn.query_row("SELECT COUNT(*) FROM route_geometry", [], |row| row.get(0))?;
        info!(path = %path.display(), entries = count, "opened sqlite geometry cache");

        Ok(Self {
            path,
            writer: Mutex::new(conn),
            readers: Mutex::new(Vec::new()),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn checkout_reader(&self) -> Result<Connection, CacheError> {
        let pooled = self.readers.lock().map_err(|_| CacheError::Poisoned)?.pop();
        if let Some(conn) = pooled {
            return Ok(conn);
        }

        let conn = Connection::open_with_flags(
            &self.path,
            OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )?;
        conn.busy_timeout(BUSY_TIMEOUT)?;
        Ok(conn)
    }

    fn return_reader(&self, conn: Connection) {
        if let Ok(mut pool) = self.readers.lock() {
            pool.push(conn);
        }
    }
}

impl GeometryCache for SqliteGeometryCache {
    fn lookup(
        &self,
        origin: &Location,
        destination: &Location,
    ) -> Result<Option<PathGeometry>, CacheError> {
        let conn = self.checkout_reader()?;
        let row: Option<String> = conn
            .query_row(
                "SELECT geometry FROM route_geometry WHERE origin = ?1 AND destination = ?2",
                params![origin.name(), destination.name()],
                |row| row.get(0),
            )
            .optional()?;
        self.return_reader(conn);

        debug!(%origin, %destination, hit = row.is_some(), "geometry cache lookup");
        Ok(row.map(|json| serde_json::from_str(&json)).transpose()?)
    }

    fn store(
        &self,
        origin: &Location,
        destination: &Location,
        geometry: &PathGeometry,
    ) -> Result<(), CacheError> {
        let encoded = serde_json::to_string(geometry)?;
        let stored_at = i64::try_from(unix_now()).unwrap_or(i64::MAX);

        let mut conn = self.writer.lock().map_err(|_| CacheError::Poisoned)?;
        let tx = conn.transaction()?;
        tx.execute(
            "INSERT INTO route_geometry (origin, destination, geometry, stored_at) \
             VALUES (?1, ?2, ?3, ?4) \
             ON CONFLICT (origin, destination) \
             DO UPDATE SET geometry = excluded.geometry, stored_at = excluded.stored_at",
            params![origin.name(), destination.name(), encoded, stored_at],
        )?;
        tx.commit()?;

        debug!(%origin, %destination, points = geometry.len(), "stored geometry");
        Ok(())
    }

    fn all_entries(&self) -> Result<Vec<CacheEntry>, CacheError> {
        let conn = self.checkout_reader()?;
        let rows = {
            let mut stmt = conn.prepare(
                "SELECT origin, destination, geometry, stored_at FROM route_geometry \
                 ORDER BY origin, destination",
            )?;
            let rows = stmt
                .query_map([], |row| {
                    Ok((
                        row.get::<_, String>(0)?,
                        row.get::<_, String>(1)?,
                        row.get::<_, String>(2)?,
                        row.get::<_, i64>(3)?,
                    ))
                })?
                .collect::<Result<Vec<_>, _>>()?;
            rows
        };
        self.return_reader(conn);

        rows.into_iter()
            .map(|(origin, destination, geometry, stored_at)| -> Result<CacheEntry, CacheError> {
                Ok(CacheEntry {
                    key: CacheKey::new(Location::new(origin), Location::new(destination)),
                    geometry: serde_json::from_str(&geometry)?,
                    stored_at: u64::try_from(stored_at).unwrap_or_default(),
                })
            })
            .collect()
    }
}

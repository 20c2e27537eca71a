//! JSON file geometry cache.
//!
//! The whole cache lives in one JSON array file. Every `store` holds an
//! exclusive lock on a sidecar `.lock` file, re-reads the file, merges its
//! entry and writes the complete snapshot to a temp file, which is fsynced
//! and renamed over the target. Other handles on the same file, in this
//! process or another, never lose each other's entries, and the file on disk
//! is always one complete write.
//!
//! Lookups are served from an in-memory map. A miss reloads the file so
//! entries stored through another handle become visible.

use std::collections::BTreeMap;
use std::fs::{self, File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, RwLock};

use fs2::FileExt;
use tracing::{debug, info};

use super::{CacheEntry, CacheKey, unix_now};
use crate::error::CacheError;
use crate::geometry::PathGeometry;
use crate::location::Location;
use crate::traits::GeometryCache;

type EntryMap = BTreeMap<CacheKey, CacheEntry>;

/// Geometry cache persisted as a single JSON file.
#[derive(Debug)]
pub struct JsonFileGeometryCache {
    path: PathBuf,
    entries: RwLock<EntryMap>,
    writer: Mutex<()>,
}

impl JsonFileGeometryCache {
    /// Load the cache at `path`, starting empty if the file does not exist.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, CacheError> {
        let path = path.as_ref().to_path_buf();
        if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }

        let entries = read_entries(&path)?;
        info!(path = %path.display(), entries = entries.len(), "opened json geometry cache");

        Ok(Self {
            path,
            entries: RwLock::new(entries),
            writer: Mutex::new(()),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Exclusive inter-process lock, released when the returned file drops.
    fn lock_file(&self) -> Result<File, CacheError> {
        let lock = OpenOptions::new()
            .create(true)
            .truncate(false)
            .write(true)
            .open(self.path.with_extension("lock"))?;
        lock.lock_exclusive()?;
        Ok(lock)
    }

    /// Replace the in-memory map with what is on disk.
    fn reload(&self) -> Result<(), CacheError> {
        let _guard = self.writer.lock().map_err(|_| CacheError::Poisoned)?;
        let on_disk = read_entries(&self.path)?;
        *self.entries.write().map_err(|_| CacheError::Poisoned)? = on_disk;
        Ok(())
    }

    fn persist(&self, entries: &EntryMap) -> Result<(), CacheError> {
        let snapshot: Vec<&CacheEntry> = entries.values().collect();
        let tmp_path = self.path.with_extension("tmp");
        let mut writer = BufWriter::new(File::create(&tmp_path)?);
        serde_json::to_writer(&mut writer, &snapshot)?;
        writer.flush()?;
        writer.get_ref().sync_all()?;
        drop(writer);

        fs::rename(&tmp_path, &self.path)?;
        sync_parent(&self.path)?;
        Ok(())
    }
}

fn read_entries(path: &Path) -> Result<EntryMap, CacheError> {
    if !path.exists() {
        return Ok(EntryMap::new());
    }

    let contents = fs::read_to_string(path)?;
    if contents.trim().is_empty() {
        return Ok(EntryMap::new());
    }

    let entries: Vec<CacheEntry> = serde_json::from_str(&contents)?;
    Ok(entries
        .into_iter()
        .map(|entry| (entry.key.clone(), entry))
        .collect())
}

#[cfg(unix)]
fn sync_parent(path: &Path) -> Result<(), CacheError> {
    if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        File::open(parent)?.sync_all()?;
    }
    Ok(())
}

#[cfg(not(unix))]
fn sync_parent(_path: &Path) -> Result<(), CacheError> {
    Ok(())
}

impl GeometryCache for JsonFileGeometryCache {
    fn lookup(
        &self,
        origin: &Location,
        destination: &Location,
    ) -> Result<Option<PathGeometry>, CacheError> {
        let key = CacheKey::new(origin.clone(), destination.clone());
        let cached = |entries: &EntryMap| entries.get(&key).map(|entry| entry.geometry.clone());

        let mut geometry = cached(&*self.entries.read().map_err(|_| CacheError::Poisoned)?);
        if geometry.is_none() {
            self.reload()?;
            geometry = cached(&*self.entries.read().map_err(|_| CacheError::Poisoned)?);
        }

        debug!(%origin, %destination, hit = geometry.is_some(), "geometry cache lookup");
        Ok(geometry)
    }

    fn store(
        &self,
        origin: &Location,
        destination: &Location,
        geometry: &PathGeometry,
    ) -> Result<(), CacheError> {
        let _guard = self.writer.lock().map_err(|_| CacheError::Poisoned)?;
        let _lock = self.lock_file()?;

        let entry = CacheEntry {
            key: CacheKey::new(origin.clone(), destination.clone()),
            geometry: geometry.clone(),
            stored_at: unix_now(),
        };

        let mut merged = read_entries(&self.path)?;
        merged.insert(entry.key.clone(), entry);
        self.persist(&merged)?;

        *self.entries.write().map_err(|_| CacheError::Poisoned)? = merged;

        debug!(%origin, %destination, points = geometry.len(), "stored geometry");
        Ok(())
    }

    fn all_entries(&self) -> Result<Vec<CacheEntry>, CacheError> {
        self.reload()?;
        let entries = self.entries.read().map_err(|_| CacheError::Poisoned)?;
        Ok(entries.values().cloned().collect())
    }
}

//! Durable route geometry cache.
//!
//! Entries are keyed by a directed (origin, destination) pair: a walking path
//! from A to B says nothing about the path from B to A. Every backend writes
//! whole entries atomically and flushes before `store` returns.

use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};

use crate::geometry::PathGeometry;
use crate::location::Location;

mod json_file;
mod sqlite;

pub use json_file::JsonFileGeometryCache;
pub use sqlite::SqliteGeometryCache;

/// Directed stop pair.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct CacheKey {
    pub origin: Location,
    pub destination: Location,
}

impl CacheKey {
    pub fn new(origin: Location, destination: Location) -> Self {
        Self {
            origin,
            destination,
        }
    }
}

/// A resolved geometry and when it was written.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheEntry {
    #[serde(flatten)]
    pub key: CacheKey,
    pub geometry: PathGeometry,
    /// Unix seconds at write time.
    pub stored_at: u64,
}

fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_secs())
        .unwrap_or_default()
}

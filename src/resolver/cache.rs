use directories::ProjectDirs;
use rusqlite::{params, Connection, OptionalExtension};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

use super::DistanceResolver;
use crate::error::{FlightMapError, Result};
use crate::flights::{Airport, RouteKey};

/// Memoizes another resolver's answers in a SQLite file, keyed by route
pub struct CachedResolver<R> {
    inner: R,
    conn: Connection,
}

/// Default location of the mileage cache
pub fn default_cache_path() -> Result<PathBuf> {
    let proj_dirs = ProjectDirs::from("", "", "flight-mileage-map")
        .ok_or_else(|| FlightMapError::Config("Could not determine cache directory".to_string()))?;
    Ok(proj_dirs.cache_dir().join("mileage.db"))
}

impl<R: DistanceResolver> CachedResolver<R> {
    pub fn open(inner: R, db_path: &Path) -> Result<Self> {
        if let Some(parent) = db_path.parent() {
            fs::create_dir_all(parent)?;
        }
        let conn = Connection::open(db_path)?;
        Self::with_connection(inner, conn)
    }

    pub fn in_memory(inner: R) -> Result<Self> {
        Self::with_connection(inner, Connection::open_in_memory()?)
    }

    fn with_connection(inner: R, conn: Connection) -> Result<Self> {
        conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS mileage (
                 route TEXT NOT NULL,
                 resolver TEXT NOT NULL,
                 miles INTEGER NOT NULL,
                 PRIMARY KEY (route, resolver)
             )",
        )?;
        Ok(Self { inner, conn })
    }

    fn lookup(&self, route: &str) -> Result<Option<u32>> {
        Ok(self
            .conn
            .query_row(
                "SELECT miles FROM mileage WHERE route = ?1 AND resolver = ?2",
                params![route, self.inner.name()],
                |row| row.get(0),
            )
            .optional()?)
    }

    fn store(&self, route: &str, miles: u32) -> Result<()> {
        self.conn.execute(
            "INSERT OR REPLACE INTO mileage (route, resolver, miles) VALUES (?1, ?2, ?3)",
            params![route, self.inner.name(), miles],
        )?;
        Ok(())
    }
}

impl<R: DistanceResolver> DistanceResolver for CachedResolver<R> {
    fn distance(&self, origin: &Airport, destination: &Airport) -> Result<u32> {
        let route = RouteKey::new(&origin.code, &destination.code).to_string();

        if let Some(miles) = self.lookup(&route)? {
            debug!(route = %route, miles, "Mileage cache hit");
            return Ok(miles);
        }

        let miles = self.inner.distance(origin, destination)?;
        self.store(&route, miles)?;
        Ok(miles)
    }

    fn name(&self) -> &str {
        self.inner.name()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use tempfile::tempdir;

    struct Fixed {
        miles: u32,
        calls: Cell<u32>,
    }

    impl DistanceResolver for Fixed {
        fn distance(&self, _origin: &Airport, _destination: &Airport) -> Result<u32> {
            self.calls.set(self.calls.get() + 1);
            Ok(self.miles)
        }

        fn name(&self) -> &str {
            "fixed"
        }
    }

    #[test]
    fn test_inner_called_once_per_route() {
        let cached = CachedResolver::in_memory(Fixed { miles: 4405, calls: Cell::new(0) }).unwrap();
        let (mia, eze) = (Airport::bare("MIA"), Airport::bare("EZE"));

        assert_eq!(cached.distance(&mia, &eze).unwrap(), 4405);
        assert_eq!(cached.distance(&eze, &mia).unwrap(), 4405);
        assert_eq!(cached.inner.calls.get(), 1);
    }

    #[test]
    fn test_cache_survives_reopen() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("mileage.db");
        let (jfk, lax) = (Airport::bare("JFK"), Airport::bare("LAX"));

        {
            let cached = CachedResolver::open(Fixed { miles: 2475, calls: Cell::new(0) }, &path).unwrap();
            cached.distance(&jfk, &lax).unwrap();
        }

        let reopened = CachedResolver::open(Fixed { miles: 0, calls: Cell::new(0) }, &path).unwrap();
        assert_eq!(reopened.distance(&lax, &jfk).unwrap(), 2475);
        assert_eq!(reopened.inner.calls.get(), 0);
    }
}

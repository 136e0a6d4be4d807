use std::{
    net::IpAddr,
    path::{Path, PathBuf},
    sync::Arc,
};

use log::{debug, error};
use once_cell::sync::OnceCell;
use thiserror::Error;

use crate::record::GeoRecord;

mod maxmind;
pub use maxmind::MaxmindOpener;

pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Read-only geolocation database keyed by IP address.
pub trait GeoDatabase: Send + Sync {
    /// Returns `Ok(None)` when the database holds no record for `ip`.
    fn lookup(&self, ip: IpAddr) -> Result<Option<GeoRecord>, DatabaseError>;
}

/// Opens a [GeoDatabase] stored at a path known to exist.
pub trait DatabaseOpener: Send + Sync {
    fn open(&self, path: &Path) -> Result<Arc<dyn GeoDatabase>, DatabaseError>;
}

#[derive(Debug, Error)]
pub enum DatabaseError {
    #[error("GEOIP_DB_PATH is not set")]
    PathNotSet,
    #[error("GeoIP database file not found at {}", .0.display())]
    FileNotFound(PathBuf),
    #[error("error accessing GeoIP database at {}: {source}", .path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: BoxError,
    },
    #[error("error reading GeoIP record for {ip}: {source}")]
    Query {
        ip: IpAddr,
        #[source]
        source: BoxError,
    },
}

/// Lazily opened, process-wide database handle.
///
/// The database is opened on the first call to [DatabaseAccessor::database] and shared from
/// then on. Concurrent first callers wait for a single open. A failed open isn't cached.
pub struct DatabaseAccessor {
    path: Option<PathBuf>,
    opener: Box<dyn DatabaseOpener>,
    handle: OnceCell<Arc<dyn GeoDatabase>>,
}

impl DatabaseAccessor {
    pub fn new<O>(path: Option<PathBuf>, opener: O) -> Self
    where
        O: DatabaseOpener + 'static,
    {
        Self {
            path,
            opener: Box::new(opener),
            handle: OnceCell::new(),
        }
    }

    pub fn database(&self) -> Result<Arc<dyn GeoDatabase>, DatabaseError> {
        self.handle
            .get_or_try_init(|| {
                self.open().map_err(|err| {
                    error!("Unable to open GeoIP database: {}", err);
                    err
                })
            })
            .cloned()
    }

    fn open(&self) -> Result<Arc<dyn GeoDatabase>, DatabaseError> {
        let path = self
            .path
            .as_deref()
            .filter(|path| !path.as_os_str().is_empty())
            .ok_or(DatabaseError::PathNotSet)?;

        if !path.exists() {
            return Err(DatabaseError::FileNotFound(path.to_owned()));
        }

        let database = self.opener.open(path)?;
        debug!("Opened GeoIP database at {}", path.display());

        Ok(database)
    }
}

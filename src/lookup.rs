use log::debug;
use thiserror::Error;

use crate::{
    database::{DatabaseAccessor, DatabaseError},
    ip::parse_ip,
    record::GeoRecord,
};

#[derive(Debug, Error)]
pub enum LookupError {
    #[error("invalid IP address")]
    InvalidIp,
    #[error("IP address not found in the database")]
    IpNotFound,
    #[error(transparent)]
    Database(#[from] DatabaseError),
}

pub struct LookupService {
    accessor: DatabaseAccessor,
}

impl LookupService {
    pub fn new(accessor: DatabaseAccessor) -> Self {
        Self { accessor }
    }

    /// Looks up `ip`, opening the database on first use.
    ///
    /// Input is validated before the database is touched. Every call queries the database
    /// once; results aren't cached.
    pub fn lookup(&self, ip: &str) -> Result<GeoRecord, LookupError> {
        let address = parse_ip(ip).ok_or(LookupError::InvalidIp)?;

        let database = self.accessor.database()?;

        match database.lookup(address)? {
            Some(record) => Ok(record),
            None => {
                debug!("No GeoIP record for {}", ip);
                Err(LookupError::IpNotFound)
            }
        }
    }
}

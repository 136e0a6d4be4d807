use std::{net::IpAddr, path::Path, sync::Arc};

use maxminddb::{geoip2, MaxMindDbError, Reader};

use super::{DatabaseError, DatabaseOpener, GeoDatabase};
use crate::record::{City, Continent, Country, GeoRecord, Location, Subdivision};

/// MaxMind DB (`.mmdb`) file loaded into memory, queried as a GeoIP2/GeoLite2 City database.
pub struct MaxmindDatabase {
    reader: Reader<Vec<u8>>,
}

#[derive(Debug, Default, Clone, Copy)]
pub struct MaxmindOpener;

impl MaxmindDatabase {
    pub fn open(path: &Path) -> Result<Self, DatabaseError> {
        let reader = Reader::open_readfile(path).map_err(|err| DatabaseError::Open {
            path: path.to_owned(),
            source: Box::new(err),
        })?;

        Ok(Self { reader })
    }
}

impl GeoDatabase for MaxmindDatabase {
    fn lookup(&self, ip: IpAddr) -> Result<Option<GeoRecord>, DatabaseError> {
        let query_error = move |err: MaxMindDbError| DatabaseError::Query {
            ip,
            source: Box::new(err),
        };

        let result = self.reader.lookup(ip).map_err(query_error)?;
        let city: Option<geoip2::City> = result.decode().map_err(query_error)?;

        Ok(city.map(GeoRecord::from))
    }
}

impl DatabaseOpener for MaxmindOpener {
    fn open(&self, path: &Path) -> Result<Arc<dyn GeoDatabase>, DatabaseError> {
        Ok(Arc::new(MaxmindDatabase::open(path)?))
    }
}

impl From<geoip2::City<'_>> for GeoRecord {
    fn from(value: geoip2::City<'_>) -> Self {
        Self {
            city: City {
                name: value.city.names.english.map(String::from),
                geoname_id: value.city.geoname_id,
            },
            continent: Continent {
                name: value.continent.names.english.map(String::from),
                code: value.continent.code.map(String::from),
                geoname_id: value.continent.geoname_id,
            },
            country: value.country.into(),
            location: Location {
                latitude: value.location.latitude,
                longitude: value.location.longitude,
                time_zone: value.location.time_zone.map(String::from),
                metro_code: value.location.metro_code,
                accuracy_radius: value.location.accuracy_radius,
            },
            registered_country: value.registered_country.into(),
            subdivisions: value
                .subdivisions
                .into_iter()
                .map(|subdivision| Subdivision {
                    name: subdivision.names.english.map(String::from),
                    iso_code: subdivision.iso_code.map(String::from),
                    geoname_id: subdivision.geoname_id,
                })
                .collect(),
        }
    }
}

impl From<geoip2::city::Country<'_>> for Country {
    fn from(value: geoip2::city::Country<'_>) -> Self {
        Self {
            name: value.names.english.map(String::from),
            iso_code: value.iso_code.map(String::from),
            geoname_id: value.geoname_id,
            in_eu: value.is_in_european_union,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn garbage_file_fails_to_open() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"definitely not a maxmind database").unwrap();

        let result = MaxmindOpener.open(file.path());

        assert!(matches!(result, Err(DatabaseError::Open { .. })));
    }

    #[test]
    fn converts_city_records() {
        let mut city = geoip2::City::default();
        city.city.names.english = Some("Mountain View");
        city.city.names.german = Some("Mountain View (de)");
        city.city.geoname_id = Some(5_375_480);
        city.continent.names.english = Some("North America");
        city.continent.code = Some("NA");
        city.country.names.english = Some("United States");
        city.country.iso_code = Some("US");
        city.country.is_in_european_union = Some(false);
        city.registered_country.iso_code = Some("US");
        city.location.latitude = Some(37.4223);
        city.location.longitude = Some(-122.0848);
        city.location.time_zone = Some("America/Los_Angeles");

        let mut england = geoip2::city::Subdivision::default();
        england.names.english = Some("England");
        england.iso_code = Some("ENG");
        let mut oxfordshire = geoip2::city::Subdivision::default();
        oxfordshire.names.english = Some("Oxfordshire");
        oxfordshire.iso_code = Some("OXF");
        city.subdivisions = vec![england, oxfordshire];

        let record = GeoRecord::from(city);

        assert_eq!(record.city.name.as_deref(), Some("Mountain View"));
        assert_eq!(record.city.geoname_id, Some(5_375_480));
        assert_eq!(record.continent.code.as_deref(), Some("NA"));
        assert_eq!(record.country.name.as_deref(), Some("United States"));
        assert_eq!(record.country.in_eu, Some(false));
        assert_eq!(record.registered_country.iso_code.as_deref(), Some("US"));
        assert_eq!(record.registered_country.name, None);
        assert_eq!(record.location.time_zone.as_deref(), Some("America/Los_Angeles"));
        assert_eq!(record.location.metro_code, None);
        assert_eq!(
            record
                .subdivisions
                .iter()
                .map(|subdivision| subdivision.name.as_deref().unwrap())
                .collect::<Vec<_>>(),
            ["England", "Oxfordshire"]
        );
    }
}

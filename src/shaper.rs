use poem_openapi::Object;

use crate::record::{self, GeoRecord};

/// Localized names of a geographic entity. Only English is served.
#[derive(Debug, Clone, PartialEq, Eq, Object)]
pub struct Names {
    en: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Object)]
pub struct DecoratedResult {
    client_ip: String,
    city: CityInfo,
    continent: ContinentInfo,
    country: CountryInfo,
    location: LocationInfo,
    registered_country: CountryInfo,
    subdivisions: Vec<SubdivisionInfo>,
}

#[derive(Debug, Clone, PartialEq, Eq, Object)]
pub struct CityInfo {
    names: Names,
    geoname_id: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Eq, Object)]
pub struct ContinentInfo {
    names: Names,
    code: Option<String>,
    geoname_id: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Eq, Object)]
pub struct CountryInfo {
    names: Names,
    iso_code: Option<String>,
    geoname_id: Option<u32>,
    is_in_european_union: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Object)]
pub struct LocationInfo {
    time_zone: Option<String>,
    latitude: Option<f64>,
    longitude: Option<f64>,
    metro_code: Option<u16>,
    accuracy_radius: Option<u16>,
}

#[derive(Debug, Clone, PartialEq, Eq, Object)]
pub struct SubdivisionInfo {
    names: Names,
    iso_code: Option<String>,
    geoname_id: Option<u32>,
}

/// Turns a lookup result into the response served for `ip`.
pub fn shape(ip: &str, record: &GeoRecord) -> DecoratedResult {
    DecoratedResult {
        client_ip: ip.to_owned(),
        city: CityInfo {
            names: Names::english(&record.city.name),
            geoname_id: record.city.geoname_id,
        },
        continent: ContinentInfo {
            names: Names::english(&record.continent.name),
            code: record.continent.code.clone(),
            geoname_id: record.continent.geoname_id,
        },
        country: CountryInfo::from(&record.country),
        location: LocationInfo {
            time_zone: record.location.time_zone.clone(),
            latitude: record.location.latitude,
            longitude: record.location.longitude,
            metro_code: record.location.metro_code,
            accuracy_radius: record.location.accuracy_radius,
        },
        registered_country: CountryInfo::from(&record.registered_country),
        subdivisions: record
            .subdivisions
            .iter()
            .map(|subdivision| SubdivisionInfo {
                names: Names::english(&subdivision.name),
                iso_code: subdivision.iso_code.clone(),
                geoname_id: subdivision.geoname_id,
            })
            .collect(),
    }
}

impl Names {
    fn english(name: &Option<String>) -> Self {
        Self { en: name.clone() }
    }
}

impl From<&record::Country> for CountryInfo {
    fn from(value: &record::Country) -> Self {
        Self {
            names: Names::english(&value.name),
            iso_code: value.iso_code.clone(),
            geoname_id: value.geoname_id,
            is_in_european_union: value.in_eu,
        }
    }
}

/// Geolocation attributes of a single IP address, as found in the database.
///
/// Only ever built from a successful lookup. Attributes the database doesn't carry for a
/// network are `None`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GeoRecord {
    pub city: City,
    pub continent: Continent,
    pub country: Country,
    pub location: Location,
    pub registered_country: Country,
    /// Largest division first, in database order.
    pub subdivisions: Vec<Subdivision>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct City {
    pub name: Option<String>,
    pub geoname_id: Option<u32>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Continent {
    pub name: Option<String>,
    pub code: Option<String>,
    pub geoname_id: Option<u32>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Country {
    pub name: Option<String>,
    pub iso_code: Option<String>,
    pub geoname_id: Option<u32>,
    pub in_eu: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Location {
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub time_zone: Option<String>,
    pub metro_code: Option<u16>,
    pub accuracy_radius: Option<u16>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Subdivision {
    pub name: Option<String>,
    pub iso_code: Option<String>,
    pub geoname_id: Option<u32>,
}

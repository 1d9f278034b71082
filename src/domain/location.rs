//! Resolved postal location.
//!
//! Addresses arrive already geocoded; the core never performs lookups.

use serde::{Deserialize, Serialize};

use crate::contract::{require_postcondition, require_precondition};
use crate::domain::text::is_blank;
use crate::error::Violation;

/// Mean Earth radius used for great-circle distances.
const EARTH_RADIUS_KM: f64 = 6371.0;

/// Formatted address with its coordinates. Immutable once built.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "LocationRecord", into = "LocationRecord")]
pub struct Location {
    formatted_address: String,
    latitude: f64,
    longitude: f64,
}

/// Wire shape of a [`Location`]; decoding goes through [`Location::new`].
#[derive(Debug, Clone, Serialize, Deserialize)]
struct LocationRecord {
    formatted_address: String,
    latitude: f64,
    longitude: f64,
}

impl TryFrom<LocationRecord> for Location {
    type Error = Violation;

    fn try_from(record: LocationRecord) -> Result<Self, Self::Error> {
        Self::new(&record.formatted_address, record.latitude, record.longitude)
    }
}

impl From<Location> for LocationRecord {
    fn from(location: Location) -> Self {
        Self {
            formatted_address: location.formatted_address,
            latitude: location.latitude,
            longitude: location.longitude,
        }
    }
}

impl Location {
    /// Builds a location from a geocoder result.
    ///
    /// # Errors
    ///
    /// Returns [`Violation::Precondition`] if the address is blank or a
    /// coordinate is out of range (or not a number).
    pub fn new(formatted_address: &str, latitude: f64, longitude: f64) -> Result<Self, Violation> {
        require_precondition(!is_blank(formatted_address), "address must not be blank")?;
        require_precondition(
            (-90.0..=90.0).contains(&latitude),
            "latitude must be within [-90, 90]",
        )?;
        require_precondition(
            (-180.0..=180.0).contains(&longitude),
            "longitude must be within [-180, 180]",
        )?;

        let location = Self {
            formatted_address: formatted_address.trim().to_string(),
            latitude,
            longitude,
        };
        require_postcondition(
            !location.formatted_address.is_empty(),
            "location address was not stored",
        )?;
        Ok(location)
    }

    /// Returns the formatted address.
    #[must_use]
    pub fn formatted_address(&self) -> &str {
        &self.formatted_address
    }

    /// Returns the latitude in degrees.
    #[must_use]
    pub const fn latitude(&self) -> f64 {
        self.latitude
    }

    /// Returns the longitude in degrees.
    #[must_use]
    pub const fn longitude(&self) -> f64 {
        self.longitude
    }

    /// Great-circle distance to `other` in kilometres (haversine).
    #[must_use]
    pub fn distance_km(&self, other: &Self) -> f64 {
        let lat1 = self.latitude.to_radians();
        let lat2 = other.latitude.to_radians();
        let d_lat = (other.latitude - self.latitude).to_radians();
        let d_lon = (other.longitude - self.longitude).to_radians();

        let a = (d_lat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (d_lon / 2.0).sin().powi(2);
        2.0 * EARTH_RADIUS_KM * a.sqrt().atan2((1.0 - a).sqrt())
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn rejects_blank_address() {
        assert!(matches!(
            Location::new("  ", 0.0, 0.0),
            Err(Violation::Precondition(_))
        ));
    }

    #[test]
    fn rejects_out_of_range_coordinates() {
        assert!(Location::new("Av. Italia 1234", 91.0, 0.0).is_err());
        assert!(Location::new("Av. Italia 1234", 0.0, -180.5).is_err());
        assert!(Location::new("Av. Italia 1234", f64::NAN, 0.0).is_err());
    }

    #[test]
    fn accepts_boundaries() {
        assert!(Location::new("North Pole", 90.0, 180.0).is_ok());
        assert!(Location::new("South Pole", -90.0, -180.0).is_ok());
    }

    #[test]
    fn distance_between_montevideo_and_buenos_aires() {
        let Ok(mvd) = Location::new("Montevideo", -34.9011, -56.1645) else {
            panic!("valid location");
        };
        let Ok(bue) = Location::new("Buenos Aires", -34.6037, -58.3816) else {
            panic!("valid location");
        };
        let d = mvd.distance_km(&bue);
        assert!((195.0..=210.0).contains(&d), "got {d}");
        assert!(mvd.distance_km(&mvd).abs() < 1e-9);
    }

    #[test]
    fn decoding_goes_through_the_constructor() {
        let raw = r#"{"formatted_address":" Colonia 1234 ","latitude":-34.9,"longitude":-56.2}"#;
        let Ok(location) = serde_json::from_str::<Location>(raw) else {
            panic!("valid location must decode");
        };
        assert_eq!(location.formatted_address(), "Colonia 1234");

        let out_of_range = r#"{"formatted_address":"","latitude":500.0,"longitude":0.0}"#;
        assert!(serde_json::from_str::<Location>(out_of_range).is_err());
        let blank = r#"{"formatted_address":"  ","latitude":0.0,"longitude":0.0}"#;
        assert!(serde_json::from_str::<Location>(blank).is_err());
    }

    #[test]
    fn encoding_keeps_field_names() {
        let Ok(location) = Location::new("Montevideo", -34.9, -56.2) else {
            panic!("valid location");
        };
        let Ok(value) = serde_json::to_value(&location) else {
            panic!("location must encode");
        };
        assert_eq!(
            value.get("formatted_address").and_then(|v| v.as_str()),
            Some("Montevideo")
        );
        let Ok(back) = serde_json::from_value::<Location>(value) else {
            panic!("encoded location must decode");
        };
        assert_eq!(back, location);
    }
}

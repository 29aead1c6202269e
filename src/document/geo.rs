use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Latitude/longitude pair, carried on the wire as `"lat,lng"`
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct GeoCoordinate {
    pub latitude: f64,
    pub longitude: f64,
}

impl GeoCoordinate {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }
}

impl fmt::Display for GeoCoordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.latitude, self.longitude)
    }
}

impl FromStr for GeoCoordinate {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.split(',');
        let (latitude, longitude) = match (parts.next(), parts.next(), parts.next()) {
            (Some(lat), Some(lng), None) => (lat.trim(), lng.trim()),
            _ => return Err(format!("expected 'latitude,longitude', got '{}'", s)),
        };

        let latitude = latitude
            .parse::<f64>()
            .map_err(|e| format!("invalid latitude '{}': {}", latitude, e))?;
        let longitude = longitude
            .parse::<f64>()
            .map_err(|e| format!("invalid longitude '{}': {}", longitude, e))?;

        if !latitude.is_finite() || !longitude.is_finite() {
            return Err(format!("coordinate '{}' is not finite", s));
        }

        Ok(Self::new(latitude, longitude))
    }
}

impl Serialize for GeoCoordinate {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for GeoCoordinate {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(de::Error::custom)
    }
}

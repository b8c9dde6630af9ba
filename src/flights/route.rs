use std::fmt;

/// Canonical, direction-independent identity of a route.
///
/// The two codes are stored in lexicographic order so `MIA-EZE` and
/// `EZE-MIA` compare equal.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RouteKey {
    first: String,
    second: String,
}

impl RouteKey {
    pub fn new(origin: &str, destination: &str) -> Self {
        let (first, second) = if origin <= destination {
            (origin, destination)
        } else {
            (destination, origin)
        };
        Self {
            first: first.to_string(),
            second: second.to_string(),
        }
    }

    pub fn first(&self) -> &str {
        &self.first
    }

    pub fn second(&self) -> &str {
        &self.second
    }
}

impl fmt::Display for RouteKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.first, self.second)
    }
}

/// Domestic when both ends share a country
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Region {
    Domestic,
    International,
}

impl Region {
    pub fn classify(origin_country: &str, destination_country: &str) -> Self {
        if origin_country == destination_country {
            Region::Domestic
        } else {
            Region::International
        }
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Region::Domestic => write!(f, "Domestic"),
            Region::International => write!(f, "International"),
        }
    }
}

/// Latitude/longitude in degrees
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

/// Handle to an airport owned by a [`FlightRegistry`](super::FlightRegistry)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AirportId(pub(crate) usize);

#[derive(Debug, Clone, PartialEq)]
pub struct Airport {
    pub code: String,
    pub coordinates: Option<Coordinates>,
    pub country: Option<String>,
}

impl Airport {
    /// An airport known only by its code
    pub fn bare(code: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            coordinates: None,
            country: None,
        }
    }

    pub fn set_coordinates(&mut self, latitude: f64, longitude: f64) {
        self.coordinates = Some(Coordinates {
            latitude,
            longitude,
        });
    }

    pub fn set_country(&mut self, country: impl Into<String>) {
        self.country = Some(country.into());
    }
}

/// One unique route, however many times it was flown
#[derive(Debug, Clone, PartialEq)]
pub struct Flight {
    pub key: RouteKey,
    pub airport1: AirportId,
    pub airport2: AirportId,
    /// Number of log rows mapping to this route
    pub count: u32,
    /// Unset while either country is unknown
    pub region: Option<Region>,
    /// Miles
    pub distance: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_route_key_ignores_direction() {
        assert_eq!(RouteKey::new("MIA", "EZE"), RouteKey::new("EZE", "MIA"));
        assert_eq!(RouteKey::new("MIA", "EZE").to_string(), "EZE-MIA");
    }

    #[test]
    fn test_route_key_endpoints() {
        let key = RouteKey::new("LAX", "JFK");
        assert_eq!(key.first(), "JFK");
        assert_eq!(key.second(), "LAX");
    }

    #[test]
    fn test_region_classify() {
        assert_eq!(Region::classify("US", "US"), Region::Domestic);
        assert_eq!(Region::classify("US", "AR"), Region::International);
    }
}

use super::DistanceResolver;
use crate::error::{FlightMapError, Result};
use crate::flights::{Airport, Coordinates};

/// Mean Earth radius in statute miles
const EARTH_RADIUS_MILES: f64 = 3958.8;

/// Offline resolver using the haversine formula
#[derive(Debug, Default, Clone, Copy)]
pub struct GreatCircleResolver;

impl GreatCircleResolver {
    pub fn new() -> Self {
        Self
    }
}

/// Great-circle distance in miles between two points
pub fn haversine_miles(a: Coordinates, b: Coordinates) -> f64 {
    let (lat1, lat2) = (a.latitude.to_radians(), b.latitude.to_radians());
    let dlat = lat2 - lat1;
    let dlon = (b.longitude - a.longitude).to_radians();

    let h = (dlat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (dlon / 2.0).sin().powi(2);
    2.0 * EARTH_RADIUS_MILES * h.sqrt().min(1.0).asin()
}

impl DistanceResolver for GreatCircleResolver {
    fn distance(&self, origin: &Airport, destination: &Airport) -> Result<u32> {
        let a = origin
            .coordinates
            .ok_or_else(|| FlightMapError::UnknownAirport(origin.code.clone()))?;
        let b = destination
            .coordinates
            .ok_or_else(|| FlightMapError::UnknownAirport(destination.code.clone()))?;

        Ok(haversine_miles(a, b).round() as u32)
    }

    fn name(&self) -> &str {
        "great-circle"
    }
}

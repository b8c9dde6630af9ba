use std::collections::HashMap;
use tracing::debug;

use super::route::{Airport, AirportId, Flight, Region, RouteKey};
use crate::airports::AirportDirectory;
use crate::error::{FlightMapError, Result};
use crate::resolver::DistanceResolver;
use crate::sheet::FlightLeg;

/// What happened to a single leg when it was recorded
#[derive(Debug, Clone, PartialEq)]
pub struct LegOutcome {
    pub key: RouteKey,
    /// Distance of the route the leg maps to
    pub route_distance: u32,
    /// True when the distance came from the resolver
    pub resolved: bool,
    /// True when this leg created the route
    pub new_route: bool,
}

/// Every unique route and airport seen in one pass over the log.
///
/// Routes and airports are kept in first-seen order.
#[derive(Debug, Default)]
pub struct FlightRegistry {
    airports: Vec<Airport>,
    airport_index: HashMap<String, AirportId>,
    flights: Vec<Flight>,
    flight_index: HashMap<RouteKey, usize>,
}

impl FlightRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the airport for `code`, creating it on first reference.
    ///
    /// A newly created airport takes its coordinates and country from the
    /// directory; a code the directory doesn't know stays bare.
    pub fn airport_or_insert(&mut self, code: &str, directory: &AirportDirectory) -> AirportId {
        if let Some(id) = self.airport_index.get(code) {
            return *id;
        }

        let mut airport = Airport::bare(code);
        match directory.lookup(code) {
            Some(info) => {
                airport.set_coordinates(info.latitude, info.longitude);
                airport.set_country(info.country.clone());
            }
            None => debug!(code, "Airport not in directory"),
        }

        let id = AirportId(self.airports.len());
        self.airports.push(airport);
        self.airport_index.insert(code.to_string(), id);
        id
    }

    /// Fold one log row into the registry.
    ///
    /// A repeated route only has its count bumped; its distance stays whatever
    /// the first row supplied or the resolver returned for it.
    pub fn record_leg(
        &mut self,
        leg: &FlightLeg,
        directory: &AirportDirectory,
        resolver: &dyn DistanceResolver,
    ) -> Result<LegOutcome> {
        let key = RouteKey::new(&leg.origin, &leg.destination);

        if let Some(&index) = self.flight_index.get(&key) {
            let flight = &mut self.flights[index];
            flight.count += 1;
            return Ok(LegOutcome {
                key,
                route_distance: flight.distance,
                resolved: false,
                new_route: false,
            });
        }

        let airport1 = self.airport_or_insert(key.first(), directory);
        let airport2 = self.airport_or_insert(key.second(), directory);

        let (a1, a2) = (self.airport(airport1), self.airport(airport2));
        let region = match (&a1.country, &a2.country) {
            (Some(c1), Some(c2)) => Some(Region::classify(c1, c2)),
            _ => None,
        };

        let (distance, resolved) = match leg.mileage {
            Some(miles) => (miles, false),
            None => {
                let miles = resolver.distance(a1, a2)?;
                if miles == 0 {
                    return Err(FlightMapError::ZeroMileage {
                        origin: a1.code.clone(),
                        destination: a2.code.clone(),
                    });
                }
                debug!(route = %key, miles, resolver = resolver.name(), "Resolved missing mileage");
                (miles, true)
            }
        };

        self.flight_index.insert(key.clone(), self.flights.len());
        self.flights.push(Flight {
            key: key.clone(),
            airport1,
            airport2,
            count: 1,
            region,
            distance,
        });

        Ok(LegOutcome {
            key,
            route_distance: distance,
            resolved,
            new_route: true,
        })
    }

    pub fn airport(&self, id: AirportId) -> &Airport {
        &self.airports[id.0]
    }

    pub fn airport_by_code(&self, code: &str) -> Option<&Airport> {
        self.airport_index.get(code).map(|id| self.airport(*id))
    }

    pub fn airports(&self) -> &[Airport] {
        &self.airports
    }

    pub fn flights(&self) -> &[Flight] {
        &self.flights
    }

    pub fn flight(&self, key: &RouteKey) -> Option<&Flight> {
        self.flight_index.get(key).map(|i| &self.flights[*i])
    }

    /// Repeat count of the busiest route, 0 when empty
    pub fn most_frequent_count(&self) -> u32 {
        self.flights.iter().map(|f| f.count).max().unwrap_or(0)
    }
}

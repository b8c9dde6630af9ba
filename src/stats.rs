use std::collections::BTreeSet;

use crate::flights::FlightRegistry;
use crate::sheet::FlightTable;

/// Summary figures shown on the map
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlightStats {
    /// Sum of the Mileage column over every row, repeats included
    pub total_distance: u64,
    pub flights_flown: usize,
    pub airports_visited: usize,
    pub countries_visited: usize,
    pub unique_routes: usize,
    pub most_frequent_count: u32,
}

impl FlightStats {
    pub fn compute(table: &FlightTable, registry: &FlightRegistry, flights_flown: usize) -> Self {
        let countries: BTreeSet<&str> = registry
            .airports()
            .iter()
            .filter_map(|a| a.country.as_deref())
            .filter(|c| !c.is_empty())
            .collect();

        Self {
            total_distance: table.mileages().sum(),
            flights_flown,
            airports_visited: registry.airports().len(),
            countries_visited: countries.len(),
            unique_routes: registry.flights().len(),
            most_frequent_count: registry.most_frequent_count(),
        }
    }

    pub fn distance_label(&self) -> String {
        format!("{} miles flown", self.total_distance)
    }

    pub fn flights_label(&self) -> String {
        format!("{} flights flown", self.flights_flown)
    }

    pub fn places_label(&self) -> String {
        format!(
            "{} airports visited in {} countries",
            self.airports_visited, self.countries_visited
        )
    }
}

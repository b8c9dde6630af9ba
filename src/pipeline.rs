//! The batch run: read → dedupe/enrich → fill in → write back.

use tracing::{info, info_span};

use crate::airports::AirportDirectory;
use crate::error::Result;
use crate::flights::FlightRegistry;
use crate::resolver::DistanceResolver;
use crate::sheet::{FlightLogStore, FlightTable};
use crate::stats::FlightStats;
use crate::ui::{Phase, Tally, Ui};

/// Everything a run produces
#[derive(Debug)]
pub struct EnrichedLog {
    /// The log with every blank mileage filled
    pub table: FlightTable,
    pub registry: FlightRegistry,
    pub stats: FlightStats,
    /// Number of routes whose distance came from the resolver
    pub resolved: usize,
    /// Rows whose mileage cell was filled in
    pub filled: usize,
}

/// Deduplicate the table into routes and fill every blank mileage in place
pub fn enrich(
    mut table: FlightTable,
    directory: &AirportDirectory,
    resolver: &dyn DistanceResolver,
    ui: &mut impl Ui,
) -> Result<EnrichedLog> {
    let _span = info_span!("enrich", resolver = resolver.name()).entered();

    let legs = table.legs()?;
    let total = legs.len() as u64;
    let mut registry = FlightRegistry::new();
    let mut tally = Tally::default();
    let mut filled = 0;

    for (i, leg) in legs.iter().enumerate() {
        let outcome = registry.record_leg(leg, directory, resolver)?;

        if outcome.resolved {
            tally.resolved += 1;
            ui.log(format!("{}: {} miles ({})", outcome.key, outcome.route_distance, resolver.name()));
        }
        if leg.mileage.is_none() {
            table.set_mileage(leg.index, outcome.route_distance);
            filled += 1;
        }

        tally.legs = i + 1;
        tally.routes = registry.flights().len();
        ui.set_tally(tally);
        ui.set_progress(i as u64 + 1, total, "Legs");
    }
    ui.clear_progress();

    let stats = FlightStats::compute(&table, &registry, legs.len());
    info!(
        legs = stats.flights_flown,
        routes = stats.unique_routes,
        resolved = tally.resolved,
        filled,
        "Enriched flight log"
    );

    Ok(EnrichedLog {
        table,
        registry,
        stats,
        resolved: tally.resolved,
        filled,
    })
}

/// Read the log from `store`, enrich it, and write the whole table back
/// when `write_back` is set
pub fn run(
    store: &dyn FlightLogStore,
    directory: &AirportDirectory,
    resolver: &dyn DistanceResolver,
    write_back: bool,
    ui: &mut impl Ui,
) -> Result<EnrichedLog> {
    ui.set_phase(Phase::Reading);
    ui.set_info(store.describe());
    let table = store.read()?;
    ui.log(format!("Read {} rows from {}", table.len(), store.describe()));

    ui.set_phase(Phase::Enriching);
    let enriched = enrich(table, directory, resolver, ui)?;

    if write_back {
        ui.set_phase(Phase::Writing);
        store.write(&enriched.table)?;
        ui.log(format!(
            "Wrote {} rows ({} filled) to {}",
            enriched.table.len(),
            enriched.filled,
            store.describe()
        ));
    } else if enriched.filled > 0 {
        ui.log(format!("Skipped writing {} filled mileages", enriched.filled));
    }

    Ok(enriched)
}

use anyhow::{bail, Context, Result};
use flight_mileage_map::{
    airports::AirportDirectory,
    cli::{Cli, Commands, SourceArgs},
    config::Config,
    flights::Airport,
    logging::init_logging,
    pipeline::{self, EnrichedLog},
    plot::{export_figure, Figure},
    resolver::{
        cache::default_cache_path, CachedResolver, DistanceResolver, GreatCircleResolver,
        ResolverKind, WebFlyerResolver,
    },
    sheet::{CsvStore, FlightLogStore, GoogleSheetsStore},
    stats::FlightStats,
    writer::export_to_sqlite,
    LogUi, Phase, Ui, UiApp,
};
use std::time::Instant;
use tracing::info;

fn main() -> Result<()> {
    let cli = Cli::parse_args();
    let tui = matches!(cli.command, Commands::Sync { no_tui: false, .. });
    init_logging(cli.verbose, tui, cli.log_file.as_deref())?;

    let mut config = Config::load(cli.config.as_deref())?;

    match cli.command {
        Commands::Sync {
            source,
            output_dir,
            title,
            no_write,
            no_display,
            no_tui,
            sqlite,
        } => {
            let start = Instant::now();
            apply_overrides(&mut config, &source);
            if let Some(dir) = output_dir {
                config.map.output_dir = dir;
            }
            if let Some(title) = title {
                config.map.title = title;
            }

            let directory = load_directory(&config)?;
            let store = open_store(&config, &source)?;
            let resolver = build_resolver(&config, source.no_cache)?;

            if no_tui {
                let mut ui = LogUi::new();
                let log = pipeline::run(store.as_ref(), &directory, resolver.as_ref(), !no_write, &mut ui)?;
                let figure = render(&config, &log, sqlite.as_deref(), &mut ui)?;
                print_summary(&log.stats, start);
                if !no_display {
                    UiApp::new()?.show_globe(&figure)?;
                }
            } else {
                let mut ui = UiApp::new()?;
                let outcome = pipeline::run(store.as_ref(), &directory, resolver.as_ref(), !no_write, &mut ui)
                    .map_err(anyhow::Error::from)
                    .and_then(|log| {
                        let figure = render(&config, &log, sqlite.as_deref(), &mut ui)?;
                        Ok((log, figure))
                    });

                // Leave the alternate screen before reporting an error
                let (log, figure) = match outcome {
                    Ok(done) => done,
                    Err(e) => {
                        ui.restore()?;
                        return Err(e);
                    }
                };

                if no_display {
                    ui.finish(&log.stats.distance_label())?;
                } else {
                    ui.show_globe(&figure)?;
                }
                print_summary(&log.stats, start);
            }
        }

        Commands::Resolve {
            origin,
            destination,
            source,
        } => {
            apply_overrides(&mut config, &source);
            let resolver = build_resolver(&config, source.no_cache)?;

            // The great-circle resolver needs coordinates; the scraper only codes
            let (origin, destination) = if config.resolver.kind == ResolverKind::GreatCircle {
                let directory = load_directory(&config)?;
                (
                    directory_airport(&directory, &origin),
                    directory_airport(&directory, &destination),
                )
            } else {
                (
                    Airport::bare(origin.to_ascii_uppercase()),
                    Airport::bare(destination.to_ascii_uppercase()),
                )
            };

            let miles = resolver.distance(&origin, &destination)?;
            println!("{}-{}: {} miles", origin.code, destination.code, miles);
        }

        Commands::Stats { source } => {
            apply_overrides(&mut config, &source);
            let log = enrich_only(&config, &source)?;

            println!("{}", log.stats.distance_label());
            println!("{}", log.stats.flights_label());
            println!("{}", log.stats.places_label());
            println!(
                "{} unique routes, busiest flown {} times",
                log.stats.unique_routes, log.stats.most_frequent_count
            );
            if log.filled > 0 {
                println!("({} blank mileages filled, not written back)", log.filled);
            }
        }

        Commands::Export { output_db, source } => {
            let start = Instant::now();
            apply_overrides(&mut config, &source);
            let log = enrich_only(&config, &source)?;

            let records = export_to_sqlite(&log, &output_db)?;
            println!(
                "\nCreated {:?} ({} records) in {:.1}s",
                output_db,
                records,
                start.elapsed().as_secs_f64()
            );
        }
    }

    Ok(())
}

fn apply_overrides(config: &mut Config, source: &SourceArgs) {
    if let Some(id) = &source.sheet_id {
        config.sheet.spreadsheet_id = Some(id.clone());
    }
    if let Some(name) = &source.sheet_name {
        config.sheet.sheet_name = name.clone();
    }
    if let Some(path) = &source.credentials {
        config.sheet.credentials = path.clone();
    }
    if let Some(path) = &source.airports {
        config.airports.path = path.clone();
    }
    if let Some(kind) = source.resolver {
        config.resolver.kind = kind;
    }
}

fn load_directory(config: &Config) -> Result<AirportDirectory> {
    AirportDirectory::from_path(&config.airports.path)
        .with_context(|| format!("Failed to load airports from {:?}", config.airports.path))
}

fn directory_airport(directory: &AirportDirectory, code: &str) -> Airport {
    let code = code.to_ascii_uppercase();
    let mut airport = Airport::bare(code.as_str());
    if let Some(info) = directory.lookup(&code) {
        airport.set_coordinates(info.latitude, info.longitude);
        airport.set_country(info.country.clone());
    }
    airport
}

fn open_store(config: &Config, source: &SourceArgs) -> Result<Box<dyn FlightLogStore>> {
    if let Some(path) = &source.log_csv {
        return Ok(Box::new(CsvStore::new(path)));
    }

    let Some(spreadsheet_id) = &config.sheet.spreadsheet_id else {
        bail!("No spreadsheet configured: pass --sheet-id, --log-csv, or set sheet.spreadsheet_id");
    };

    let store = GoogleSheetsStore::connect(
        spreadsheet_id.as_str(),
        config.sheet.sheet_name.as_str(),
        &config.sheet.credentials,
        config.resolver.timeout(),
    )
    .context("Failed to connect to Google Sheets")?;
    Ok(Box::new(store))
}

fn build_resolver(config: &Config, no_cache: bool) -> Result<Box<dyn DistanceResolver>> {
    let inner: Box<dyn DistanceResolver> = match config.resolver.kind {
        ResolverKind::Webflyer => Box::new(WebFlyerResolver::new(config.resolver.timeout())?),
        ResolverKind::GreatCircle => Box::new(GreatCircleResolver::new()),
    };

    if no_cache || !config.resolver.cache {
        return Ok(inner);
    }

    let cache_path = match &config.resolver.cache_path {
        Some(path) => path.clone(),
        None => default_cache_path()?,
    };
    let cached = CachedResolver::open(inner, &cache_path)
        .with_context(|| format!("Failed to open mileage cache {:?}", cache_path))?;
    Ok(Box::new(cached))
}

/// Read and enrich without writing back or plotting
fn enrich_only(config: &Config, source: &SourceArgs) -> Result<EnrichedLog> {
    let directory = load_directory(config)?;
    let store = open_store(config, source)?;
    let resolver = build_resolver(config, source.no_cache)?;
    let mut ui = LogUi::new();
    Ok(pipeline::run(store.as_ref(), &directory, resolver.as_ref(), false, &mut ui)?)
}

fn render(
    config: &Config,
    log: &EnrichedLog,
    sqlite: Option<&std::path::Path>,
    ui: &mut impl Ui,
) -> Result<Figure> {
    ui.set_phase(Phase::Rendering);
    let figure = Figure::build(&log.registry, &log.stats, &config.map.settings())?;
    let (html, png) = export_figure(&figure, &config.map.output_dir)?;
    ui.log(format!("Wrote {} and {}", html.display(), png.display()));

    if let Some(path) = sqlite {
        let records = export_to_sqlite(log, path)?;
        ui.log(format!("Exported {} records to {}", records, path.display()));
    }

    ui.set_phase(Phase::Complete);
    Ok(figure)
}

fn print_summary(stats: &FlightStats, start: Instant) {
    info!(elapsed_secs = start.elapsed().as_secs_f64(), "Run complete");
    println!(
        "\n{} · {} · {} ({:.1}s)",
        stats.distance_label(),
        stats.flights_label(),
        stats.places_label(),
        start.elapsed().as_secs_f64()
    );
}

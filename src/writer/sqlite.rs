use rusqlite::types::Value;
use rusqlite::{params_from_iter, Connection};
use std::path::Path;
use tracing::{debug, info};

use super::schema::{TableSchema, AIRPORTS, ALL_TABLES, LEGS, ROUTES};
use super::schema_gen::{generate_create_table, generate_indexes, generate_insert};
use crate::error::Result;
use crate::flights::RouteKey;
use crate::pipeline::EnrichedLog;

pub struct SqliteWriter {
    conn: Connection,
}

impl SqliteWriter {
    pub fn new(db_path: &Path) -> Result<Self> {
        // Each export starts from an empty database
        if db_path.exists() {
            std::fs::remove_file(db_path)?;
        }

        let conn = Connection::open(db_path)?;
        conn.execute_batch(
            "PRAGMA foreign_keys = ON;
             PRAGMA journal_mode = WAL;
             PRAGMA synchronous = NORMAL;",
        )?;

        Ok(Self { conn })
    }

    /// Create all tables for the given schemas
    pub fn create_tables(&self, schemas: &[&TableSchema]) -> Result<()> {
        for schema in schemas {
            self.conn.execute(&generate_create_table(schema), [])?;
            for index_sql in generate_indexes(schema) {
                self.conn.execute(&index_sql, [])?;
            }
        }
        debug!(tables = schemas.len(), "Created export tables");
        Ok(())
    }

    /// Insert airports, routes and legs in one transaction
    pub fn write_log(&mut self, log: &EnrichedLog) -> Result<u64> {
        let tx = self.conn.transaction()?;
        let mut count: u64 = 0;

        {
            let mut stmt = tx.prepare_cached(&generate_insert(&AIRPORTS))?;
            for airport in log.registry.airports() {
                let (lat, lon) = match airport.coordinates {
                    Some(c) => (Value::Real(c.latitude), Value::Real(c.longitude)),
                    None => (Value::Null, Value::Null),
                };
                stmt.execute(params_from_iter([
                    Value::Text(airport.code.clone()),
                    lat,
                    lon,
                    optional_text(airport.country.as_deref()),
                ]))?;
                count += 1;
            }

            let mut stmt = tx.prepare_cached(&generate_insert(&ROUTES))?;
            for flight in log.registry.flights() {
                stmt.execute(params_from_iter([
                    Value::Text(flight.key.to_string()),
                    Value::Text(log.registry.airport(flight.airport1).code.clone()),
                    Value::Text(log.registry.airport(flight.airport2).code.clone()),
                    Value::Integer(flight.count.into()),
                    optional_text(flight.region.map(|r| r.to_string()).as_deref()),
                    Value::Integer(flight.distance.into()),
                ]))?;
                count += 1;
            }

            // Parsed from the filled table, so no mileage is blank here
            let mut stmt = tx.prepare_cached(&generate_insert(&LEGS))?;
            for leg in log.table.legs()? {
                let route = RouteKey::new(&leg.origin, &leg.destination);
                stmt.execute(params_from_iter([
                    Value::Integer((leg.index + 2) as i64),
                    Value::Text(leg.origin),
                    Value::Text(leg.destination),
                    Value::Text(route.to_string()),
                    leg.mileage.map_or(Value::Null, |m| Value::Integer(m.into())),
                ]))?;
                count += 1;
            }
        }

        tx.commit()?;
        Ok(count)
    }

    pub fn finalize(self) -> Result<()> {
        self.conn.execute_batch("PRAGMA optimize;")?;
        Ok(())
    }
}

fn optional_text(value: Option<&str>) -> Value {
    value.map_or(Value::Null, |s| Value::Text(s.to_string()))
}

/// Export an enriched log to a fresh SQLite database
pub fn export_to_sqlite(log: &EnrichedLog, output_db: &Path) -> Result<u64> {
    let mut writer = SqliteWriter::new(output_db)?;
    writer.create_tables(ALL_TABLES)?;
    let records = writer.write_log(log)?;
    writer.finalize()?;

    info!(path = %output_db.display(), records, "Exported to SQLite");
    Ok(records)
}

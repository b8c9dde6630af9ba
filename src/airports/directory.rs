//! Static airport reference table keyed by IATA code.
//!
//! The expected layout is the OurAirports `airports.csv` export; only the
//! `iata_code`, `latitude_deg`, `longitude_deg` and `iso_country` columns are
//! read and everything else is ignored.

use serde::Deserialize;
use std::collections::HashMap;
use std::io::Read;
use std::path::Path;
use tracing::debug;

use crate::error::Result;

/// Coordinates and country for one airport
#[derive(Debug, Clone, PartialEq)]
pub struct AirportInfo {
    pub latitude: f64,
    pub longitude: f64,
    pub country: String,
}

#[derive(Debug, Deserialize)]
struct AirportRecord {
    #[serde(default)]
    iata_code: String,
    latitude_deg: f64,
    longitude_deg: f64,
    #[serde(default)]
    iso_country: String,
}

/// Read-only lookup from airport code to location
#[derive(Debug, Default)]
pub struct AirportDirectory {
    entries: HashMap<String, AirportInfo>,
}

impl AirportDirectory {
    /// Load the directory from a CSV file on disk
    pub fn from_path(path: &Path) -> Result<Self> {
        let reader = csv::Reader::from_path(path)?;
        let directory = Self::from_csv_reader(reader)?;
        debug!(path = %path.display(), airports = directory.len(), "Loaded airport directory");
        Ok(directory)
    }

    /// Load the directory from any CSV source with a header row
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        Self::from_csv_reader(csv::Reader::from_reader(reader))
    }

    fn from_csv_reader<R: Read>(mut reader: csv::Reader<R>) -> Result<Self> {
        let mut entries = HashMap::new();

        for record in reader.deserialize() {
            let record: AirportRecord = record?;
            let code = record.iata_code.trim();
            if code.is_empty() {
                continue;
            }

            // First entry wins when a code appears twice
            entries
                .entry(code.to_ascii_uppercase())
                .or_insert_with(|| AirportInfo {
                    latitude: record.latitude_deg,
                    longitude: record.longitude_deg,
                    country: record.iso_country.trim().to_string(),
                });
        }

        Ok(Self { entries })
    }

    /// Look up an airport by its code
    pub fn lookup(&self, code: &str) -> Option<&AirportInfo> {
        self.entries.get(code)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "\
id,ident,type,name,latitude_deg,longitude_deg,iso_country,iata_code
1,KJFK,large_airport,John F Kennedy,40.639447,-73.779317,US,JFK
2,KLAX,large_airport,Los Angeles,33.942501,-118.407997,US,LAX
3,00A,heliport,Total RF Heliport,40.070985,-74.933689,US,
4,SAEZ,large_airport,Ministro Pistarini,-34.8222,-58.5358,AR,EZE
";

    #[test]
    fn test_lookup_known_code() {
        let directory = AirportDirectory::from_reader(SAMPLE.as_bytes()).unwrap();
        let eze = directory.lookup("EZE").unwrap();
        assert_eq!(eze.country, "AR");
        assert!((eze.latitude + 34.8222).abs() < 1e-9);
    }

    #[test]
    fn test_rows_without_iata_code_are_skipped() {
        let directory = AirportDirectory::from_reader(SAMPLE.as_bytes()).unwrap();
        assert_eq!(directory.len(), 3);
        assert!(directory.lookup("").is_none());
    }

    #[test]
    fn test_unknown_code() {
        let directory = AirportDirectory::from_reader(SAMPLE.as_bytes()).unwrap();
        assert!(directory.lookup("XXX").is_none());
    }
}

use std::path::PathBuf;
use tracing::debug;

use super::{FlightLogStore, FlightTable};
use crate::error::Result;

/// Flight log kept in a local CSV file
pub struct CsvStore {
    path: PathBuf,
}

impl CsvStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl FlightLogStore for CsvStore {
    fn read(&self) -> Result<FlightTable> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_path(&self.path)?;

        let mut values = Vec::new();
        for record in reader.records() {
            let record = record?;
            values.push(record.iter().map(str::to_string).collect());
        }

        debug!(path = %self.path.display(), rows = values.len(), "Read flight log");
        FlightTable::from_values(values)
    }

    fn write(&self, table: &FlightTable) -> Result<()> {
        let mut writer = csv::WriterBuilder::new()
            .flexible(true)
            .from_path(&self.path)?;

        writer.write_record(table.header())?;
        for row in table.rows() {
            writer.write_record(row)?;
        }
        writer.flush()?;

        debug!(path = %self.path.display(), rows = table.len(), "Wrote flight log");
        Ok(())
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_write_preserves_extra_columns() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("flights.csv");
        fs::write(&path, "Date,From,To,Mileage\n2019-03-01,EZE,MIA,\n").unwrap();

        let store = CsvStore::new(&path);
        let mut table = store.read().unwrap();
        table.set_mileage(0, 4405);
        store.write(&table).unwrap();

        let contents = fs::read_to_string(&path).unwrap();
        assert_eq!(contents, "Date,From,To,Mileage\n2019-03-01,EZE,MIA,4405\n");
    }
}

//! Flight log storage: the remote spreadsheet and a local CSV stand-in.

pub mod auth;
pub mod csv_file;
pub mod google;
pub mod table;

pub use csv_file::CsvStore;
pub use google::GoogleSheetsStore;
pub use table::*;

use crate::error::Result;

/// A tabular store holding the flight log
pub trait FlightLogStore {
    /// Read the whole log, header included
    fn read(&self) -> Result<FlightTable>;

    /// Replace the log body with the given table in one call
    fn write(&self, table: &FlightTable) -> Result<()>;

    /// Human-readable location for progress output
    fn describe(&self) -> String;
}

use crate::error::{FlightMapError, Result};

pub const FROM_COLUMN: &str = "From";
pub const TO_COLUMN: &str = "To";
pub const MILEAGE_COLUMN: &str = "Mileage";

/// One directional trip parsed out of the log
#[derive(Debug, Clone, PartialEq)]
pub struct FlightLeg {
    /// Position in the table body (0-based, header excluded)
    pub index: usize,
    pub origin: String,
    pub destination: String,
    pub mileage: Option<u32>,
}

/// The flight log as a grid of cells.
///
/// Every column is kept verbatim so the table can be written back in full;
/// only `From`, `To` and `Mileage` are interpreted.
#[derive(Debug, Clone, PartialEq)]
pub struct FlightTable {
    header: Vec<String>,
    rows: Vec<Vec<String>>,
    from_col: usize,
    to_col: usize,
    mileage_col: usize,
}

impl FlightTable {
    /// Build a table from raw values, the first row being the header.
    /// Short rows are padded with blanks to the header width.
    pub fn from_values(mut values: Vec<Vec<String>>) -> Result<Self> {
        if values.is_empty() {
            return Err(FlightMapError::MissingColumn(FROM_COLUMN.to_string()));
        }

        let header: Vec<String> = values.remove(0).into_iter().map(|h| h.trim().to_string()).collect();
        let from_col = find_column(&header, FROM_COLUMN)?;
        let to_col = find_column(&header, TO_COLUMN)?;
        let mileage_col = find_column(&header, MILEAGE_COLUMN)?;

        let width = header.len();
        let rows = values
            .into_iter()
            .map(|mut row| {
                row.resize(width.max(row.len()), String::new());
                row
            })
            .collect();

        Ok(Self {
            header,
            rows,
            from_col,
            to_col,
            mileage_col,
        })
    }

    pub fn header(&self) -> &[String] {
        &self.header
    }

    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Widest row, which may exceed the header when trailing cells are unnamed
    pub fn width(&self) -> usize {
        self.rows
            .iter()
            .map(Vec::len)
            .chain(std::iter::once(self.header.len()))
            .max()
            .unwrap_or(0)
    }

    /// Parse every non-blank row into a leg
    pub fn legs(&self) -> Result<Vec<FlightLeg>> {
        self.rows
            .iter()
            .enumerate()
            .filter(|(_, row)| row.iter().any(|cell| !cell.trim().is_empty()))
            .map(|(index, row)| {
                let sheet_row = index + 2;
                Ok(FlightLeg {
                    index,
                    origin: parse_code(&row[self.from_col], sheet_row, FROM_COLUMN)?,
                    destination: parse_code(&row[self.to_col], sheet_row, TO_COLUMN)?,
                    mileage: parse_mileage(&row[self.mileage_col], sheet_row)?,
                })
            })
            .collect()
    }

    /// Overwrite the mileage cell of one row
    pub fn set_mileage(&mut self, index: usize, miles: u32) {
        if let Some(row) = self.rows.get_mut(index) {
            row[self.mileage_col] = miles.to_string();
        }
    }

    /// Mileage cells of every row, blanks and junk counted as zero
    pub fn mileages(&self) -> impl Iterator<Item = u64> + '_ {
        self.rows.iter().map(move |row| {
            parse_mileage(&row[self.mileage_col], 0)
                .ok()
                .flatten()
                .map(u64::from)
                .unwrap_or(0)
        })
    }
}

fn find_column(header: &[String], name: &str) -> Result<usize> {
    header
        .iter()
        .position(|h| h.eq_ignore_ascii_case(name))
        .ok_or_else(|| FlightMapError::MissingColumn(name.to_string()))
}

fn parse_code(cell: &str, row: usize, column: &str) -> Result<String> {
    let code = cell.trim();
    if code.is_empty() {
        return Err(FlightMapError::MissingCode {
            row,
            column: column.to_string(),
        });
    }
    Ok(code.to_ascii_uppercase())
}

/// Parse a mileage cell. Blank means unknown; thousands separators are allowed.
pub fn parse_mileage(cell: &str, row: usize) -> Result<Option<u32>> {
    let cleaned: String = cell
        .chars()
        .filter(|c| !c.is_whitespace() && *c != ',')
        .collect();

    if cleaned.is_empty() {
        return Ok(None);
    }

    if let Ok(miles) = cleaned.parse::<u32>() {
        return Ok(Some(miles));
    }

    match cleaned.parse::<f64>() {
        Ok(miles) if miles.is_finite() && miles >= 0.0 && miles <= u32::MAX as f64 => {
            Ok(Some(miles.round() as u32))
        }
        _ => Err(FlightMapError::InvalidMileage {
            row,
            value: cell.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn values(rows: &[&[&str]]) -> Vec<Vec<String>> {
        rows.iter()
            .map(|r| r.iter().map(|c| c.to_string()).collect())
            .collect()
    }

    #[test]
    fn test_parse_mileage() {
        assert_eq!(parse_mileage("", 2).unwrap(), None);
        assert_eq!(parse_mileage("  ", 2).unwrap(), None);
        assert_eq!(parse_mileage("7300", 2).unwrap(), Some(7300));
        assert_eq!(parse_mileage("7,300", 2).unwrap(), Some(7300));
        assert_eq!(parse_mileage("2475.0", 2).unwrap(), Some(2475));
        assert!(matches!(
            parse_mileage("far", 5),
            Err(FlightMapError::InvalidMileage { row: 5, .. })
        ));
        assert!(parse_mileage("-12", 2).is_err());
    }

    #[test]
    fn test_short_rows_are_padded() {
        let table = FlightTable::from_values(values(&[
            &["Date", "From", "To", "Mileage", "Airline"],
            &["2019-01-02", "mia", "EZE"],
        ]))
        .unwrap();

        assert_eq!(table.rows()[0].len(), 5);
        let legs = table.legs().unwrap();
        assert_eq!(legs[0].origin, "MIA");
        assert_eq!(legs[0].mileage, None);
    }

    #[test]
    fn test_missing_column() {
        let err = FlightTable::from_values(values(&[&["From", "To"]])).unwrap_err();
        assert!(matches!(err, FlightMapError::MissingColumn(c) if c == "Mileage"));
    }

    #[test]
    fn test_blank_code_is_an_error() {
        let table = FlightTable::from_values(values(&[
            &["From", "To", "Mileage"],
            &["MIA", " ", "100"],
        ]))
        .unwrap();
        assert!(matches!(
            table.legs(),
            Err(FlightMapError::MissingCode { row: 2, .. })
        ));
    }

    #[test]
    fn test_blank_rows_are_kept_but_not_parsed() {
        let table = FlightTable::from_values(values(&[
            &["From", "To", "Mileage"],
            &["", "", ""],
            &["MIA", "EZE", "7300"],
        ]))
        .unwrap();
        assert_eq!(table.len(), 2);

        let legs = table.legs().unwrap();
        assert_eq!(legs.len(), 1);
        assert_eq!(legs[0].index, 1);
    }

    #[test]
    fn test_set_mileage() {
        let mut table = FlightTable::from_values(values(&[
            &["From", "To", "Mileage"],
            &["EZE", "MIA", ""],
        ]))
        .unwrap();
        table.set_mileage(0, 7300);
        assert_eq!(table.rows()[0][2], "7300");
        assert_eq!(table.mileages().sum::<u64>(), 7300);
    }
}

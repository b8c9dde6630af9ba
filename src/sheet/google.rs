use reqwest::blocking::Client;
use reqwest::Url;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use tracing::{debug, info};

use super::auth::{fetch_access_token, ServiceAccountKey, SPREADSHEETS_SCOPE};
use super::{FlightLogStore, FlightTable};
use crate::error::{FlightMapError, Result};

const SHEETS_API: &str = "https://sheets.googleapis.com/v4/spreadsheets";

#[derive(Debug, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
struct ValueRange {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    range: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    major_dimension: Option<String>,
    #[serde(default)]
    values: Vec<Vec<String>>,
}

/// Flight log stored in a Google spreadsheet
pub struct GoogleSheetsStore {
    client: Client,
    token: String,
    api_base: String,
    spreadsheet_id: String,
    sheet_name: String,
}

fn http_client(timeout: Duration) -> Result<Client> {
    Ok(Client::builder()
        .user_agent("flight-mileage-map")
        .timeout(timeout)
        .build()?)
}

impl GoogleSheetsStore {
    /// Authenticate with the service account key and bind to one sheet
    pub fn connect(
        spreadsheet_id: impl Into<String>,
        sheet_name: impl Into<String>,
        credentials: &Path,
        timeout: Duration,
    ) -> Result<Self> {
        let key = ServiceAccountKey::from_path(credentials)?;
        let client = http_client(timeout)?;
        let token = fetch_access_token(&client, &key, SPREADSHEETS_SCOPE)?;

        Ok(Self {
            client,
            token,
            api_base: SHEETS_API.to_string(),
            spreadsheet_id: spreadsheet_id.into(),
            sheet_name: sheet_name.into(),
        })
    }

    /// Bind to a sheet behind `api_base` with an already issued token
    pub fn with_base_url(
        api_base: impl Into<String>,
        token: impl Into<String>,
        spreadsheet_id: impl Into<String>,
        sheet_name: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self> {
        Ok(Self {
            client: http_client(timeout)?,
            token: token.into(),
            api_base: api_base.into(),
            spreadsheet_id: spreadsheet_id.into(),
            sheet_name: sheet_name.into(),
        })
    }

    fn values_url(&self, range: &str) -> Result<Url> {
        let mut url = Url::parse(&self.api_base).map_err(|e| FlightMapError::Config(e.to_string()))?;
        url.path_segments_mut()
            .map_err(|_| FlightMapError::Config(format!("Bad API base URL: {}", self.api_base)))?
            .pop_if_empty()
            .push(&self.spreadsheet_id)
            .push("values")
            .push(range);
        Ok(url)
    }
}

impl FlightLogStore for GoogleSheetsStore {
    fn read(&self) -> Result<FlightTable> {
        let url = self.values_url(&self.sheet_name)?;
        let response = self
            .client
            .get(url)
            .bearer_auth(&self.token)
            .send()?
            .error_for_status()?;

        let body: ValueRange = response.json()?;
        debug!(sheet = %self.sheet_name, rows = body.values.len(), "Fetched sheet values");
        FlightTable::from_values(body.values)
    }

    fn write(&self, table: &FlightTable) -> Result<()> {
        let range = body_range(&self.sheet_name, table.width());
        let mut url = self.values_url(&range)?;
        url.query_pairs_mut()
            .append_pair("valueInputOption", "USER_ENTERED");

        let body = ValueRange {
            range: Some(range.clone()),
            major_dimension: Some("ROWS".to_string()),
            values: table.rows().to_vec(),
        };

        self.client
            .put(url)
            .bearer_auth(&self.token)
            .json(&body)
            .send()?
            .error_for_status()?;

        info!(range = %range, rows = table.len(), "Updated spreadsheet");
        Ok(())
    }

    fn describe(&self) -> String {
        format!("spreadsheet {} ({})", self.spreadsheet_id, self.sheet_name)
    }
}

/// The range covering the table body: everything below the header row
pub fn body_range(sheet_name: &str, width: usize) -> String {
    format!("{}!A2:{}", sheet_name, column_letter(width.max(1)))
}

/// Spreadsheet column name for a 1-based column number
pub fn column_letter(mut column: usize) -> String {
    let mut letters = Vec::new();
    while column > 0 {
        let rem = (column - 1) % 26;
        letters.push(b'A' + rem as u8);
        column = (column - 1) / 26;
    }
    letters.reverse();
    String::from_utf8(letters).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::serve_once;

    #[test]
    fn test_column_letter() {
        assert_eq!(column_letter(1), "A");
        assert_eq!(column_letter(5), "E");
        assert_eq!(column_letter(26), "Z");
        assert_eq!(column_letter(27), "AA");
        assert_eq!(column_letter(52), "AZ");
    }

    #[test]
    fn test_body_range() {
        assert_eq!(body_range("Sheet1", 5), "Sheet1!A2:E");
    }

    #[test]
    fn test_value_range_tolerates_missing_values() {
        let body: ValueRange =
            serde_json::from_str(r#"{"range":"Sheet1!A1:Z1000","majorDimension":"ROWS"}"#).unwrap();
        assert!(body.values.is_empty());
    }

    #[test]
    fn test_read_fetches_sheet_values() {
        let (base, server) = serve_once(
            200,
            "application/json",
            r#"{"range":"Sheet1!A1:Z1000","majorDimension":"ROWS","values":[["From","To","Mileage"],["MIA","EZE","7300"],["EZE","MIA"]]}"#,
        );
        let store = GoogleSheetsStore::with_base_url(
            format!("{}/v4/spreadsheets", base),
            "token-1",
            "abc123",
            "Sheet1",
            Duration::from_secs(5),
        )
        .unwrap();

        let table = store.read().unwrap();
        let request = server.join().unwrap();

        assert_eq!(request.request_line, "GET /v4/spreadsheets/abc123/values/Sheet1 HTTP/1.1");
        assert_eq!(request.header("authorization"), Some("Bearer token-1"));
        assert_eq!(table.len(), 2);
        assert_eq!(table.rows()[1], vec!["EZE", "MIA", ""]);
    }

    #[test]
    fn test_write_updates_body_range_user_entered() {
        let (base, server) = serve_once(200, "application/json", r#"{"updatedRows":2}"#);
        let store = GoogleSheetsStore::with_base_url(
            format!("{}/v4/spreadsheets", base),
            "token-1",
            "abc123",
            "Flights",
            Duration::from_secs(5),
        )
        .unwrap();
        let table = FlightTable::from_values(vec![
            vec!["From".into(), "To".into(), "Mileage".into()],
            vec!["MIA".into(), "EZE".into(), "7300".into()],
            vec!["EZE".into(), "MIA".into(), "7300".into()],
        ])
        .unwrap();

        store.write(&table).unwrap();
        let request = server.join().unwrap();

        assert_eq!(
            request.request_line,
            "PUT /v4/spreadsheets/abc123/values/Flights!A2:C?valueInputOption=USER_ENTERED HTTP/1.1"
        );
        assert_eq!(request.header("authorization"), Some("Bearer token-1"));

        let body: serde_json::Value = serde_json::from_str(&request.body).unwrap();
        assert_eq!(body["range"], "Flights!A2:C");
        assert_eq!(body["majorDimension"], "ROWS");
        assert_eq!(
            body["values"],
            serde_json::json!([["MIA", "EZE", "7300"], ["EZE", "MIA", "7300"]])
        );
    }

    #[test]
    fn test_rejected_update_is_an_error() {
        let (base, server) = serve_once(403, "application/json", r#"{"error":{"code":403}}"#);
        let store = GoogleSheetsStore::with_base_url(
            format!("{}/v4/spreadsheets", base),
            "expired",
            "abc123",
            "Sheet1",
            Duration::from_secs(5),
        )
        .unwrap();
        let table = FlightTable::from_values(vec![vec!["From".into(), "To".into(), "Mileage".into()]]).unwrap();

        assert!(matches!(store.write(&table), Err(FlightMapError::Http(_))));
        server.join().unwrap();
    }

    #[test]
    fn test_value_range_serializes_camel_case() {
        let body = ValueRange {
            range: Some("Sheet1!A2:C".to_string()),
            major_dimension: Some("ROWS".to_string()),
            values: vec![vec!["MIA".into(), "EZE".into(), "4405".into()]],
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["majorDimension"], "ROWS");
        assert_eq!(json["values"][0][2], "4405");
    }
}

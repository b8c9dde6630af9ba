//! Mileage scraped from the WebFlyer calculator page.
//!
//! The distance sits in one cell of a deeply nested table layout. The
//! selector below walks that layout by position, so any change to the page
//! breaks it.

use reqwest::blocking::Client;
use scraper::{Html, Selector};
use std::time::Duration;
use tracing::debug;

use super::DistanceResolver;
use crate::error::{FlightMapError, Result};
use crate::flights::Airport;

pub const WEBFLYER_URL: &str = "http://www.webflyer.com/travel/mileage_calculator/getmileage.php";

/// Positional path to the mileage field. The parser inserts `tbody` between
/// every `table` and its rows.
const MILEAGE_SELECTOR: &str = "body > table > tbody > tr:nth-of-type(3) > td > table > tbody > tr \
     > td:nth-of-type(2) > table:nth-of-type(2) > tbody > tr > td > form > table > tbody \
     > tr:nth-of-type(5) > td:nth-of-type(2) > b > span";

pub struct WebFlyerResolver {
    client: Client,
    base_url: String,
}

impl WebFlyerResolver {
    pub fn new(timeout: Duration) -> Result<Self> {
        Self::with_base_url(WEBFLYER_URL, timeout)
    }

    pub fn with_base_url(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .user_agent("flight-mileage-map")
            .timeout(timeout)
            .build()?;
        Ok(Self {
            client,
            base_url: base_url.into(),
        })
    }
}

/// Query parameters the calculator expects; only the first two cities are used
pub fn mileage_query<'a>(origin: &'a str, destination: &'a str) -> Vec<(&'static str, &'a str)> {
    vec![
        ("city", origin),
        ("city", destination),
        ("city", ""),
        ("city", ""),
        ("city", ""),
        ("city", ""),
        ("bonus", "0"),
        ("bonus_use_min", "0"),
        ("class_bonus", "0"),
        ("class_bonus_use_min", "0"),
        ("promo_bonus", "0"),
        ("promo_bonus_use_min", "0"),
        ("min", "0"),
        ("min_type", "m"),
        ("ticket_price", ""),
    ]
}

/// Pull the mileage out of a calculator result page
pub fn parse_mileage_page(body: &str, origin: &str, destination: &str) -> Result<u32> {
    let document = Html::parse_document(body);
    let selector = Selector::parse(MILEAGE_SELECTOR)
        .map_err(|e| FlightMapError::Config(format!("Invalid mileage selector: {:?}", e)))?;

    let text: String = document
        .select(&selector)
        .next()
        .ok_or_else(|| FlightMapError::MileageNotFound {
            origin: origin.to_string(),
            destination: destination.to_string(),
        })?
        .text()
        .collect();

    let digits: String = text.chars().filter(char::is_ascii_digit).collect();
    digits
        .parse::<u32>()
        .map_err(|_| FlightMapError::MileageParse(text.trim().to_string()))
}

impl DistanceResolver for WebFlyerResolver {
    fn distance(&self, origin: &Airport, destination: &Airport) -> Result<u32> {
        let response = self
            .client
            .get(&self.base_url)
            .query(&mileage_query(&origin.code, &destination.code))
            .send()?
            .error_for_status()?;

        let body = response.text()?;
        debug!(origin = %origin.code, destination = %destination.code, bytes = body.len(), "Fetched mileage page");
        parse_mileage_page(&body, &origin.code, &destination.code)
    }

    fn name(&self) -> &str {
        "webflyer"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::serve_once;

    /// A page with the same nesting as the calculator's result page
    fn result_page(mileage: &str) -> String {
        format!(
            r#"<html><head><title>Mileage</title></head><body>
<table>
  <tr><td>header</td></tr>
  <tr><td>nav</td></tr>
  <tr><td>
    <table><tr>
      <td>sidebar</td>
      <td>
        <table><tr><td>ad</td></tr></table>
        <table><tr><td>
          <form action="getmileage.php">
            <table>
              <tr><td>From</td><td>MIA</td></tr>
              <tr><td>To</td><td>EZE</td></tr>
              <tr><td></td><td></td></tr>
              <tr><td></td><td></td></tr>
              <tr><td>Distance</td><td><b><span>{}</span></b></td></tr>
            </table>
          </form>
        </td></tr></table>
      </td>
    </tr></table>
  </td></tr>
</table>
</body></html>"#,
            mileage
        )
    }

    #[test]
    fn test_parse_mileage_page() {
        let page = result_page("4,405 miles");
        assert_eq!(parse_mileage_page(&page, "MIA", "EZE").unwrap(), 4405);
    }

    #[test]
    fn test_layout_change_is_reported() {
        let page = "<html><body><p>Service unavailable</p></body></html>";
        assert!(matches!(
            parse_mileage_page(page, "MIA", "EZE"),
            Err(FlightMapError::MileageNotFound { .. })
        ));
    }

    #[test]
    fn test_field_without_digits() {
        let page = result_page("n/a");
        assert!(matches!(
            parse_mileage_page(&page, "MIA", "EZE"),
            Err(FlightMapError::MileageParse(text)) if text == "n/a"
        ));
    }

    #[test]
    fn test_mileage_query() {
        let query = mileage_query("MIA", "EZE");
        assert_eq!(query.iter().filter(|(k, _)| *k == "city").count(), 6);
        assert_eq!(query[0], ("city", "MIA"));
        assert_eq!(query[1], ("city", "EZE"));
        assert!(query.contains(&("min_type", "m")));
    }

    fn resolver(base: &str) -> WebFlyerResolver {
        WebFlyerResolver::with_base_url(format!("{}/getmileage.php", base), Duration::from_secs(5)).unwrap()
    }

    #[test]
    fn test_distance_fetches_and_parses_page() {
        let (base, server) = serve_once(200, "text/html", &result_page("2,475 miles"));

        let miles = resolver(&base)
            .distance(&Airport::bare("JFK"), &Airport::bare("LAX"))
            .unwrap();
        let request = server.join().unwrap();

        assert_eq!(miles, 2475);
        let target = request.request_line.split(' ').nth(1).unwrap();
        let (path, query) = target.split_once('?').unwrap();
        assert_eq!(path, "/getmileage.php");
        assert_eq!(query.split('&').count(), 15);
        assert!(query.starts_with("city=JFK&city=LAX&city=&city=&city=&city=&"));
        assert!(query.contains("min_type=m"));
        assert!(query.ends_with("ticket_price="));
    }

    #[test]
    fn test_server_error_is_reported() {
        let (base, server) = serve_once(503, "text/html", "<html><body>down</body></html>");

        let result = resolver(&base).distance(&Airport::bare("MIA"), &Airport::bare("EZE"));
        server.join().unwrap();

        assert!(matches!(result, Err(FlightMapError::Http(_))));
    }

    #[test]
    fn test_selector_parses() {
        assert!(Selector::parse(MILEAGE_SELECTOR).is_ok());
    }
}

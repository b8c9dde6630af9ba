//! Figure model shared by every output.
//!
//! Serializes to the plotly.js `{data, layout}` shape so the HTML export can
//! hand it to the browser unchanged; the raster and terminal renderers read
//! the same traces.

use serde::Serialize;

use crate::error::{FlightMapError, Result};
use crate::flights::{Airport, FlightRegistry, Region};
use crate::stats::FlightStats;

pub const DOMESTIC_COLOR: &str = "red";
pub const INTERNATIONAL_COLOR: &str = "blue";
pub const AIRPORT_COLOR: &str = "red";

/// Title and initial view of the map
#[derive(Debug, Clone, PartialEq)]
pub struct MapSettings {
    pub title: String,
    pub rotation_lon: f64,
    pub rotation_lat: f64,
}

impl Default for MapSettings {
    fn default() -> Self {
        Self {
            title: "My flights".to_string(),
            rotation_lon: -45.0,
            rotation_lat: 10.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    Lines,
    Markers,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LineStyle {
    pub width: f64,
    pub color: &'static str,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MarkerStyle {
    pub color: &'static str,
}

/// One `scattergeo` trace: a route line or an airport marker
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Trace {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub name: String,
    pub mode: Mode,
    pub lat: Vec<f64>,
    pub lon: Vec<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub opacity: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line: Option<LineStyle>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub marker: Option<MarkerStyle>,
}

impl Trace {
    pub fn color(&self) -> &'static str {
        match (&self.line, &self.marker) {
            (Some(line), _) => line.color,
            (None, Some(marker)) => marker.color,
            (None, None) => AIRPORT_COLOR,
        }
    }

    pub fn points(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.lat.iter().copied().zip(self.lon.iter().copied())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Font {
    pub size: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Title {
    pub text: String,
    pub font: Font,
    pub x: f64,
    pub xanchor: &'static str,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Rotation {
    pub lon: f64,
    pub lat: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Projection {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub rotation: Rotation,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Geo {
    pub projection: Projection,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Annotation {
    pub text: String,
    pub showarrow: bool,
    pub x: f64,
    pub y: f64,
    pub font: Font,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Layout {
    pub title: Title,
    pub showlegend: bool,
    pub geo: Geo,
    pub annotations: Vec<Annotation>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Figure {
    pub data: Vec<Trace>,
    pub layout: Layout,
}

/// Busiest route fully opaque, a route flown once at least half
pub fn route_opacity(count: u32, most_frequent: u32) -> f64 {
    if most_frequent == 0 {
        return 1.0;
    }
    0.5 + (count as f64 / most_frequent as f64) / 2.0
}

fn position(airport: &Airport) -> Result<(f64, f64)> {
    airport
        .coordinates
        .map(|c| (c.latitude, c.longitude))
        .ok_or_else(|| FlightMapError::UnknownAirport(airport.code.clone()))
}

fn annotation(text: String, y: f64) -> Annotation {
    Annotation {
        text,
        showarrow: false,
        x: 1.0,
        y,
        font: Font { size: 18 },
    }
}

impl Figure {
    /// Build the map. Fails if any airport is still missing its location.
    pub fn build(registry: &FlightRegistry, stats: &FlightStats, settings: &MapSettings) -> Result<Self> {
        let most_frequent = registry.most_frequent_count();
        let mut data = Vec::with_capacity(registry.flights().len() + registry.airports().len());

        for flight in registry.flights() {
            let (a1, a2) = (registry.airport(flight.airport1), registry.airport(flight.airport2));
            let (p1, p2) = (position(a1)?, position(a2)?);
            let region = flight.region.ok_or_else(|| {
                let unknown = if a1.country.is_none() { a1 } else { a2 };
                FlightMapError::UnknownAirport(unknown.code.clone())
            })?;

            data.push(Trace {
                kind: "scattergeo",
                name: flight.key.to_string(),
                mode: Mode::Lines,
                lat: vec![p1.0, p2.0],
                lon: vec![p1.1, p2.1],
                opacity: Some(route_opacity(flight.count, most_frequent)),
                line: Some(LineStyle {
                    width: 1.0,
                    color: match region {
                        Region::Domestic => DOMESTIC_COLOR,
                        Region::International => INTERNATIONAL_COLOR,
                    },
                }),
                marker: None,
            });
        }

        for airport in registry.airports() {
            let (lat, lon) = position(airport)?;
            data.push(Trace {
                kind: "scattergeo",
                name: airport.code.clone(),
                mode: Mode::Markers,
                lat: vec![lat],
                lon: vec![lon],
                opacity: None,
                line: None,
                marker: Some(MarkerStyle { color: AIRPORT_COLOR }),
            });
        }

        let layout = Layout {
            title: Title {
                text: settings.title.clone(),
                font: Font { size: 24 },
                x: 0.5,
                xanchor: "center",
            },
            showlegend: false,
            geo: Geo {
                projection: Projection {
                    kind: "orthographic",
                    rotation: Rotation {
                        lon: settings.rotation_lon,
                        lat: settings.rotation_lat,
                    },
                },
            },
            annotations: vec![
                annotation(stats.distance_label(), 0.05),
                annotation(stats.flights_label(), 0.1),
                annotation(stats.places_label(), 0.15),
            ],
        };

        Ok(Self { data, layout })
    }

    pub fn routes(&self) -> impl Iterator<Item = &Trace> {
        self.data.iter().filter(|t| t.mode == Mode::Lines)
    }

    pub fn airports(&self) -> impl Iterator<Item = &Trace> {
        self.data.iter().filter(|t| t.mode == Mode::Markers)
    }
}

/// RGB value for the named colors used on the map
pub fn named_rgb(name: &str) -> [u8; 3] {
    match name {
        "red" => [220, 38, 38],
        "blue" => [37, 99, 235],
        _ => [0, 0, 0],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_route_opacity() {
        assert_eq!(route_opacity(4, 4), 1.0);
        assert_eq!(route_opacity(2, 4), 0.75);
        assert!(route_opacity(1, 100) > 0.5);
        assert_eq!(route_opacity(0, 0), 1.0);
    }

    #[test]
    fn test_trace_serializes_as_plotly() {
        let trace = Trace {
            kind: "scattergeo",
            name: "EZE-MIA".to_string(),
            mode: Mode::Lines,
            lat: vec![-34.82, 25.79],
            lon: vec![-58.54, -80.29],
            opacity: Some(1.0),
            line: Some(LineStyle { width: 1.0, color: INTERNATIONAL_COLOR }),
            marker: None,
        };
        let json = serde_json::to_value(&trace).unwrap();
        assert_eq!(json["type"], "scattergeo");
        assert_eq!(json["mode"], "lines");
        assert_eq!(json["line"]["color"], "blue");
        assert!(json.get("marker").is_none());
    }
}

//! Static `map.png` export drawn with plotters.
//!
//! plotters is built without its system-font backend, so the title and the
//! statistics are drawn with the built-in glyphs in [`super::glyphs`].

use image::RgbImage;
use plotters::coord::Shift;
use plotters::drawing::DrawingAreaErrorKind;
use plotters::prelude::*;
use std::path::Path;

use super::figure::{named_rgb, Figure};
use super::glyphs::{cells, scale_for, text_width, GLYPH_HEIGHT};
use super::land::LAND_OUTLINES;
use super::projection::{great_circle_path, Orthographic};
use crate::error::{FlightMapError, Result};

pub const IMAGE_WIDTH: u32 = 1200;
pub const IMAGE_HEIGHT: u32 = 600;

const OCEAN: RGBColor = RGBColor(235, 241, 250);
const COASTLINE: RGBColor = RGBColor(150, 150, 150);
const TEXT: RGBColor = RGBColor(40, 40, 40);
const ARC_SEGMENTS: usize = 64;
const MARKER_RADIUS: i32 = 3;
const MARGIN: i32 = 12;

type Area<'a> = DrawingArea<BitMapBackend<'a>, Shift>;

fn render_error<E: std::error::Error + Send + Sync>(e: DrawingAreaErrorKind<E>) -> FlightMapError {
    FlightMapError::Render(e.to_string())
}

fn rgb(name: &str) -> RGBColor {
    let [r, g, b] = named_rgb(name);
    RGBColor(r, g, b)
}

/// Maps unit-disk coordinates onto the image
#[derive(Debug, Clone, Copy)]
struct Viewport {
    cx: f64,
    cy: f64,
    radius: f64,
}

impl Viewport {
    fn new(width: u32, height: u32) -> Self {
        Self {
            cx: width as f64 / 2.0,
            cy: height as f64 / 2.0 + height as f64 * 0.04,
            radius: height as f64 * 0.42,
        }
    }

    fn to_pixel(&self, (x, y): (f64, f64)) -> (i32, i32) {
        (
            (self.cx + x * self.radius).round() as i32,
            (self.cy - y * self.radius).round() as i32,
        )
    }

    fn path(&self, points: &[(f64, f64)]) -> Vec<(i32, i32)> {
        points.iter().map(|&p| self.to_pixel(p)).collect()
    }
}

/// Horizontal alignment of a label relative to its anchor point
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Align {
    Center,
    Right,
}

/// Draw `text` with its vertical center on `y`
fn draw_label(area: &Area, text: &str, (x, y): (i32, i32), align: Align, font_size: u32) -> Result<()> {
    let scale = scale_for(font_size);
    let width = text_width(text, scale);
    let left = match align {
        Align::Center => x - width / 2,
        Align::Right => x - width,
    };
    let top = y - GLYPH_HEIGHT * scale / 2;

    for (cx, cy) in cells(text) {
        let (px, py) = (left + cx * scale, top + cy * scale);
        area.draw(&Rectangle::new(
            [(px, py), (px + scale - 1, py + scale - 1)],
            TEXT.filled(),
        ))
        .map_err(render_error)?;
    }
    Ok(())
}

fn draw_map(area: &Area, figure: &Figure, width: u32, height: u32) -> Result<()> {
    let rotation = &figure.layout.geo.projection.rotation;
    let projection = Orthographic::new(rotation.lon, rotation.lat);
    let view = Viewport::new(width, height);

    area.fill(&WHITE).map_err(render_error)?;
    area.draw(&Circle::new(
        view.to_pixel((0.0, 0.0)),
        view.radius.round() as i32,
        OCEAN.filled(),
    ))
    .map_err(render_error)?;

    let rim: Vec<(f64, f64)> = (0..=360)
        .map(|deg| {
            let a = (deg as f64).to_radians();
            (a.cos(), a.sin())
        })
        .collect();
    area.draw(&PathElement::new(view.path(&rim), COASTLINE.stroke_width(1)))
        .map_err(render_error)?;

    for outline in LAND_OUTLINES {
        for run in projection.project_path(outline) {
            area.draw(&PathElement::new(view.path(&run), COASTLINE.stroke_width(1)))
                .map_err(render_error)?;
        }
    }

    for route in figure.routes() {
        let points: Vec<(f64, f64)> = route.points().collect();
        if points.len() < 2 {
            continue;
        }
        let arc = great_circle_path(points[0], points[1], ARC_SEGMENTS);
        let style = rgb(route.color()).mix(route.opacity.unwrap_or(1.0)).stroke_width(1);
        for run in projection.project_path(&arc) {
            area.draw(&PathElement::new(view.path(&run), style))
                .map_err(render_error)?;
        }
    }

    for airport in figure.airports() {
        let style = rgb(airport.color()).filled();
        for (lat, lon) in airport.points() {
            if let Some(p) = projection.project(lat, lon) {
                area.draw(&Circle::new(view.to_pixel(p), MARKER_RADIUS, style))
                    .map_err(render_error)?;
            }
        }
    }

    let layout = &figure.layout;
    let title_x = (layout.title.x * width as f64).round() as i32;
    let title_y = MARGIN + GLYPH_HEIGHT * scale_for(layout.title.font.size) / 2;
    draw_label(area, &layout.title.text, (title_x, title_y), Align::Center, layout.title.font.size)?;

    // Paper coordinates: x=1 is the right edge, y grows upward from the bottom
    for annotation in &layout.annotations {
        let x = (annotation.x * width as f64).round() as i32 - MARGIN;
        let y = ((1.0 - annotation.y) * height as f64).round() as i32;
        draw_label(area, &annotation.text, (x, y), Align::Right, annotation.font.size)?;
    }

    area.present().map_err(render_error)?;
    Ok(())
}

/// Draw the globe, coastlines, routes, airports, title and statistics
pub fn render_image(figure: &Figure, width: u32, height: u32) -> Result<RgbImage> {
    let mut buffer = vec![0u8; width as usize * height as usize * 3];
    {
        let area = BitMapBackend::with_buffer(&mut buffer, (width, height)).into_drawing_area();
        draw_map(&area, figure, width, height)?;
    }

    RgbImage::from_raw(width, height, buffer)
        .ok_or_else(|| FlightMapError::Render("Pixel buffer does not match image size".to_string()))
}

/// Write the figure as a fixed-size PNG
pub fn write_png(figure: &Figure, path: &Path) -> Result<()> {
    render_image(figure, IMAGE_WIDTH, IMAGE_HEIGHT)?.save(path)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plot::figure::{
        Annotation, Font, Geo, Layout, LineStyle, MarkerStyle, Mode, Projection, Rotation, Title,
        Trace,
    };

    fn figure() -> Figure {
        Figure {
            data: vec![
                Trace {
                    kind: "scattergeo",
                    name: "JFK-LAX".to_string(),
                    mode: Mode::Lines,
                    lat: vec![40.64, 33.94],
                    lon: vec![-73.78, -118.41],
                    opacity: Some(1.0),
                    line: Some(LineStyle { width: 1.0, color: "red" }),
                    marker: None,
                },
                Trace {
                    kind: "scattergeo",
                    name: "JFK".to_string(),
                    mode: Mode::Markers,
                    lat: vec![40.64],
                    lon: vec![-73.78],
                    opacity: None,
                    line: None,
                    marker: Some(MarkerStyle { color: "red" }),
                },
            ],
            layout: Layout {
                title: Title {
                    text: "t".to_string(),
                    font: Font { size: 24 },
                    x: 0.5,
                    xanchor: "center",
                },
                showlegend: false,
                geo: Geo {
                    projection: Projection {
                        kind: "orthographic",
                        rotation: Rotation { lon: -90.0, lat: 35.0 },
                    },
                },
                annotations: Vec::new(),
            },
        }
    }

    #[test]
    fn test_image_size() {
        let image = render_image(&figure(), IMAGE_WIDTH, IMAGE_HEIGHT).unwrap();
        assert_eq!(image.dimensions(), (1200, 600));
    }

    #[test]
    fn test_airport_marker_is_drawn() {
        let fig = figure();
        let image = render_image(&fig, IMAGE_WIDTH, IMAGE_HEIGHT).unwrap();

        let projection = Orthographic::new(-90.0, 35.0);
        let view = Viewport::new(IMAGE_WIDTH, IMAGE_HEIGHT);
        let (x, y) = view.to_pixel(projection.project(40.64, -73.78).unwrap());
        let pixel = image.get_pixel(x as u32, y as u32);
        assert_eq!(pixel.0, named_rgb("red"));
    }

    fn ink_in(image: &RgbImage, x: std::ops::Range<u32>, y: std::ops::Range<u32>) -> usize {
        x.flat_map(|px| y.clone().map(move |py| (px, py)))
            .filter(|&(px, py)| image.get_pixel(px, py).0 == [TEXT.0, TEXT.1, TEXT.2])
            .count()
    }

    #[test]
    fn test_title_and_statistics_are_drawn() {
        let mut bare = figure();
        bare.layout.title.text.clear();
        let mut labelled = figure();
        labelled.layout.title.text = "My flights".to_string();
        labelled.layout.annotations = [("17075 miles flown", 0.05), ("3 flights flown", 0.1)]
            .iter()
            .map(|&(text, y)| Annotation {
                text: text.to_string(),
                showarrow: false,
                x: 1.0,
                y,
                font: Font { size: 18 },
            })
            .collect();

        let before = render_image(&bare, IMAGE_WIDTH, IMAGE_HEIGHT).unwrap();
        let after = render_image(&labelled, IMAGE_WIDTH, IMAGE_HEIGHT).unwrap();
        assert_ne!(before.as_raw(), after.as_raw());

        // Statistics sit right-aligned along the bottom edge
        assert_eq!(ink_in(&before, 800..1200, 520..600), 0);
        assert!(ink_in(&after, 800..1200, 520..600) > 0);
        // Title is centered at the top
        assert_eq!(ink_in(&before, 450..750, 0..40), 0);
        assert!(ink_in(&after, 450..750, 0..40) > 0);
    }

    #[test]
    fn test_label_alignment() {
        let mut fig = figure();
        fig.layout.title.text = String::new();
        fig.layout.annotations = vec![Annotation {
            text: "1".to_string(),
            showarrow: false,
            x: 1.0,
            y: 0.5,
            font: Font { size: 8 },
        }];
        let image = render_image(&fig, 200, 100).unwrap();

        // One cell per pixel; the glyph ends MARGIN pixels from the right edge
        let right = 200 - MARGIN as u32;
        assert!(ink_in(&image, right - 5..right, 40..60) > 0);
        assert_eq!(ink_in(&image, right..200, 0..100), 0);
    }

    #[test]
    fn test_write_png() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("map.png");
        write_png(&figure(), &path).unwrap();
        let decoded = image::open(&path).unwrap();
        assert_eq!(decoded.width(), IMAGE_WIDTH);
    }
}

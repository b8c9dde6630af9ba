//! On-screen globe drawn on a braille canvas.

use crossterm::event::KeyCode;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::symbols::Marker;
use ratatui::text::{Line, Span};
use ratatui::widgets::canvas::{Canvas, Circle, Line as CanvasLine, Points};
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};
use ratatui::Frame;

use crate::plot::figure::{named_rgb, Figure};
use crate::plot::land::LAND_OUTLINES;
use crate::plot::projection::{great_circle_path, Orthographic};

const ROTATE_STEP: f64 = 10.0;
const ARC_SEGMENTS: usize = 32;

type Segment = (f64, f64, f64, f64, Color);

/// Interactive view over a finished figure
pub struct GlobeView<'a> {
    figure: &'a Figure,
    projection: Orthographic,
}

impl<'a> GlobeView<'a> {
    pub fn new(figure: &'a Figure) -> Self {
        let rotation = &figure.layout.geo.projection.rotation;
        Self {
            figure,
            projection: Orthographic::new(rotation.lon, rotation.lat),
        }
    }

    /// Apply a key press; returns false when the view should close
    pub fn handle_key(&mut self, code: KeyCode) -> bool {
        match code {
            KeyCode::Char('q') | KeyCode::Esc => return false,
            KeyCode::Left => self.projection.rotate(-ROTATE_STEP, 0.0),
            KeyCode::Right => self.projection.rotate(ROTATE_STEP, 0.0),
            KeyCode::Up => self.projection.rotate(0.0, ROTATE_STEP),
            KeyCode::Down => self.projection.rotate(0.0, -ROTATE_STEP),
            KeyCode::Char('r') => *self = GlobeView::new(self.figure),
            _ => {}
        }
        true
    }

    fn segments(&self) -> Vec<Segment> {
        let mut segments = Vec::new();
        let mut push_runs = |runs: Vec<Vec<(f64, f64)>>, color: Color| {
            for run in runs {
                for pair in run.windows(2) {
                    segments.push((pair[0].0, pair[0].1, pair[1].0, pair[1].1, color));
                }
            }
        };

        for outline in LAND_OUTLINES {
            push_runs(self.projection.project_path(outline), Color::DarkGray);
        }

        for route in self.figure.routes() {
            let points: Vec<(f64, f64)> = route.points().collect();
            if points.len() < 2 {
                continue;
            }
            let arc = great_circle_path(points[0], points[1], ARC_SEGMENTS);
            let color = dimmed(named_rgb(route.color()), route.opacity.unwrap_or(1.0));
            push_runs(self.projection.project_path(&arc), color);
        }

        segments
    }

    fn airport_points(&self) -> Vec<(f64, f64)> {
        self.figure
            .airports()
            .flat_map(|t| t.points())
            .filter_map(|(lat, lon)| self.projection.project(lat, lon))
            .collect()
    }

    pub fn render(&self, frame: &mut Frame, area: Rect) {
        let chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Min(20), Constraint::Length(38)])
            .split(area);

        self.render_globe(frame, chunks[0]);
        self.render_summary(frame, chunks[1]);
    }

    fn render_globe(&self, frame: &mut Frame, area: Rect) {
        // Terminal cells are about twice as tall as wide
        let inner_w = area.width.saturating_sub(2).max(1) as f64;
        let inner_h = area.height.saturating_sub(2).max(1) as f64;
        let aspect = inner_w / (2.0 * inner_h);

        let segments = self.segments();
        let airports = self.airport_points();

        let canvas = Canvas::default()
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(format!(" {} ", self.figure.layout.title.text))
                    .border_style(Style::default().fg(Color::Blue)),
            )
            .marker(Marker::Braille)
            .x_bounds([-1.1 * aspect, 1.1 * aspect])
            .y_bounds([-1.1, 1.1])
            .paint(move |ctx| {
                ctx.draw(&Circle {
                    x: 0.0,
                    y: 0.0,
                    radius: 1.0,
                    color: Color::Gray,
                });
                for &(x1, y1, x2, y2, color) in &segments {
                    ctx.draw(&CanvasLine { x1, y1, x2, y2, color });
                }
                ctx.draw(&Points {
                    coords: &airports,
                    color: Color::Red,
                });
            });

        frame.render_widget(canvas, area);
    }

    fn render_summary(&self, frame: &mut Frame, area: Rect) {
        let bold = Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD);
        let (lon, lat) = self.projection.center();

        let mut lines = vec![Line::from(Span::styled("Statistics", bold)), Line::from("")];
        // Annotations are laid out bottom-up
        for annotation in self.figure.layout.annotations.iter().rev() {
            lines.push(Line::from(format!(" {}", annotation.text)));
        }
        lines.extend([
            Line::from(""),
            Line::from(vec![
                Span::styled(" ━ ", Style::default().fg(Color::Red)),
                Span::raw("Domestic"),
            ]),
            Line::from(vec![
                Span::styled(" ━ ", Style::default().fg(Color::Blue)),
                Span::raw("International"),
            ]),
            Line::from(""),
            Line::from(Span::styled(
                format!(" View: {:.0}°, {:.0}°", lat, lon),
                Style::default().fg(Color::Gray),
            )),
            Line::from(Span::styled(
                " ←↑↓→ rotate  r reset  q quit",
                Style::default().fg(Color::DarkGray),
            )),
        ]);

        let paragraph = Paragraph::new(lines).wrap(Wrap { trim: false }).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Blue)),
        );
        frame.render_widget(paragraph, area);
    }
}

/// Scale a color toward black by `opacity`
fn dimmed(rgb: [u8; 3], opacity: f64) -> Color {
    let scale = |c: u8| (c as f64 * opacity.clamp(0.0, 1.0)).round() as u8;
    Color::Rgb(scale(rgb[0]), scale(rgb[1]), scale(rgb[2]))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dimmed() {
        assert_eq!(dimmed([200, 100, 0], 0.5), Color::Rgb(100, 50, 0));
        assert_eq!(dimmed([200, 100, 0], 1.0), Color::Rgb(200, 100, 0));
    }
}

//! Panels of the progress screen

use std::collections::VecDeque;
use std::time::Instant;

use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Gauge, List, ListItem, Paragraph};
use ratatui::Frame;

use super::{Phase, Progress, Tally};

const ACTIVITY_LIMIT: usize = 200;

fn panel(title: &str) -> Block<'_> {
    Block::default()
        .borders(Borders::ALL)
        .title(title)
        .border_style(Style::default().fg(Color::Blue))
}

/// Every phase of the run on one line, the current one highlighted
pub struct PhaseTrack {
    phase: Phase,
    source: String,
}

impl PhaseTrack {
    pub fn new() -> Self {
        Self {
            phase: Phase::Reading,
            source: String::new(),
        }
    }

    pub fn set_phase(&mut self, phase: Phase) {
        self.phase = phase;
    }

    pub fn set_source(&mut self, source: impl Into<String>) {
        self.source = source.into();
    }

    pub fn render(&self, frame: &mut Frame, area: Rect) {
        let current = self.phase.ordinal();
        let mut steps = Vec::new();

        for phase in Phase::ALL {
            let (mark, style) = match phase.ordinal().cmp(&current) {
                std::cmp::Ordering::Less => ("✓", Style::default().fg(Color::Green)),
                std::cmp::Ordering::Equal => (
                    "●",
                    Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
                ),
                std::cmp::Ordering::Greater => ("○", Style::default().fg(Color::DarkGray)),
            };
            steps.push(Span::styled(format!(" {} {} ", mark, phase), style));
        }

        let lines = vec![
            Line::from(steps),
            Line::from(Span::styled(
                format!("   {}", self.source),
                Style::default().fg(Color::Gray),
            )),
        ];

        frame.render_widget(Paragraph::new(lines).block(panel(" Flight Mileage Map ")), area);
    }
}

/// Running counts of legs read, routes found and lookups made
pub struct TallyPanel {
    tally: Tally,
}

impl TallyPanel {
    pub fn new() -> Self {
        Self {
            tally: Tally::default(),
        }
    }

    pub fn set(&mut self, tally: Tally) {
        self.tally = tally;
    }

    pub fn render(&self, frame: &mut Frame, area: Rect) {
        let row = |label: &str, value: usize| {
            Line::from(vec![
                Span::styled(format!(" {:<9}", label), Style::default().fg(Color::Gray)),
                Span::styled(
                    value.to_string(),
                    Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
                ),
            ])
        };

        let lines = vec![
            row("legs", self.tally.legs),
            row("routes", self.tally.routes),
            row("looked up", self.tally.resolved),
        ];
        frame.render_widget(Paragraph::new(lines).block(panel(" Tally ")), area);
    }
}

/// Gauge over the legs of the log
pub struct LegGauge {
    progress: Option<Progress>,
}

impl LegGauge {
    pub fn new() -> Self {
        Self { progress: None }
    }

    pub fn set(&mut self, progress: Progress) {
        self.progress = Some(progress);
    }

    pub fn clear(&mut self) {
        self.progress = None;
    }

    pub fn render(&self, frame: &mut Frame, area: Rect) {
        let block = Block::default()
            .borders(Borders::LEFT | Borders::RIGHT)
            .border_style(Style::default().fg(Color::Blue));

        let Some(progress) = &self.progress else {
            frame.render_widget(block, area);
            return;
        };

        let label = match progress.total {
            0 => progress.label.clone(),
            total => format!("{} {} of {}", progress.label, progress.current, total),
        };
        let gauge = Gauge::default()
            .block(block)
            .gauge_style(Style::default().fg(Color::Cyan).bg(Color::DarkGray))
            .ratio(progress.ratio().clamp(0.0, 1.0))
            .label(label);
        frame.render_widget(gauge, area);
    }
}

/// Timestamped messages, newest at the bottom
pub struct ActivityLog {
    started: Instant,
    entries: VecDeque<(f64, String)>,
}

impl ActivityLog {
    pub fn new() -> Self {
        Self {
            started: Instant::now(),
            entries: VecDeque::with_capacity(ACTIVITY_LIMIT),
        }
    }

    pub fn push(&mut self, message: impl Into<String>) {
        if self.entries.len() == ACTIVITY_LIMIT {
            self.entries.pop_front();
        }
        let at = self.started.elapsed().as_secs_f64();
        self.entries.push_back((at, message.into()));
    }

    pub fn render(&self, frame: &mut Frame, area: Rect) {
        let visible = area.height.saturating_sub(2) as usize;
        let skip = self.entries.len().saturating_sub(visible);
        let newest = self.entries.len().saturating_sub(1);

        let items: Vec<ListItem> = self
            .entries
            .iter()
            .enumerate()
            .skip(skip)
            .map(|(i, (at, message))| {
                let text_style = if i == newest {
                    Style::default().fg(Color::White)
                } else {
                    Style::default().fg(Color::Gray)
                };
                ListItem::new(Line::from(vec![
                    Span::styled(format!(" {:>6.1}s ", at), Style::default().fg(Color::DarkGray)),
                    Span::styled(message.as_str(), text_style),
                ]))
            })
            .collect();

        frame.render_widget(List::new(items).block(panel(" Activity ")), area);
    }
}

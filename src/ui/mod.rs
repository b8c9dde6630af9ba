//! Terminal progress screen and globe viewer.
//!
//! A run reports through the [`Ui`] trait: the phase it is in, which leg it is
//! on, running counts and free-form activity. [`UiApp`] draws all of that with
//! ratatui; [`LogUi`] turns it into tracing events and [`SilentUi`] drops it.

mod components;
pub mod globe;

use anyhow::Result;
use crossterm::event::{self, Event as CrosstermEvent, KeyEventKind};
use crossterm::terminal::{self, EnterAlternateScreen, LeaveAlternateScreen};
use crossterm::ExecutableCommand;
use ratatui::backend::CrosstermBackend;
use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::Terminal;
use std::fmt;
use std::io::{self, Stdout};
use std::time::Duration;
use tracing::{debug, info};

use crate::plot::Figure;
use components::{ActivityLog, LegGauge, PhaseTrack, TallyPanel};
use globe::GlobeView;

const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Stages of a sync run, in order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Reading,
    Enriching,
    Writing,
    Rendering,
    Complete,
}

impl Phase {
    pub const ALL: [Phase; 5] = [
        Phase::Reading,
        Phase::Enriching,
        Phase::Writing,
        Phase::Rendering,
        Phase::Complete,
    ];

    pub fn ordinal(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Phase::Reading => "Read",
            Phase::Enriching => "Resolve",
            Phase::Writing => "Write back",
            Phase::Rendering => "Render",
            Phase::Complete => "Done",
        };
        f.write_str(name)
    }
}

/// Position within the current phase
#[derive(Debug, Clone, Default)]
pub struct Progress {
    pub current: u64,
    pub total: u64,
    pub label: String,
}

impl Progress {
    pub fn new(current: u64, total: u64, label: impl Into<String>) -> Self {
        Self {
            current,
            total,
            label: label.into(),
        }
    }

    pub fn ratio(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.current as f64 / self.total as f64
        }
    }
}

/// Running counts for the enrichment phase
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Tally {
    pub legs: usize,
    pub routes: usize,
    pub resolved: usize,
}

/// Sink for run progress
pub trait Ui {
    fn set_phase(&mut self, phase: Phase);
    fn set_info(&mut self, info: impl Into<String>);
    fn set_progress(&mut self, current: u64, total: u64, label: impl Into<String>);
    fn set_tally(&mut self, tally: Tally);
    fn clear_progress(&mut self);
    fn log(&mut self, message: impl Into<String>);
}

/// Full-screen terminal UI
pub struct UiApp {
    terminal: Terminal<CrosstermBackend<Stdout>>,
    phases: PhaseTrack,
    tally: TallyPanel,
    gauge: LegGauge,
    activity: ActivityLog,
}

impl UiApp {
    /// Switch to raw mode on the alternate screen
    pub fn new() -> Result<Self> {
        terminal::enable_raw_mode()?;
        let mut stdout = io::stdout();
        stdout.execute(EnterAlternateScreen)?;
        let terminal = Terminal::new(CrosstermBackend::new(stdout))?;

        Ok(Self {
            terminal,
            phases: PhaseTrack::new(),
            tally: TallyPanel::new(),
            gauge: LegGauge::new(),
            activity: ActivityLog::new(),
        })
    }

    fn draw(&mut self) -> Result<()> {
        let (phases, tally, gauge, activity) = (&self.phases, &self.tally, &self.gauge, &self.activity);

        self.terminal.draw(|frame| {
            let rows = Layout::default()
                .direction(Direction::Vertical)
                .constraints([Constraint::Length(5), Constraint::Length(1), Constraint::Min(4)])
                .split(frame.area());
            let header = Layout::default()
                .direction(Direction::Horizontal)
                .constraints([Constraint::Min(40), Constraint::Length(22)])
                .split(rows[0]);

            phases.render(frame, header[0]);
            tally.render(frame, header[1]);
            gauge.render(frame, rows[1]);
            activity.render(frame, rows[2]);
        })?;

        Ok(())
    }

    /// Show the final summary and wait for a key before leaving
    pub fn finish(mut self, summary: &str) -> Result<()> {
        self.set_phase(Phase::Complete);
        self.clear_progress();
        self.log(summary);
        self.log("Press any key to exit");

        loop {
            if event::poll(POLL_INTERVAL)? {
                if let CrosstermEvent::Key(key) = event::read()? {
                    if key.kind == KeyEventKind::Press {
                        break;
                    }
                }
            }
        }

        self.restore()
    }

    /// Replace the progress screen with the globe until the user quits
    pub fn show_globe(mut self, figure: &Figure) -> Result<()> {
        let mut view = GlobeView::new(figure);

        loop {
            self.terminal.draw(|frame| {
                let area = frame.area();
                view.render(frame, area);
            })?;

            if event::poll(POLL_INTERVAL)? {
                if let CrosstermEvent::Key(key) = event::read()? {
                    if key.kind == KeyEventKind::Press && !view.handle_key(key.code) {
                        break;
                    }
                }
            }
        }

        self.restore()
    }

    /// Leave the alternate screen immediately
    pub fn restore(mut self) -> Result<()> {
        terminal::disable_raw_mode()?;
        self.terminal.backend_mut().execute(LeaveAlternateScreen)?;
        self.terminal.show_cursor()?;
        Ok(())
    }
}

impl Ui for UiApp {
    fn set_phase(&mut self, phase: Phase) {
        self.phases.set_phase(phase);
        self.draw().ok();
    }

    fn set_info(&mut self, info: impl Into<String>) {
        self.phases.set_source(info);
        self.draw().ok();
    }

    fn set_progress(&mut self, current: u64, total: u64, label: impl Into<String>) {
        self.gauge.set(Progress::new(current, total, label));
        self.draw().ok();
    }

    fn set_tally(&mut self, tally: Tally) {
        self.tally.set(tally);
    }

    fn clear_progress(&mut self) {
        self.gauge.clear();
        self.draw().ok();
    }

    fn log(&mut self, message: impl Into<String>) {
        self.activity.push(message);
        self.draw().ok();
    }
}

impl Drop for UiApp {
    fn drop(&mut self) {
        terminal::disable_raw_mode().ok();
        self.terminal.backend_mut().execute(LeaveAlternateScreen).ok();
        self.terminal.show_cursor().ok();
    }
}

/// Discards everything; used by tests
#[derive(Default)]
pub struct SilentUi;

impl SilentUi {
    pub fn new() -> Self {
        Self
    }
}

impl Ui for SilentUi {
    fn set_phase(&mut self, _phase: Phase) {}
    fn set_info(&mut self, _info: impl Into<String>) {}
    fn set_progress(&mut self, _current: u64, _total: u64, _label: impl Into<String>) {}
    fn set_tally(&mut self, _tally: Tally) {}
    fn clear_progress(&mut self) {}
    fn log(&mut self, _message: impl Into<String>) {}
}

/// Line-oriented UI that reports through `tracing`, for runs without a TUI
#[derive(Default)]
pub struct LogUi;

impl LogUi {
    pub fn new() -> Self {
        Self
    }
}

impl Ui for LogUi {
    fn set_phase(&mut self, phase: Phase) {
        info!(%phase, "Phase");
    }

    fn set_info(&mut self, info: impl Into<String>) {
        debug!("{}", info.into());
    }

    fn set_progress(&mut self, current: u64, total: u64, label: impl Into<String>) {
        debug!(current, total, "{}", label.into());
    }

    fn set_tally(&mut self, _tally: Tally) {}

    fn clear_progress(&mut self) {}

    fn log(&mut self, message: impl Into<String>) {
        info!("{}", message.into());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_phase_order() {
        let ordinals: Vec<usize> = Phase::ALL.iter().map(|p| p.ordinal()).collect();
        assert_eq!(ordinals, vec![0, 1, 2, 3, 4]);
        assert!(Phase::Writing.ordinal() > Phase::Enriching.ordinal());
    }

    #[test]
    fn test_progress_ratio() {
        assert_eq!(Progress::new(3, 4, "Legs").ratio(), 0.75);
        assert_eq!(Progress::new(3, 0, "Legs").ratio(), 0.0);
    }
}

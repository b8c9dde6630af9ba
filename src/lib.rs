pub mod airports;
pub mod cli;
pub mod config;
pub mod error;
pub mod flights;
pub mod logging;
pub mod pipeline;
pub mod plot;
pub mod resolver;
pub mod sheet;
pub mod stats;
pub mod ui;
pub mod writer;

#[cfg(test)]
mod test_support;

pub use cli::{Cli, Commands};
pub use error::{FlightMapError, Result};
pub use ui::{LogUi, Phase, SilentUi, Ui, UiApp};

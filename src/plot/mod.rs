//! Map rendering: one figure, three outputs (HTML, PNG, terminal).

pub mod figure;
pub mod glyphs;
pub mod html;
pub mod land;
pub mod projection;
pub mod raster;

pub use figure::{Figure, MapSettings};
pub use html::write_html;
pub use projection::Orthographic;
pub use raster::write_png;

use std::path::{Path, PathBuf};

use crate::error::Result;

pub const HTML_FILE: &str = "map.html";
pub const PNG_FILE: &str = "map.png";

/// Write `map.html` and `map.png` into `dir`, returning their paths
pub fn export_figure(figure: &Figure, dir: &Path) -> Result<(PathBuf, PathBuf)> {
    std::fs::create_dir_all(dir)?;
    let html_path = dir.join(HTML_FILE);
    let png_path = dir.join(PNG_FILE);

    write_html(figure, &html_path)?;
    write_png(figure, &png_path)?;

    Ok((html_path, png_path))
}

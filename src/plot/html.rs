use std::fs;
use std::path::Path;

use super::Figure;
use crate::error::Result;

const PLOTLY_CDN: &str = "https://cdn.plot.ly/plotly-2.35.2.min.js";

/// Render the figure as a standalone page driven by plotly.js
pub fn render_html(figure: &Figure) -> Result<String> {
    // Keep a "</script>" inside a trace name from closing the tag early
    let data = serde_json::to_string(&figure.data)?.replace("</", "<\\/");
    let layout = serde_json::to_string(&figure.layout)?.replace("</", "<\\/");

    Ok(format!(
        r#"<!DOCTYPE html>
<html>
<head>
<meta charset="utf-8" />
<title>{title}</title>
<script src="{cdn}"></script>
<style>html, body, #map {{ width: 100%; height: 100%; margin: 0; }}</style>
</head>
<body>
<div id="map"></div>
<script>
Plotly.newPlot("map", {data}, {layout}, {{responsive: true}});
</script>
</body>
</html>
"#,
        title = escape_text(&figure.layout.title.text),
        cdn = PLOTLY_CDN,
        data = data,
        layout = layout,
    ))
}

pub fn write_html(figure: &Figure, path: &Path) -> Result<()> {
    fs::write(path, render_html(figure)?)?;
    Ok(())
}

fn escape_text(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plot::figure::{Annotation, Font, Geo, Layout, Projection, Rotation, Title};

    fn empty_figure(title: &str) -> Figure {
        Figure {
            data: Vec::new(),
            layout: Layout {
                title: Title {
                    text: title.to_string(),
                    font: Font { size: 24 },
                    x: 0.5,
                    xanchor: "center",
                },
                showlegend: false,
                geo: Geo {
                    projection: Projection {
                        kind: "orthographic",
                        rotation: Rotation { lon: -45.0, lat: 10.0 },
                    },
                },
                annotations: vec![Annotation {
                    text: "0 miles flown".to_string(),
                    showarrow: false,
                    x: 1.0,
                    y: 0.05,
                    font: Font { size: 18 },
                }],
            },
        }
    }

    #[test]
    fn test_page_embeds_figure() {
        let html = render_html(&empty_figure("My flights")).unwrap();
        assert!(html.contains("<title>My flights</title>"));
        assert!(html.contains(r#""type":"orthographic""#));
        assert!(html.contains("0 miles flown"));
    }

    #[test]
    fn test_script_close_is_escaped() {
        let html = render_html(&empty_figure("</script><b>")).unwrap();
        assert!(html.contains("&lt;/script&gt;&lt;b&gt;"));
        assert_eq!(html.matches("</script>").count(), 2);
    }
}

//! Interactive four-panel bar chart dashboard (plotly.js).

use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::analysis::group_moments;
use crate::error::Result;
use crate::schema::Table;
use crate::transform::MODEL_STANDARDIZED_COLUMN;

use super::config::RenderConfig;

pub const DASHBOARD_FILE: &str = "interactive_dashboard.html";

/// One bar panel: group labels and their mean values.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BarPanel {
    pub title: String,
    pub x: Vec<String>,
    pub y: Vec<Option<f64>>,
}

/// Panel definitions: title, grouping column, value column.
const PANELS: [(&str, &str, &str); 4] = [
    ("Response time by culture", "culture", "response_time"),
    ("Response time by model", MODEL_STANDARDIZED_COLUMN, "response_time"),
    ("Response time by complexity", "complexity", "response_time"),
    ("Word count by scenario", "scenario", "word_count"),
];

/// Group means for each dashboard panel. A panel whose columns are missing
/// is returned with no bars.
pub fn dashboard_panels(table: &Table) -> Vec<BarPanel> {
    PANELS
        .iter()
        .map(|(title, key, value)| {
            let groups = group_moments(table, key, value).unwrap_or_default();
            BarPanel {
                title: title.to_string(),
                x: groups.iter().map(|g| g.key.clone()).collect(),
                y: groups.iter().map(|g| g.mean()).collect(),
            }
        })
        .collect()
}

/// Whether this build can write the dashboard.
pub fn dashboard_available() -> bool {
    cfg!(feature = "dashboard")
}

/// Write the dashboard into `dir`.
#[cfg(feature = "dashboard")]
pub fn write_dashboard(table: &Table, dir: impl AsRef<Path>, config: &RenderConfig) -> Result<PathBuf> {
    use crate::error::CrosscultError;

    let dir = dir.as_ref();
    super::ensure_dir(dir)?;
    let path = dir.join(DASHBOARD_FILE);

    let html = render_html(&dashboard_panels(table), config)?;
    std::fs::write(&path, html).map_err(|e| CrosscultError::io(&path, e))?;
    tracing::info!(path = %path.display(), "saved dashboard");
    Ok(path)
}

/// Without the `dashboard` feature the dashboard cannot be produced.
#[cfg(not(feature = "dashboard"))]
pub fn write_dashboard(_table: &Table, _dir: impl AsRef<Path>, _config: &RenderConfig) -> Result<PathBuf> {
    Err(crate::error::CrosscultError::Unavailable(
        "interactive dashboard support not enabled. Rebuild with --features dashboard".to_string(),
    ))
}

#[cfg(feature = "dashboard")]
fn render_html(panels: &[BarPanel], config: &RenderConfig) -> Result<String> {
    let data = script_json(panels)?;
    let title = script_json(&config.dashboard_title)?;

    Ok(format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <title>{plain_title}</title>
    <script src="https://cdn.plot.ly/plotly-2.35.2.min.js"></script>
</head>
<body>
    <div id="dashboard"></div>
    <script>
        const panels = {data};
        const axes = [["x", "y"], ["x2", "y2"], ["x3", "y3"], ["x4", "y4"]];
        const traces = panels.map((p, i) => ({{
            type: "bar",
            x: p.x,
            y: p.y,
            name: p.title,
            xaxis: axes[i][0],
            yaxis: axes[i][1],
        }}));
        const annotations = panels.map((p, i) => ({{
            text: p.title,
            showarrow: false,
            xref: axes[i][0] + " domain",
            yref: axes[i][1] + " domain",
            x: 0.5,
            y: 1.12,
        }}));
        Plotly.newPlot("dashboard", traces, {{
            title: {{ text: {title}, x: 0.5 }},
            height: {height},
            showlegend: false,
            grid: {{ rows: 2, columns: 2, pattern: "independent" }},
            annotations: annotations,
        }});
    </script>
</body>
</html>
"#,
        plain_title = html_escape(&config.dashboard_title),
        data = data,
        title = title,
        height = config.dashboard_height,
    ))
}

/// JSON that can be inlined in a `<script>` element. Escaping `<`, `>` and
/// `&` keeps a value from closing the element early.
#[cfg(feature = "dashboard")]
fn script_json<T: Serialize + ?Sized>(value: &T) -> Result<String> {
    let json = serde_json::to_string(value)?;
    Ok(json
        .replace('<', "\\u003c")
        .replace('>', "\\u003e")
        .replace('&', "\\u0026")
        .replace('\u{2028}', "\\u2028")
        .replace('\u{2029}', "\\u2029"))
}

#[cfg(feature = "dashboard")]
fn html_escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{Record, Value};

    fn table() -> Table {
        let rows = [("Chinese", 10.0), ("German", 20.0), ("Chinese", 14.0)];
        Table::from_records(
            rows.into_iter()
                .map(|(c, rt)| {
                    let mut r = Record::new();
                    r.insert("culture".into(), c.into());
                    r.insert("response_time".into(), Value::Float(rt));
                    r
                })
                .collect(),
        )
    }

    #[test]
    fn test_panels_group_means() {
        let panels = dashboard_panels(&table());
        assert_eq!(panels.len(), 4);
        assert_eq!(panels[0].x, vec!["Chinese", "German"]);
        assert_eq!(panels[0].y, vec![Some(12.0), Some(20.0)]);
        // No model/complexity/scenario columns
        assert!(panels[1].x.is_empty());
        assert!(panels[3].x.is_empty());
    }

    #[cfg(feature = "dashboard")]
    #[test]
    fn test_write_dashboard() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_dashboard(&table(), dir.path(), &RenderConfig::default()).unwrap();
        let html = std::fs::read_to_string(path).unwrap();
        assert!(html.contains("Plotly.newPlot"));
        assert!(html.contains("\"Chinese\",\"German\""));
    }

    #[cfg(feature = "dashboard")]
    #[test]
    fn test_dashboard_escapes_script_close() {
        let hostile = "</script><script>alert(1)</script>";
        let mut r = Record::new();
        r.insert("culture".into(), hostile.into());
        r.insert("response_time".into(), Value::Float(3.0));
        let config = RenderConfig {
            dashboard_title: "Run <b>&</b>".to_string(),
            ..RenderConfig::default()
        };

        let html = render_html(&dashboard_panels(&Table::from_records(vec![r])), &config).unwrap();

        assert_eq!(html.matches("</script>").count(), 2);
        assert!(!html.contains(hostile));
        assert!(html.contains("\\u003c/script\\u003e"));
        assert!(html.contains("<title>Run &lt;b&gt;&amp;&lt;/b&gt;</title>"));
    }

    #[cfg(feature = "dashboard")]
    #[test]
    fn test_script_json_is_still_json() {
        let escaped = script_json("a</b> & c").unwrap();
        let back: String = serde_json::from_str(&escaped).unwrap();
        assert_eq!(back, "a</b> & c");
    }

    #[cfg(not(feature = "dashboard"))]
    #[test]
    fn test_dashboard_unavailable() {
        let dir = tempfile::tempdir().unwrap();
        assert!(write_dashboard(&table(), dir.path(), &RenderConfig::default()).is_err());
    }
}

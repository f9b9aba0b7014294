//! Static 2×2 figure grids.
//!
//! Each figure is planned first (which panels have the columns and data
//! they need) and then drawn with plotters. Panels without data are left
//! blank.

mod charts;

use std::path::{Path, PathBuf};

use plotters::prelude::*;
use tracing::{debug, info, warn};

use crate::analysis::{group_samples, pivot_mean};
use crate::error::Result;
use crate::schema::Table;
use crate::transform::MODEL_STANDARDIZED_COLUMN;

use super::config::{FigureSize, RenderConfig};
use super::ensure_dir;

pub use charts::{Area, Chart, Panel};

pub const BASIC_FIGURE: &str = "basic_analysis.png";
pub const CULTURAL_FIGURE: &str = "cultural_model_analysis.png";

/// Four panels in row-major order; `None` marks a hidden panel.
pub type FigurePlan = [Option<Panel>; 4];

/// A figure written to disk.
#[derive(Debug, Clone)]
pub struct FigureOutput {
    pub path: PathBuf,
    /// Which panels were drawn.
    pub panels: [bool; 4],
}

/// Render both figures into `dir`.
pub fn write_figures(table: &Table, dir: impl AsRef<Path>, config: &RenderConfig) -> Result<Vec<FigureOutput>> {
    let dir = dir.as_ref();
    ensure_dir(dir)?;

    let figures = [
        (BASIC_FIGURE, plan_basic(table, config), config.basic_size),
        (CULTURAL_FIGURE, plan_cultural(table, config), config.cultural_size),
    ];

    let mut written = Vec::new();
    for (name, plan, size) in figures {
        let path = dir.join(name);
        if let Err(err) = render(&plan, size, &path, config, config.labels) {
            if !config.labels {
                return Err(err);
            }
            warn!(path = %path.display(), error = %err, "drawing figure without text");
            render(&plan, size, &path, config, false)?;
        }
        let panels = [0, 1, 2, 3].map(|i| plan[i].is_some());
        info!(path = %path.display(), ?panels, "saved figure");
        written.push(FigureOutput { path, panels });
    }
    Ok(written)
}

/// Distributions and per-group box plots of response time and word count.
pub fn plan_basic(table: &Table, config: &RenderConfig) -> FigurePlan {
    let has_rt = table.has_values("response_time");

    let histogram = |column: &str, color, title: &str, x_desc: &str| {
        table.has_values(column).then(|| {
            let chart = Chart::Histogram {
                values: numeric(table, column),
                color,
            };
            Panel::new(title, x_desc, "count", chart)
        })
    };
    let box_plot = |key: &str, color, title: &str, x_desc: &str| {
        if !has_rt {
            return None;
        }
        group_samples(table, key, "response_time")
            .filter(|groups| groups.iter().any(|(_, samples)| !samples.is_empty()))
            .map(|groups| Panel::new(title, x_desc, "seconds", Chart::BoxPlot { groups, color }))
    };

    [
        histogram("response_time", config.response_time_color, "Response time distribution", "seconds"),
        histogram("word_count", config.word_count_color, "Word count distribution", "words"),
        box_plot("culture", config.culture_box_color, "Response time by culture", "culture"),
        box_plot(
            MODEL_STANDARDIZED_COLUMN,
            config.model_box_color,
            "Response time by model",
            "model",
        ),
    ]
}

/// Culture × model heatmaps and grouped bars by complexity and scenario.
pub fn plan_cultural(table: &Table, config: &RenderConfig) -> FigurePlan {
    let heatmap = |value: &str, gradient, title: &str, legend: &str| {
        pivot_mean(table, "culture", MODEL_STANDARDIZED_COLUMN, value)
            .filter(|p| p.has_values())
            .map(|pivot| {
                let chart = Chart::Heatmap {
                    pivot,
                    gradient,
                    legend: legend.to_string(),
                };
                Panel::new(title, "model", "culture", chart)
            })
    };
    let bars = |column: &str, value: &str, title: &str, y_desc: &str| {
        if !table.has_values(value) {
            return None;
        }
        pivot_mean(table, "culture", column, value)
            .filter(|p| p.has_values())
            .map(|pivot| Panel::new(title, "culture", y_desc, Chart::GroupedBars { pivot }))
    };

    [
        heatmap(
            "response_time",
            config.response_time_heat,
            "Culture × model: response time",
            "mean response time (s)",
        ),
        heatmap(
            "word_count",
            config.word_count_heat,
            "Culture × model: word count",
            "mean word count",
        ),
        bars("complexity", "response_time", "Response time by complexity", "seconds"),
        bars("scenario", "word_count", "Word count by scenario", "words"),
    ]
}

fn numeric(table: &Table, column: &str) -> Vec<f64> {
    table
        .column(column)
        .map(|values| values.iter().filter_map(|v| v.as_f64()).collect())
        .unwrap_or_default()
}

fn render(plan: &FigurePlan, size: FigureSize, path: &Path, config: &RenderConfig, labelled: bool) -> Result<()> {
    let root = BitMapBackend::new(path, (size.width, size.height)).into_drawing_area();
    let [r, g, b] = config.background;
    root.fill(&RGBColor(r, g, b))?;

    for (area, panel) in root.split_evenly((2, 2)).iter().zip(plan) {
        let Some(panel) = panel else { continue };
        debug!(kind = panel.chart.kind(), title = %panel.title, "drawing panel");
        panel.draw(area, config, labelled)?;
    }
    root.present()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{Record, Value};

    fn table(with_rt: bool) -> Table {
        let rows = [
            ("Chinese", "Claude-4", "high", 10.0, 300.0),
            ("German", "GPT-4", "low", 14.0, 280.0),
            ("German", "Claude-4", "high", 9.0, 410.0),
        ];
        Table::from_records(
            rows.into_iter()
                .map(|(c, m, x, rt, wc)| {
                    let mut r = Record::new();
                    r.insert("culture".into(), c.into());
                    r.insert(MODEL_STANDARDIZED_COLUMN.into(), m.into());
                    r.insert("complexity".into(), x.into());
                    if with_rt {
                        r.insert("response_time".into(), Value::Float(rt));
                    }
                    r.insert("word_count".into(), Value::Float(wc));
                    r
                })
                .collect(),
        )
    }

    #[test]
    fn test_full_basic_plan() {
        let plan = plan_basic(&table(true), &RenderConfig::default());
        assert!(plan.iter().all(Option::is_some));

        let by_culture = plan[2].as_ref().unwrap();
        assert_eq!(by_culture.title, "Response time by culture");
        assert_eq!(by_culture.chart.kind(), "box_plot");
    }

    #[test]
    fn test_cultural_heatmap_carries_legend() {
        let plan = plan_cultural(&table(true), &RenderConfig::default());
        match &plan[0].as_ref().unwrap().chart {
            Chart::Heatmap { pivot, legend, .. } => {
                assert_eq!(pivot.row_keys, vec!["Chinese", "German"]);
                assert_eq!(legend, "mean response time (s)");
            }
            other => panic!("expected a heatmap, got {}", other.kind()),
        }
    }

    #[test]
    fn test_missing_response_time_hides_panels() {
        let config = RenderConfig::default();
        let basic = plan_basic(&table(false), &config);
        assert!(basic[0].is_none());
        assert!(basic[1].is_some());
        assert!(basic[2].is_none());
        assert!(basic[3].is_none());

        let cultural = plan_cultural(&table(false), &config);
        assert!(cultural[0].is_none());
        assert!(cultural[1].is_some());
        assert!(cultural[2].is_none());
        // No scenario column
        assert!(cultural[3].is_none());
    }

    #[test]
    fn test_write_figures() {
        let dir = tempfile::tempdir().unwrap();
        let config = RenderConfig {
            basic_size: FigureSize { width: 200, height: 160 },
            cultural_size: FigureSize { width: 200, height: 160 },
            panel_padding: 10,
            labels: false,
            ..RenderConfig::default()
        };
        let written = write_figures(&table(true), dir.path(), &config).unwrap();

        assert_eq!(written.len(), 2);
        assert!(dir.path().join(BASIC_FIGURE).exists());
        assert!(dir.path().join(CULTURAL_FIGURE).exists());
        assert_eq!(written[1].panels, [true, true, true, false]);
    }

    #[test]
    fn test_write_labelled_figures() {
        let dir = tempfile::tempdir().unwrap();
        let config = RenderConfig {
            basic_size: FigureSize { width: 640, height: 480 },
            cultural_size: FigureSize { width: 640, height: 480 },
            panel_padding: 8,
            ..RenderConfig::default()
        };
        // Falls back to unlabelled panels where no font is installed.
        let written = write_figures(&table(true), dir.path(), &config).unwrap();

        assert!(written.iter().all(|figure| figure.path.exists()));
        assert_eq!(written[0].panels, [true; 4]);
    }
}

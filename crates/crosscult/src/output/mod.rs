//! Output formatters. All of them read the final table and never modify it.

pub mod config;
mod csv_writer;
mod dashboard;
pub mod figures;
mod report;
mod tables;

use std::path::Path;

use crate::error::{CrosscultError, Result};

pub use csv_writer::write_table_csv;
pub use config::{FigureSize, RenderConfig, Rgb};
pub use dashboard::{dashboard_available, dashboard_panels, write_dashboard, BarPanel, DASHBOARD_FILE};
pub use figures::{plan_basic, plan_cultural, write_figures, FigureOutput, BASIC_FIGURE, CULTURAL_FIGURE};
pub use report::{build_report, write_report, REPORT_FILE};
pub use tables::{write_tables, COUNTS_FILE, MISSING_RATE_FILE, SOURCES_FILE};

/// Create a directory and its parents.
pub(crate) fn ensure_dir(dir: &Path) -> Result<()> {
    std::fs::create_dir_all(dir).map_err(|e| CrosscultError::io(dir, e))
}

/// Create the parent directory of a file path, if it has one.
pub(crate) fn ensure_parent(path: &Path) -> Result<()> {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => ensure_dir(parent),
        _ => Ok(()),
    }
}

//! CLI argument definitions using clap.

use clap::Parser;
use std::path::PathBuf;

/// Crosscult: merge raw AI evaluation files and write figures, tables and a report
#[derive(Parser, Debug)]
#[command(name = "crosscult")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Directory holding the raw *.json files
    #[arg(long, value_name = "DIR", default_value = "data/raw")]
    pub raw_dir: PathBuf,

    /// Output directory for figures, tables, dashboard and report
    #[arg(long, value_name = "DIR", default_value = "reports")]
    pub out: PathBuf,

    /// Path of the merged CSV
    #[arg(
        long,
        value_name = "FILE",
        default_value = "data/processed/merged_cross_cultural_data.csv"
    )]
    pub csv: PathBuf,

    /// Also write the interactive HTML dashboard
    #[arg(long)]
    pub with_plotly: bool,

    /// Normalize input files in parallel
    #[arg(long)]
    pub parallel: bool,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cli = Cli::parse_from(["crosscult"]);
        assert_eq!(cli.raw_dir, PathBuf::from("data/raw"));
        assert_eq!(cli.out, PathBuf::from("reports"));
        assert_eq!(
            cli.csv,
            PathBuf::from("data/processed/merged_cross_cultural_data.csv")
        );
        assert!(!cli.with_plotly);
        assert!(!cli.verbose);
    }

    #[test]
    fn test_flags() {
        let cli = Cli::parse_from([
            "crosscult",
            "--raw-dir",
            "in",
            "--out",
            "out",
            "--csv",
            "merged.csv",
            "--with-plotly",
            "-v",
        ]);
        assert_eq!(cli.raw_dir, PathBuf::from("in"));
        assert_eq!(cli.csv, PathBuf::from("merged.csv"));
        assert!(cli.with_plotly);
        assert!(cli.verbose);
        assert!(!cli.parallel);
    }
}

//! Run command - merge the raw directory and write every artifact.

use colored::Colorize;
use crosscult::{DashboardStatus, MergeReport, Pipeline, PipelineConfig, RunOutcome, RunResult};

use crate::cli::Cli;

pub fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    println!(
        "{} {}",
        "Merging".cyan().bold(),
        cli.raw_dir.display().to_string().white()
    );

    let config = PipelineConfig::default()
        .with_raw_dir(&cli.raw_dir)
        .with_out_dir(&cli.out)
        .with_csv_path(&cli.csv)
        .with_dashboard(cli.with_plotly)
        .with_parallel(cli.parallel);
    tracing::debug!(?config, "pipeline configuration");

    match Pipeline::with_config(config).run()? {
        RunOutcome::NoUsableData(report) => {
            print_skipped(&report);
            println!("{}", "No usable data found - nothing was written.".yellow());
        }
        RunOutcome::Completed(result) => print_result(&result, cli.verbose),
    }

    Ok(())
}

fn print_skipped(report: &MergeReport) {
    if report.skipped.is_empty() {
        return;
    }
    println!(
        "Skipped {} of {} files:",
        report.skipped.len().to_string().yellow(),
        report.files_found
    );
    for skipped in &report.skipped {
        println!("  {:30} {}", skipped.file, skipped.reason.dimmed());
    }
}

fn print_result(result: &RunResult, verbose: bool) {
    let summary = &result.summary;

    println!(
        "Merged {} rows from {} files",
        summary.samples.to_string().white().bold(),
        result.merge.sources.len().to_string().white().bold()
    );
    print_skipped(&result.merge);

    if verbose {
        println!();
        println!("{}", "Sources:".yellow().bold());
        for source in &result.merge.sources {
            println!(
                "  {:30} {:14} {:>6} rows",
                source.file,
                source.layout.to_string(),
                source.row_count
            );
        }
        println!();
        println!(
            "Coercion failures: {}",
            result.preprocess.coercion_failures.to_string().yellow()
        );
    }

    println!();
    println!("{}", "Summary:".yellow().bold());
    println!("  Samples:  {}", summary.samples);
    println!("  Cultures: {}", count_or_na(summary.cultures));
    println!("  Models:   {}", count_or_na(summary.models));
    if let Some(culture) = &summary.fastest_culture {
        println!("  Fastest culture: {}", culture.green());
    }
    if let Some(model) = &summary.fastest_model {
        println!("  Fastest model:   {}", model.green());
    }

    println!();
    println!("{}", "Written:".green().bold());
    for path in &result.artifacts {
        println!("  {}", path.display().to_string().white());
    }
    if let DashboardStatus::Unavailable(reason) = &result.dashboard {
        println!("{} {}", "Dashboard skipped:".yellow(), reason);
    }
}

fn count_or_na(count: Option<usize>) -> String {
    count.map_or_else(|| "NA".to_string(), |n| n.to_string())
}

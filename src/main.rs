// src/main.rs

use clap::Parser;
use log::LevelFilter;
use log4rs::{
    append::console::{ConsoleAppender, Target},
    append::file::FileAppender,
    config::{Appender, Root},
    encode::pattern::PatternEncoder,
    filter::threshold::ThresholdFilter,
    Config,
};
use notion_activity::{
    default_csv_filename, deliver, render_csv, render_table, ActivityConfig, ActivityReport,
    AppError, CommandLineInput, CsvDestination, DeliveryTarget, LocalTimeFormatter,
    NotionHttpClient, OutputPlan, OutputReport, SubpageScanner,
};
use std::fs;
use std::sync::Arc;

/// Sets up logging configuration.
///
/// Console logs go to stderr so `--pipe` output stays clean CSV.
fn setup_logging(verbose: bool) -> Result<(), Box<dyn std::error::Error>> {
    let log_level = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Warn
    };

    let log_file_path = std::env::temp_dir().join("notion_activity.log");
    if let Some(parent) = log_file_path.parent() {
        fs::create_dir_all(parent)?;
    }

    let pattern = if verbose {
        "{d(%Y-%m-%d %H:%M:%S)} [{l}] - {m}{n}"
    } else {
        "{m}{n}"
    };

    let stderr_appender = ConsoleAppender::builder()
        .target(Target::Stderr)
        .encoder(Box::new(PatternEncoder::new(pattern)))
        .build();

    let file_appender = FileAppender::builder()
        .encoder(Box::new(PatternEncoder::new(
            "{d(%Y-%m-%d %H:%M:%S)} [{l}] - {m}{n}",
        )))
        .build(&log_file_path)?;

    let config = Config::builder()
        .appender(Appender::builder().build("stderr", Box::new(stderr_appender)))
        .appender(
            Appender::builder()
                .filter(Box::new(ThresholdFilter::new(LevelFilter::Debug)))
                .build("file", Box::new(file_appender)),
        )
        .build(
            Root::builder()
                .appender("stderr")
                .appender("file")
                .build(log_level),
        )?;

    log4rs::init_config(config)?;
    log::info!("Logging initialized. Log file: {}", log_file_path.display());
    Ok(())
}

/// Scans the root page and delivers the report.
async fn execute_scan(config: &ActivityConfig) -> Result<(), AppError> {
    log::info!("Scanning subpages of {}", config.root_id.to_hyphenated());

    let transport = NotionHttpClient::new(&config.api_key, config.scan.request_timeout)?;
    let scanner = SubpageScanner::from_options(
        Arc::new(transport),
        &config.scan,
        Arc::new(LocalTimeFormatter::ist()),
    );

    let report = scanner.list_subpage_summaries(&config.root_id).await?;
    if let Some(stats) = scanner.admission_stats() {
        log::info!(
            "{} requests issued, at most {} in flight",
            stats.admitted(),
            stats.peak_in_flight()
        );
    }

    report_completion(config, &report)
}

/// Prints the report and writes any requested CSV export.
fn report_completion(config: &ActivityConfig, report: &ActivityReport) -> Result<(), AppError> {
    let csv = render_csv(&report.summaries);

    if config.csv == CsvDestination::Stdout {
        let delivery = deliver(
            OutputPlan::new().with_target(DeliveryTarget::PrintToStdout { content: csv }),
        );
        return ensure_delivered(&delivery);
    }

    if report.is_empty() {
        println!("No subpages found for this page.");
    } else {
        println!(
            "✅ Analyzed {} subpages in {:.2} seconds",
            report.summaries.len(),
            report.elapsed.as_secs_f64()
        );
        print!("{}", render_table(&report.summaries));
    }

    for failure in &report.failures {
        eprintln!("⚠️  Skipped subtree {}", failure);
    }

    let path = match &config.csv {
        CsvDestination::File(path) => Some(path.clone()),
        CsvDestination::DefaultFile => Some(default_csv_filename(chrono::Local::now())),
        CsvDestination::None | CsvDestination::Stdout => None,
    };

    if let Some(path) = path {
        let delivery = deliver(OutputPlan::new().with_target(DeliveryTarget::WriteFile {
            path: path.clone(),
            content: csv,
        }));
        ensure_delivered(&delivery)?;
        println!("📥 CSV saved to {}", path.display());
    }

    Ok(())
}

fn ensure_delivered(report: &OutputReport) -> Result<(), AppError> {
    match report.failed.first() {
        None => Ok(()),
        Some(failure) => Err(AppError::Io(std::io::Error::other(format!(
            "{}: {}",
            failure.target.describe(),
            failure.error
        )))),
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = CommandLineInput::parse();

    setup_logging(cli.verbose)?;

    let config = ActivityConfig::resolve(cli)?;

    if let Err(e) = execute_scan(&config).await {
        log::error!("Scan failed ({} error): {}", e.category(), e);
        return Err(e.into());
    }

    Ok(())
}

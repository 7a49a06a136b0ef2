//! Stockpile CLI entry point.

use std::process::ExitCode;

use clap::Parser;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use stockpile::cli::Cli;
use stockpile::context::InstallContext;
use stockpile::fetch::Fetcher;
use stockpile::pipeline::Driver;
use stockpile::registry::Registry;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Initialize the tracing subscriber for logging.
///
/// Log level is controlled by:
/// 1. `--debug` flag sets level to DEBUG
/// 2. `RUST_LOG` environment variable (if set)
/// 3. Default is INFO
fn init_tracing(debug: bool) {
    let filter = if debug {
        EnvFilter::new("stockpile=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("stockpile=info"))
    };

    // Logs go to stderr; stdout carries the --list table and --json report.
    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .with(filter)
        .init();
}

fn list_registry(registry: &Registry) {
    for spec in registry.packages() {
        let floor = spec.min_version.as_deref().unwrap_or("any");
        println!(
            "{} {:<10} {}",
            style(format!("{:<12}", spec.name)).cyan().bold(),
            floor,
            style(spec.build.label()).dim()
        );
    }
}

fn download_bar() -> ProgressBar {
    let bar = ProgressBar::new(0);
    bar.set_style(
        ProgressStyle::default_bar()
            .template("{bytes}/{total_bytes} [{wide_bar}] {bytes_per_sec}")
            .unwrap(),
    );
    bar
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.debug);

    tracing::debug!("Stockpile starting with args: {:?}", cli);

    let registry = Registry::new();
    if cli.list {
        list_registry(&registry);
        return ExitCode::SUCCESS;
    }

    let ctx = InstallContext::new(&cli.base_dir, cli.python.as_str());
    // Build subprocesses and the version probe must see what earlier
    // packages installed.
    ctx.export_python_path();

    let mut fetcher = Fetcher::new();
    let bar = if !cli.quiet && console::Term::stderr().is_term() {
        let bar = download_bar();
        let handle = bar.clone();
        fetcher = fetcher.with_progress(Box::new(move |got, total| {
            handle.set_length(total);
            handle.set_position(got);
        }));
        Some(bar)
    } else {
        None
    };

    let driver = Driver::new(registry, ctx, fetcher);
    let result = driver.run(&cli.packages);
    if let Some(bar) = bar {
        bar.finish_and_clear();
    }

    match result {
        Ok(report) => {
            for line in report.failure_lines() {
                eprintln!("{}", style(line).red().bold());
            }
            if cli.json {
                match serde_json::to_string_pretty(&report) {
                    Ok(json) => println!("{json}"),
                    Err(err) => {
                        eprintln!("{}", style(format!("Error: {err}")).red().bold());
                        return ExitCode::from(1);
                    }
                }
            }
            ExitCode::from(report.error_count().min(255) as u8)
        }
        Err(err) => {
            eprintln!("{}", style(format!("Error: {err}")).red().bold());
            ExitCode::from(1)
        }
    }
}

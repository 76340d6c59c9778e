use std::process;
use std::time::Duration;

use clap::Parser;
use console::style;
use indicatif::ProgressBar;

mod archiver;
mod classifier;
mod cli;
mod config;
mod error;
mod paths;
mod rules;
mod smells;
mod tree;
mod updater;

use classifier::{Classifier, Diagnostics, TestDetection};
use paths::SourceRoot;

fn main() {
    let cli = cli::Cli::parse();

    setup_logging(cli.quiet, cli.verbose);

    if let Err(e) = run(&cli) {
        eprintln!("{} {e}", style("error:").red().bold());
        process::exit(1);
    }
}

fn setup_logging(quiet: bool, verbose: u8) {
    let level = if quiet {
        log::LevelFilter::Warn
    } else {
        match verbose {
            0 => log::LevelFilter::Info,
            1 => log::LevelFilter::Debug,
            _ => log::LevelFilter::Trace,
        }
    };

    env_logger::Builder::new()
        .filter_level(level)
        .format_timestamp(None)
        .format_target(false)
        .init();
}

fn run(cli: &cli::Cli) -> Result<(), Box<dyn std::error::Error>> {
    let config = match &cli.config {
        Some(path) => config::load_from(&config::expand_tilde(path))?,
        None => config::load()?,
    };

    if let Some(feed) = &config.release_feed {
        notify_of_updates(feed);
    }

    log::info!("JS Packager {} - Started", updater::current_version());

    let root = SourceRoot::resolve(&config::expand_tilde(&cli.source))?;
    log::info!("Source directory to zip up: {}", root.root.display());

    let tests = match &cli.tests {
        Some(raw) => TestDetection::Explicit(paths::test_dir_name(&root.project, raw)),
        None => TestDetection::Heuristic,
    };
    match &tests {
        TestDetection::Explicit(dir) => {
            log::info!("Test directory (its content will be omitted): {dir}");
        }
        TestDetection::Heuristic => {
            log::info!("No test directory given, common test folders and files will be omitted");
        }
    }

    let spinner = ProgressBar::new_spinner();
    spinner.set_message("Checking the source tree...");
    spinner.enable_steady_tick(Duration::from_millis(80));

    let report = smells::check(&root);

    spinner.finish_and_clear();
    report.log_warnings();

    let target = config::expand_tilde(&cli.target).join(archiver::archive_file_name(
        &root.project,
        chrono::Local::now().date_naive(),
    ));

    log::info!("Zip process - Started...");

    let classifier = Classifier::new(config.rules(), tests);
    let mut diagnostics = Diagnostics::new();
    let summary = archiver::package(&root, &target, &classifier, &mut diagnostics)?;

    log::info!("Zip process - Finished");
    for (category, count) in diagnostics.breakdown() {
        log::debug!("excluded {count} {category} {}", if count == 1 { "path" } else { "paths" });
    }

    println!(
        "{} {} {} in {} {} ({}), {} excluded",
        style("Packaged").green().bold(),
        summary.files,
        if summary.files == 1 { "file" } else { "files" },
        summary.directories,
        if summary.directories == 1 { "folder" } else { "folders" },
        archiver::format_size(summary.bytes),
        summary.excluded,
    );
    if summary.skipped_links > 0 {
        println!(
            "{} {} symbolic {} not pointing at project files",
            style("Skipped").yellow().bold(),
            summary.skipped_links,
            if summary.skipped_links == 1 { "link" } else { "links" },
        );
    }
    println!("{} {}", style("Wrote").blue().bold(), target.display());

    Ok(())
}

fn notify_of_updates(feed: &str) {
    match updater::check(feed) {
        Ok(Some(hint)) => println!(
            "{} {} -> {} is available",
            style("Update:").yellow().bold(),
            hint.current_version,
            hint.latest_version
        ),
        Ok(None) => {}
        Err(e) => log::debug!("update check failed: {e}"),
    }
}

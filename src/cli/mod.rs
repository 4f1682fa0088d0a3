//! # CLI Module
//!
//! Command-line interface for phopy.
//!
//! ## Usage
//! ```bash
//! # Copy everything
//! phopy --source ~/Card --target ~/Photos
//!
//! # Preview one month
//! phopy -s ~/Card -t ~/Photos --from 2024-10-01 --until 2024-10-31 --dry-run
//!
//! # Overwrite existing targets without asking
//! phopy -s ~/Card -t ~/Photos --allow-override --yes
//!
//! # JSON output
//! phopy -s ~/Card -t ~/Photos --dry-run --output json
//! ```

pub mod config;
mod printer;

use clap::Parser;
use config::{Cli, OutputFormat, ProcessEnv};
use console::{style, Term};
use indicatif::{ProgressBar, ProgressStyle};
use phopy::core::{
    CancellationToken, CopyConfig, CopyExecutor, CopyPlan, ExifReader, FileSystem, OsFileSystem,
    Planner,
};
use phopy::error::{CopyError, PhopyError, ScanError};
use phopy::events::{CopyEvent, Event, EventChannel, EventReceiver, ScanEvent};
use phopy::Result;
use printer::Printer;
use std::sync::Arc;
use std::thread;
use std::time::Duration;
use tracing::debug;

/// Run the CLI
pub fn run() -> Result<()> {
    let cli = Cli::parse();
    let config = cli.resolve(&ProcessEnv)?;

    phopy::init_tracing(config.verbose);
    debug!(
        "source={} target={} dry-run={} date-range={}",
        config.source_dir.display(),
        config.target_dir.display(),
        config.dry_run,
        config.range.describe()
    );

    run_copy(&config, cli.output, cli.yes)
}

fn run_copy(config: &CopyConfig, output: OutputFormat, assume_yes: bool) -> Result<()> {
    let fs: Arc<dyn FileSystem> = Arc::new(OsFileSystem::new());

    let source_exists = fs
        .exists(&config.source_dir)
        .map_err(|source| ScanError::Stat {
            path: config.source_dir.clone(),
            source,
        })?;
    if !source_exists {
        return Err(ScanError::SourceNotFound {
            path: config.source_dir.clone(),
        }
        .into());
    }

    let mut builder = Planner::builder()
        .file_system(Arc::clone(&fs))
        .capture_times(Arc::new(ExifReader::new()))
        .allow_override(config.allow_override);
    if let Some(workers) = config.workers {
        builder = builder.workers(workers);
    }
    let planner = builder.build()?;

    let pretty = matches!(output, OutputFormat::Pretty);
    let cancel = CancellationToken::new();

    let (sender, receiver) = EventChannel::new();
    let event_thread = thread::spawn(move || drive_progress(receiver, pretty));

    let planned = planner.plan(
        &config.source_dir,
        &config.target_dir,
        config.range,
        &cancel,
        &sender,
    );

    let plan = match planned {
        Ok(plan) => plan,
        Err(err) => {
            drop(sender);
            event_thread.join().ok();
            return Err(err);
        }
    };

    if config.dry_run {
        drop(sender);
        event_thread.join().ok();
        return print_plan(&plan, config.verbose, output, None);
    }

    let confirmed = if plan.override_items.is_empty() {
        false
    } else if assume_yes {
        true
    } else {
        confirm_overrides(plan.override_count())?
    };

    fs.ensure_dir(&config.target_dir)
        .map_err(|source| CopyError::EnsureDir {
            path: config.target_dir.clone(),
            source,
        })?;

    let executor = CopyExecutor::builder().file_system(fs).build()?;
    let executed = executor.execute(&plan, confirmed, &cancel, &sender);

    // Drop sender to signal event thread to finish
    drop(sender);
    event_thread.join().ok();

    let report = executed?;
    debug!(
        "Copied {} files in {}ms ({} overrides skipped)",
        report.files_copied, report.duration_ms, report.overrides_skipped
    );

    print_plan(&plan, config.verbose, output, Some(confirmed))
}

/// Render scan and copy events as progress bars on stderr
fn drive_progress(receiver: EventReceiver, enabled: bool) {
    let bar_style = ProgressStyle::default_bar()
        .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("█▓░");

    let mut progress: Option<ProgressBar> = None;

    for event in receiver.iter() {
        if !enabled {
            continue;
        }
        match event {
            Event::Scan(ScanEvent::Started { source }) => {
                let spinner = ProgressBar::new_spinner();
                spinner.set_message(format!("Scanning {}", source.display()));
                spinner.enable_steady_tick(Duration::from_millis(100));
                progress = Some(spinner);
            }
            Event::Scan(ScanEvent::Candidates { to_process, .. }) => {
                if let Some(pb) = progress.take() {
                    pb.finish_and_clear();
                }
                let pb = ProgressBar::new(to_process as u64);
                pb.set_style(bar_style.clone());
                pb.set_message("Reading capture times");
                progress = Some(pb);
            }
            Event::Scan(ScanEvent::Progress(p)) => {
                if let Some(ref pb) = progress {
                    pb.set_length(p.total as u64);
                    pb.set_position(p.current as u64);
                }
            }
            Event::Copy(CopyEvent::Started { total }) => {
                if let Some(pb) = progress.take() {
                    pb.finish_and_clear();
                }
                let pb = ProgressBar::new(total as u64);
                pb.set_style(bar_style.clone());
                progress = Some(pb);
            }
            Event::Copy(CopyEvent::Progress(p)) => {
                if let Some(ref pb) = progress {
                    pb.set_position(p.current as u64);
                    pb.set_message(p.file_name);
                }
            }
            Event::Scan(ScanEvent::Completed { .. }) | Event::Copy(CopyEvent::Completed { .. }) => {
                if let Some(pb) = progress.take() {
                    pb.finish_and_clear();
                }
            }
        }
    }

    if let Some(pb) = progress {
        pb.finish_and_clear();
    }
}

/// Ask on the terminal; anything but y/yes declines
fn confirm_overrides(count: usize) -> Result<bool> {
    let term = Term::stderr();
    term.write_str(&format!(
        "{} Override {} existing files? [y/N]: ",
        style("?").yellow().bold(),
        count
    ))
    .map_err(PhopyError::Prompt)?;

    let answer = term.read_line().map_err(PhopyError::Prompt)?;
    Ok(is_yes(&answer))
}

fn is_yes(answer: &str) -> bool {
    matches!(answer.trim().to_lowercase().as_str(), "y" | "yes")
}

/// `confirmed` is `None` for dry runs
fn print_plan(
    plan: &CopyPlan,
    verbose: bool,
    output: OutputFormat,
    confirmed: Option<bool>,
) -> Result<()> {
    match output {
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(plan)
                .map_err(|e| PhopyError::Output(e.to_string()))?;
            println!("{}", json);
            Ok(())
        }
        OutputFormat::Pretty => {
            let mut printer = Printer::new(Term::stdout(), verbose);
            let written = match confirmed {
                None => printer.print_dry_run(plan),
                Some(granted) => printer.print_execution(plan, granted),
            };
            written.map_err(|e| PhopyError::Output(e.to_string()))
        }
    }
}

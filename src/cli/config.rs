//! Argument and environment resolution into a [`CopyConfig`].

use chrono::{DateTime, Duration, Local, NaiveDate, TimeZone};
use clap::{Parser, ValueEnum};
use phopy::core::organize::{CopyConfig, DateRange};
use phopy::PhopyError;
use std::path::PathBuf;

const LONG_ABOUT: &str = "phopy copies photos from a source directory into a target directory.

JPEGs are skipped when a RAW file with the same name exists. Files whose
target already exists are skipped unless --allow-override is given, in which
case overwriting them needs confirmation.";

/// phopy - Copy photos, keep the RAWs
#[derive(Parser, Debug)]
#[command(name = "phopy")]
#[command(author, version, about, long_about = LONG_ABOUT)]
#[command(after_help = "Examples:
  phopy --source ~/Photos --target ~/Archive
  phopy -s ./in -t ./out --from 2024-01-01 --until 2024-12-31 --dry-run")]
pub struct Cli {
    /// Source directory to copy from
    #[arg(short, long, env = "PHOPY_SOURCE_DIR")]
    pub source: Option<PathBuf>,

    /// Target directory to copy to
    #[arg(short, long, env = "PHOPY_TARGET_DIR")]
    pub target: Option<PathBuf>,

    /// Dry run (no copy)
    #[arg(short, long)]
    pub dry_run: bool,

    /// Verbose output (env: PHOPY_VERBOSE)
    #[arg(short, long)]
    pub verbose: bool,

    /// Start date, YYYY-MM-DD (env: PHOPY_FROM, PHOPY_START_DATE)
    #[arg(short, long)]
    pub from: Option<String>,

    /// End date, YYYY-MM-DD, inclusive (env: PHOPY_UNTIL, PHOPY_END_DATE)
    #[arg(short, long)]
    pub until: Option<String>,

    /// Plan overwrites of existing target files (asks for confirmation)
    #[arg(long, env = "PHOPY_ALLOW_OVERRIDE")]
    pub allow_override: bool,

    /// Confirm overwrites without asking
    #[arg(short = 'y', long)]
    pub yes: bool,

    /// Number of metadata workers (default: CPU count)
    #[arg(short, long)]
    pub workers: Option<usize>,

    /// Output format
    #[arg(short, long, default_value = "pretty")]
    pub output: OutputFormat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable summary
    Pretty,
    /// The full plan as JSON for scripting
    Json,
}

/// Where environment fallbacks come from; tests swap in a map
pub trait Env {
    fn var(&self, key: &str) -> Option<String>;
}

/// The process environment
pub struct ProcessEnv;

impl Env for ProcessEnv {
    fn var(&self, key: &str) -> Option<String> {
        std::env::var(key).ok()
    }
}

impl Cli {
    /// Merge flags with environment fallbacks and validate
    pub fn resolve(&self, env: &dyn Env) -> Result<CopyConfig, PhopyError> {
        let lookup = |keys: &[&str]| {
            keys.iter()
                .filter_map(|key| env.var(key))
                .map(|v| v.trim().to_string())
                .find(|v| !v.is_empty())
        };

        let non_empty = |p: &Option<PathBuf>| p.clone().filter(|p| !p.as_os_str().is_empty());
        let (source_dir, target_dir) = match (non_empty(&self.source), non_empty(&self.target)) {
            (Some(source), Some(target)) => (source, target),
            _ => return Err(PhopyError::Config("source and target are required".to_string())),
        };

        let verbose = self.verbose || lookup(&["PHOPY_VERBOSE"]).is_some_and(|v| is_truthy(&v));

        let from = self
            .from
            .clone()
            .or_else(|| lookup(&["PHOPY_FROM", "PHOPY_START_DATE"]));
        let until = self
            .until
            .clone()
            .or_else(|| lookup(&["PHOPY_UNTIL", "PHOPY_END_DATE"]));

        let start = from
            .map(|s| parse_day_start(&s).ok_or_else(|| invalid_date("from")))
            .transpose()?;
        let end = until
            .map(|s| parse_day_end(&s).ok_or_else(|| invalid_date("until")))
            .transpose()?;

        Ok(CopyConfig {
            source_dir,
            target_dir,
            range: DateRange::new(start, end),
            dry_run: self.dry_run,
            allow_override: self.allow_override,
            verbose,
            workers: self.workers,
        })
    }
}

fn invalid_date(which: &str) -> PhopyError {
    PhopyError::Config(format!("invalid {} date, use YYYY-MM-DD", which))
}

fn is_truthy(value: &str) -> bool {
    matches!(
        value.trim().to_lowercase().as_str(),
        "1" | "true" | "yes" | "y"
    )
}

/// Local midnight at the start of a `YYYY-MM-DD` day
pub fn parse_day_start(value: &str) -> Option<DateTime<Local>> {
    let day = NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").ok()?;
    Local
        .from_local_datetime(&day.and_hms_opt(0, 0, 0)?)
        .earliest()
}

/// 23:59:59 local on a `YYYY-MM-DD` day
pub fn parse_day_end(value: &str) -> Option<DateTime<Local>> {
    let start = parse_day_start(value)?;
    Some(start + Duration::hours(23) + Duration::minutes(59) + Duration::seconds(59))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Timelike};
    use std::collections::HashMap;

    struct MapEnv(HashMap<&'static str, &'static str>);

    impl Env for MapEnv {
        fn var(&self, key: &str) -> Option<String> {
            self.0.get(key).map(|v| v.to_string())
        }
    }

    fn env(pairs: &[(&'static str, &'static str)]) -> MapEnv {
        MapEnv(pairs.iter().copied().collect())
    }

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("phopy").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn source_and_target_are_required() {
        let err = parse(&["-s", "/in"]).resolve(&env(&[])).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Invalid configuration: source and target are required"
        );
    }

    #[test]
    fn flags_resolve_into_config() {
        let config = parse(&[
            "-s",
            "/in",
            "-t",
            "/out",
            "--dry-run",
            "--from",
            "2024-01-01",
            "--until",
            "2024-12-31",
            "--allow-override",
            "-w",
            "3",
        ])
        .resolve(&env(&[]))
        .unwrap();

        assert_eq!(config.source_dir, PathBuf::from("/in"));
        assert_eq!(config.target_dir, PathBuf::from("/out"));
        assert!(config.dry_run);
        assert!(config.allow_override);
        assert_eq!(config.workers, Some(3));

        let start = config.range.start.unwrap();
        assert_eq!((start.year(), start.month(), start.day()), (2024, 1, 1));
        assert_eq!((start.hour(), start.minute()), (0, 0));
        let end = config.range.end.unwrap();
        assert_eq!((end.month(), end.day()), (12, 31));
        assert_eq!((end.hour(), end.minute(), end.second()), (23, 59, 59));
    }

    #[test]
    fn env_date_aliases_are_used_in_order() {
        let config = parse(&["-s", "/in", "-t", "/out"])
            .resolve(&env(&[
                ("PHOPY_START_DATE", "2024-02-02"),
                ("PHOPY_UNTIL", "2024-03-03"),
                ("PHOPY_END_DATE", "2025-01-01"),
            ]))
            .unwrap();

        assert_eq!(config.range.start.unwrap().day(), 2);
        assert_eq!(config.range.end.unwrap().month(), 3);
    }

    #[test]
    fn flags_win_over_env() {
        let config = parse(&["-s", "/in", "-t", "/out", "-f", "2024-05-05"])
            .resolve(&env(&[("PHOPY_FROM", "2020-01-01")]))
            .unwrap();
        assert_eq!(config.range.start.unwrap().year(), 2024);
    }

    #[test]
    fn verbose_env_accepts_truthy_values() {
        for value in ["1", "true", "YES", "y"] {
            let config = parse(&["-s", "/in", "-t", "/out"])
                .resolve(&env(&[("PHOPY_VERBOSE", value)]))
                .unwrap();
            assert!(config.verbose, "{} should be truthy", value);
        }

        let config = parse(&["-s", "/in", "-t", "/out"])
            .resolve(&env(&[("PHOPY_VERBOSE", "no")]))
            .unwrap();
        assert!(!config.verbose);
    }

    #[test]
    fn invalid_dates_are_config_errors() {
        let err = parse(&["-s", "/in", "-t", "/out", "--from", "01/02/2024"])
            .resolve(&env(&[]))
            .unwrap_err();
        assert!(err.to_string().contains("invalid from date, use YYYY-MM-DD"));

        let err = parse(&["-s", "/in", "-t", "/out", "--until", "2024-13-01"])
            .resolve(&env(&[]))
            .unwrap_err();
        assert!(err.to_string().contains("invalid until date"));
    }

    #[test]
    fn no_dates_means_unbounded() {
        let config = parse(&["-s", "/in", "-t", "/out"]).resolve(&env(&[])).unwrap();
        assert!(config.range.is_unbounded());
        assert!(!config.dry_run);
        assert!(!config.allow_override);
    }
}

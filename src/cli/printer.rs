//! Plain-text plan and execution summaries.

use chrono::{DateTime, Local};
use phopy::core::organize::{CopyItem, CopyPlan};
use std::io::{self, Write};

/// Writes plan summaries to any writer
pub struct Printer<W: Write> {
    out: W,
    verbose: bool,
}

impl<W: Write> Printer<W> {
    pub fn new(out: W, verbose: bool) -> Self {
        Self { out, verbose }
    }

    /// What a real run would do, without doing it
    pub fn print_dry_run(&mut self, plan: &CopyPlan) -> io::Result<()> {
        self.print_copy_section(plan)?;

        writeln!(self.out)?;
        writeln!(self.out, "Override Required:")?;
        for item in &plan.override_items {
            writeln!(self.out, "{}", item.record.name)?;
        }

        writeln!(self.out)?;
        self.print_summary(plan, None)?;
        self.print_warnings(plan)
    }

    /// What a real run did; `overrides_confirmed` is the user's decision
    pub fn print_execution(&mut self, plan: &CopyPlan, overrides_confirmed: bool) -> io::Result<()> {
        self.print_copy_section(plan)?;

        if !plan.override_items.is_empty() {
            writeln!(self.out)?;
            writeln!(self.out, "Override Required:")?;
            for item in &plan.override_items {
                writeln!(self.out, "{}", item.record.name)?;
            }
        }

        writeln!(self.out)?;
        self.print_summary(plan, Some(overrides_confirmed))?;
        self.print_warnings(plan)
    }

    fn print_copy_section(&mut self, plan: &CopyPlan) -> io::Result<()> {
        writeln!(self.out, "Copying:")?;
        writeln!(self.out)?;
        for line in format_copy_lines(&plan.items) {
            writeln!(self.out, "{}", line)?;
        }
        Ok(())
    }

    /// `confirmed` is `None` for dry runs
    fn print_summary(&mut self, plan: &CopyPlan, confirmed: Option<bool>) -> io::Result<()> {
        match (format_day(plan.range.start), format_day(plan.range.end)) {
            (Some(start), Some(end)) => writeln!(
                self.out,
                "Copied {} RAW and {} JPEG files from {} until {}.",
                plan.raw_count, plan.jpeg_count, start, end
            )?,
            _ => writeln!(
                self.out,
                "Copied {} RAW and {} JPEG files.",
                plan.raw_count, plan.jpeg_count
            )?,
        }

        writeln!(
            self.out,
            "Skipped {} JPEGs because their RAW files existed.",
            plan.skipped_jpegs
        )?;

        let date_skips = plan.skipped_raws_date + plan.skipped_jpegs_date;
        if date_skips > 0 {
            writeln!(
                self.out,
                "Skipped {} files outside the date range.",
                date_skips
            )?;
        }
        let duplicate_skips = plan.skipped_raws_duplicate + plan.skipped_jpegs_duplicate;
        if duplicate_skips > 0 {
            writeln!(
                self.out,
                "Skipped {} files already present in the target.",
                duplicate_skips
            )?;
        }

        let line = match confirmed {
            None if plan.override_count() == 0 => {
                "No override confirmation would be required.".to_string()
            }
            None => format!(
                "Would ask for override confirmation for {} when not in dry run.",
                override_counts(plan)
            ),
            Some(_) if plan.override_count() == 0 => {
                "No override confirmation was required.".to_string()
            }
            Some(granted) => format!(
                "Override confirmation {} for {}.",
                if granted { "granted" } else { "declined" },
                override_counts(plan)
            ),
        };
        writeln!(self.out, "{}", line)
    }

    fn print_warnings(&mut self, plan: &CopyPlan) -> io::Result<()> {
        if !self.verbose || plan.warnings.is_empty() {
            return Ok(());
        }
        writeln!(self.out)?;
        writeln!(self.out, "Warnings:")?;
        for warning in &plan.warnings {
            writeln!(self.out, "- {}", warning)?;
        }
        Ok(())
    }
}

/// `Copy <name>  <date>` lines, shortened to head and tail past four items
pub fn format_copy_lines(items: &[CopyItem]) -> Vec<String> {
    let lines: Vec<String> = items
        .iter()
        .map(|item| {
            format!(
                "Copy {}  {}",
                item.record.name,
                item.record.captured_at.format("%Y-%m-%d %H:%M")
            )
        })
        .collect();

    if lines.len() <= 4 {
        return lines;
    }

    let mut shortened = lines[..2].to_vec();
    shortened.push("...".to_string());
    shortened.extend_from_slice(&lines[lines.len() - 2..]);
    shortened
}

fn format_day(value: Option<DateTime<Local>>) -> Option<String> {
    value.map(|d| d.format("%Y-%m-%d").to_string())
}

fn override_counts(plan: &CopyPlan) -> String {
    match (plan.raw_overrides, plan.jpeg_overrides) {
        (raw, 0) => format!("{} RAW files", raw),
        (0, jpeg) => format!("{} JPEG files", jpeg),
        (raw, jpeg) => format!("{} RAW and {} JPEG files", raw, jpeg),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use phopy::core::organize::{DateRange, FileRecord};
    use phopy::core::scanner::ImageKind;
    use std::path::{Path, PathBuf};

    fn item(name: &str, minute: u32) -> CopyItem {
        let record = FileRecord::new(
            PathBuf::from("/in").join(name),
            PathBuf::from(name),
            Local.with_ymd_and_hms(2024, 10, 2, 15, minute, 0).unwrap(),
            ImageKind::from_path(Path::new(name)).unwrap(),
        );
        CopyItem::new(record, Path::new("/out"))
    }

    fn render(plan: &CopyPlan, verbose: bool, confirmed: Option<bool>) -> String {
        let mut buf = Vec::new();
        let mut printer = Printer::new(&mut buf, verbose);
        match confirmed {
            None => printer.print_dry_run(plan).unwrap(),
            Some(granted) => printer.print_execution(plan, granted).unwrap(),
        }
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn format_copy_lines_truncates() {
        let items: Vec<CopyItem> = (0..6).map(|i| item(&format!("IMG_{}.JPG", i), i)).collect();

        let lines = format_copy_lines(&items);

        assert_eq!(
            lines,
            vec![
                "Copy IMG_0.JPG  2024-10-02 15:00",
                "Copy IMG_1.JPG  2024-10-02 15:01",
                "...",
                "Copy IMG_4.JPG  2024-10-02 15:04",
                "Copy IMG_5.JPG  2024-10-02 15:05",
            ]
        );
        assert_eq!(format_copy_lines(&items[..4]).len(), 4);
    }

    #[test]
    fn dry_run_output_includes_sections() {
        let existing = item("DSC01.ARW", 1);
        let plan = CopyPlan {
            items: vec![existing.clone(), item("DSC02.JPG", 2)],
            override_items: vec![existing],
            raw_count: 1,
            jpeg_count: 1,
            skipped_jpegs: 3,
            raw_overrides: 1,
            range: DateRange::new(
                Some(Local.with_ymd_and_hms(2024, 10, 1, 0, 0, 0).unwrap()),
                Some(Local.with_ymd_and_hms(2024, 10, 3, 23, 59, 59).unwrap()),
            ),
            warnings: vec!["EXIF not found for DSC02.JPG, using filesystem time".to_string()],
            ..Default::default()
        };

        let quiet = render(&plan, false, None);
        assert!(quiet.contains("Copying:"));
        assert!(quiet.contains("Override Required:\nDSC01.ARW"));
        assert!(quiet.contains("Copied 1 RAW and 1 JPEG files from 2024-10-01 until 2024-10-03."));
        assert!(quiet.contains("Skipped 3 JPEGs because their RAW files existed."));
        assert!(quiet.contains(
            "Would ask for override confirmation for 1 RAW files when not in dry run."
        ));
        assert!(!quiet.contains("Warnings:"));

        let verbose = render(&plan, true, None);
        assert!(verbose.contains("Warnings:\n- EXIF not found for DSC02.JPG"));
    }

    #[test]
    fn execution_summary_reports_decision() {
        let existing = item("DSC01.JPG", 1);
        let plan = CopyPlan {
            items: vec![existing.clone()],
            override_items: vec![existing],
            jpeg_count: 1,
            jpeg_overrides: 1,
            ..Default::default()
        };

        assert!(render(&plan, false, Some(true))
            .contains("Override confirmation granted for 1 JPEG files."));
        assert!(render(&plan, false, Some(false))
            .contains("Override confirmation declined for 1 JPEG files."));
    }

    #[test]
    fn empty_plan_needs_no_confirmation() {
        let plan = CopyPlan::default();
        let output = render(&plan, false, Some(false));
        assert!(output.contains("Copied 0 RAW and 0 JPEG files."));
        assert!(output.contains("No override confirmation was required."));
        assert!(!output.contains("Override Required:"));
    }

    #[test]
    fn mixed_override_counts() {
        let plan = CopyPlan {
            raw_overrides: 2,
            jpeg_overrides: 1,
            ..Default::default()
        };
        assert_eq!(override_counts(&plan), "2 RAW and 1 JPEG files");
    }
}

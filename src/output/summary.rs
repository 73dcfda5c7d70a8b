use crate::crawler::ScanReport;
use std::fmt::Write;

/// Renders a finished scan as a text table
///
/// Rows follow the order in which the prefixes were scanned, followed by a
/// total line.
pub fn render_summary(report: &ScanReport) -> String {
    let mut out = String::new();
    let tallies = report.result.tallies();

    let name_width = tallies
        .iter()
        .map(|tally| tally.name.chars().count())
        .chain(std::iter::once("Total".len()))
        .max()
        .unwrap_or(0);

    let _ = writeln!(out, "=== Category {} ===\n", report.category_id);
    let _ = writeln!(
        out,
        "{:<width$}  {:>8}  {:>6}  {:>8}",
        "Prefix",
        "Id",
        "Pages",
        "Threads",
        width = name_width
    );

    for tally in tallies {
        let _ = writeln!(
            out,
            "{:<width$}  {:>8}  {:>6}  {:>8}",
            tally.name,
            tally.prefix_id,
            tally.pages,
            tally.threads,
            width = name_width
        );
    }

    let total_pages: u64 = tallies.iter().map(|tally| u64::from(tally.pages)).sum();
    let _ = writeln!(
        out,
        "{:<width$}  {:>8}  {:>6}  {:>8}",
        "Total",
        "",
        total_pages,
        report.result.total_threads(),
        width = name_width
    );

    let _ = writeln!(
        out,
        "\nFinished at {} ({}s)",
        report.finished_at.format("%Y-%m-%d %H:%M:%S UTC"),
        report.duration_seconds()
    );

    out
}

/// Prints the summary table to stdout
pub fn print_summary(report: &ScanReport) {
    print!("{}", render_summary(report));
}

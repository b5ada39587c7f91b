//! End of run summary.

use crate::pipeline::MigrationReport;
use colored::Colorize;

pub fn format_report(report: &MigrationReport) -> String {
    format!(
        "VLANs created: {}\nSubnets created: {} ({} nested)\nIP addresses created: {}\nLegacy rows skipped: {}",
        report.vlans_created,
        report.subnets_created,
        report.subnets_with_parent,
        report.addresses_created,
        report.rows_skipped
    )
}

pub fn print_report(report: &MigrationReport) {
    println!("{}", "Migration complete".green().bold());
    println!("{}", format_report(report));
    if report.rows_skipped > 0 {
        println!(
            "#{}# skipped rows are listed in the debug log (--debug)",
            "NOTE".on_yellow()
        );
    }
}

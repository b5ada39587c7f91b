//! Dry-run plan printing.

use super::terminal::{format_field, format_opt_field};
use crate::processing::PlanRow;
use colored::Colorize;

/// One plan line, comma separated like the header.
pub fn format_plan_row(row: &PlanRow) -> String {
    format!(
        "{pos},{cidr},{parent},{vlan},{description}",
        pos = format_field(row.position, 6),
        cidr = format_field(row.cidr, 20),
        parent = format_opt_field(row.parent, 20),
        vlan = format_opt_field(row.vlan_number, 6),
        description = format_field(&row.description, 0),
    )
}

/// Print the subnets in creation order with the parent each one is
/// expected to get.
pub fn print_plan(rows: &[PlanRow]) {
    log::info!("#Start print_plan() subnets={}", rows.len());
    println!(r#"  "pos",              "subnet",              "parent", "vlan","description""#);

    let mut late = 0;
    for row in rows {
        let line = format_plan_row(row);
        if row.parent_late {
            late += 1;
            println!("{line} {}", "#parent created later".on_red());
        } else {
            println!("{line}");
        }
    }

    if late > 0 {
        println!(
            "#{}# {late} subnets come before their parent and will be created without one (try --order containment)",
            "NOTE".on_red()
        );
    }
}

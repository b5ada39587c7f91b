//! Terminal output.
//!
//! - [`plan`] - The dry-run subnet plan
//! - [`report`] - Counts at the end of a run
//! - [`terminal`] - Column helpers

mod plan;
mod report;
mod terminal;

pub use plan::{format_plan_row, print_plan};
pub use report::{format_report, print_report};
pub use terminal::{format_field, format_opt_field};

//! Column helpers for terminal output.

use std::fmt::Display;

/// Quote `value` and right-align it to `width`. Longer values are kept
/// whole.
pub fn format_field(value: impl Display, width: usize) -> String {
    format!("{:>width$}", format!("\"{value}\""))
}

/// Like [`format_field`], with `-` standing in for a missing value.
pub fn format_opt_field<T: Display>(value: Option<T>, width: usize) -> String {
    match value {
        Some(v) => format_field(v, width),
        None => format!("{:>width$}", "-"),
    }
}

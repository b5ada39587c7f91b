//! Command execution for the `mysql` client.
//!
//! Provides utilities for running a command line and collecting its output.

use crate::error::{MigrateError, Result};
use colored::Colorize;
use regex::Regex;
use std::process::Command;
use std::sync::OnceLock;

/// Upper bound on one query result.
const MAX_OUTPUT_BYTES: usize = 64 * 1024 * 1024;

/// Regex for splitting command strings while preserving quoted substrings.
static COMMAND_REGEX: OnceLock<Regex> = OnceLock::new();

fn get_command_regex() -> &'static Regex {
    COMMAND_REGEX.get_or_init(|| {
        Regex::new(r#"'([^']*)'\s*|\"([^\"]*)\"\s*|([^'\s]*)\s*"#).expect("Invalid Regex")
    })
}

/// Run a shell command and return its stdout.
///
/// The command string is split on spaces, with quoted substrings preserved.
/// `envs` are added to the child's environment and never logged.
///
/// # Returns
/// * `Ok(String)` - The stdout output on success
/// * `Err` - If the command fails or produces too much output
pub fn run(cmd: &str, envs: &[(&str, &str)]) -> Result<String> {
    log::debug!("run({cmd})", cmd = cmd.on_blue());

    let cmds: Vec<&str> = split_and_strip(cmd)
        .into_iter()
        .filter(|s| !s.is_empty())
        .collect();
    log::trace!("split cmds={:?}", cmds);

    let program = cmds
        .first()
        .ok_or_else(|| MigrateError::Command("empty command".to_string()))?;

    // Build command and add args
    let mut command = Command::new(program);
    for arg in cmds.iter().skip(1) {
        command.arg(arg);
    }
    for (key, value) in envs {
        command.env(key, value);
    }

    let output = command.output().map_err(|e| {
        log::error!("Command execution failed: {}", e);
        MigrateError::Command(format!("failed to execute {program}: {e}"))
    })?;

    if output.status.success() {
        log::debug!("Success cmd: {cmd}");
        log::debug!("Success output.stdout.len(): {}", output.stdout.len());

        if output.stdout.len() > MAX_OUTPUT_BYTES {
            return Err(MigrateError::Command(format!(
                "response too large: {} bytes for command: {:?}",
                output.stdout.len(),
                cmds
            )));
        }
    } else {
        let stderr = String::from_utf8_lossy(&output.stderr);
        log::trace!(
            "code={code:?}, status={status}\n┎######\nstderr=\n{stderr}\n┖######",
            code = output.status.code(),
            status = output.status,
            stderr = stderr.red()
        );
        log::warn!(
            "{failed} to run {cmd}",
            failed = "failed".on_red(),
            cmd = cmd.on_blue()
        );
        return Err(MigrateError::Command(format!("ERROR running: {stderr}")));
    }

    String::from_utf8(output.stdout)
        .map_err(|e| MigrateError::Command(format!("invalid UTF-8 in output: {e}")))
}

/// Split a command string on spaces, preserving quoted substrings.
fn split_and_strip(input: &str) -> Vec<&str> {
    get_command_regex()
        .find_iter(input)
        .map(|m| m.as_str().trim().trim_matches('\'').trim_matches('"'))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_and_strip_query() {
        let input = "mysql --batch -u phpipam phpipam -e 'select name, number from vlans'";
        let expected = vec![
            "mysql",
            "--batch",
            "-u",
            "phpipam",
            "phpipam",
            "-e",
            "select name, number from vlans",
        ];
        assert_eq!(split_and_strip(input), expected);
    }

    #[test]
    fn test_split_and_strip_nospaces() {
        let input = "NoSpacesHere";
        let expected = vec!["NoSpacesHere"];
        assert_eq!(split_and_strip(input), expected);
    }

    #[test]
    fn test_split_and_strip_double_quotes() {
        let input = "mysql -e \"select * from subnets\" phpipam";
        let expected = vec!["mysql", "-e", "select * from subnets", "phpipam"];
        assert_eq!(split_and_strip(input), expected);
    }

    #[test]
    fn test_run_missing_program() {
        let err = run("definitely-not-a-mysql-client-binary --version", &[]).unwrap_err();
        assert!(matches!(err, MigrateError::Command(_)));
    }

    #[test]
    fn test_run_empty_command() {
        assert!(run("", &[]).is_err());
    }
}

//! Shared output formatting for hausplan commands.

use serde::Serialize;

use crate::error::{exit_codes, Error, Result};

pub const SCHEMA_VERSION: &str = "hausplan.v1";

#[derive(Debug, Clone, Copy)]
pub struct OutputOptions {
    pub json: bool,
    pub quiet: bool,
}

#[derive(Debug, Clone)]
pub struct HumanOutput {
    header: String,
    summary: Vec<(String, String)>,
    details: Vec<String>,
    warnings: Vec<String>,
    next_steps: Vec<String>,
}

impl HumanOutput {
    pub fn new(header: impl Into<String>) -> Self {
        Self {
            header: header.into(),
            summary: Vec::new(),
            details: Vec::new(),
            warnings: Vec::new(),
            next_steps: Vec::new(),
        }
    }

    pub fn push_summary(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.summary.push((key.into(), value.into()));
    }

    pub fn push_detail(&mut self, value: impl Into<String>) {
        self.details.push(value.into());
    }

    pub fn push_warning(&mut self, value: impl Into<String>) {
        self.warnings.push(value.into());
    }

    pub fn push_next_step(&mut self, value: impl Into<String>) {
        self.next_steps.push(value.into());
    }
}

pub fn emit_success<T: Serialize>(
    options: OutputOptions,
    command: &str,
    data: &T,
    human: Option<&HumanOutput>,
) -> Result<()> {
    if options.json {
        let warnings = human.map(|h| h.warnings.clone()).unwrap_or_default();
        let next_steps = human.map(|h| h.next_steps.clone()).unwrap_or_default();

        #[derive(Serialize)]
        struct Envelope<'a, T: Serialize> {
            schema_version: &'static str,
            command: &'a str,
            status: &'static str,
            data: &'a T,
            #[serde(skip_serializing_if = "Vec::is_empty")]
            warnings: Vec<String>,
            #[serde(skip_serializing_if = "Vec::is_empty")]
            next_steps: Vec<String>,
        }

        let payload = Envelope {
            schema_version: SCHEMA_VERSION,
            command,
            status: "success",
            data,
            warnings,
            next_steps,
        };

        println!("{}", serde_json::to_string_pretty(&payload)?);
        return Ok(());
    }

    if options.quiet {
        return Ok(());
    }

    if let Some(human) = human {
        println!("{}", format_human(human));
    }

    Ok(())
}

pub fn emit_error(command: &str, err: &Error, json: bool) -> Result<()> {
    let next_steps = error_next_steps(err);
    let hint = next_steps.first().map(|step| step.as_str());
    if json {
        #[derive(Serialize)]
        struct ErrorBody<'a> {
            message: &'a str,
            code: i32,
            kind: &'static str,
            #[serde(skip_serializing_if = "Option::is_none")]
            details: Option<serde_json::Value>,
        }

        #[derive(Serialize)]
        struct Envelope<'a> {
            schema_version: &'static str,
            command: &'a str,
            status: &'static str,
            error: ErrorBody<'a>,
            #[serde(skip_serializing_if = "Vec::is_empty")]
            next_steps: Vec<String>,
        }

        let payload = Envelope {
            schema_version: SCHEMA_VERSION,
            command,
            status: "error",
            error: ErrorBody {
                message: &err.to_string(),
                code: err.exit_code(),
                kind: error_kind(err),
                details: err.details(),
            },
            next_steps: next_steps.clone(),
        };

        println!("{}", serde_json::to_string_pretty(&payload)?);
        return Ok(());
    }

    eprintln!("error: {err}");
    if let Some(hint) = hint {
        eprintln!("hint: {hint}");
    }
    Ok(())
}

pub fn format_human(output: &HumanOutput) -> String {
    let mut lines = Vec::new();
    lines.push(output.header.clone());

    push_summary(&mut lines, &output.summary);
    push_section(&mut lines, "Details", &output.details);
    push_section(&mut lines, "Warnings", &output.warnings);
    push_section(&mut lines, "Next steps", &output.next_steps);

    lines.join("\n")
}

/// Global flags whose value is a separate argument
const VALUE_FLAGS: [&str; 2] = ["--data-dir", "--config"];

pub fn infer_command_name_from_args() -> String {
    infer_command_name(std::env::args().skip(1))
}

fn infer_command_name(args: impl IntoIterator<Item = String>) -> String {
    let mut args = args.into_iter();

    let command = match next_positional(&mut args) {
        Some(cmd) => cmd,
        None => return "hausplan".to_string(),
    };

    let subcommand = if matches!(command.as_str(), "member" | "task") {
        next_positional(&mut args)
    } else {
        None
    };

    if let Some(sub) = subcommand {
        format!("{command} {sub}")
    } else {
        command
    }
}

fn next_positional(args: &mut impl Iterator<Item = String>) -> Option<String> {
    while let Some(arg) = args.next() {
        if VALUE_FLAGS.contains(&arg.as_str()) {
            args.next();
            continue;
        }
        if arg.starts_with('-') {
            continue;
        }
        return Some(arg);
    }
    None
}

fn error_kind(err: &Error) -> &'static str {
    match err.exit_code() {
        exit_codes::USER_ERROR => "user_error",
        _ => "operation_failed",
    }
}

fn error_next_steps(err: &Error) -> Vec<String> {
    match err {
        Error::NoMembers => vec!["hausplan member add <NAME>".to_string()],
        Error::MemberNotFound(_) => vec!["hausplan member ls".to_string()],
        Error::TaskNotFound(_) => vec!["hausplan task ls".to_string()],
        Error::InvalidDate(_) => vec!["pass dates as YYYY-MM-DD".to_string()],
        Error::InvalidConfig(_) => vec!["fix the config file then retry".to_string()],
        Error::LockFailed(_) => vec!["close other hausplan sessions then retry".to_string()],
        _ => Vec::new(),
    }
}

fn push_summary(lines: &mut Vec<String>, summary: &[(String, String)]) {
    if summary.is_empty() {
        return;
    }

    lines.push(String::new());
    lines.push("Summary:".to_string());
    for (key, value) in summary {
        if value.is_empty() {
            lines.push(format!("- {key}"));
        } else {
            lines.push(format!("- {key}: {value}"));
        }
    }
}

fn push_section(lines: &mut Vec<String>, title: &str, items: &[String]) {
    if items.is_empty() {
        return;
    }

    lines.push(String::new());
    lines.push(format!("{title}:"));
    for item in items {
        lines.push(format!("- {item}"));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn human_output_sections() {
        let mut output = HumanOutput::new("Added Anna");
        output.push_summary("id", "1234abcd");
        output.push_warning("state could not be saved");
        output.push_next_step("hausplan task add <TITLE>");

        let text = format_human(&output);
        assert!(text.starts_with("Added Anna\n\nSummary:\n- id: 1234abcd"));
        assert!(text.contains("Warnings:\n- state could not be saved"));
        assert!(text.contains("Next steps:\n- hausplan task add <TITLE>"));
        assert!(!text.contains("Details:"));
    }

    #[test]
    fn command_name_skips_flag_values() {
        let args = ["--data-dir", "/tmp/task", "--json", "member", "--config=x.toml", "rm", "Anna"]
            .map(String::from);
        assert_eq!(infer_command_name(args), "member rm");
        assert_eq!(infer_command_name(["show".to_string()]), "show");
        assert_eq!(infer_command_name(Vec::new()), "hausplan");
    }

    #[test]
    fn error_kinds_follow_exit_codes() {
        assert_eq!(error_kind(&Error::NoMembers), "user_error");
        assert_eq!(
            error_kind(&Error::OperationFailed("disk full".to_string())),
            "operation_failed"
        );
        assert_eq!(
            error_next_steps(&Error::TaskNotFound("x".to_string())),
            vec!["hausplan task ls".to_string()]
        );
    }
}

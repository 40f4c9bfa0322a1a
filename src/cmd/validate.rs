//! Validate command - check a JSON document against a named schema

use crate::cmd::read_document;
use clap::Args;
use pnlreport::schema::ValidationIssue;
use pnlreport::{ConsistencyWarning, Registry};
use serde::Serialize;
use std::path::PathBuf;

#[derive(Args, Debug)]
pub struct ValidateCommand {
    /// Schema to validate against (e.g. Report, ReportEventsPayload)
    #[arg(short, long)]
    schema: String,

    /// JSON document, or "-" to read stdin
    #[arg(default_value = "-")]
    file: PathBuf,

    /// Output as JSON instead of formatted text
    #[arg(long)]
    json: bool,
}

/// JSON output structure
#[derive(Debug, Serialize)]
struct ValidationOutput<'a> {
    schema: &'a str,
    valid: bool,
    issue_count: usize,
    issues: &'a [ValidationIssue],
    warnings: &'a [ConsistencyWarning],
}

impl ValidateCommand {
    pub fn exec(&self) -> anyhow::Result<()> {
        let registry = Registry::global();
        let Some(entry) = registry.find(&self.schema) else {
            anyhow::bail!(
                "Unknown schema '{}'. Run `pnlreport schema` to list schemas.",
                self.schema
            );
        };
        let document = read_document(&self.file)?;

        let (issues, warnings) = match entry.validate(document) {
            Ok(warnings) => (Vec::new(), warnings),
            Err(err) => (err.issues, Vec::new()),
        };
        log::info!(
            "{}: {} issue(s), {} warning(s)",
            entry.name(),
            issues.len(),
            warnings.len()
        );

        if self.json {
            let output = ValidationOutput {
                schema: entry.name(),
                valid: issues.is_empty(),
                issue_count: issues.len(),
                issues: &issues,
                warnings: &warnings,
            };
            println!("{}", serde_json::to_string_pretty(&output)?);
        } else {
            self.print_text(entry.name(), &issues, &warnings);
        }

        // Exit with code 1 if invalid
        if !issues.is_empty() {
            std::process::exit(1);
        }
        Ok(())
    }

    fn print_text(&self, schema: &str, issues: &[ValidationIssue], warnings: &[ConsistencyWarning]) {
        if issues.is_empty() {
            println!("\u{2713} valid {}", schema);
            for warning in warnings {
                println!("  note: {}", warning);
            }
            return;
        }

        println!("\u{26A0} invalid {}: {} issue(s) found:", schema, issues.len());
        println!();
        for (i, issue) in issues.iter().enumerate() {
            println!("  {}. {}", i + 1, issue);
        }
    }
}

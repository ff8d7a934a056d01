//! Check command implementation

use colored::Colorize;
use serde_json::json;

use profile_core::{CheckSettings, CheckStatus, Severity, ValidationReport, Validator};

use crate::context::ProfileContext;
use crate::error::Result;

/// Run the check command
///
/// Validates one vendor, or every vendor when `vendor` is `None`. Returns
/// whether the result passes; `strict` (or `[check] strict` in config) also
/// fails on warnings.
pub fn run_check(
    ctx: &ProfileContext,
    vendor: Option<&str>,
    strict: bool,
    json: bool,
) -> Result<bool> {
    let settings = CheckSettings {
        strict: strict || ctx.config.check.strict,
        ..ctx.config.check.clone()
    };
    let strict = settings.strict;
    let validator = Validator::new(&ctx.tree, settings);

    let mut report = ValidationReport::default();
    for name in ctx.vendors(vendor)? {
        report = report.merge(validator.validate_vendor(&name)?);
    }
    let success = report.is_success(strict);

    if json {
        let output = json!({
            "status": report.status(),
            "success": success,
            "strict": strict,
            "vendors": report.vendors,
            "checked": report.checked,
            "errors": report.errors().count(),
            "warnings": report.warnings().count(),
            "issues": report.issues,
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(success);
    }

    print_report(&report, strict, success);
    Ok(success)
}

fn print_report(report: &ValidationReport, strict: bool, success: bool) {
    for issue in &report.issues {
        let label = match issue.severity {
            Severity::Error => "error".red().bold(),
            Severity::Warning => "warning".yellow().bold(),
        };
        let location = match (&issue.file, &issue.profile) {
            (Some(file), Some(profile)) => format!("{file} ({profile})"),
            (Some(file), None) => file.clone(),
            (None, Some(profile)) => profile.clone(),
            (None, None) => String::new(),
        };
        println!(
            "{}[{}] {}: {}",
            label,
            issue.kind.as_str().dimmed(),
            location.yellow(),
            issue.message
        );
    }

    if !report.issues.is_empty() {
        println!();
    }

    let errors = report.errors().count();
    let warnings = report.warnings().count();
    let summary = format!(
        "{} vendor(s), {} profile file(s), {} error(s), {} warning(s)",
        report.vendors.len(),
        report.checked,
        errors,
        warnings
    );

    match (report.status(), success) {
        (CheckStatus::Healthy, _) => println!("{} {}", "OK".green().bold(), summary),
        (CheckStatus::Warnings, true) => println!("{} {}", "OK".yellow().bold(), summary),
        (_, _) if strict && errors == 0 => {
            println!("{} {} (strict)", "Failed".red().bold(), summary)
        }
        _ => println!("{} {}", "Failed".red().bold(), summary),
    }
}

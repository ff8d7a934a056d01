//! Generate command implementation
//!
//! Rebuilds a vendor manifest's lists in load order. With `--dry-run` the
//! manifest is left alone and a unified diff is printed instead.

use colored::Colorize;
use serde_json::json;

use profile_core::{
    GenerateOptions, GenerateReport, ManifestGenerator, ProfileKind, UnresolvedPolicy,
};

use crate::context::ProfileContext;
use crate::error::Result;

/// Run the generate command
///
/// Fails (returns `false`) when any list contains an inheritance cycle. The
/// manifest is then left untouched.
pub fn run_generate(
    ctx: &ProfileContext,
    vendor: &str,
    kinds: &[ProfileKind],
    policy: Option<UnresolvedPolicy>,
    dry_run: bool,
    json: bool,
) -> Result<bool> {
    let mut options = GenerateOptions {
        policy: ctx.policy(policy),
        ..GenerateOptions::default()
    };
    if !kinds.is_empty() {
        options.kinds = kinds.to_vec();
    }

    let generator = ManifestGenerator::new(&ctx.tree, options);
    let report = generator.generate(vendor)?;
    let success = !report.has_cycles();
    let written = if dry_run || !success {
        false
    } else {
        generator.write(&report)?
    };

    if json {
        let mut unresolved = Vec::new();
        for (kind, resolution) in &report.resolutions {
            for u in &resolution.unresolved {
                let mut value = serde_json::to_value(u)?;
                if let Some(obj) = value.as_object_mut() {
                    obj.insert("type".to_string(), json!(kind.as_str()));
                }
                unresolved.push(value);
            }
        }
        let (inserted, deleted) = report.line_changes();
        let diff = dry_run.then(|| report.unified_diff());
        let output = json!({
            "vendor": report.vendor,
            "path": report.path.as_str(),
            "changed": report.changed(),
            "written": written,
            "dry_run": dry_run,
            "lines_added": inserted,
            "lines_removed": deleted,
            "diff": diff,
            "unresolved": unresolved,
            "failures": report.failures,
            "success": success,
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(success);
    }

    print_problems(&report);

    if !report.changed() {
        println!(
            "{} {} is already up to date.",
            "OK".green().bold(),
            report.path.as_str().yellow()
        );
    } else if dry_run {
        print_diff(&report);
        println!();
        println!(
            "Run {} to apply these changes.",
            format!("orca-profiles generate {vendor}").cyan()
        );
    } else if written {
        let (inserted, deleted) = report.line_changes();
        println!(
            "{} Wrote {} ({}, {})",
            "OK".green().bold(),
            report.path.as_str().yellow(),
            format!("+{inserted}").green(),
            format!("-{deleted}").red()
        );
    }

    for (kind, resolution) in &report.resolutions {
        println!(
            "  {:<20} {} entries",
            kind.list_key().dimmed(),
            resolution.ordered.len()
        );
    }

    if !success {
        println!();
        println!(
            "{} Inheritance cycles found; {} was not written.",
            "Failed".red().bold(),
            report.path.as_str().yellow()
        );
    }

    Ok(success)
}

fn print_problems(report: &GenerateReport) {
    for failure in &report.failures {
        println!(
            "{} skipped {}: {}",
            "warning:".yellow().bold(),
            failure.sub_path,
            failure.reason
        );
    }
    for (kind, resolution) in &report.resolutions {
        for unresolved in &resolution.unresolved {
            let label = if unresolved.reason.is_cyclic() {
                "error:".red().bold()
            } else {
                "warning:".yellow().bold()
            };
            println!("{} [{}] {}: {}", label, kind, unresolved.name, unresolved.reason);
        }
    }
}

fn print_diff(report: &GenerateReport) {
    for line in report.unified_diff().lines() {
        if line.starts_with("+++") || line.starts_with("---") {
            println!("{}", line.bold());
        } else if line.starts_with('+') {
            println!("{}", line.green());
        } else if line.starts_with('-') {
            println!("{}", line.red());
        } else if line.starts_with("@@") {
            println!("{}", line.cyan());
        } else {
            println!("{}", line);
        }
    }
}

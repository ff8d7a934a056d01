//! Print the resolved load order of a vendor's profiles

use colored::Colorize;
use serde_json::json;

use profile_core::{ProfileKind, Resolution, UnresolvedPolicy, resolve, scan_vendor};

use crate::context::ProfileContext;
use crate::error::Result;

/// Run the order command
///
/// Fails (returns `false`) when any resolved list contains an inheritance cycle.
pub fn run_order(
    ctx: &ProfileContext,
    vendor: &str,
    kind: Option<ProfileKind>,
    policy: Option<UnresolvedPolicy>,
    json: bool,
) -> Result<bool> {
    let policy = ctx.policy(policy);
    let scan = scan_vendor(&ctx.tree, vendor)?;
    let kinds: Vec<ProfileKind> = match kind {
        Some(kind) => vec![kind],
        None => ProfileKind::ALL.to_vec(),
    };

    let resolutions: Vec<(ProfileKind, Resolution)> = kinds
        .into_iter()
        .map(|kind| (kind, resolve(&scan.entries(kind), policy)))
        .collect();
    let success = !resolutions.iter().any(|(_, r)| r.has_cycles());

    if json {
        let lists: serde_json::Map<String, serde_json::Value> = resolutions
            .iter()
            .map(|(kind, resolution)| {
                Ok((kind.to_string(), serde_json::to_value(resolution)?))
            })
            .collect::<std::result::Result<_, serde_json::Error>>()?;
        let output = json!({
            "vendor": vendor,
            "policy": policy.to_string(),
            "lists": lists,
            "failures": scan.failures,
            "success": success,
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(success);
    }

    println!(
        "{} {} ({} policy)",
        "Order".blue().bold(),
        vendor.yellow(),
        policy.to_string().cyan()
    );

    for (kind, resolution) in &resolutions {
        println!();
        println!("{} ({}):", kind.list_key().bold(), resolution.ordered.len());
        if resolution.ordered.is_empty() {
            println!("  {}", "(empty)".dimmed());
        }
        for (i, entry) in resolution.ordered.iter().enumerate() {
            let flagged = resolution
                .unresolved
                .iter()
                .any(|u| u.sub_path == entry.sub_path);
            let marker = if flagged {
                "!".yellow()
            } else {
                " ".normal()
            };
            println!(
                "  {:>4} {} {} {}",
                i + 1,
                marker,
                entry.name,
                entry.sub_path.dimmed()
            );
        }
        for unresolved in &resolution.unresolved {
            let label = if unresolved.reason.is_cyclic() {
                "error:".red().bold()
            } else {
                "warning:".yellow().bold()
            };
            println!(
                "  {} {}: {}",
                label,
                unresolved.name,
                unresolved.reason
            );
        }
    }

    for failure in &scan.failures {
        println!(
            "{} skipped {}: {}",
            "warning:".yellow().bold(),
            failure.sub_path,
            failure.reason
        );
    }

    if !success {
        println!();
        println!(
            "{} Inheritance cycles found; no valid load order exists for them.",
            "Failed".red().bold()
        );
    }

    Ok(success)
}

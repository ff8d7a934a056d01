//! List vendors with profile counts

use colored::Colorize;
use serde::Serialize;

use profile_core::{ProfileKind, VendorManifest, scan_vendor};

use crate::context::ProfileContext;
use crate::error::Result;

/// One row of `list` output.
#[derive(Debug, Serialize)]
struct VendorSummary {
    vendor: String,
    version: Option<String>,
    machine_models: usize,
    machines: usize,
    processes: usize,
    filaments: usize,
    failures: usize,
}

/// Run the list command
pub fn run_list(ctx: &ProfileContext, json: bool) -> Result<bool> {
    let mut summaries = Vec::new();
    for vendor in ctx.tree.vendors()? {
        let scan = scan_vendor(&ctx.tree, &vendor)?;
        // A broken manifest still lists the vendor; `check` reports why
        let version = VendorManifest::load(vendor.as_str(), &ctx.tree.manifest_path(&vendor))
            .ok()
            .and_then(|m| m.version_text().map(str::to_string));
        summaries.push(VendorSummary {
            version,
            machine_models: scan.count(ProfileKind::MachineModel),
            machines: scan.count(ProfileKind::Machine),
            processes: scan.count(ProfileKind::Process),
            filaments: scan.count(ProfileKind::Filament),
            failures: scan.failures.len(),
            vendor,
        });
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&summaries)?);
        return Ok(true);
    }

    if summaries.is_empty() {
        println!(
            "{} No vendors found in {}",
            "=>".blue().bold(),
            ctx.tree.root().as_str().yellow()
        );
        return Ok(true);
    }

    println!("{}", "Vendors".bold());
    println!();
    println!(
        "  {:<24} {:>12} {:>7} {:>9} {:>8} {:>10}",
        "name".dimmed(),
        "version".dimmed(),
        "models".dimmed(),
        "machines".dimmed(),
        "process".dimmed(),
        "filaments".dimmed()
    );
    for s in &summaries {
        let name = if s.failures > 0 {
            format!("{} ({} unreadable)", s.vendor, s.failures).yellow()
        } else {
            s.vendor.green()
        };
        println!(
            "  {:<24} {:>12} {:>7} {:>9} {:>8} {:>10}",
            name,
            s.version.as_deref().unwrap_or("-"),
            s.machine_models,
            s.machines,
            s.processes,
            s.filaments
        );
    }
    println!();
    println!("{} {} vendors", "Total:".dimmed(), summaries.len());

    Ok(true)
}

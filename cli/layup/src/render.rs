//! Table and summary rendering.

use colored::Colorize;
use comfy_table::{presets, Table};
use layup_core::{AuditMatrix, Identity, Playbook, ResolveStats};

/// Announce the identity the audit runs as.
pub fn identity_banner(identity: &Identity) {
    match identity {
        Identity::Unauthenticated => {
            println!("\nYou are: {}\n", "UNAUTHENTICATED".red().bold());
        }
        Identity::Principal(arn) => {
            println!("\nYou are: {}\n", arn.green());
        }
    }
}

/// Render the resolution table. With `matches_only`, rows that found no
/// bucket at all are suppressed.
pub fn resolve_table(stats: &ResolveStats, matches_only: bool) {
    let mut table = Table::new();
    table.load_preset(presets::UTF8_FULL);
    table.set_header(["URL", "Bucket Name", "Region", "Takeover?"]);

    for status in &stats.statuses {
        if matches_only && status.bucket.is_missing() {
            continue;
        }
        table.add_row(status.row());
    }

    println!("{table}");
}

/// Summarize a resolver run on stderr, keeping stdout clean for the table.
pub fn resolve_summary(stats: &ResolveStats) {
    eprintln!();
    eprintln!("URLs processed:            {}", stats.urls_processed);
    eprintln!("URLs failed:               {}", stats.urls_failed);
    eprintln!();
    eprintln!("S3 endpoints found:        {}", stats.endpoints);
    eprintln!("Bucket names identified:   {}", stats.named_count());
    eprintln!("Bucket takeovers possible: {}", stats.takeovers_possible);

    if let Some(duration) = stats.duration() {
        let secs = duration.num_milliseconds() as f64 / 1000.0;
        eprintln!("Duration:                  {:.2}s", secs);
    }
    eprintln!();
}

/// Per-bucket permission groupings, READ and WRITE separated.
pub fn audit_results(results: &AuditMatrix) {
    println!("\nYou have permissions for the following buckets:\n");

    for (bucket, audit) in results {
        let granted = |prefixes: &[&str]| -> Vec<&str> {
            audit
                .iter()
                .filter(|(name, allowed)| {
                    **allowed && prefixes.iter().any(|p| name.starts_with(p))
                })
                .map(|(name, _)| *name)
                .collect()
        };
        let reads = granted(&["Get", "List"]);
        let writes = granted(&["Put"]);

        if reads.is_empty() && writes.is_empty() {
            continue;
        }

        println!("* {}", bucket.bold());
        if !reads.is_empty() {
            println!("    {}  {}", "READ:".bold(), reads.join(", "));
        }
        if !writes.is_empty() {
            println!("    {} {}", "WRITE:".bold(), writes.join(", "));
        }
        println!();
    }
}

/// Render playbook entries as a table.
pub fn playbook_table(book: &Playbook) {
    let mut table = Table::new();
    table.load_preset(presets::UTF8_FULL);
    table.set_header(["Action", "Type", "Description", "Equivalent Command"]);

    for (name, action) in book {
        table.add_row([
            name.to_string(),
            action.kind.to_string(),
            action.description.to_string(),
            action.cli.to_string(),
        ]);
    }

    println!("{table}");
}

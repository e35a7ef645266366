//! CLI argument definitions for layup.

use std::path::PathBuf;

use clap::{ArgAction, Args, Parser, Subcommand};

/// Object storage permissions auditor.
///
/// Resolves web URLs back to the S3 buckets serving them, flags dangling
/// bucket references open to takeover, and audits which IAM actions the
/// current principal can exercise against target buckets.
#[derive(Parser, Debug)]
#[command(name = "layup")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Print debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Audit permissions against target buckets
    ///
    /// By default only READ probes run against each bucket.
    Audit(AuditArgs),

    /// Resolve bucket names behind URLs and test for takeover
    Resolve(ResolveArgs),

    /// List supported playbook actions
    Playbook(PlaybookArgs),
}

#[derive(Args, Debug)]
pub struct AuditArgs {
    /// Name of a target bucket to audit; repeatable
    #[arg(short, long = "name")]
    pub names: Vec<String>,

    /// File with newline-separated bucket names
    #[arg(short, long)]
    pub file: Option<PathBuf>,

    /// Also audit every bucket the principal can enumerate via ListBuckets
    #[arg(short, long)]
    pub list: bool,

    /// Probe only this playbook action; repeatable
    #[arg(short, long = "perm")]
    pub perms: Vec<String>,

    /// Enable WRITE probes (checksum-poisoned so S3 rejects them before
    /// committing; third-party S3-compatible stores may not validate first)
    #[arg(short, long)]
    pub write: bool,

    /// Credential profile to audit with; 'none' audits unauthenticated
    #[arg(short = 'i', long, default_value = "default")]
    pub profile: String,
}

#[derive(Args, Debug)]
pub struct ResolveArgs {
    /// URL to resolve a bucket name from; repeatable
    #[arg(short = 'n', long = "url")]
    pub urls: Vec<String>,

    /// File with newline-separated URLs
    #[arg(short, long)]
    pub file: Option<PathBuf>,

    /// Show only rows that resolved to a bucket
    #[arg(short, long, default_value_t = true, action = ArgAction::Set)]
    pub matches: bool,

    /// Append resolved bucket names to this path, one per line
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub struct PlaybookArgs {
    /// Show only this action
    #[arg(short, long)]
    pub action: Option<String>,
}

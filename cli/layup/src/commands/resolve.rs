//! The `resolve` subcommand.

use std::io::Write;
use std::path::Path;

use anyhow::{bail, Context, Result};
use layup_core::{ResolveStats, Resolver};
use tracing::{info, warn};

use crate::args::ResolveArgs;
use crate::{input, render};

pub async fn execute(args: ResolveArgs) -> Result<()> {
    let mut urls = args.urls.clone();
    if let Some(file) = &args.file {
        urls.extend(input::read_lines(file)?);
    }
    if urls.is_empty() {
        bail!("must specify at least one of --url or --file");
    }
    info!(count = urls.len(), "URLs queued for resolution");

    let mut resolver = Resolver::with_defaults()?;

    // Ctrl-C stops the loop; whatever has been collected still renders.
    for url in &urls {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                warn!("interrupted, rendering partial results");
                break;
            }
            result = resolver.resolve(url) => {
                if let Err(e) = result {
                    warn!(url, error = %e, "skipping URL");
                }
            }
        }
    }

    let stats = resolver.finish();
    render::resolve_table(&stats, args.matches);

    if let Some(path) = &args.output {
        append_names(path, &stats)?;
    }

    render::resolve_summary(&stats);
    Ok(())
}

/// Append resolved bucket names to the output file, one per line. Unnamed
/// sentinels carry no name and takeover candidates no longer exist, so both
/// are skipped.
fn append_names(path: &Path, stats: &ResolveStats) -> Result<()> {
    let mut file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("could not open {}", path.display()))?;

    for name in stats.auditable_names() {
        writeln!(file, "{name}")?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use layup_core::{Bucket, Region, ResolverStatus};

    fn stats_with(statuses: Vec<ResolverStatus>) -> ResolveStats {
        let mut stats = ResolveStats::new();
        for status in statuses {
            stats.record(status);
        }
        stats
    }

    #[test]
    fn test_append_names_excludes_sentinels_and_takeovers() {
        let stats = stats_with(vec![
            ResolverStatus {
                url: "a.example.com".into(),
                bucket: Bucket::Named("live-bucket".into()),
                region: Region::Named("us-east-1".into()),
                takeover: false,
            },
            ResolverStatus {
                url: "b.example.com".into(),
                bucket: Bucket::Named("gone-bucket".into()),
                region: Region::Named("us-east-1".into()),
                takeover: true,
            },
            ResolverStatus {
                url: "c.example.com".into(),
                bucket: Bucket::Unnamed,
                region: Region::Unknown,
                takeover: false,
            },
        ]);

        let file = tempfile::NamedTempFile::new().unwrap();
        append_names(file.path(), &stats).unwrap();

        let written = std::fs::read_to_string(file.path()).unwrap();
        assert_eq!(written, "live-bucket\n");
    }

    #[test]
    fn test_append_names_appends_across_runs() {
        let file = tempfile::NamedTempFile::new().unwrap();
        let stats = stats_with(vec![ResolverStatus {
            url: "a.example.com".into(),
            bucket: Bucket::Named("first".into()),
            region: Region::Unknown,
            takeover: false,
        }]);

        append_names(file.path(), &stats).unwrap();
        append_names(file.path(), &stats).unwrap();

        let written = std::fs::read_to_string(file.path()).unwrap();
        assert_eq!(written, "first\nfirst\n");
    }
}

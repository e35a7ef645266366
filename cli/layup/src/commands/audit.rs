//! The `audit` subcommand.

use anyhow::{bail, Result};
use layup_core::aws::identity;
use layup_core::{list_buckets, Auditor};
use tracing::{info, warn};

use crate::args::AuditArgs;
use crate::{input, render};

pub async fn execute(args: AuditArgs) -> Result<()> {
    // 'none' means audit as an anonymous principal.
    let profile = (args.profile != "none").then(|| args.profile.clone());

    let mut names = args.names.clone();
    if let Some(file) = &args.file {
        names.extend(input::read_lines(file)?);
    }
    if args.list {
        info!("enumerating buckets via ListBuckets");
        names.extend(list_buckets(profile.as_deref()).await?);
    }
    if names.is_empty() {
        bail!("must specify at least one of --name, --file, or --list");
    }
    info!(count = names.len(), "buckets queued for auditing");

    let who = identity::current(profile.as_deref()).await?;
    render::identity_banner(&who);

    let mut auditor = Auditor::new(&args.perms, profile, args.write);
    if auditor.playbook().is_empty() {
        bail!("no playbook actions selected; check --perm names and the --write gate");
    }

    // Ctrl-C stops the loop; results collected so far still render.
    for bucket in &names {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                warn!("interrupted, rendering partial results");
                break;
            }
            result = auditor.run(bucket) => {
                if let Err(e) = result {
                    warn!(bucket, error = %e, "skipping bucket");
                }
            }
        }
    }

    render::audit_results(auditor.results());
    Ok(())
}

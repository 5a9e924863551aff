use crate::cli::AddArgs;
use crate::config::Settings;
use crate::error::ManageError;
use crate::truenas::NfsShare;
use anyhow::{Context, Result};
use std::io::Write;

/// Group root is mapped to on new shares
const MAPROOT_GROUP: &str = "wheel";

/// Parse the size argument before anything touches the network
pub fn parse_size(arg: &str) -> Result<i64, ManageError> {
    arg.trim()
        .parse::<i64>()
        .map_err(|e| ManageError::Validation(format!("invalid max size '{}': {}", arg, e)))
}

/// Share exporting `/mnt/{dataset_id}` read-write to `hosts`, root mapped to `root:wheel`
pub fn share_for(dataset_id: &str, comment: &str, hosts: &[String]) -> NfsShare {
    NfsShare {
        path: format!("/mnt/{}", dataset_id),
        comment: comment.to_string(),
        hosts: hosts.to_vec(),
        maproot_user: Some("root".to_string()),
        maproot_group: Some(MAPROOT_GROUP.to_string()),
        read_only: false,
        ..NfsShare::default()
    }
}

pub async fn run<W: Write>(args: &AddArgs, settings: &Settings, out: &mut W) -> Result<()> {
    let max_size_gb = parse_size(&args.max_size_gb)?;
    let client = args.connection.connect(settings)?;

    let dataset_id = client
        .create_dataset(&args.pool, &args.dataset, max_size_gb)
        .await
        .context("failed to create dataset")?;
    writeln!(out, "Successfully created dataset '{}'", dataset_id)?;

    if args.nfs_hosts.is_empty() {
        return Ok(());
    }

    let share = share_for(&dataset_id, &args.dataset, &args.nfs_hosts);
    let share_id = client
        .create_nfs_share(share)
        .await
        .context("failed to create NFS share")?;
    writeln!(
        out,
        "Successfully created NFS share (ID: {}) for hosts: [{}]",
        share_id,
        args.nfs_hosts.join(", ")
    )?;

    Ok(())
}

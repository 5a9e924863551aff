use super::confirm;
use crate::cli::DestructiveArgs;
use crate::config::Settings;
use anyhow::{Context, Result};
use std::io::{BufRead, Write};

pub async fn run<R, W>(
    args: &DestructiveArgs,
    settings: &Settings,
    input: &mut R,
    out: &mut W,
) -> Result<()>
where
    R: BufRead,
    W: Write,
{
    if !args.force {
        let warning = format!(
            "This will permanently DELETE dataset '{}' and all its data",
            args.dataset
        );
        if !confirm(&warning, input, out)? {
            writeln!(out, "Operation cancelled")?;
            return Ok(());
        }
    }

    let client = args.connection.connect(settings)?;
    client
        .delete_dataset(&args.dataset)
        .await
        .context("failed to delete dataset")?;

    writeln!(out, "Successfully removed dataset '{}'", args.dataset)?;
    Ok(())
}

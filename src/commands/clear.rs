use super::confirm;
use crate::cli::DestructiveArgs;
use crate::config::Settings;
use anyhow::{Context, Result};
use std::io::{BufRead, Write};

/// Wipe a dataset by deleting and re-creating it
///
/// Properties other than the name and type (quota, compression, ...) are not
/// carried over.
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
        let warning = format!("This will DELETE ALL DATA in dataset '{}'", args.dataset);
        if !confirm(&warning, input, out)? {
            writeln!(out, "Operation cancelled")?;
            return Ok(());
        }
    }

    let client = args.connection.connect(settings)?;
    client
        .clear_dataset(&args.dataset)
        .await
        .context("failed to clear dataset")?;

    writeln!(out, "Successfully cleared dataset '{}'", args.dataset)?;
    Ok(())
}

//! Command handlers: each runs one subcommand against a `GlacierService`
//! and writes one human-readable line per object to `out`.
//!
//! Per-object failures become `Failed:` lines. Listing failures and errors
//! for which `StorageError::is_fatal` holds are returned to the caller.

pub mod restore_handlers;
pub mod status_handlers;

use crate::{
    config::Command,
    errors::StorageError,
    models::object::BucketScope,
    services::{glacier_service::GlacierService, storage::ObjectStorage},
};
use anyhow::Result;
use std::io::Write;

/// Run the configured command.
pub async fn dispatch<S, W>(
    service: &GlacierService<S>,
    scope: &BucketScope,
    command: &Command,
    out: &mut W,
) -> Result<()>
where
    S: ObjectStorage,
    W: Write,
{
    match command {
        Command::RestoreSingleObject { key, params } => {
            restore_handlers::restore_single_object(service, &scope.bucket, key, params, out).await
        }
        Command::RestoreObjects { params } => {
            restore_handlers::restore_objects(service, scope.clone(), *params, out).await
        }
        Command::IsObjectRestored { key } => {
            status_handlers::is_object_restored(service, &scope.bucket, key, out).await
        }
        Command::CheckRestoreStatus { wait } => {
            status_handlers::check_restore_status(service, scope.clone(), *wait, out).await
        }
    }
}

/// Write the failure line for `key`, or hand the error back if it is fatal.
fn report_failure<W: Write>(out: &mut W, key: &str, err: StorageError) -> Result<()> {
    if err.is_fatal() {
        return Err(err.into());
    }
    tracing::warn!(key, error = %err, "object operation failed");
    writeln!(out, "Failed: {key} ({err})")?;
    Ok(())
}

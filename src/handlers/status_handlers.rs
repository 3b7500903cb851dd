//! Handlers for the restore-status commands.

use super::report_failure;
use crate::{
    models::{object::BucketScope, restore::RestoreStatus},
    services::{glacier_service::GlacierService, storage::ObjectStorage},
};
use anyhow::{Context, Result};
use std::{
    io::{self, Write},
    time::Duration,
};
use tracing::info;

/// `is-object-restored <key>`
pub async fn is_object_restored<S: ObjectStorage, W: Write>(
    service: &GlacierService<S>,
    bucket: &str,
    key: &str,
    out: &mut W,
) -> Result<()> {
    match service.is_object_restored(bucket, key).await {
        Ok(status) => write_status_message(out, &status)?,
        Err(err) => report_failure(out, key, err)?,
    }
    Ok(())
}

/// `check-restore-status`: one status line per listed object, then `Done!`.
///
/// With `wait`, each object is polled at that interval until its restore
/// is no longer in progress before its line is written.
pub async fn check_restore_status<S: ObjectStorage, W: Write>(
    service: &GlacierService<S>,
    scope: BucketScope,
    wait: Option<Duration>,
    out: &mut W,
) -> Result<()> {
    info!(
        bucket = %scope.bucket,
        prefix = %scope.prefix,
        "Checking status of bucket. This can take some time if there are many objects."
    );

    let bucket = scope.bucket.clone();
    let mut listing = service.list_objects(scope);
    while let Some(object) = listing
        .next_object()
        .await
        .with_context(|| format!("listing objects in bucket `{bucket}`"))?
    {
        let status = match wait {
            Some(interval) => {
                service
                    .wait_for_restore(&object.bucket, &object.key, interval)
                    .await
            }
            None => service.is_object_restored(&object.bucket, &object.key).await,
        };
        match status {
            Ok(status) => writeln!(out, "{status}: {}", object.key)?,
            Err(err) => report_failure(out, &object.key, err)?,
        }
        out.flush()?;
    }

    writeln!(out, "Done!")?;
    Ok(())
}

fn write_status_message<W: Write>(out: &mut W, status: &RestoreStatus) -> io::Result<()> {
    match status {
        RestoreStatus::NotRequested => writeln!(out, "Restore not requested"),
        RestoreStatus::InProgress => writeln!(out, "Restore in progress..."),
        RestoreStatus::Completed { expiry: None } => writeln!(out, "Object ready!"),
        RestoreStatus::Completed {
            expiry: Some(expiry),
        } => writeln!(out, "Object ready! Expires {}", expiry.to_rfc3339()),
    }
}

//! Handlers for the restore-issuing commands.

use super::report_failure;
use crate::{
    models::{object::BucketScope, restore::RestoreParams},
    services::{glacier_service::GlacierService, storage::ObjectStorage},
};
use anyhow::{Context, Result};
use std::io::Write;
use tracing::info;

/// `restore-single-object <key>`
pub async fn restore_single_object<S: ObjectStorage, W: Write>(
    service: &GlacierService<S>,
    bucket: &str,
    key: &str,
    params: &RestoreParams,
    out: &mut W,
) -> Result<()> {
    match service.restore_object(bucket, key, params).await {
        Ok(outcome) => writeln!(out, "{outcome}: {key}")?,
        Err(err) => report_failure(out, key, err)?,
    }
    Ok(())
}

/// `restore-objects`: streams one line per object as it is processed.
pub async fn restore_objects<S: ObjectStorage, W: Write>(
    service: &GlacierService<S>,
    scope: BucketScope,
    params: RestoreParams,
    out: &mut W,
) -> Result<()> {
    let bucket = scope.bucket.clone();
    let mut progress = service.restore_objects(scope, params);

    while let Some(report) = progress
        .next_report()
        .await
        .with_context(|| format!("listing objects in bucket `{bucket}`"))?
    {
        match report.outcome {
            Ok(outcome) => writeln!(out, "{outcome}: {}", report.object.key)?,
            Err(err) => report_failure(out, &report.object.key, err)?,
        }
        out.flush()?;
    }

    let summary = progress.summary();
    info!(
        total = summary.total(),
        restored = summary.restored,
        already_in_progress = summary.already_in_progress,
        not_archived = summary.not_archived,
        failed = summary.failed,
        "bulk restore finished"
    );
    Ok(())
}

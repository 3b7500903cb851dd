//! src/services/glacier_service.rs
//!
//! GlacierService — restore requests and restore-status polling for archived
//! objects, on top of any `ObjectStorage`. Every operation is strictly
//! sequential: one remote round trip per object, awaited before the next.

use crate::{
    errors::StorageResult,
    models::{
        object::{BucketScope, ObjectSummary, is_archival_storage_class},
        restore::{RestoreOutcome, RestoreParams, RestoreStatus, RestoreSummary},
    },
    services::storage::ObjectStorage,
};
use std::{collections::VecDeque, time::Duration};
use tracing::{debug, info, warn};

/// GlacierService provides the four logical restore operations:
/// - List objects under a bucket scope (lazily, page by page)
/// - Restore one object
/// - Query one object's restore status
/// - Restore every object under a scope, one report at a time
pub struct GlacierService<S> {
    storage: S,
}

impl<S: ObjectStorage> GlacierService<S> {
    pub fn new(storage: S) -> Self {
        Self { storage }
    }

    /// Start a fresh listing of every object under `scope`.
    ///
    /// No request is made until the first object is pulled.
    pub fn list_objects(&self, scope: BucketScope) -> ObjectListing<'_, S> {
        ObjectListing {
            storage: &self.storage,
            scope,
            buffer: VecDeque::new(),
            continuation_token: None,
            exhausted: false,
            pages_fetched: 0,
        }
    }

    /// Issue a restore request for a single object.
    ///
    /// Pending restores and non-archival objects are outcomes, not errors.
    pub async fn restore_object(
        &self,
        bucket: &str,
        key: &str,
        params: &RestoreParams,
    ) -> StorageResult<RestoreOutcome> {
        match self.storage.restore_object(bucket, key, params).await {
            Ok(()) => {
                debug!(
                    bucket,
                    key,
                    days = params.days,
                    tier = params.tier.as_str(),
                    "restore requested"
                );
                Ok(RestoreOutcome::Restored)
            }
            Err(err) => match err.code().and_then(RestoreOutcome::from_error_code) {
                Some(outcome) => {
                    debug!(bucket, key, %outcome, "restore not issued");
                    Ok(outcome)
                }
                None => {
                    debug!(bucket, key, error = %err, "restore failed");
                    Err(err)
                }
            },
        }
    }

    /// Read an object's metadata and classify its restore state.
    pub async fn is_object_restored(
        &self,
        bucket: &str,
        key: &str,
    ) -> StorageResult<RestoreStatus> {
        let meta = self.storage.head_object(bucket, key).await?;
        let status = RestoreStatus::classify(meta.restore.as_deref());
        debug!(
            bucket,
            key = %meta.key,
            storage_class = %meta.storage_class,
            archived = is_archival_storage_class(&meta.storage_class),
            size_bytes = meta.size_bytes,
            %status,
            "restore status"
        );
        Ok(status)
    }

    /// Restore every object under `scope`, in listing order.
    pub fn restore_objects(
        &self,
        scope: BucketScope,
        params: RestoreParams,
    ) -> RestoreProgress<'_, S> {
        RestoreProgress {
            service: self,
            listing: self.list_objects(scope),
            params,
            summary: RestoreSummary::default(),
        }
    }

    /// Poll an object until its restore is no longer in progress.
    pub async fn wait_for_restore(
        &self,
        bucket: &str,
        key: &str,
        poll_interval: Duration,
    ) -> StorageResult<RestoreStatus> {
        loop {
            let status = self.is_object_restored(bucket, key).await?;
            if !status.is_in_progress() {
                return Ok(status);
            }
            info!(key, "Restore in progress...");
            tokio::time::sleep(poll_interval).await;
        }
    }
}

/// Forward-only listing that follows continuation tokens on demand.
pub struct ObjectListing<'a, S> {
    storage: &'a S,
    scope: BucketScope,
    buffer: VecDeque<ObjectSummary>,
    continuation_token: Option<String>,
    exhausted: bool,
    pages_fetched: usize,
}

impl<S: ObjectStorage> ObjectListing<'_, S> {
    /// Pull the next object, fetching another page when the buffer is empty.
    ///
    /// Returns `Ok(None)` once the listing is exhausted.
    pub async fn next_object(&mut self) -> StorageResult<Option<ObjectSummary>> {
        loop {
            if let Some(object) = self.buffer.pop_front() {
                return Ok(Some(object));
            }
            if self.exhausted {
                return Ok(None);
            }

            let page = self
                .storage
                .list_objects_page(
                    &self.scope.bucket,
                    &self.scope.prefix,
                    self.continuation_token.as_deref(),
                )
                .await?;
            self.pages_fetched += 1;
            debug!(
                bucket = %self.scope.bucket,
                prefix = %self.scope.prefix,
                page = self.pages_fetched,
                objects = page.objects.len(),
                truncated = page.is_truncated,
                "fetched listing page"
            );

            self.buffer.extend(page.objects);
            match (page.is_truncated, page.next_continuation_token) {
                (true, Some(token)) => self.continuation_token = Some(token),
                (true, None) => {
                    warn!(
                        bucket = %self.scope.bucket,
                        "truncated listing without a continuation token; stopping"
                    );
                    self.exhausted = true;
                }
                (false, _) => self.exhausted = true,
            }
        }
    }
}

/// One object processed by a bulk restore.
#[derive(Debug)]
pub struct RestoreReport {
    pub object: ObjectSummary,
    pub outcome: StorageResult<RestoreOutcome>,
}

/// Bulk restore driven one object at a time.
pub struct RestoreProgress<'a, S> {
    service: &'a GlacierService<S>,
    listing: ObjectListing<'a, S>,
    params: RestoreParams,
    summary: RestoreSummary,
}

impl<S: ObjectStorage> RestoreProgress<'_, S> {
    /// Restore the next listed object.
    ///
    /// Listing failures are returned as `Err`; a failed restore of the
    /// object itself is carried inside the report.
    pub async fn next_report(&mut self) -> StorageResult<Option<RestoreReport>> {
        let Some(object) = self.listing.next_object().await? else {
            return Ok(None);
        };

        debug!(
            key = %object.key,
            storage_class = %object.storage_class,
            size_bytes = object.size_bytes,
            "restoring object"
        );
        let outcome = self
            .service
            .restore_object(&object.bucket, &object.key, &self.params)
            .await;
        self.summary.record(&outcome);

        Ok(Some(RestoreReport { object, outcome }))
    }

    pub fn summary(&self) -> &RestoreSummary {
        &self.summary
    }
}

//! The seam between restore logic and the object storage service.
//!
//! `ObjectStorage` covers exactly the three remote calls the tool needs.
//! Implementations report service failures as `StorageError`, keeping the
//! service's error code so callers can classify it.

use crate::{
    errors::StorageResult,
    models::{
        object::{ObjectMetadata, ObjectSummary},
        restore::RestoreParams,
    },
};
use std::future::Future;

/// One page of a ListObjectsV2 response.
#[derive(Debug, Default)]
pub struct ObjectPage {
    pub objects: Vec<ObjectSummary>,
    pub is_truncated: bool,
    pub next_continuation_token: Option<String>,
}

pub trait ObjectStorage {
    /// Fetch one page of objects under `prefix`, resuming after
    /// `continuation_token` when given.
    fn list_objects_page(
        &self,
        bucket: &str,
        prefix: &str,
        continuation_token: Option<&str>,
    ) -> impl Future<Output = StorageResult<ObjectPage>> + Send;

    /// Ask the service to restore an archived object.
    fn restore_object(
        &self,
        bucket: &str,
        key: &str,
        params: &RestoreParams,
    ) -> impl Future<Output = StorageResult<()>> + Send;

    /// Read an object's storage class and restore header.
    fn head_object(
        &self,
        bucket: &str,
        key: &str,
    ) -> impl Future<Output = StorageResult<ObjectMetadata>> + Send;
}

//! `ObjectStorage` backed by the AWS SDK.
//!
//! Credentials and region come from the standard AWS provider chain
//! (environment, profile, instance role). Only region, endpoint and
//! addressing style can be overridden from the command line.

use crate::{
    config::ClientConfig,
    errors::{StorageError, StorageResult},
    models::{
        object::{DEFAULT_STORAGE_CLASS, ObjectMetadata, ObjectSummary},
        restore::RestoreParams,
    },
    services::storage::{ObjectPage, ObjectStorage},
};
use aws_config::BehaviorVersion;
use aws_sdk_s3::{
    Client,
    config::Region,
    error::{DisplayErrorContext, ProvideErrorMetadata, SdkError},
    operation::head_object::HeadObjectError,
    types::{GlacierJobParameters, RestoreRequest, Tier},
};
use std::{error::Error, fmt::Debug};
use tracing::debug;

#[derive(Clone, Debug)]
pub struct S3Storage {
    client: Client,
}

impl S3Storage {
    /// Build an S3 client from the default provider chain plus overrides.
    pub async fn connect(cfg: &ClientConfig) -> Self {
        let mut loader = aws_config::defaults(BehaviorVersion::latest());
        if let Some(region) = &cfg.region {
            loader = loader.region(Region::new(region.clone()));
        }
        if let Some(endpoint) = &cfg.endpoint_url {
            loader = loader.endpoint_url(endpoint);
        }
        let sdk_config = loader.load().await;

        let s3_config = aws_sdk_s3::config::Builder::from(&sdk_config)
            .force_path_style(cfg.force_path_style)
            .build();

        debug!(
            region = ?sdk_config.region(),
            endpoint = ?cfg.endpoint_url,
            "S3 client configured"
        );

        Self {
            client: Client::from_conf(s3_config),
        }
    }
}

impl S3Storage {
    /// Confirm the bucket exists and is readable with the current credentials.
    async fn check_bucket(&self, bucket: &str) -> StorageResult<()> {
        match self.client.head_bucket().bucket(bucket).send().await {
            Ok(_) => Ok(()),
            Err(err) => {
                let status = err.raw_response().map(|resp| resp.status().as_u16());
                Err(match status {
                    Some(404) => StorageError::BucketNotFound(bucket.to_string()),
                    Some(403) => StorageError::BucketAccessDenied(bucket.to_string()),
                    _ if err.as_service_error().is_some_and(|e| e.is_not_found()) => {
                        StorageError::BucketNotFound(bucket.to_string())
                    }
                    _ => sdk_error("HeadBucket", err),
                })
            }
        }
    }
}

impl ObjectStorage for S3Storage {
    async fn list_objects_page(
        &self,
        bucket: &str,
        prefix: &str,
        continuation_token: Option<&str>,
    ) -> StorageResult<ObjectPage> {
        let response = self
            .client
            .list_objects_v2()
            .bucket(bucket)
            .prefix(prefix)
            .set_continuation_token(continuation_token.map(str::to_owned))
            .send()
            .await
            .map_err(|err| match err.code() {
                Some("NoSuchBucket") => StorageError::BucketNotFound(bucket.to_string()),
                _ => sdk_error("ListObjectsV2", err),
            })?;

        let objects = response
            .contents()
            .iter()
            .map(|obj| ObjectSummary {
                bucket: bucket.to_string(),
                key: obj.key().unwrap_or_default().to_string(),
                storage_class: obj
                    .storage_class()
                    .map(|class| class.as_str().to_string())
                    .unwrap_or_else(|| DEFAULT_STORAGE_CLASS.to_string()),
                size_bytes: obj.size().unwrap_or(0),
            })
            .collect();

        Ok(ObjectPage {
            objects,
            is_truncated: response.is_truncated().unwrap_or(false),
            next_continuation_token: response.next_continuation_token().map(str::to_owned),
        })
    }

    async fn restore_object(
        &self,
        bucket: &str,
        key: &str,
        params: &RestoreParams,
    ) -> StorageResult<()> {
        let job_parameters = GlacierJobParameters::builder()
            .tier(Tier::from(params.tier.as_str()))
            .build()
            .map_err(|err| StorageError::InvalidRestoreRequest(err.to_string()))?;

        let request = RestoreRequest::builder()
            .days(params.days)
            .glacier_job_parameters(job_parameters)
            .build();

        self.client
            .restore_object()
            .bucket(bucket)
            .key(key)
            .restore_request(request)
            .send()
            .await
            .map_err(|err| match err.code() {
                Some("NoSuchBucket") => StorageError::BucketNotFound(bucket.to_string()),
                Some("NoSuchKey") => StorageError::ObjectNotFound {
                    bucket: bucket.to_string(),
                    key: key.to_string(),
                },
                _ => sdk_error("RestoreObject", err),
            })?;

        Ok(())
    }

    async fn head_object(&self, bucket: &str, key: &str) -> StorageResult<ObjectMetadata> {
        let response = match self.client.head_object().bucket(bucket).key(key).send().await {
            Ok(response) => response,
            Err(err) => {
                // HEAD responses carry no body, so 404 and 403 come without an
                // error code and could be about the bucket rather than the key.
                let status = err.raw_response().map(|resp| resp.status().as_u16());
                let object_error = head_object_error(bucket, key, status, err);
                if matches!(status, Some(403 | 404))
                    || matches!(object_error, StorageError::ObjectNotFound { .. })
                {
                    self.check_bucket(bucket).await?;
                }
                return Err(object_error);
            }
        };

        Ok(ObjectMetadata {
            key: key.to_string(),
            storage_class: response
                .storage_class()
                .map(|class| class.as_str().to_string())
                .unwrap_or_else(|| DEFAULT_STORAGE_CLASS.to_string()),
            restore: response.restore().map(str::to_owned),
            size_bytes: response.content_length().unwrap_or(0),
        })
    }
}

fn head_object_error<R>(
    bucket: &str,
    key: &str,
    status: Option<u16>,
    err: SdkError<HeadObjectError, R>,
) -> StorageError
where
    R: Debug,
{
    if status == Some(404) || err.as_service_error().is_some_and(|e| e.is_not_found()) {
        StorageError::ObjectNotFound {
            bucket: bucket.to_string(),
            key: key.to_string(),
        }
    } else {
        sdk_error("HeadObject", err)
    }
}

/// Flatten an SDK error into a storage error, keeping the service code.
fn sdk_error<E, R>(operation: &'static str, err: SdkError<E, R>) -> StorageError
where
    E: ProvideErrorMetadata + Error + 'static,
    R: Debug,
{
    let code = err.code().unwrap_or_default().to_string();
    StorageError::access(operation, code, DisplayErrorContext(&err).to_string())
}

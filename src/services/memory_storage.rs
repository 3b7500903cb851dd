//! In-memory `ObjectStorage` that mimics S3's restore semantics for tests.
//!
//! Ongoing restores can be set to finish on their own after a number of
//! HEAD requests, which stands in for the hours a real thaw takes.

use crate::{
    errors::{StorageError, StorageResult},
    models::{
        object::{ObjectMetadata, ObjectSummary, is_archival_storage_class},
        restore::RestoreParams,
    },
    services::storage::{ObjectPage, ObjectStorage},
};
use chrono::{DateTime, Duration, Utc};
use std::{
    collections::{BTreeMap, HashMap},
    sync::Mutex,
};

#[derive(Clone, Debug)]
enum RestoreState {
    None,
    Ongoing { polls_left: Option<u32> },
    Done { expiry: DateTime<Utc> },
}

#[derive(Clone, Debug)]
struct StoredObject {
    storage_class: String,
    size_bytes: i64,
    restore: RestoreState,
}

type Buckets = HashMap<String, BTreeMap<String, StoredObject>>;

pub struct MemoryStorage {
    page_size: usize,
    restore_latency: Option<u32>,
    buckets: Mutex<Buckets>,
    list_requests: Mutex<usize>,
}

impl MemoryStorage {
    pub fn new(page_size: usize) -> Self {
        Self {
            page_size: page_size.max(1),
            restore_latency: None,
            buckets: Mutex::new(HashMap::new()),
            list_requests: Mutex::new(0),
        }
    }

    /// Make new restores complete after `polls` HEAD requests.
    pub fn with_restore_latency(mut self, polls: u32) -> Self {
        self.restore_latency = Some(polls);
        self
    }

    pub fn create_bucket(&self, bucket: &str) {
        self.buckets
            .lock()
            .unwrap()
            .entry(bucket.to_string())
            .or_default();
    }

    pub fn put_object(&self, bucket: &str, key: &str, storage_class: &str) {
        let mut buckets = self.buckets.lock().unwrap();
        buckets.entry(bucket.to_string()).or_default().insert(
            key.to_string(),
            StoredObject {
                storage_class: storage_class.to_string(),
                size_bytes: key.len() as i64,
                restore: RestoreState::None,
            },
        );
    }

    /// Finish an ongoing restore, as the service eventually does.
    pub fn complete_restore(&self, bucket: &str, key: &str, expiry: DateTime<Utc>) {
        let mut buckets = self.buckets.lock().unwrap();
        let object = buckets
            .get_mut(bucket)
            .and_then(|objects| objects.get_mut(key))
            .expect("object exists");
        object.restore = RestoreState::Done { expiry };
    }

    pub fn list_requests(&self) -> usize {
        *self.list_requests.lock().unwrap()
    }
}

impl ObjectStorage for MemoryStorage {
    async fn list_objects_page(
        &self,
        bucket: &str,
        prefix: &str,
        continuation_token: Option<&str>,
    ) -> StorageResult<ObjectPage> {
        *self.list_requests.lock().unwrap() += 1;

        let buckets = self.buckets.lock().unwrap();
        let objects = buckets
            .get(bucket)
            .ok_or_else(|| StorageError::BucketNotFound(bucket.to_string()))?;

        let mut matching = objects
            .iter()
            .filter(|(key, _)| key.starts_with(prefix))
            .filter(|(key, _)| continuation_token.is_none_or(|token| key.as_str() > token));

        let page: Vec<ObjectSummary> = matching
            .by_ref()
            .take(self.page_size)
            .map(|(key, obj)| ObjectSummary {
                bucket: bucket.to_string(),
                key: key.clone(),
                storage_class: obj.storage_class.clone(),
                size_bytes: obj.size_bytes,
            })
            .collect();

        let is_truncated = matching.next().is_some();
        let next_continuation_token = if is_truncated {
            page.last().map(|obj| obj.key.clone())
        } else {
            None
        };

        Ok(ObjectPage {
            objects: page,
            is_truncated,
            next_continuation_token,
        })
    }

    async fn restore_object(
        &self,
        bucket: &str,
        key: &str,
        params: &RestoreParams,
    ) -> StorageResult<()> {
        let mut buckets = self.buckets.lock().unwrap();
        let object = buckets
            .get_mut(bucket)
            .ok_or_else(|| StorageError::BucketNotFound(bucket.to_string()))?
            .get_mut(key)
            .ok_or_else(|| StorageError::ObjectNotFound {
                bucket: bucket.to_string(),
                key: key.to_string(),
            })?;

        if !is_archival_storage_class(&object.storage_class) {
            return Err(StorageError::access(
                "RestoreObject",
                "InvalidObjectState",
                "The operation is not valid for the object's storage class",
            ));
        }

        match object.restore {
            RestoreState::Ongoing { .. } => Err(StorageError::access(
                "RestoreObject",
                "RestoreAlreadyInProgress",
                "Object restore is already in progress",
            )),
            // A completed copy just gets its expiry pushed out.
            RestoreState::Done { .. } => {
                object.restore = RestoreState::Done {
                    expiry: Utc::now() + Duration::days(i64::from(params.days)),
                };
                Ok(())
            }
            RestoreState::None => {
                object.restore = RestoreState::Ongoing {
                    polls_left: self.restore_latency,
                };
                Ok(())
            }
        }
    }

    async fn head_object(&self, bucket: &str, key: &str) -> StorageResult<ObjectMetadata> {
        let mut buckets = self.buckets.lock().unwrap();
        let object = buckets
            .get_mut(bucket)
            .ok_or_else(|| StorageError::BucketNotFound(bucket.to_string()))?
            .get_mut(key)
            .ok_or_else(|| StorageError::ObjectNotFound {
                bucket: bucket.to_string(),
                key: key.to_string(),
            })?;

        let finished = match &mut object.restore {
            RestoreState::Ongoing {
                polls_left: Some(0),
            } => true,
            RestoreState::Ongoing {
                polls_left: Some(polls_left),
            } => {
                *polls_left -= 1;
                false
            }
            _ => false,
        };
        if finished {
            object.restore = RestoreState::Done {
                expiry: Utc::now() + Duration::days(1),
            };
        }

        let restore = match &object.restore {
            RestoreState::None => None,
            RestoreState::Ongoing { .. } => Some(r#"ongoing-request="true""#.to_string()),
            RestoreState::Done { expiry } => Some(format!(
                r#"ongoing-request="false", expiry-date="{}""#,
                expiry.format("%a, %d %b %Y %H:%M:%S GMT")
            )),
        };

        Ok(ObjectMetadata {
            key: key.to_string(),
            storage_class: object.storage_class.clone(),
            restore,
            size_bytes: object.size_bytes,
        })
    }
}

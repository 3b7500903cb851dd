//! Represents objects (and the bucket scope they are listed from).

/// Storage classes that must be restored before the object can be read.
const ARCHIVAL_STORAGE_CLASSES: [&str; 2] = ["GLACIER", "DEEP_ARCHIVE"];

/// Storage class reported when the service omits one.
pub const DEFAULT_STORAGE_CLASS: &str = "STANDARD";

/// The bucket and key prefix a listing-based command operates on.
///
/// An empty prefix selects every object in the bucket.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BucketScope {
    pub bucket: String,
    pub prefix: String,
}

impl BucketScope {
    pub fn new(bucket: impl Into<String>, prefix: impl Into<String>) -> Self {
        Self {
            bucket: bucket.into(),
            prefix: prefix.into(),
        }
    }
}

/// A single entry of an object listing.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ObjectSummary {
    /// Bucket the object was listed from.
    pub bucket: String,

    /// Object key (path-like identifier within the bucket).
    pub key: String,

    /// Storage class (e.g., STANDARD, GLACIER, DEEP_ARCHIVE).
    pub storage_class: String,

    /// Size in bytes.
    pub size_bytes: i64,
}

/// Metadata returned by a HEAD request on a single object.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ObjectMetadata {
    pub key: String,
    pub storage_class: String,

    /// Raw `x-amz-restore` header, absent when no restore was ever requested.
    pub restore: Option<String>,

    pub size_bytes: i64,
}

pub fn is_archival_storage_class(storage_class: &str) -> bool {
    ARCHIVAL_STORAGE_CLASSES.contains(&storage_class)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_glacier_classes_are_archival() {
        assert!(is_archival_storage_class("GLACIER"));
        assert!(is_archival_storage_class("DEEP_ARCHIVE"));
        assert!(!is_archival_storage_class("STANDARD"));
        assert!(!is_archival_storage_class("GLACIER_IR"));
    }
}

//! Restore parameters, outcomes and status classification.

use chrono::{DateTime, Utc};
use clap::ValueEnum;
use std::fmt;

/// Retrieval tier requested from the archival storage class.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
#[value(rename_all = "PascalCase")]
pub enum RetrievalTier {
    #[default]
    Standard,
    Bulk,
    Expedited,
}

impl RetrievalTier {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Standard => "Standard",
            Self::Bulk => "Bulk",
            Self::Expedited => "Expedited",
        }
    }
}

/// Parameters sent with every restore request.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RestoreParams {
    /// Days the restored copy stays readable.
    pub days: i32,
    pub tier: RetrievalTier,
}

impl Default for RestoreParams {
    fn default() -> Self {
        Self {
            days: 3,
            tier: RetrievalTier::Standard,
        }
    }
}

/// Result of issuing a restore request for one object.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RestoreOutcome {
    /// The request was accepted. Thawing has begun, it is not finished.
    Restored,
    AlreadyInProgress,
    /// The object's storage class does not need a restore.
    NotArchived,
}

impl RestoreOutcome {
    /// Map an S3 error code returned by `RestoreObject` onto an outcome.
    ///
    /// Returns `None` for codes that are real failures.
    pub fn from_error_code(code: &str) -> Option<Self> {
        match code {
            "RestoreAlreadyInProgress" => Some(Self::AlreadyInProgress),
            "InvalidObjectState" | "ObjectAlreadyInActiveTierError" => Some(Self::NotArchived),
            _ => None,
        }
    }
}

impl fmt::Display for RestoreOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Restored => "Restored",
            Self::AlreadyInProgress => "Already in progress",
            Self::NotArchived => "Not archived",
        };
        f.write_str(label)
    }
}

/// Restore state of an object as reported by its metadata.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RestoreStatus {
    NotRequested,
    InProgress,
    /// A readable copy exists until `expiry` (when the service reported one).
    Completed { expiry: Option<DateTime<Utc>> },
}

impl RestoreStatus {
    /// Classify the raw `x-amz-restore` header.
    ///
    /// The header looks like `ongoing-request="true"` while thawing and
    /// `ongoing-request="false", expiry-date="Sun, 23 Dec 2012 00:00:00 GMT"`
    /// once the copy is readable.
    pub fn classify(restore_header: Option<&str>) -> Self {
        let Some(header) = restore_header else {
            return Self::NotRequested;
        };

        if header_field(header, "ongoing-request") == Some("true") {
            return Self::InProgress;
        }

        let expiry = header_field(header, "expiry-date")
            .and_then(|raw| DateTime::parse_from_rfc2822(raw).ok())
            .map(|dt| dt.with_timezone(&Utc));

        Self::Completed { expiry }
    }

    pub fn is_in_progress(&self) -> bool {
        matches!(self, Self::InProgress)
    }
}

impl fmt::Display for RestoreStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotRequested => f.write_str("Not requested"),
            Self::InProgress => f.write_str("In progress"),
            Self::Completed { expiry: None } => f.write_str("Completed"),
            Self::Completed {
                expiry: Some(expiry),
            } => write!(f, "Completed (expires {})", expiry.to_rfc3339()),
        }
    }
}

/// Extract the quoted value of `name="..."` from a restore header.
fn header_field<'a>(header: &'a str, name: &str) -> Option<&'a str> {
    let needle = format!("{name}=\"");
    let start = header.find(&needle)? + needle.len();
    let rest = &header[start..];
    let end = rest.find('"')?;
    Some(&rest[..end])
}

/// Running tally of outcomes produced by a bulk restore.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RestoreSummary {
    pub restored: usize,
    pub already_in_progress: usize,
    pub not_archived: usize,
    pub failed: usize,
}

impl RestoreSummary {
    pub fn record<E>(&mut self, outcome: &Result<RestoreOutcome, E>) {
        match outcome {
            Ok(RestoreOutcome::Restored) => self.restored += 1,
            Ok(RestoreOutcome::AlreadyInProgress) => self.already_in_progress += 1,
            Ok(RestoreOutcome::NotArchived) => self.not_archived += 1,
            Err(_) => self.failed += 1,
        }
    }

    pub fn total(&self) -> usize {
        self.restored + self.already_in_progress + self.not_archived + self.failed
    }
}

use serde::{Deserialize, Serialize};

/// One resolved dependency coordinate (`group:name:version`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ArtifactInfo {
    pub group: String,
    pub name: String,
    pub version: String,
}

impl ArtifactInfo {
    pub fn new(group: &str, name: &str, version: &str) -> Self {
        Self {
            group: group.to_string(),
            name: name.to_string(),
            version: version.to_string(),
        }
    }
}

impl std::fmt::Display for ArtifactInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}:{}", self.group, self.name, self.version)
    }
}

/// Position of one library's raw license section inside the shared text blob.
///
/// `start` and `length` count chars of the decoded blob, not bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LicenseIndexEntry {
    pub library_name: String,
    pub start: usize,
    pub length: usize,
}

/// A single canonical license body, identified by the hash of its content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LicenseModel {
    pub name: String,
    pub content: String,
    pub hash: String,
}

/// One logical library entry in the generated catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LibraryModel {
    pub unique_id: String,
    pub name: String,
    /// License hashes, in order of first appearance in the library's section.
    pub licenses: Vec<String>,
}

/// Why a coordinate or index entry contributed nothing to the catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SkipReason {
    Unresolved,
    ResolverFailed,
    NoPayload,
    ArchiveFailed,
    EntryOutOfRange,
    EntryMalformed,
}

impl std::fmt::Display for SkipReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SkipReason::Unresolved => write!(f, "artifact not found"),
            SkipReason::ResolverFailed => write!(f, "resolver error"),
            SkipReason::NoPayload => write!(f, "no license payload"),
            SkipReason::ArchiveFailed => write!(f, "unreadable archive"),
            SkipReason::EntryOutOfRange => write!(f, "offsets out of range"),
            SkipReason::EntryMalformed => write!(f, "malformed index entry"),
        }
    }
}

/// A diagnostic recorded for the run summary.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Skipped {
    /// The coordinate, optionally suffixed with the library name for entry-level skips.
    pub subject: String,
    pub reason: SkipReason,
    pub detail: String,
}

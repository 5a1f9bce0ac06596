//! One catalog run: resolve → open → split → classify, then merge in order.
//!
//! Artifacts are read concurrently in fixed-size batches on the blocking pool.
//! Each batch is joined in candidate order and merged sequentially, so
//! first-write-wins resolves exactly as a one-at-a-time run would.

use std::sync::Arc;

use anyhow::Result;
use futures::future::join_all;
use indicatif::ProgressBar;

use crate::archive::{read_payload, ArchiveOpener};
use crate::catalog::Catalog;
use crate::config::ArchiveConfig;
use crate::error::SegmentError;
use crate::license::classifier::{classify_section, ExtractedLicense};
use crate::license::patterns::SignatureSet;
use crate::license::segment::{parse_index, TextBlob};
use crate::models::{ArtifactInfo, SkipReason, Skipped};
use crate::resolver::ArtifactResolver;

const BATCH_SIZE: usize = 16;

/// One library's classified section.
#[derive(Debug)]
pub struct Section {
    pub library_name: String,
    pub licenses: Vec<ExtractedLicense>,
}

/// Everything read from one artifact.
#[derive(Debug, Default)]
pub struct ArtifactReport {
    pub sections: Vec<Section>,
    pub skipped: Vec<Skipped>,
}

impl ArtifactReport {
    fn skip(subject: String, reason: SkipReason, detail: String) -> Self {
        ArtifactReport {
            sections: Vec::new(),
            skipped: vec![Skipped {
                subject,
                reason,
                detail,
            }],
        }
    }
}

/// Outcome of a completed run.
#[derive(Debug)]
pub struct RunResult {
    pub catalog: Catalog,
    pub skipped: Vec<Skipped>,
    /// Candidates that yielded at least one section.
    pub contributing: usize,
}

pub struct Pipeline {
    resolver: Arc<dyn ArtifactResolver>,
    opener: Arc<dyn ArchiveOpener>,
    signatures: Arc<SignatureSet>,
    archive: Arc<ArchiveConfig>,
    namespace: String,
}

impl Pipeline {
    pub fn new(
        resolver: Arc<dyn ArtifactResolver>,
        opener: Arc<dyn ArchiveOpener>,
        signatures: SignatureSet,
        archive: ArchiveConfig,
        namespace: &str,
    ) -> Self {
        Self {
            resolver,
            opener,
            signatures: Arc::new(signatures),
            archive: Arc::new(archive),
            namespace: namespace.to_string(),
        }
    }

    pub async fn run(
        &self,
        candidates: &[ArtifactInfo],
        progress: Option<&ProgressBar>,
    ) -> Result<RunResult> {
        let mut catalog = Catalog::new(&self.namespace);
        let mut skipped = Vec::new();
        let mut contributing = 0;

        for batch in candidates.chunks(BATCH_SIZE) {
            let tasks: Vec<_> = batch
                .iter()
                .map(|artifact| {
                    let artifact = artifact.clone();
                    let resolver = Arc::clone(&self.resolver);
                    let opener = Arc::clone(&self.opener);
                    let signatures = Arc::clone(&self.signatures);
                    let archive = Arc::clone(&self.archive);
                    tokio::task::spawn_blocking(move || {
                        read_artifact(
                            &artifact,
                            resolver.as_ref(),
                            opener.as_ref(),
                            &archive,
                            &signatures,
                        )
                    })
                })
                .collect();

            for (artifact, joined) in batch.iter().zip(join_all(tasks).await) {
                let report = joined.unwrap_or_else(|e| {
                    tracing::error!(coordinate = %artifact, error = %e, "reading artifact panicked");
                    ArtifactReport::skip(artifact.to_string(), SkipReason::ArchiveFailed, e.to_string())
                });
                if !report.sections.is_empty() {
                    contributing += 1;
                }
                for section in &report.sections {
                    catalog.add_library(&section.library_name, &section.licenses);
                }
                skipped.extend(report.skipped);
                if let Some(pb) = progress {
                    pb.inc(1);
                }
            }
        }

        tracing::info!(
            libraries = catalog.libraries().len(),
            licenses = catalog.licenses().len(),
            skipped = skipped.len(),
            "catalog built"
        );

        Ok(RunResult {
            catalog,
            skipped,
            contributing,
        })
    }
}

/// Read and classify every section of one artifact. Never fails: problems
/// become skip records.
pub fn read_artifact(
    artifact: &ArtifactInfo,
    resolver: &dyn ArtifactResolver,
    opener: &dyn ArchiveOpener,
    names: &ArchiveConfig,
    signatures: &SignatureSet,
) -> ArtifactReport {
    let subject = artifact.to_string();

    let path = match resolver.resolve(artifact) {
        Ok(Some(path)) => path,
        Ok(None) => {
            tracing::warn!(coordinate = %subject, "no artifact file found");
            return ArtifactReport::skip(subject, SkipReason::Unresolved, String::new());
        }
        Err(e) => {
            tracing::warn!(coordinate = %subject, error = %e, "resolving artifact failed");
            return ArtifactReport::skip(subject, SkipReason::ResolverFailed, format!("{e:#}"));
        }
    };

    let payload = match read_payload(opener, &path, names) {
        Ok(Some(payload)) => payload,
        Ok(None) => {
            tracing::debug!(coordinate = %subject, path = %path.display(), "no license entries");
            return ArtifactReport::skip(subject, SkipReason::NoPayload, String::new());
        }
        Err(e) => {
            tracing::error!(coordinate = %subject, error = %e, "cannot read license archive");
            return ArtifactReport::skip(subject, SkipReason::ArchiveFailed, e.to_string());
        }
    };

    let entries = match parse_index(&payload.index) {
        Ok(entries) => entries,
        Err(e) => {
            tracing::error!(coordinate = %subject, error = %e, "cannot read license index");
            return ArtifactReport::skip(subject, SkipReason::ArchiveFailed, e.to_string());
        }
    };

    let blob = TextBlob::new(&payload.text);
    let mut report = ArtifactReport::default();

    for entry in entries {
        let section = entry.and_then(|entry| {
            blob.section(&entry)
                .map(|text| classify_section(&entry.library_name, text, signatures))
                .map(|licenses| Section {
                    library_name: entry.library_name.clone(),
                    licenses,
                })
        });
        match section {
            Ok(section) => report.sections.push(section),
            Err(e) => {
                tracing::warn!(coordinate = %subject, error = %e, "skipping index entry");
                let (library, reason) = match &e {
                    SegmentError::OutOfRange { library, .. } => {
                        (library.clone(), SkipReason::EntryOutOfRange)
                    }
                    SegmentError::Malformed { library, .. } => {
                        (library.clone(), SkipReason::EntryMalformed)
                    }
                };
                report.skipped.push(Skipped {
                    subject: format!("{subject} ({library})"),
                    reason,
                    detail: e.to_string(),
                });
            }
        }
    }

    tracing::debug!(
        coordinate = %subject,
        sections = report.sections.len(),
        "classified license sections"
    );
    report
}

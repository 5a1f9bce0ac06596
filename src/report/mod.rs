//! Run summary rendering.
//!
//! - [`terminal`] — colored summary box and tables; respects `--verbose` / `--quiet`.
//! - JSON output is the [`RunSummary`] serialized as-is.

pub mod terminal;

use std::collections::HashMap;

use serde::Serialize;

use crate::models::Skipped;
use crate::output::WriteSummary;
use crate::pipeline::RunResult;

#[derive(Debug, Serialize)]
pub struct RunSummary {
    pub coordinates: usize,
    pub candidates: usize,
    pub contributing: usize,
    pub libraries: Vec<LibraryRow>,
    pub licenses: Vec<LicenseRow>,
    pub skipped: Vec<Skipped>,
    pub output: WriteSummary,
}

#[derive(Debug, Serialize)]
pub struct LibraryRow {
    pub name: String,
    pub unique_id: String,
    pub licenses: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct LicenseRow {
    pub name: String,
    pub spdx_id: Option<String>,
    pub hash: String,
    /// Number of libraries referencing this record.
    pub used_by: usize,
}

impl RunSummary {
    pub fn new(
        coordinates: usize,
        candidates: usize,
        result: &RunResult,
        output: &WriteSummary,
    ) -> Self {
        let catalog = &result.catalog;

        let mut used_by: HashMap<&str, usize> = HashMap::new();
        for lib in catalog.libraries() {
            for hash in &lib.licenses {
                *used_by.entry(hash.as_str()).or_insert(0) += 1;
            }
        }

        let libraries = catalog
            .libraries()
            .iter()
            .map(|lib| LibraryRow {
                name: lib.name.clone(),
                unique_id: lib.unique_id.clone(),
                licenses: lib
                    .licenses
                    .iter()
                    .filter_map(|h| catalog.license(h))
                    .map(|l| l.model.name.clone())
                    .collect(),
            })
            .collect();

        let licenses = catalog
            .licenses()
            .iter()
            .map(|l| LicenseRow {
                name: l.model.name.clone(),
                spdx_id: l.spdx_id.clone(),
                hash: l.model.hash.clone(),
                used_by: used_by.get(l.model.hash.as_str()).copied().unwrap_or(0),
            })
            .collect();

        RunSummary {
            coordinates,
            candidates,
            contributing: result.contributing,
            libraries,
            licenses,
            skipped: result.skipped.clone(),
            output: output.clone(),
        }
    }
}

use std::collections::HashMap;

use crate::license::canonical::{canonicalize, content_hash};
use crate::license::classifier::ExtractedLicense;
use crate::models::{LibraryModel, LicenseModel};

/// Stored license record plus the SPDX id of the signature that produced it.
#[derive(Debug, Clone)]
pub struct StoredLicense {
    pub model: LicenseModel,
    pub spdx_id: Option<String>,
}

/// The run's accumulators: libraries by `unique_id`, licenses by content hash.
///
/// Both are first-write-wins and remember insertion order.
#[derive(Debug)]
pub struct Catalog {
    namespace: String,
    libraries: Vec<LibraryModel>,
    library_index: HashMap<String, usize>,
    licenses: Vec<StoredLicense>,
    license_index: HashMap<String, usize>,
}

impl Catalog {
    pub fn new(namespace: &str) -> Self {
        Self {
            namespace: namespace.to_string(),
            libraries: Vec::new(),
            library_index: HashMap::new(),
            licenses: Vec::new(),
            license_index: HashMap::new(),
        }
    }

    /// `<namespace>.<name lowercased, spaces as underscores>`.
    pub fn unique_id(&self, library_name: &str) -> String {
        format!(
            "{}.{}",
            self.namespace,
            library_name.to_lowercase().replace(' ', "_")
        )
    }

    /// Record a library and its licenses.
    ///
    /// Returns `false`, storing nothing, when the library's `unique_id` is
    /// already taken by an earlier section.
    pub fn add_library(&mut self, library_name: &str, extracted: &[ExtractedLicense]) -> bool {
        let unique_id = self.unique_id(library_name);
        if self.library_index.contains_key(&unique_id) {
            tracing::debug!(%unique_id, "library already catalogued, keeping first");
            return false;
        }

        let mut licenses: Vec<String> = Vec::with_capacity(extracted.len());
        for license in extracted {
            let hash = self.add_license(license);
            if !licenses.contains(&hash) {
                licenses.push(hash);
            }
        }

        self.library_index
            .insert(unique_id.clone(), self.libraries.len());
        self.libraries.push(LibraryModel {
            unique_id,
            name: library_name.to_string(),
            licenses,
        });
        true
    }

    /// Store a license body unless identical canonical content is already
    /// stored. Returns its hash either way.
    pub fn add_license(&mut self, license: &ExtractedLicense) -> String {
        let content = canonicalize(&license.content);
        let hash = content_hash(&content);
        if !self.license_index.contains_key(&hash) {
            self.license_index.insert(hash.clone(), self.licenses.len());
            self.licenses.push(StoredLicense {
                model: LicenseModel {
                    name: license.name.clone(),
                    content,
                    hash: hash.clone(),
                },
                spdx_id: license.spdx_id.clone(),
            });
        }
        hash
    }

    pub fn libraries(&self) -> &[LibraryModel] {
        &self.libraries
    }

    pub fn licenses(&self) -> &[StoredLicense] {
        &self.licenses
    }

    pub fn library(&self, unique_id: &str) -> Option<&LibraryModel> {
        self.library_index
            .get(unique_id)
            .map(|&i| &self.libraries[i])
    }

    pub fn license(&self, hash: &str) -> Option<&StoredLicense> {
        self.license_index.get(hash).map(|&i| &self.licenses[i])
    }
}

//! Writing the catalog next to hand-authored entries.
//!
//! Directory contract: a file whose name starts with the generated prefix is
//! owned by this tool and is deleted and rewritten on every run. Any other
//! file is hand-authored and never touched. Generated-ness is decided by the
//! name alone, never by content.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Serialize;

use crate::catalog::{Catalog, StoredLicense};
use crate::config::OutputConfig;
use crate::license::canonical::content_hash;
use crate::models::LibraryModel;

pub struct OutputLayout {
    pub libraries_dir: PathBuf,
    pub licenses_dir: PathBuf,
    pub prefix: String,
    pub write_plain_text: bool,
}

impl OutputLayout {
    pub fn new(libraries_dir: PathBuf, licenses_dir: PathBuf, config: &OutputConfig) -> Self {
        Self {
            libraries_dir,
            licenses_dir,
            prefix: config.generated_prefix.clone(),
            write_plain_text: config.write_plain_text,
        }
    }

    /// `<prefix><unique id>.json`. When sanitizing changed the id, a short
    /// hash of the original id keeps distinct libraries in distinct files.
    pub fn library_file(&self, library: &LibraryModel) -> PathBuf {
        let safe = sanitize(&library.unique_id);
        let stem = if safe == library.unique_id {
            safe
        } else {
            format!("{safe}_{}", &content_hash(&library.unique_id)[..8])
        };
        self.libraries_dir.join(format!("{}{stem}.json", self.prefix))
    }

    /// `<prefix><name>_<hash>.<ext>`
    pub fn license_file(&self, license: &StoredLicense, ext: &str) -> PathBuf {
        self.licenses_dir.join(format!(
            "{}{}_{}.{ext}",
            self.prefix,
            sanitize(&license.model.name),
            license.model.hash
        ))
    }
}

#[derive(Debug, Default, Clone, Serialize)]
pub struct WriteSummary {
    pub removed: usize,
    pub written: usize,
}

#[derive(Serialize)]
struct LicenseRecord<'a> {
    name: &'a str,
    hash: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    spdx_id: Option<&'a str>,
    content: &'a str,
}

/// Replace all generated files in both directories with the catalog's contents.
pub fn reconcile(catalog: &Catalog, layout: &OutputLayout) -> Result<WriteSummary> {
    let mut summary = WriteSummary::default();

    for dir in [&layout.libraries_dir, &layout.licenses_dir] {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("creating output directory {}", dir.display()))?;
        summary.removed += remove_generated(dir, &layout.prefix)?;
    }

    for library in catalog.libraries() {
        write_json(&layout.library_file(library), library)?;
        summary.written += 1;
    }

    for license in catalog.licenses() {
        let record = LicenseRecord {
            name: &license.model.name,
            hash: &license.model.hash,
            spdx_id: license.spdx_id.as_deref(),
            content: &license.model.content,
        };
        write_json(&layout.license_file(license, "json"), &record)?;
        summary.written += 1;

        if layout.write_plain_text {
            let txt = layout.license_file(license, "txt");
            std::fs::write(&txt, format!("{}\n", license.model.content))
                .with_context(|| format!("writing {}", txt.display()))?;
            summary.written += 1;
        }
    }

    tracing::info!(
        removed = summary.removed,
        written = summary.written,
        "output reconciled"
    );
    Ok(summary)
}

/// Delete every regular file in `dir` whose name starts with `prefix`.
fn remove_generated(dir: &Path, prefix: &str) -> Result<usize> {
    let mut removed = 0;
    for entry in std::fs::read_dir(dir).with_context(|| format!("listing {}", dir.display()))? {
        let entry = entry?;
        if !entry.file_type()?.is_file() {
            continue;
        }
        if entry.file_name().to_string_lossy().starts_with(prefix) {
            std::fs::remove_file(entry.path())
                .with_context(|| format!("removing {}", entry.path().display()))?;
            tracing::debug!(path = %entry.path().display(), "removed generated file");
            removed += 1;
        }
    }
    Ok(removed)
}

fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let body = serde_json::to_string_pretty(value)?;
    std::fs::write(path, format!("{body}\n"))
        .with_context(|| format!("writing {}", path.display()))
}

/// Keep `[A-Za-z0-9._-]`, replace everything else with `_`.
pub fn sanitize(name: &str) -> String {
    name.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-') {
                c
            } else {
                '_'
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::license::classifier::ExtractedLicense;
    use std::collections::BTreeMap;
    use tempfile::TempDir;

    fn lic(name: &str, content: &str) -> ExtractedLicense {
        ExtractedLicense {
            name: name.to_string(),
            spdx_id: Some("MIT".to_string()),
            content: content.to_string(),
        }
    }

    fn sample_catalog() -> Catalog {
        let mut catalog = Catalog::new("bundled");
        catalog.add_library("Okio", &[lic("MIT License", "mit text"), lic("Okio license", "")]);
        catalog.add_library("Gson / Core", &[lic("MIT License", "mit text")]);
        catalog
    }

    fn layout(root: &Path, plain: bool) -> OutputLayout {
        OutputLayout {
            libraries_dir: root.join("libraries"),
            licenses_dir: root.join("licenses"),
            prefix: "gen_".to_string(),
            write_plain_text: plain,
        }
    }

    fn snapshot(root: &Path) -> BTreeMap<String, Vec<u8>> {
        let mut files = BTreeMap::new();
        for sub in ["libraries", "licenses"] {
            for entry in std::fs::read_dir(root.join(sub)).unwrap() {
                let entry = entry.unwrap();
                let key = format!("{sub}/{}", entry.file_name().to_string_lossy());
                files.insert(key, std::fs::read(entry.path()).unwrap());
            }
        }
        files
    }

    #[test]
    fn test_writes_expected_files() {
        let dir = TempDir::new().unwrap();
        let layout = layout(dir.path(), true);
        let summary = reconcile(&sample_catalog(), &layout).unwrap();

        // 2 libraries + 2 licenses × (json + txt)
        assert_eq!(summary.written, 6);
        assert!(dir.path().join("libraries/gen_bundled.okio.json").exists());
        let gson = layout.library_file(&sample_catalog().libraries()[1]);
        assert!(gson
            .file_name()
            .unwrap()
            .to_string_lossy()
            .starts_with("gen_bundled.gson___core_"));
        assert!(gson.exists());

        let okio: LibraryModel = serde_json::from_str(
            &std::fs::read_to_string(dir.path().join("libraries/gen_bundled.okio.json")).unwrap(),
        )
        .unwrap();
        assert_eq!(okio.name, "Okio");
        assert_eq!(okio.licenses.len(), 2);

        let stem = format!("licenses/gen_MIT_License_{}", okio.licenses[0]);
        let txt = std::fs::read_to_string(dir.path().join(format!("{stem}.txt"))).unwrap();
        assert_eq!(txt, "mit text\n");
        let json = std::fs::read_to_string(dir.path().join(format!("{stem}.json"))).unwrap();
        assert!(json.contains("\"spdx_id\": \"MIT\""));
    }

    #[test]
    fn test_plain_text_can_be_disabled() {
        let dir = TempDir::new().unwrap();
        let summary = reconcile(&sample_catalog(), &layout(dir.path(), false)).unwrap();
        assert_eq!(summary.written, 4);
        let any_txt = snapshot(dir.path()).keys().any(|k| k.ends_with(".txt"));
        assert!(!any_txt);
    }

    #[test]
    fn test_stale_generated_files_are_removed() {
        let dir = TempDir::new().unwrap();
        let layout = layout(dir.path(), true);
        std::fs::create_dir_all(&layout.libraries_dir).unwrap();
        let stale = layout.libraries_dir.join("gen_bundled.retired_library.json");
        std::fs::write(&stale, "{}").unwrap();

        let summary = reconcile(&sample_catalog(), &layout).unwrap();
        assert_eq!(summary.removed, 1);
        assert!(!stale.exists());
    }

    #[test]
    fn test_hand_authored_files_untouched() {
        let dir = TempDir::new().unwrap();
        let layout = layout(dir.path(), true);
        std::fs::create_dir_all(&layout.licenses_dir).unwrap();
        let manual = layout.licenses_dir.join("custom_license.json");
        std::fs::write(&manual, "{\"name\": \"mine\"}").unwrap();
        let generated_dir = layout.licenses_dir.join("gen_keep_me");
        std::fs::create_dir_all(&generated_dir).unwrap();

        reconcile(&sample_catalog(), &layout).unwrap();
        reconcile(&sample_catalog(), &layout).unwrap();

        assert_eq!(std::fs::read_to_string(&manual).unwrap(), "{\"name\": \"mine\"}");
        assert!(generated_dir.is_dir());
    }

    #[test]
    fn test_second_run_is_identical() {
        let dir = TempDir::new().unwrap();
        let layout = layout(dir.path(), true);

        reconcile(&sample_catalog(), &layout).unwrap();
        let first = snapshot(dir.path());
        let summary = reconcile(&sample_catalog(), &layout).unwrap();
        let second = snapshot(dir.path());

        assert_eq!(first, second);
        assert_eq!(summary.removed, 6);
    }

    #[test]
    fn test_dotted_license_names_keep_full_name() {
        let dir = TempDir::new().unwrap();
        let mut catalog = Catalog::new("bundled");
        catalog.add_library("Dagger", &[lic("Apache License 2.0", "apache text")]);
        reconcile(&catalog, &layout(dir.path(), true)).unwrap();

        let hash = &catalog.licenses()[0].model.hash;
        let json = dir
            .path()
            .join(format!("licenses/gen_Apache_License_2.0_{hash}.json"));
        assert!(json.exists());
    }

    #[test]
    fn test_names_differing_only_in_unsafe_chars_get_own_files() {
        let dir = TempDir::new().unwrap();
        let layout = layout(dir.path(), false);
        let mut catalog = Catalog::new("bundled");
        catalog.add_library("a/b", &[lic("MIT License", "mit text")]);
        catalog.add_library("a:b", &[lic("MIT License", "mit text")]);
        reconcile(&catalog, &layout).unwrap();

        let files: Vec<_> = std::fs::read_dir(&layout.libraries_dir).unwrap().collect();
        assert_eq!(files.len(), 2);
        for library in catalog.libraries() {
            let written: LibraryModel = serde_json::from_str(
                &std::fs::read_to_string(layout.library_file(library)).unwrap(),
            )
            .unwrap();
            assert_eq!(written.unique_id, library.unique_id);
        }
    }

    #[test]
    fn test_sanitize() {
        assert_eq!(sanitize("bundled.protocol_buffers"), "bundled.protocol_buffers");
        assert_eq!(sanitize("Apache License 2.0"), "Apache_License_2.0");
        assert_eq!(sanitize("a/b:c"), "a_b_c");
    }
}

//! Locating the artifact file backing a coordinate.
//!
//! The pipeline only depends on [`ArtifactResolver`]; [`MavenRepositoryResolver`]
//! is the stock implementation over local Maven-layout repositories.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use quick_xml::events::Event;
use quick_xml::Reader;

use crate::models::ArtifactInfo;

pub trait ArtifactResolver: Send + Sync {
    /// `Ok(None)` when no file backs the coordinate.
    fn resolve(&self, artifact: &ArtifactInfo) -> Result<Option<PathBuf>>;
}

/// Searches `<root>/<group path>/<name>/<version>/<name>-<version>.<ext>` in
/// each root, in order.
pub struct MavenRepositoryResolver {
    roots: Vec<PathBuf>,
}

impl MavenRepositoryResolver {
    pub fn new(roots: Vec<PathBuf>) -> Self {
        Self { roots }
    }
}

impl ArtifactResolver for MavenRepositoryResolver {
    fn resolve(&self, artifact: &ArtifactInfo) -> Result<Option<PathBuf>> {
        let group_path = artifact.group.replace('.', "/");
        let stem = format!("{}-{}", artifact.name, artifact.version);

        for root in &self.roots {
            let dir = root
                .join(&group_path)
                .join(&artifact.name)
                .join(&artifact.version);
            if !dir.is_dir() {
                continue;
            }

            let pom = dir.join(format!("{stem}.pom"));
            let extensions: Vec<&str> = if pom.exists() {
                match read_packaging(&pom)? {
                    Some(packaging) => vec![extension_for(&packaging)],
                    None => vec!["jar"],
                }
            } else {
                vec!["aar", "jar"]
            };

            for ext in extensions {
                let candidate = dir.join(format!("{stem}.{ext}"));
                if candidate.is_file() {
                    return Ok(Some(candidate));
                }
            }
        }

        Ok(None)
    }
}

fn extension_for(packaging: &str) -> &'static str {
    match packaging {
        "aar" => "aar",
        _ => "jar",
    }
}

/// Read the project-level `<packaging>` from a POM file.
fn read_packaging(path: &Path) -> Result<Option<String>> {
    let xml = std::fs::read_to_string(path)
        .with_context(|| format!("reading {}", path.display()))?;
    Ok(extract_packaging(&xml))
}

fn extract_packaging(xml: &str) -> Option<String> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut buf = Vec::new();
    let mut depth: u32 = 0;
    let mut in_packaging = false;

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(ref e)) => {
                depth += 1;
                let tag = String::from_utf8_lossy(e.name().local_name().as_ref()).into_owned();
                // Only <project><packaging>, not plugin or dependency children.
                in_packaging = depth == 2 && tag == "packaging";
            }
            Ok(Event::Text(ref e)) if in_packaging => {
                if let Ok(text) = e.unescape() {
                    return Some(text.trim().to_string());
                }
            }
            Ok(Event::End(_)) => {
                depth = depth.saturating_sub(1);
                in_packaging = false;
            }
            Ok(Event::Eof) => break,
            Err(_) => break,
            _ => {}
        }
        buf.clear();
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn artifact_dir(root: &Path, a: &ArtifactInfo) -> PathBuf {
        let dir = root
            .join(a.group.replace('.', "/"))
            .join(&a.name)
            .join(&a.version);
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn test_extract_packaging_ignores_nested_tags() {
        let xml = r#"<?xml version="1.0"?>
<project>
  <build><plugins><plugin><packaging>war</packaging></plugin></plugins></build>
  <packaging>aar</packaging>
</project>"#;
        assert_eq!(extract_packaging(xml), Some("aar".to_string()));
    }

    #[test]
    fn test_extract_packaging_missing() {
        assert_eq!(extract_packaging("<project><artifactId>x</artifactId></project>"), None);
    }

    #[test]
    fn test_resolves_aar_from_pom_packaging() {
        let root = TempDir::new().unwrap();
        let a = ArtifactInfo::new("com.google.android.gms", "play-services-base", "18.1.0");
        let dir = artifact_dir(root.path(), &a);
        std::fs::write(
            dir.join("play-services-base-18.1.0.pom"),
            "<project><packaging>aar</packaging></project>",
        )
        .unwrap();
        std::fs::write(dir.join("play-services-base-18.1.0.aar"), b"PK").unwrap();

        let resolver = MavenRepositoryResolver::new(vec![root.path().to_path_buf()]);
        let found = resolver.resolve(&a).unwrap().unwrap();
        assert!(found.ends_with("play-services-base-18.1.0.aar"));
    }

    #[test]
    fn test_falls_back_to_jar_without_pom() {
        let root = TempDir::new().unwrap();
        let a = ArtifactInfo::new("com.google.firebase", "firebase-license", "1.0");
        let dir = artifact_dir(root.path(), &a);
        std::fs::write(dir.join("firebase-license-1.0.jar"), b"PK").unwrap();

        let resolver = MavenRepositoryResolver::new(vec![root.path().to_path_buf()]);
        let found = resolver.resolve(&a).unwrap().unwrap();
        assert!(found.ends_with("firebase-license-1.0.jar"));
    }

    #[test]
    fn test_searches_roots_in_order() {
        let first = TempDir::new().unwrap();
        let second = TempDir::new().unwrap();
        let a = ArtifactInfo::new("com.google.firebase", "firebase-common", "20.0.0");
        let dir = artifact_dir(second.path(), &a);
        std::fs::write(dir.join("firebase-common-20.0.0.aar"), b"PK").unwrap();

        let resolver = MavenRepositoryResolver::new(vec![
            first.path().to_path_buf(),
            second.path().to_path_buf(),
        ]);
        assert!(resolver.resolve(&a).unwrap().is_some());
    }

    #[test]
    fn test_unresolved_is_none() {
        let root = TempDir::new().unwrap();
        let resolver = MavenRepositoryResolver::new(vec![root.path().to_path_buf()]);
        let a = ArtifactInfo::new("com.google.firebase", "missing", "1.0");
        assert!(resolver.resolve(&a).unwrap().is_none());
    }
}

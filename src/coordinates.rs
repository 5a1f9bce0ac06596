use std::collections::HashSet;
use std::path::Path;

use anyhow::{Context, Result};
use regex::Regex;

use crate::config::FilterConfig;
use crate::models::ArtifactInfo;

/// Read a dependency list file — one `group:name:version` per line.
pub fn read_dependency_list(path: &Path) -> Result<Vec<ArtifactInfo>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("reading dependency list {}", path.display()))?;
    parse_dependency_list(&content)
}

/// Parse coordinates, one per line.
///
/// Also accepts `gradle.lockfile` lines (`group:name:version=configurations`).
/// Blank lines and `#` comments are ignored; anything else that is not exactly
/// three colon-separated fields is skipped with a warning. Repeated coordinates
/// keep their first position.
pub fn parse_dependency_list(content: &str) -> Result<Vec<ArtifactInfo>> {
    let re = Regex::new(r"^([^:\s]+):([^:\s]+):([^:=\s]+)(?:=\S*)?$")?;
    let mut seen: HashSet<ArtifactInfo> = HashSet::new();
    let mut out = Vec::new();

    for (lineno, line) in content.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        // Lockfile trailer, e.g. `empty=annotationProcessor`
        if !line.contains(':') && line.contains('=') {
            continue;
        }
        match re.captures(line) {
            Some(caps) => {
                let artifact = ArtifactInfo::new(&caps[1], &caps[2], &caps[3]);
                if seen.insert(artifact.clone()) {
                    out.push(artifact);
                }
            }
            None => {
                tracing::warn!(line = lineno + 1, text = line, "ignoring malformed coordinate");
            }
        }
    }

    Ok(out)
}

/// Decides which coordinates are aggregated license containers worth opening.
pub struct CoordinateFilter {
    groups: Vec<String>,
    granular_base_version: u64,
    license_suffix: String,
}

impl CoordinateFilter {
    pub fn new(config: &FilterConfig) -> Self {
        Self {
            groups: config.groups.clone(),
            granular_base_version: config.granular_base_version,
            license_suffix: config.license_suffix.clone(),
        }
    }

    /// The group is on the allow-list (case-insensitive exact match).
    pub fn is_candidate(&self, artifact: &ArtifactInfo) -> bool {
        self.groups
            .iter()
            .any(|g| g.eq_ignore_ascii_case(&artifact.group))
    }

    /// A candidate that uses the granular format or is a dedicated license artifact.
    pub fn should_open(&self, artifact: &ArtifactInfo) -> bool {
        if !self.is_candidate(artifact) {
            return false;
        }
        let granular = leading_version_number(&artifact.version)
            .is_some_and(|major| major >= self.granular_base_version);
        granular || artifact.name.ends_with(&self.license_suffix)
    }

    /// Keep the coordinates to open, in input order.
    pub fn select(&self, artifacts: &[ArtifactInfo]) -> Vec<ArtifactInfo> {
        artifacts
            .iter()
            .filter(|a| {
                let open = self.should_open(a);
                if !open {
                    tracing::debug!(coordinate = %a, "not a license container");
                }
                open
            })
            .cloned()
            .collect()
    }
}

/// Leading integer of a version string: `"17.0.1"` → 17, `"beta"` → `None`.
/// Values too large for `u64` saturate.
fn leading_version_number(version: &str) -> Option<u64> {
    let digits: String = version
        .trim()
        .chars()
        .take_while(|c| c.is_ascii_digit())
        .collect();
    if digits.is_empty() {
        return None;
    }
    Some(digits.parse().unwrap_or(u64::MAX))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn filter() -> CoordinateFilter {
        CoordinateFilter::new(&FilterConfig::default())
    }

    #[test]
    fn test_parse_plain_and_lockfile_lines() {
        let content = r#"
# resolved runtime classpath
com.google.android.gms:play-services-base:18.1.0
com.google.firebase:firebase-common:20.3.2=debugRuntimeClasspath,releaseRuntimeClasspath
androidx.core:core:1.9.0
empty=annotationProcessor
"#;
        let deps = parse_dependency_list(content).unwrap();
        assert_eq!(deps.len(), 3);
        assert_eq!(deps[1].group, "com.google.firebase");
        assert_eq!(deps[1].name, "firebase-common");
        assert_eq!(deps[1].version, "20.3.2");
    }

    #[test]
    fn test_parse_skips_malformed_and_duplicates() {
        let content = "a:b\na:b:c:d\ng:n:1.0\ng:n:1.0\n::1\n";
        let deps = parse_dependency_list(content).unwrap();
        assert_eq!(deps, vec![ArtifactInfo::new("g", "n", "1.0")]);
    }

    #[test]
    fn test_read_dependency_list_file() {
        let mut f = NamedTempFile::new().unwrap();
        writeln!(f, "com.google.android.gms:play-services-ads:22.0.0").unwrap();
        let deps = read_dependency_list(f.path()).unwrap();
        assert_eq!(deps.len(), 1);
    }

    #[test]
    fn test_group_allow_list_is_case_insensitive() {
        let f = filter();
        assert!(f.is_candidate(&ArtifactInfo::new("COM.Google.Firebase", "x", "20.0.0")));
        assert!(!f.is_candidate(&ArtifactInfo::new("com.google.firebase.extra", "x", "20.0.0")));
    }

    #[test]
    fn test_granular_threshold() {
        let f = filter();
        assert!(f.should_open(&ArtifactInfo::new("com.google.android.gms", "play-services-base", "14.0.0")));
        assert!(f.should_open(&ArtifactInfo::new("com.google.android.gms", "play-services-base", "18.1.0")));
        assert!(!f.should_open(&ArtifactInfo::new("com.google.android.gms", "play-services-base", "12.0.1")));
    }

    #[test]
    fn test_license_suffix_bypasses_version_check() {
        let f = filter();
        assert!(f.should_open(&ArtifactInfo::new("com.google.android.gms", "play-services-base-license", "12.0.1")));
    }

    #[test]
    fn test_malformed_version_fails_granular_check() {
        let f = filter();
        assert!(!f.should_open(&ArtifactInfo::new("com.google.firebase", "firebase-core", "latest")));
        assert!(f.should_open(&ArtifactInfo::new("com.google.firebase", "firebase-core-license", "latest")));
    }

    #[test]
    fn test_select_keeps_input_order() {
        let input = vec![
            ArtifactInfo::new("com.google.firebase", "b", "20.0.0"),
            ArtifactInfo::new("org.example", "x", "99.0"),
            ArtifactInfo::new("com.google.android.gms", "a", "17.0.0"),
        ];
        let picked = filter().select(&input);
        assert_eq!(picked.len(), 2);
        assert_eq!(picked[0].name, "b");
        assert_eq!(picked[1].name, "a");
    }

    #[test]
    fn test_leading_version_number() {
        assert_eq!(leading_version_number("17.0.1"), Some(17));
        assert_eq!(leading_version_number("9-beta"), Some(9));
        assert_eq!(leading_version_number("v1"), None);
        assert_eq!(leading_version_number(""), None);
        assert_eq!(leading_version_number("99999999999999999999999.1"), Some(u64::MAX));
    }

    #[test]
    fn test_huge_version_is_granular() {
        let f = filter();
        assert!(f.should_open(&ArtifactInfo::new("com.google.firebase", "firebase-core", "123456789012345678901234567890")));
    }
}

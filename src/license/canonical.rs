use sha2::{Digest, Sha256};

/// Collapse a license body to one line: blank lines dropped, every other line
/// trimmed, joined with single spaces.
pub fn canonicalize(content: &str) -> String {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Lowercase hex SHA-256 of an already canonical string.
pub fn content_hash(canonical: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(canonical.as_bytes());
    hex::encode(hasher.finalize())
}

use serde::Deserialize;
use serde_json::Value;

use crate::error::{ArchiveError, SegmentError};
use crate::models::LicenseIndexEntry;

#[derive(Deserialize)]
struct Offsets {
    start: usize,
    length: usize,
}

/// Parse the index document: `{"<library>": {"start": n, "length": n}, ...}`.
///
/// Entries come back in document order. A document that is not a JSON object
/// fails as a whole; a single bad value only fails its own entry.
pub fn parse_index(
    bytes: &[u8],
) -> Result<Vec<Result<LicenseIndexEntry, SegmentError>>, ArchiveError> {
    let value: Value = serde_json::from_slice(bytes)?;
    let Value::Object(map) = value else {
        return Err(ArchiveError::IndexNotObject);
    };

    Ok(map
        .into_iter()
        .map(|(library_name, v)| match serde_json::from_value::<Offsets>(v) {
            Ok(o) => Ok(LicenseIndexEntry {
                library_name,
                start: o.start,
                length: o.length,
            }),
            Err(e) => Err(SegmentError::Malformed {
                library: library_name,
                detail: e.to_string(),
            }),
        })
        .collect())
}

/// The decoded text blob, addressable by char offsets.
pub struct TextBlob {
    text: String,
    /// Byte offset of every char, plus `text.len()` as the end sentinel.
    bounds: Vec<usize>,
}

impl TextBlob {
    pub fn new(bytes: &[u8]) -> Self {
        let text = String::from_utf8_lossy(bytes).into_owned();
        let bounds = text
            .char_indices()
            .map(|(i, _)| i)
            .chain(std::iter::once(text.len()))
            .collect();
        Self { text, bounds }
    }

    pub fn char_len(&self) -> usize {
        self.bounds.len() - 1
    }

    /// `blob[start .. start + length]`, in chars.
    pub fn section(&self, entry: &LicenseIndexEntry) -> Result<&str, SegmentError> {
        let out_of_range = || SegmentError::OutOfRange {
            library: entry.library_name.clone(),
            start: entry.start,
            length: entry.length,
            blob_len: self.char_len(),
        };
        let end = entry
            .start
            .checked_add(entry.length)
            .ok_or_else(out_of_range)?;
        if end > self.char_len() {
            return Err(out_of_range());
        }
        Ok(&self.text[self.bounds[entry.start]..self.bounds[end]])
    }
}

//! Reading the index document and text blob out of a license container.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};

use zip::result::ZipError;
use zip::ZipArchive;

use crate::config::ArchiveConfig;
use crate::error::ArchiveError;

/// Named-entry access to one opened archive.
pub trait EntrySource {
    /// `Ok(None)` when the archive has no entry by that name.
    fn read_entry(&mut self, name: &str) -> Result<Option<Vec<u8>>, ArchiveError>;
}

pub trait ArchiveOpener: Send + Sync {
    fn open(&self, path: &Path) -> Result<Box<dyn EntrySource>, ArchiveError>;
}

/// Opens AAR/JAR files as ZIP archives.
pub struct ZipOpener;

struct ZipEntries {
    path: PathBuf,
    archive: ZipArchive<BufReader<File>>,
}

impl ArchiveOpener for ZipOpener {
    fn open(&self, path: &Path) -> Result<Box<dyn EntrySource>, ArchiveError> {
        let file = File::open(path).map_err(|source| ArchiveError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let archive = ZipArchive::new(BufReader::new(file)).map_err(|source| ArchiveError::Zip {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Box::new(ZipEntries {
            path: path.to_path_buf(),
            archive,
        }))
    }
}

impl EntrySource for ZipEntries {
    fn read_entry(&mut self, name: &str) -> Result<Option<Vec<u8>>, ArchiveError> {
        match self.archive.by_name(name) {
            Ok(mut entry) => {
                let mut buf = Vec::new();
                entry.read_to_end(&mut buf).map_err(|source| ArchiveError::Io {
                    path: self.path.clone(),
                    source,
                })?;
                Ok(Some(buf))
            }
            Err(ZipError::FileNotFound) => Ok(None),
            Err(source) => Err(ArchiveError::Zip {
                path: self.path.clone(),
                source,
            }),
        }
    }
}

/// The two raw entries of a license container.
#[derive(Debug)]
pub struct RawPayload {
    pub index: Vec<u8>,
    pub text: Vec<u8>,
}

/// Open `path` and pull out both license entries.
///
/// `Ok(None)` if either entry is absent: the artifact simply carries no
/// license payload.
pub fn read_payload(
    opener: &dyn ArchiveOpener,
    path: &Path,
    names: &ArchiveConfig,
) -> Result<Option<RawPayload>, ArchiveError> {
    let mut entries = opener.open(path)?;
    let Some(index) = entries.read_entry(&names.index_entry)? else {
        return Ok(None);
    };
    let Some(text) = entries.read_entry(&names.text_entry)? else {
        return Ok(None);
    };
    Ok(Some(RawPayload { index, text }))
}

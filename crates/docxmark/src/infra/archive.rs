//! Read-only access to parts inside a document container.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use zip::ZipArchive;
use zip::result::ZipError;

use crate::domain::errors::ExtractError;

/// Internal path of the main document body.
pub const BODY_PART: &str = "word/document.xml";

/// Read the main body part of the container at `path`.
pub fn read_body_part(path: &Path) -> Result<String, ExtractError> {
    read_part(path, BODY_PART)
}

/// Read `part` from the container at `path` and decode it as UTF-8.
///
/// The archive is closed before returning, whatever the outcome.
pub fn read_part(path: &Path, part: &str) -> Result<String, ExtractError> {
    tracing::debug!(path = %path.display(), part, "opening document archive");

    let file = File::open(path).map_err(|err| ExtractError::unreadable(path, err))?;
    let mut archive =
        ZipArchive::new(BufReader::new(file)).map_err(|err| ExtractError::unreadable(path, err))?;

    let mut entry = match archive.by_name(part) {
        Ok(entry) => entry,
        Err(ZipError::FileNotFound) => {
            return Err(ExtractError::PartMissing {
                path: path.to_path_buf(),
                part: part.to_owned(),
            });
        }
        Err(err) => return Err(ExtractError::unreadable(path, err)),
    };

    let mut contents = String::new();
    entry
        .read_to_string(&mut contents)
        .map_err(|err| ExtractError::unreadable(path, err))?;
    Ok(contents)
}

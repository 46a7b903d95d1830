//! Fixture builders shared by unit tests.

use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::Result;
use zip::ZipWriter;
use zip::write::SimpleFileOptions;

use crate::domain::markup::WORDML_NS;
use crate::infra::archive::BODY_PART;

const CONTENT_TYPES: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"><Override PartName="/word/document.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.document.main+xml"/></Types>"#;

/// Wrap paragraph markup in a `w:document/w:body` envelope.
pub fn body_xml(paragraphs: &str) -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><w:document xmlns:w="{WORDML_NS}"><w:body>{paragraphs}</w:body></w:document>"#
    )
}

/// A paragraph holding one run, highlighted with `color` when given.
pub fn run(color: Option<&str>, text: &str) -> String {
    let props = color
        .map(|color| format!(r#"<w:rPr><w:highlight w:val="{color}"/></w:rPr>"#))
        .unwrap_or_default();
    format!(r#"<w:p><w:r>{props}<w:t xml:space="preserve">{text}</w:t></w:r></w:p>"#)
}

pub fn write_zip(dir: &Path, name: &str, entries: &[(&str, &[u8])]) -> Result<PathBuf> {
    let path = dir.join(name);
    let mut zip = ZipWriter::new(File::create(&path)?);
    let options = SimpleFileOptions::default();
    for (entry, data) in entries {
        zip.start_file(*entry, options)?;
        zip.write_all(data)?;
    }
    zip.finish()?;
    Ok(path)
}

pub fn write_docx(dir: &Path, name: &str, document_xml: &str) -> Result<PathBuf> {
    write_zip(
        dir,
        name,
        &[
            ("[Content_Types].xml", CONTENT_TYPES.as_bytes()),
            (BODY_PART, document_xml.as_bytes()),
        ],
    )
}

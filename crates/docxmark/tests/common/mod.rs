#![allow(dead_code)]

use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

use docxmark::domain::markup::WORDML_NS;
use zip::ZipWriter;
use zip::write::SimpleFileOptions;

pub fn body_xml(paragraphs: &str) -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><w:document xmlns:w="{WORDML_NS}"><w:body>{paragraphs}</w:body></w:document>"#
    )
}

pub fn highlighted(color: &str, text: &str) -> String {
    format!(
        r#"<w:p><w:r><w:rPr><w:highlight w:val="{color}"/></w:rPr><w:t xml:space="preserve">{text}</w:t></w:r></w:p>"#
    )
}

pub fn plain(text: &str) -> String {
    format!(r#"<w:p><w:r><w:t>{text}</w:t></w:r></w:p>"#)
}

pub fn write_zip(dir: &Path, name: &str, entries: &[(&str, &str)]) -> PathBuf {
    let path = dir.join(name);
    let file = File::create(&path).expect("create fixture");
    let mut zip = ZipWriter::new(file);
    for (entry, data) in entries {
        zip.start_file(*entry, SimpleFileOptions::default())
            .expect("start entry");
        zip.write_all(data.as_bytes()).expect("write entry");
    }
    zip.finish().expect("finish zip");
    path
}

pub fn write_docx(dir: &Path, name: &str, paragraphs: &str) -> PathBuf {
    let xml = body_xml(paragraphs);
    write_zip(dir, name, &[("word/document.xml", xml.as_str())])
}

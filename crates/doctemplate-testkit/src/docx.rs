//! Minimal Word packages for tests
//!
//! [`DocxBuilder`] writes the smallest package Word itself would open: content
//! types, root relationships and a `word/document.xml` wrapping the given body.

use std::io::{Read, Write};
use std::path::Path;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipArchive, ZipWriter};

pub const CONTENT_TYPES: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"><Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/><Default Extension="xml" ContentType="application/xml"/><Override PartName="/word/document.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.document.main+xml"/></Types>"#;

pub const ROOT_RELS: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="word/document.xml"/></Relationships>"#;

/// Wrap paragraph content in a `w:document`
pub fn document_xml(body: &str) -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main"><w:body><w:p><w:r>{body}</w:r></w:p></w:body></w:document>"#
    )
}

/// Builder for a `.docx` package
#[derive(Debug, Default)]
pub struct DocxBuilder {
    body: String,
    extra_parts: Vec<(String, Vec<u8>)>,
}

impl DocxBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run content placed inside the single paragraph, e.g. `<w:t>Hi !name!</w:t>`
    pub fn body(mut self, body: &str) -> Self {
        self.body = body.to_string();
        self
    }

    /// Additional part stored as-is
    pub fn part(mut self, name: &str, content: &[u8]) -> Self {
        self.extra_parts.push((name.to_string(), content.to_vec()));
        self
    }

    /// Write the package to `path`
    ///
    /// # Panics
    ///
    /// Panics if the file cannot be written.
    pub fn write(&self, path: &Path) {
        let document = document_xml(&self.body);
        let mut parts: Vec<(&str, &[u8])> = vec![
            ("[Content_Types].xml", CONTENT_TYPES.as_bytes()),
            ("_rels/.rels", ROOT_RELS.as_bytes()),
            ("word/document.xml", document.as_bytes()),
        ];
        for (name, content) in &self.extra_parts {
            parts.push((name.as_str(), content.as_slice()));
        }
        build_package(path, &parts);
    }
}

/// Write a zip package containing exactly `parts`
///
/// # Panics
///
/// Panics if the file cannot be written.
pub fn build_package(path: &Path, parts: &[(&str, &[u8])]) {
    let file = std::fs::File::create(path)
        .unwrap_or_else(|e| panic!("Failed to create {}: {}", path.display(), e));
    let mut zip = ZipWriter::new(file);
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

    for (name, content) in parts {
        zip.start_file(*name, options)
            .unwrap_or_else(|e| panic!("Failed to add {}: {}", name, e));
        zip.write_all(content)
            .unwrap_or_else(|e| panic!("Failed to write {}: {}", name, e));
    }

    zip.finish().expect("Failed to finish package");
}

/// Bytes of one part of the package at `path`
///
/// # Panics
///
/// Panics if the package or the part cannot be read.
pub fn read_part(path: &Path, name: &str) -> Vec<u8> {
    let file = std::fs::File::open(path)
        .unwrap_or_else(|e| panic!("Failed to open {}: {}", path.display(), e));
    let mut archive = ZipArchive::new(file).expect("Failed to read package");
    let mut part = archive
        .by_name(name)
        .unwrap_or_else(|e| panic!("Part {} missing: {}", name, e));

    let mut content = Vec::new();
    part.read_to_end(&mut content)
        .unwrap_or_else(|e| panic!("Failed to read {}: {}", name, e));
    content
}

/// `word/document.xml` of the package at `path`, as text
pub fn read_document_xml(path: &Path) -> String {
    String::from_utf8(read_part(path, "word/document.xml")).expect("document.xml is not UTF-8")
}

/// Names of all parts, in archive order
pub fn part_names(path: &Path) -> Vec<String> {
    let file = std::fs::File::open(path)
        .unwrap_or_else(|e| panic!("Failed to open {}: {}", path.display(), e));
    let archive = ZipArchive::new(file).expect("Failed to read package");
    archive.file_names().map(str::to_string).collect()
}

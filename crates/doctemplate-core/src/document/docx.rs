//! Word packages (`.docx` and friends)
//!
//! The body is the XML of the package's main document part. Writing produces a
//! copy of the source package where only that part is replaced; every other part
//! is raw-copied without recompression.

use quick_xml::events::Event;
use quick_xml::Reader;
use std::fs::File;
use std::io::{Cursor, Read, Seek, Write};
use std::path::{Path, PathBuf};
use zip::write::FileOptions;
use zip::{CompressionMethod, ZipArchive, ZipWriter};

use super::{Document, ValueEncoding};
use crate::error::{DoctemplateError, Result};

/// Package relationships of the root
const ROOT_RELS_PART: &str = "_rels/.rels";

/// Used when the root relationships do not name a main part
const DEFAULT_MAIN_PART: &str = "word/document.xml";

/// Relationship type URIs of the main part end with this segment
const OFFICE_DOCUMENT_SUFFIX: &str = "/officeDocument";

pub struct DocxDocument {
    path: PathBuf,
}

impl DocxDocument {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn read_error(&self, reason: impl ToString) -> DoctemplateError {
        DoctemplateError::DocumentReadFailed {
            path: self.path.clone(),
            reason: reason.to_string(),
        }
    }

    fn open_archive(&self) -> Result<ZipArchive<File>> {
        let file = File::open(&self.path).map_err(|e| self.read_error(e))?;
        ZipArchive::new(file).map_err(|e| self.read_error(format!("not a Word package: {}", e)))
    }

    /// Name of the main document part, e.g. `word/document.xml`
    pub fn main_part(&self) -> Result<String> {
        let mut archive = self.open_archive()?;
        find_main_part(&mut archive).map_err(|e| self.read_error(e))
    }
}

impl Document for DocxDocument {
    fn path(&self) -> &Path {
        &self.path
    }

    fn read_text(&self) -> Result<String> {
        let mut archive = self.open_archive()?;
        let main_part = find_main_part(&mut archive).map_err(|e| self.read_error(e))?;

        let mut file = archive
            .by_name(&main_part)
            .map_err(|e| self.read_error(format!("{}: {}", main_part, e)))?;

        let mut xml = String::new();
        file.read_to_string(&mut xml)
            .map_err(|e| self.read_error(format!("{}: {}", main_part, e)))?;

        tracing::debug!(part = %main_part, bytes = xml.len(), "read document body");
        Ok(xml)
    }

    fn write_text(&self, destination: &Path, text: &str) -> Result<()> {
        let write_error = |reason: String| DoctemplateError::DocumentWriteFailed {
            path: destination.to_path_buf(),
            reason,
        };

        if destination == self.path {
            return Err(write_error("refusing to overwrite the template".to_string()));
        }

        let mut archive = self.open_archive()?;
        let main_part = find_main_part(&mut archive).map_err(|e| self.read_error(e))?;

        let parent = match destination.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        let temp_file = tempfile::NamedTempFile::new_in(parent)
            .map_err(|e| write_error(format!("Failed to create temp file: {}", e)))?;

        let temp_file = rewrite_package(&mut archive, &main_part, text, temp_file)
            .map_err(|e| write_error(e.to_string()))?;

        temp_file
            .persist(destination)
            .map_err(|e| write_error(format!("Failed to persist temp file: {}", e)))?;

        tracing::debug!(destination = %destination.display(), "wrote document package");
        Ok(())
    }

    fn encoding(&self) -> ValueEncoding {
        ValueEncoding::Xml
    }
}

/// Copy `archive` into `output`, replacing `main_part` with `text`
fn rewrite_package<R, W>(
    archive: &mut ZipArchive<R>,
    main_part: &str,
    text: &str,
    output: W,
) -> zip::result::ZipResult<W>
where
    R: Read + Seek,
    W: Write + Seek,
{
    let mut zip = ZipWriter::new(output);
    let options = FileOptions::<()>::default().compression_method(CompressionMethod::Deflated);

    for i in 0..archive.len() {
        let file = archive.by_index_raw(i)?;
        if file.name() == main_part {
            zip.start_file(main_part, options)?;
            zip.write_all(text.as_bytes())?;
        } else {
            zip.raw_copy_file(file)?;
        }
    }

    zip.finish()
}

/// Locate the main part through the root relationships
fn find_main_part<R: Read + Seek>(archive: &mut ZipArchive<R>) -> std::result::Result<String, String> {
    let rels = match archive.by_name(ROOT_RELS_PART) {
        Ok(mut file) => {
            let mut bytes = Vec::new();
            file.read_to_end(&mut bytes)
                .map_err(|e| format!("{}: {}", ROOT_RELS_PART, e))?;
            Some(bytes)
        }
        Err(zip::result::ZipError::FileNotFound) => None,
        Err(e) => return Err(format!("{}: {}", ROOT_RELS_PART, e)),
    };

    let target = match rels {
        Some(bytes) => office_document_target(&bytes)
            .map_err(|e| format!("{}: {}", ROOT_RELS_PART, e))?,
        None => None,
    };

    let main_part = target.unwrap_or_else(|| DEFAULT_MAIN_PART.to_string());
    if archive.index_for_name(&main_part).is_none() {
        return Err(format!("main document part '{}' is missing", main_part));
    }
    Ok(main_part)
}

/// Target of the root `officeDocument` relationship, as a part name
fn office_document_target(xml: &[u8]) -> std::result::Result<Option<String>, String> {
    let mut reader = Reader::from_reader(Cursor::new(xml));
    reader.config_mut().trim_text(true);
    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf).map_err(|e| e.to_string())? {
            Event::Start(start) | Event::Empty(start) => {
                if local_name(start.name().as_ref()).eq_ignore_ascii_case(b"Relationship") {
                    let mut target = None;
                    let mut type_uri = None;
                    for attr in start.attributes() {
                        let attr = attr.map_err(|e| e.to_string())?;
                        let key = local_name(attr.key.as_ref());
                        let value = attr.unescape_value().map_err(|e| e.to_string())?;
                        if key.eq_ignore_ascii_case(b"Target") {
                            target = Some(value.into_owned());
                        } else if key.eq_ignore_ascii_case(b"Type") {
                            type_uri = Some(value.into_owned());
                        }
                    }
                    if let (Some(target), Some(type_uri)) = (target, type_uri) {
                        if type_uri.ends_with(OFFICE_DOCUMENT_SUFFIX) {
                            return Ok(Some(normalize_part_name(&target)));
                        }
                    }
                }
            }
            Event::Eof => return Ok(None),
            _ => {}
        }
        buf.clear();
    }
}

/// Root relationship targets are relative to the package root
fn normalize_part_name(target: &str) -> String {
    let mut components: Vec<&str> = Vec::new();
    for segment in target.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                components.pop();
            }
            _ => components.push(segment),
        }
    }
    components.join("/")
}

fn local_name(name: &[u8]) -> &[u8] {
    match name.iter().rposition(|b| *b == b':') {
        Some(idx) => &name[idx + 1..],
        None => name,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use doctemplate_testkit::docx::{build_package, read_part, DocxBuilder};
    use tempfile::TempDir;

    #[test]
    fn test_read_default_main_part() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("letter.docx");
        DocxBuilder::new().body("<w:t>Hi !name!</w:t>").write(&path);

        let document = DocxDocument::new(&path);
        assert_eq!(document.main_part().unwrap(), "word/document.xml");
        assert!(document.read_text().unwrap().contains("<w:t>Hi !name!</w:t>"));
    }

    #[test]
    fn test_main_part_from_relationships() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("moved.docx");
        let rels = r#"<?xml version="1.0" encoding="UTF-8"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
  <Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="/content/main.xml"/>
</Relationships>"#;
        build_package(
            &path,
            &[
                ("_rels/.rels", rels.as_bytes()),
                ("content/main.xml", b"<doc>!x!</doc>".as_slice()),
            ],
        );

        let document = DocxDocument::new(&path);
        assert_eq!(document.main_part().unwrap(), "content/main.xml");
        assert_eq!(document.read_text().unwrap(), "<doc>!x!</doc>");
    }

    #[test]
    fn test_missing_main_part_is_read_error() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("empty.docx");
        build_package(&path, &[("other.xml", b"<x/>".as_slice())]);

        assert!(matches!(
            DocxDocument::new(&path).read_text(),
            Err(DoctemplateError::DocumentReadFailed { .. })
        ));
    }

    #[test]
    fn test_not_a_zip_is_read_error() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("fake.docx");
        std::fs::write(&path, "plain text").unwrap();

        match DocxDocument::new(&path).read_text() {
            Err(DoctemplateError::DocumentReadFailed { path: failed, .. }) => {
                assert_eq!(failed, path)
            }
            other => panic!("Expected DocumentReadFailed, got {:?}", other),
        }
    }

    #[test]
    fn test_write_replaces_only_main_part() {
        let temp = TempDir::new().unwrap();
        let source = temp.path().join("_letter.docx");
        DocxBuilder::new()
            .body("<w:t>Hi !name!</w:t>")
            .part("word/media/logo.png", &[0x89, 0x50, 0x4e, 0x47])
            .write(&source);

        let destination = temp.path().join("letter.docx");
        let document = DocxDocument::new(&source);
        let filled = document.read_text().unwrap().replace("!name!", "Alice");
        document.write_text(&destination, &filled).unwrap();

        let body = String::from_utf8(read_part(&destination, "word/document.xml")).unwrap();
        assert!(body.contains("<w:t>Hi Alice</w:t>"));
        assert_eq!(
            read_part(&destination, "word/media/logo.png"),
            vec![0x89, 0x50, 0x4e, 0x47]
        );
        assert_eq!(
            read_part(&destination, "[Content_Types].xml"),
            read_part(&source, "[Content_Types].xml")
        );

        // Source package is untouched
        let original = String::from_utf8(read_part(&source, "word/document.xml")).unwrap();
        assert!(original.contains("!name!"));
    }

    #[test]
    fn test_write_refuses_to_overwrite_source() {
        let temp = TempDir::new().unwrap();
        let source = temp.path().join("letter.docx");
        DocxBuilder::new().body("<w:t>x</w:t>").write(&source);

        assert!(matches!(
            DocxDocument::new(&source).write_text(&source, "y"),
            Err(DoctemplateError::DocumentWriteFailed { .. })
        ));
    }

    #[test]
    fn test_normalize_part_name() {
        assert_eq!(normalize_part_name("/word/document.xml"), "word/document.xml");
        assert_eq!(normalize_part_name("./word/../word/doc.xml"), "word/doc.xml");
    }
}

//! Document I/O - the body text of a template and where filled copies go
//!
//! The resolution engine treats a document as an opaque text source and sink.
//! Word packages expose the XML of their main part; anything else is read as
//! plain UTF-8 text.

mod docx;
mod output;
mod text;

pub use docx::DocxDocument;
pub use output::output_path;
pub use text::TextDocument;

use std::borrow::Cow;
use std::path::Path;

use crate::error::Result;

/// Escaping applied to substituted values before they enter the body text
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueEncoding {
    /// Values are written verbatim
    Plain,
    /// `&`, `<`, `>`, `"` and `'` become character references
    Xml,
}

impl ValueEncoding {
    pub fn encode<'a>(&self, value: &'a str) -> Cow<'a, str> {
        match self {
            ValueEncoding::Plain => Cow::Borrowed(value),
            ValueEncoding::Xml => escape_xml(value),
        }
    }
}

fn escape_xml(value: &str) -> Cow<'_, str> {
    if !value.contains(['&', '<', '>', '"', '\'']) {
        return Cow::Borrowed(value);
    }

    let mut escaped = String::with_capacity(value.len() + 16);
    for c in value.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            _ => escaped.push(c),
        }
    }
    Cow::Owned(escaped)
}

/// A template document whose body text can be read and written
pub trait Document {
    /// Path the document was opened from
    fn path(&self) -> &Path;

    /// Full body text
    fn read_text(&self) -> Result<String>;

    /// Write a copy of this document with `text` as its body to `destination`
    fn write_text(&self, destination: &Path, text: &str) -> Result<()>;

    /// How substituted values must be escaped for this body format
    fn encoding(&self) -> ValueEncoding;
}

/// Extensions handled as Word packages
const WORD_EXTENSIONS: &[&str] = &["docx", "docm", "dotx", "dotm"];

/// Pick the document kind by file extension
pub fn open_document(path: impl AsRef<Path>) -> Box<dyn Document> {
    let path = path.as_ref();
    let is_word = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| WORD_EXTENSIONS.iter().any(|w| ext.eq_ignore_ascii_case(w)));

    if is_word {
        Box::new(DocxDocument::new(path))
    } else {
        Box::new(TextDocument::new(path))
    }
}

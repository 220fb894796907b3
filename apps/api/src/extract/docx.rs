//! DOCX text extraction.
//!
//! A .docx is a zip archive; the body text lives in `word/document.xml` as
//! WordprocessingML. We pull text nodes out of that one entry and rebuild
//! paragraph breaks from `</w:p>` close tags, which is all the downstream
//! parsers need.

use std::io::{Cursor, Read};

use quick_xml::events::Event;
use quick_xml::Reader;
use thiserror::Error;

const DOCUMENT_ENTRY: &str = "word/document.xml";

#[derive(Debug, Error)]
pub enum DocxError {
    #[error("not a valid zip archive: {0}")]
    Zip(#[from] zip::result::ZipError),

    #[error("malformed document XML: {0}")]
    Xml(#[from] quick_xml::Error),

    #[error("archive has no {DOCUMENT_ENTRY} entry")]
    MissingDocument,

    #[error("I/O error reading archive: {0}")]
    Io(#[from] std::io::Error),
}

/// Extracts plain text from the bytes of a .docx file.
pub fn extract_text(data: &[u8]) -> Result<String, DocxError> {
    let mut archive = zip::ZipArchive::new(Cursor::new(data))?;

    let mut xml = String::new();
    match archive.by_name(DOCUMENT_ENTRY) {
        Ok(mut entry) => {
            entry.read_to_string(&mut xml)?;
        }
        Err(zip::result::ZipError::FileNotFound) => return Err(DocxError::MissingDocument),
        Err(e) => return Err(e.into()),
    }

    document_xml_to_text(&xml)
}

/// Walks the WordprocessingML body and collects text, one line per paragraph.
fn document_xml_to_text(xml: &str) -> Result<String, DocxError> {
    let mut reader = Reader::from_str(xml);
    reader.trim_text(false);

    let mut out = String::new();
    loop {
        match reader.read_event()? {
            Event::Text(t) => out.push_str(&t.unescape()?),
            // Tabs and explicit line breaks both separate runs of text.
            Event::Empty(e) if matches!(e.name().as_ref(), b"w:tab" | b"w:br") => {
                out.push(' ');
            }
            Event::End(e) if e.name().as_ref() == b"w:p" => out.push('\n'),
            Event::Eof => break,
            _ => {}
        }
    }
    Ok(out)
}

//! Raw text extraction from uploaded résumé files.
//!
//! Supported formats are PDF (via `pdf-extract`) and DOCX (a zip of WordprocessingML,
//! see [`docx`]). Extraction is CPU-bound and runs on the calling thread; uploads
//! are capped well below anything that would make that a problem.

pub mod docx;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("unsupported file type: {0}")]
    UnsupportedType(String),

    #[error("failed to read PDF: {0}")]
    Pdf(#[from] pdf_extract::OutputError),

    #[error("failed to read DOCX: {0}")]
    Docx(#[from] docx::DocxError),

    #[error("file contains no extractable text")]
    Empty,
}

/// Upload format, inferred from the file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadKind {
    Pdf,
    Docx,
}

impl UploadKind {
    /// Classifies a filename by extension, case-insensitively.
    pub fn from_filename(filename: &str) -> Result<Self, ExtractError> {
        let ext = filename
            .rsplit('.')
            .next()
            .map(str::to_ascii_lowercase)
            .unwrap_or_default();
        match ext.as_str() {
            "pdf" => Ok(UploadKind::Pdf),
            "docx" => Ok(UploadKind::Docx),
            _ => Err(ExtractError::UnsupportedType(filename.to_string())),
        }
    }
}

/// Extracts plain text from an uploaded file body.
pub fn extract_text(kind: UploadKind, data: &[u8]) -> Result<String, ExtractError> {
    let text = match kind {
        UploadKind::Pdf => pdf_extract::extract_text_from_mem(data)?,
        UploadKind::Docx => docx::extract_text(data)?,
    };
    if text.trim().is_empty() {
        return Err(ExtractError::Empty);
    }
    Ok(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_from_filename() {
        assert_eq!(UploadKind::from_filename("cv.pdf").unwrap(), UploadKind::Pdf);
        assert_eq!(
            UploadKind::from_filename("Resume.DOCX").unwrap(),
            UploadKind::Docx
        );
    }

    #[test]
    fn test_kind_rejects_other_extensions() {
        assert!(UploadKind::from_filename("resume.txt").is_err());
        assert!(UploadKind::from_filename("resume.doc").is_err());
        assert!(UploadKind::from_filename("noextension").is_err());
    }

    #[test]
    fn test_extract_rejects_garbage_pdf() {
        assert!(extract_text(UploadKind::Pdf, b"not a pdf at all").is_err());
    }
}

//! Uploaded file inputs and kind sniffing.
//!
//! Files are accepted by extension or MIME type only; content is never
//! parsed here. The PDF body in particular is handed to a passive
//! external renderer untouched.

use std::path::Path;
use thiserror::Error;

/// File validation errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FileError {
    #[error("Please upload a PDF file")]
    NotPdf,
    #[error("Please upload a JSON file")]
    NotJson,
    #[error("Unrecognized file type: {0}")]
    Unrecognized(String),
}

/// Kind of file the tool accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileKind {
    Pdf,
    Json,
    Csv,
}

/// An uploaded file: name, declared MIME type, and raw content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileInput {
    pub name: String,
    pub mime: String,
    pub bytes: Vec<u8>,
}

impl FileInput {
    /// Create a file input from in-memory parts.
    pub fn new(name: impl Into<String>, mime: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            mime: mime.into(),
            bytes,
        }
    }

    /// Read a file from disk, deriving the MIME type from the extension.
    pub fn from_path(path: &Path) -> std::io::Result<Self> {
        let bytes = std::fs::read(path)?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let mime = match extension(&name) {
            Some("pdf") => "application/pdf",
            Some("json") => "application/json",
            Some("csv") => "text/csv",
            _ => "application/octet-stream",
        };
        Ok(Self::new(name, mime, bytes))
    }

    /// Sniff the file kind from extension or MIME type.
    pub fn kind(&self) -> Option<FileKind> {
        let ext = extension(&self.name);
        if self.mime == "application/pdf" || ext == Some("pdf") {
            Some(FileKind::Pdf)
        } else if self.mime == "application/json" || ext == Some("json") {
            Some(FileKind::Json)
        } else if self.mime == "text/csv" || ext == Some("csv") {
            Some(FileKind::Csv)
        } else {
            None
        }
    }

    /// Require the file to be a PDF.
    pub fn expect_pdf(&self) -> Result<(), FileError> {
        match self.kind() {
            Some(FileKind::Pdf) => Ok(()),
            _ => Err(FileError::NotPdf),
        }
    }

    /// Require the file to be a JSON document.
    pub fn expect_json(&self) -> Result<(), FileError> {
        match self.kind() {
            Some(FileKind::Json) => Ok(()),
            _ => Err(FileError::NotJson),
        }
    }

    /// Interpret the content as UTF-8 text, lossily.
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.bytes).into_owned()
    }
}

/// Recognized extension of a file name, normalized to lowercase.
fn extension(name: &str) -> Option<&'static str> {
    let (_, ext) = name.rsplit_once('.')?;
    for known in ["pdf", "json", "csv"] {
        if ext.eq_ignore_ascii_case(known) {
            return Some(known);
        }
    }
    None
}

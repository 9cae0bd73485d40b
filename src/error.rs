use std::path::PathBuf;

use thiserror::Error;

/// Why a document produced no records at all.
#[derive(Debug, Error)]
pub enum DocumentError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{0} is not a PDF (missing %PDF- header)")]
    NotPdf(PathBuf),

    #[error("unsupported document type: {0}")]
    Unsupported(PathBuf),

    #[error("PDF text extraction failed for {path}: {message}")]
    PdfParsing { path: PathBuf, message: String },
}

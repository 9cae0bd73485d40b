use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::debug;

use crate::error::DocumentError;

const PDF_MAGIC: &[u8] = b"%PDF-";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DocumentKind {
    Pdf,
    Text,
}

fn kind_of(path: &Path) -> Option<DocumentKind> {
    let ext = path.extension()?.to_str()?.to_ascii_lowercase();
    match ext.as_str() {
        "pdf" => Some(DocumentKind::Pdf),
        "txt" => Some(DocumentKind::Text),
        _ => None,
    }
}

/// Linearized text of one document, pages separated by newlines.
/// `.txt` files are taken as already-extracted text.
pub fn read_document_text(path: &Path) -> Result<String, DocumentError> {
    let kind = kind_of(path).ok_or_else(|| DocumentError::Unsupported(path.to_path_buf()))?;
    let bytes = std::fs::read(path).map_err(|source| DocumentError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    match kind {
        DocumentKind::Text => Ok(String::from_utf8_lossy(&bytes).into_owned()),
        DocumentKind::Pdf => {
            if !bytes.starts_with(PDF_MAGIC) {
                return Err(DocumentError::NotPdf(path.to_path_buf()));
            }
            let pages = pdf_extract::extract_text_from_mem_by_pages(&bytes).map_err(|e| {
                DocumentError::PdfParsing {
                    path: path.to_path_buf(),
                    message: e.to_string(),
                }
            })?;
            debug!(path = %path.display(), pages = pages.len(), "pdf text extracted");

            let mut text = String::new();
            for page in pages {
                text.push_str(&page);
                text.push('\n');
            }
            Ok(text)
        }
    }
}

/// Supported documents directly inside `dir`, sorted by file name.
pub fn discover_documents(dir: &Path) -> Result<Vec<PathBuf>> {
    let entries = std::fs::read_dir(dir)
        .with_context(|| format!("Failed to read input directory {:?}", dir))?;

    let mut paths = Vec::new();
    for entry in entries {
        let path = entry?.path();
        if path.is_file() && kind_of(&path).is_some() {
            paths.push(path);
        }
    }
    paths.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    Ok(paths)
}

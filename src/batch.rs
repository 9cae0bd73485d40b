use std::path::{Path, PathBuf};

use anyhow::Result;
use chrono::{DateTime, Local};
use indicatif::{ProgressBar, ProgressStyle};
use rayon::prelude::*;
use serde::Serialize;
use tracing::{info, warn};

use crate::error::DocumentError;
use crate::parser::{self, ContactRecord};
use crate::pdf;

const CHUNK: usize = 64;

/// An extracted record plus where and when it was found. The record itself
/// is carried unchanged.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SourcedContact {
    #[serde(flatten)]
    pub contact: ContactRecord,
    pub source_document: String,
    pub extracted_at: DateTime<Local>,
}

/// Result of one document. A failed document does not stop the batch.
#[derive(Debug)]
pub struct DocumentOutcome {
    pub source_document: String,
    pub result: Result<Vec<SourcedContact>, DocumentError>,
}

#[derive(Debug, Default)]
pub struct BatchReport {
    pub documents: usize,
    /// All contacts, grouped by document in input order, block order within.
    pub contacts: Vec<SourcedContact>,
    pub failures: Vec<(String, DocumentError)>,
}

impl BatchReport {
    pub fn succeeded(&self) -> usize {
        self.documents - self.failures.len()
    }
}

fn document_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// Read one document, run the extraction core on it, attach provenance.
pub fn process_document(path: &Path) -> DocumentOutcome {
    let source_document = document_name(path);
    let result = pdf::read_document_text(path).map(|text| {
        let extracted_at = Local::now();
        parser::extract(&text)
            .into_iter()
            .map(|contact| SourcedContact {
                contact,
                source_document: source_document.clone(),
                extracted_at,
            })
            .collect()
    });
    DocumentOutcome {
        source_document,
        result,
    }
}

/// Process documents in parallel, one pipeline call per document.
pub fn process_batch(paths: &[PathBuf], progress: bool) -> Result<BatchReport> {
    let pb = if progress {
        let pb = ProgressBar::new(paths.len() as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} documents ({per_sec})")?
                .progress_chars("#>-"),
        );
        pb
    } else {
        ProgressBar::hidden()
    };

    let mut report = BatchReport::default();

    for chunk in paths.chunks(CHUNK) {
        let outcomes: Vec<DocumentOutcome> = chunk
            .par_iter()
            .map(|p| process_document(p))
            .collect();

        for outcome in outcomes {
            report.documents += 1;
            match outcome.result {
                Ok(contacts) => {
                    info!(
                        document = %outcome.source_document,
                        contacts = contacts.len(),
                        "document processed"
                    );
                    report.contacts.extend(contacts);
                }
                Err(e) => {
                    warn!("Error processing {}: {}", outcome.source_document, e);
                    report.failures.push((outcome.source_document, e));
                }
            }
        }
        pb.inc(chunk.len() as u64);
    }

    pb.finish_and_clear();
    info!(
        "Processed {} documents ({} ok, {} failed), {} contacts",
        report.documents,
        report.succeeded(),
        report.failures.len(),
        report.contacts.len()
    );
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write(dir: &Path, name: &str, body: &str) -> PathBuf {
        let path = dir.join(name);
        std::fs::write(&path, body).unwrap();
        path
    }

    #[test]
    fn provenance_attached_without_touching_fields() {
        let dir = tempfile::tempdir().unwrap();
        let body = "Contact: John Smith\nEmail: john.smith@swisspensionfund.ch";
        let path = write(dir.path(), "swiss.txt", body);

        let outcome = process_document(&path);
        let contacts = outcome.result.unwrap();
        assert_eq!(outcome.source_document, "swiss.txt");
        assert_eq!(contacts.len(), 1);
        assert_eq!(contacts[0].source_document, "swiss.txt");
        assert_eq!(contacts[0].contact, parser::extract(body)[0]);
    }

    #[test]
    fn bad_document_does_not_abort_batch() {
        let dir = tempfile::tempdir().unwrap();
        let paths = vec![
            write(dir.path(), "a.txt", "Anna Meier\nanna@alpine.ch\n\nBruno Keller\nbruno@alpine.ch"),
            write(dir.path(), "b.pdf", "plain text pretending to be a pdf"),
            write(dir.path(), "c.txt", "Clara Weiss\nclara@lakeside.ch"),
        ];

        let report = process_batch(&paths, false).unwrap();
        assert_eq!(report.documents, 3);
        assert_eq!(report.succeeded(), 2);
        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.failures[0].0, "b.pdf");
        assert!(matches!(report.failures[0].1, DocumentError::NotPdf(_)));

        let emails: Vec<&str> = report.contacts.iter().map(|c| c.contact.email.as_str()).collect();
        assert_eq!(emails, vec!["anna@alpine.ch", "bruno@alpine.ch", "clara@lakeside.ch"]);
    }

    #[test]
    fn serialized_record_is_flat() {
        let contact = SourcedContact {
            contact: ContactRecord {
                email: "x@y.ch".into(),
                ..Default::default()
            },
            source_document: "doc.pdf".into(),
            extracted_at: Local::now(),
        };
        let value = serde_json::to_value(&contact).unwrap();
        assert_eq!(value["email"], "x@y.ch");
        assert_eq!(value["source_document"], "doc.pdf");
        assert!(value.get("contact").is_none());
    }
}

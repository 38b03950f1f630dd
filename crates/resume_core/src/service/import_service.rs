//! Batch import of source documents.
//!
//! # Responsibility
//! - Run each document through extraction, then reconciliation.
//! - Isolate failures per document.
//!
//! # Invariants
//! - Documents are processed strictly in order; a document's payload is
//!   fully reconciled before the next extraction starts.
//! - A failing document never aborts the batch and is never retried.
//! - Records merged before a failure are kept; unpersisted in-memory
//!   changes from the failed document are discarded by a reload.

use crate::extraction::{DocumentExtractor, ExtractionError, SourceDocument};
use crate::reconcile::engine::{ReconcileError, ReconcileReport, ReconciliationEngine};
use crate::store::registry::StoreRegistry;
use log::{info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Why one document could not be imported.
#[derive(Debug)]
pub enum ImportFailure {
    Extraction(ExtractionError),
    Reconciliation(ReconcileError),
}

impl Display for ImportFailure {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Extraction(err) => write!(f, "extraction failed: {err}"),
            Self::Reconciliation(err) => write!(f, "{err}"),
        }
    }
}

impl Error for ImportFailure {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Extraction(err) => Some(err),
            Self::Reconciliation(err) => Some(err),
        }
    }
}

/// Result of importing one document.
#[derive(Debug)]
pub struct DocumentImport {
    pub document: String,
    pub outcome: Result<ReconcileReport, ImportFailure>,
}

impl DocumentImport {
    pub fn succeeded(&self) -> bool {
        self.outcome.is_ok()
    }
}

/// Results of a batch, in input order.
#[derive(Debug, Default)]
pub struct ImportSummary {
    pub documents: Vec<DocumentImport>,
}

impl ImportSummary {
    pub fn succeeded(&self) -> usize {
        self.documents.iter().filter(|doc| doc.succeeded()).count()
    }

    pub fn failed(&self) -> usize {
        self.documents.len() - self.succeeded()
    }
}

/// Import use-case bound to one extractor implementation.
pub struct ImportService<E: DocumentExtractor> {
    extractor: E,
}

impl<E: DocumentExtractor> ImportService<E> {
    pub fn new(extractor: E) -> Self {
        Self { extractor }
    }

    /// Imports one document: extract, then reconcile.
    ///
    /// After a reconciliation failure every store is reloaded, so in-memory
    /// state matches what actually reached storage.
    pub fn import_document(
        &self,
        stores: &mut StoreRegistry<'_>,
        document: &SourceDocument,
    ) -> Result<ReconcileReport, ImportFailure> {
        let payload = self
            .extractor
            .extract(document)
            .map_err(ImportFailure::Extraction)?;
        let outcome = ReconciliationEngine::new(stores).reconcile(&payload);
        if outcome.is_err() {
            stores.reload();
            info!("event=stores_reload module=service status=ok reason=reconcile_failed");
        }
        outcome.map_err(ImportFailure::Reconciliation)
    }

    /// Imports `documents` sequentially, isolating failures per document.
    pub fn import_documents(
        &self,
        stores: &mut StoreRegistry<'_>,
        documents: &[SourceDocument],
    ) -> ImportSummary {
        let mut summary = ImportSummary::default();

        for (index, document) in documents.iter().enumerate() {
            let outcome = self.import_document(stores, document);
            match &outcome {
                Ok(report) => info!(
                    "event=import_document module=service status=ok index={} added={} skipped={}",
                    index,
                    report.total_added(),
                    report.total_skipped()
                ),
                Err(ImportFailure::Extraction(err)) => warn!(
                    "event=import_document module=service status=error index={} error_code=extraction_failed error={}",
                    index, err
                ),
                Err(ImportFailure::Reconciliation(err)) => warn!(
                    "event=import_document module=service status=error index={} error_code=reconcile_failed error={}",
                    index, err
                ),
            }
            summary.documents.push(DocumentImport {
                document: document.name.clone(),
                outcome,
            });
        }

        info!(
            "event=import_batch module=service status=ok documents={} succeeded={} failed={}",
            documents.len(),
            summary.succeeded(),
            summary.failed()
        );
        summary
    }
}

use anyhow::Result;
use async_trait::async_trait;
use serde_json::Value;
use tracing::{error, info};

/// The cloud document database this pipeline feeds. Implementors are expected
/// to stamp `createdAt`/`updatedAt` on writes.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Creates a document, generating an id when none is supplied, and
    /// returns the id actually used.
    async fn create_document(
        &self,
        collection: &str,
        id: Option<&str>,
        fields: Value,
    ) -> Result<String>;

    async fn update_document(&self, collection: &str, id: &str, fields: Value) -> Result<()>;

    async fn delete_document(&self, collection: &str, id: &str) -> Result<()>;

    async fn list_documents(&self, collection: &str) -> Result<Vec<Value>>;
}

/// Outcome of one chunked batch-write run. Batches commit independently, so a
/// partial failure still reports how far the operation got instead of hiding
/// progress behind a single aggregate error.
#[derive(Debug, Default)]
pub struct BatchWriteReport {
    pub attempted: usize,
    pub succeeded: usize,
    pub failed: usize,
    pub errors: Vec<String>,
}

/// Writes documents in fixed-size chunks. A failed chunk counts all of its
/// members as failed, rolls back any of its documents that had already
/// landed, records the error, and processing continues with the next chunk;
/// there are no retries. The store contents therefore always agree with the
/// `(succeeded, failed)` totals.
pub async fn batch_write(
    store: &dyn DocumentStore,
    collection: &str,
    documents: &[Value],
    batch_size: usize,
) -> BatchWriteReport {
    let batch_size = batch_size.max(1);
    let mut report = BatchWriteReport {
        attempted: documents.len(),
        ..Default::default()
    };

    for (batch_index, chunk) in documents.chunks(batch_size).enumerate() {
        let mut created_ids = Vec::new();
        let mut batch_error = None;

        for document in chunk {
            match store.create_document(collection, None, document.clone()).await {
                Ok(id) => created_ids.push(id),
                Err(e) => {
                    batch_error = Some(format!("batch {}: {}", batch_index, e));
                    break;
                }
            }
        }

        match batch_error {
            None => {
                report.succeeded += chunk.len();
                info!("Committed batch {} ({} documents)", batch_index, chunk.len());
            }
            Some(message) => {
                for id in &created_ids {
                    if let Err(e) = store.delete_document(collection, id).await {
                        error!("Failed to roll back document {}: {}", id, e);
                    }
                }

                report.failed += chunk.len();
                error!("Failed batch {}: {}", batch_index, message);
                report.errors.push(message);
            }
        }
    }

    report
}

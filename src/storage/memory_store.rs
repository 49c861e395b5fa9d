use anyhow::{anyhow, Result};
use async_trait::async_trait;
use chrono::Utc;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Mutex;
use uuid::Uuid;

use super::document_store::DocumentStore;

/// In-memory document store. Backs the CLI's dry-run sink and the tests; the
/// production deployment swaps in the real database client behind the same
/// trait.
pub struct MemoryStore {
    collections: Mutex<HashMap<String, HashMap<String, Value>>>,
    /// When set, create calls start failing once this many documents have
    /// been accepted. Used to exercise partial-failure bookkeeping.
    create_limit: Option<usize>,
    created: Mutex<usize>,
}

impl MemoryStore {
    pub fn new() -> Self {
        MemoryStore {
            collections: Mutex::new(HashMap::new()),
            create_limit: None,
            created: Mutex::new(0),
        }
    }

    /// A store that accepts `limit` creates and rejects every one after.
    pub fn failing_after(limit: usize) -> Self {
        MemoryStore {
            create_limit: Some(limit),
            ..Self::new()
        }
    }

    fn lock_collections(&self) -> std::sync::MutexGuard<'_, HashMap<String, HashMap<String, Value>>> {
        self.collections.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn create_document(
        &self,
        collection: &str,
        id: Option<&str>,
        fields: Value,
    ) -> Result<String> {
        if let Some(limit) = self.create_limit {
            let mut created = self.created.lock().unwrap_or_else(|e| e.into_inner());
            if *created >= limit {
                return Err(anyhow!("Simulated write failure after {} documents", limit));
            }
            *created += 1;
        }

        let id = id
            .map(|i| i.to_string())
            .unwrap_or_else(|| Uuid::new_v4().to_string());

        let mut document = fields;
        if let Some(map) = document.as_object_mut() {
            let now = Value::String(Utc::now().to_rfc3339());
            map.insert("createdAt".to_string(), now.clone());
            map.insert("updatedAt".to_string(), now);
        }

        self.lock_collections()
            .entry(collection.to_string())
            .or_default()
            .insert(id.clone(), document);

        Ok(id)
    }

    async fn update_document(&self, collection: &str, id: &str, fields: Value) -> Result<()> {
        let mut collections = self.lock_collections();
        let documents = collections
            .get_mut(collection)
            .ok_or_else(|| anyhow!("Unknown collection: {}", collection))?;

        let existing = documents
            .get_mut(id)
            .ok_or_else(|| anyhow!("Document not found: {}/{}", collection, id))?;

        if let (Some(target), Some(updates)) = (existing.as_object_mut(), fields.as_object()) {
            for (key, value) in updates {
                target.insert(key.clone(), value.clone());
            }
            target.insert(
                "updatedAt".to_string(),
                Value::String(Utc::now().to_rfc3339()),
            );
        }

        Ok(())
    }

    async fn delete_document(&self, collection: &str, id: &str) -> Result<()> {
        let mut collections = self.lock_collections();
        let documents = collections
            .get_mut(collection)
            .ok_or_else(|| anyhow!("Unknown collection: {}", collection))?;

        documents
            .remove(id)
            .ok_or_else(|| anyhow!("Document not found: {}/{}", collection, id))?;

        Ok(())
    }

    async fn list_documents(&self, collection: &str) -> Result<Vec<Value>> {
        let collections = self.lock_collections();
        Ok(collections
            .get(collection)
            .map(|documents| documents.values().cloned().collect())
            .unwrap_or_default())
    }
}

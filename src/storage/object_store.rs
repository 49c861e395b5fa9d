use anyhow::{anyhow, Result};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;

/// Object storage collaborator for the admin image-upload flows. The
/// ingestion pipeline itself only ever carries image URLs already present in
/// the source data, so nothing in this crate uploads; the trait exists for
/// the callers that do.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Uploads raw bytes under a path and returns a storage reference.
    async fn upload_bytes(&self, path: &str, bytes: &[u8]) -> Result<String>;

    /// Resolves a storage reference to a publicly servable URL.
    fn public_url(&self, reference: &str) -> Result<String>;
}

/// In-memory object store used to test the collaborator contract.
pub struct MemoryObjectStore {
    objects: Mutex<HashMap<String, Vec<u8>>>,
}

impl MemoryObjectStore {
    pub fn new() -> Self {
        MemoryObjectStore {
            objects: Mutex::new(HashMap::new()),
        }
    }
}

impl Default for MemoryObjectStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ObjectStore for MemoryObjectStore {
    async fn upload_bytes(&self, path: &str, bytes: &[u8]) -> Result<String> {
        self.objects
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .insert(path.to_string(), bytes.to_vec());
        Ok(path.to_string())
    }

    fn public_url(&self, reference: &str) -> Result<String> {
        let objects = self.objects.lock().unwrap_or_else(|e| e.into_inner());
        if !objects.contains_key(reference) {
            return Err(anyhow!("Unknown object reference: {}", reference));
        }
        Ok(format!("memory://{}", reference))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_upload_then_public_url() {
        let store = MemoryObjectStore::new();
        let reference = store
            .upload_bytes("products/p1/front.jpg", b"jpegbytes")
            .await
            .unwrap();

        let url = store.public_url(&reference).unwrap();
        assert_eq!(url, "memory://products/p1/front.jpg");
    }

    #[tokio::test]
    async fn test_unknown_reference_errors() {
        let store = MemoryObjectStore::new();
        assert!(store.public_url("missing.jpg").is_err());
    }
}

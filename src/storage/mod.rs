pub mod document_store;
pub mod memory_store;
pub mod object_store;

pub use document_store::{batch_write, BatchWriteReport, DocumentStore};
pub use memory_store::MemoryStore;
pub use object_store::{MemoryObjectStore, ObjectStore};

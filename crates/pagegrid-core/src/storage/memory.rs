//! In-memory storage.

use super::{BoxFuture, Storage, StorageError, StorageResult};
use crate::store::PageDocument;
use std::collections::HashMap;
use std::sync::RwLock;

/// Keeps documents in a map for the lifetime of the process.
#[derive(Default)]
pub struct MemoryStorage {
    documents: RwLock<HashMap<String, PageDocument>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

fn lock_error(e: impl std::fmt::Display) -> StorageError {
    StorageError::Other(format!("Lock error: {}", e))
}

impl Storage for MemoryStorage {
    fn save(&self, id: &str, document: &PageDocument) -> BoxFuture<'_, StorageResult<()>> {
        let id = id.to_string();
        let document = document.clone();
        Box::pin(async move {
            let mut docs = self.documents.write().map_err(lock_error)?;
            docs.insert(id, document);
            Ok(())
        })
    }

    fn load(&self, id: &str) -> BoxFuture<'_, StorageResult<PageDocument>> {
        let id = id.to_string();
        Box::pin(async move {
            let docs = self.documents.read().map_err(lock_error)?;
            docs.get(&id).cloned().ok_or(StorageError::NotFound(id))
        })
    }

    fn delete(&self, id: &str) -> BoxFuture<'_, StorageResult<()>> {
        let id = id.to_string();
        Box::pin(async move {
            let mut docs = self.documents.write().map_err(lock_error)?;
            docs.remove(&id);
            Ok(())
        })
    }

    fn list(&self) -> BoxFuture<'_, StorageResult<Vec<String>>> {
        Box::pin(async move {
            let docs = self.documents.read().map_err(lock_error)?;
            let mut ids: Vec<String> = docs.keys().cloned().collect();
            ids.sort();
            Ok(ids)
        })
    }

    fn exists(&self, id: &str) -> BoxFuture<'_, StorageResult<bool>> {
        let id = id.to_string();
        Box::pin(async move {
            let docs = self.documents.read().map_err(lock_error)?;
            Ok(docs.contains_key(&id))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::block_on;

    #[test]
    fn test_save_and_load() {
        let storage = MemoryStorage::new();
        let doc = PageDocument::demo();

        block_on(storage.save("landing", &doc)).unwrap();
        let loaded = block_on(storage.load("landing")).unwrap();
        assert_eq!(loaded, doc);
    }

    #[test]
    fn test_not_found() {
        let storage = MemoryStorage::new();
        let result = block_on(storage.load("nonexistent"));
        assert!(matches!(result, Err(StorageError::NotFound(_))));
    }

    #[test]
    fn test_delete_and_exists() {
        let storage = MemoryStorage::new();
        block_on(storage.save("landing", &PageDocument::new())).unwrap();
        assert!(block_on(storage.exists("landing")).unwrap());
        block_on(storage.delete("landing")).unwrap();
        assert!(!block_on(storage.exists("landing")).unwrap());
    }

    #[test]
    fn test_list() {
        let storage = MemoryStorage::new();
        let doc = PageDocument::new();
        block_on(storage.save("b", &doc)).unwrap();
        block_on(storage.save("a", &doc)).unwrap();
        assert_eq!(block_on(storage.list()).unwrap(), vec!["a".to_string(), "b".to_string()]);
    }
}

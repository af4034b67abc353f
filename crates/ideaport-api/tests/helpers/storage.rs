//! In-memory Storage implementation for tests.

use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::Mutex;
use std::time::Duration;

use ideaport_storage::{Storage, StorageError, StorageResult};

/// Mock storage keeping objects in memory. Individual keys can be scripted
/// to fail deletion for sweep-resilience tests.
pub struct MockStorage {
    files: Mutex<HashMap<String, Vec<u8>>>,
    fail_delete: Mutex<HashSet<String>>,
}

impl MockStorage {
    pub fn new() -> Self {
        Self {
            files: Mutex::new(HashMap::new()),
            fail_delete: Mutex::new(HashSet::new()),
        }
    }

    pub fn has_file(&self, key: &str) -> bool {
        self.files.lock().unwrap().contains_key(key)
    }

    pub fn file_count(&self) -> usize {
        self.files.lock().unwrap().len()
    }

    pub fn keys(&self) -> Vec<String> {
        self.files.lock().unwrap().keys().cloned().collect()
    }

    /// Make subsequent deletes of `key` fail with a backend error.
    pub fn fail_delete_on(&self, key: &str) {
        self.fail_delete.lock().unwrap().insert(key.to_string());
    }
}

impl Default for MockStorage {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Storage for MockStorage {
    async fn upload_with_key(&self, storage_key: &str, data: Vec<u8>) -> StorageResult<()> {
        self.files
            .lock()
            .unwrap()
            .insert(storage_key.to_string(), data);
        Ok(())
    }

    async fn download(&self, storage_key: &str) -> StorageResult<Vec<u8>> {
        self.files
            .lock()
            .unwrap()
            .get(storage_key)
            .cloned()
            .ok_or_else(|| StorageError::NotFound(storage_key.to_string()))
    }

    async fn delete(&self, storage_key: &str) -> StorageResult<()> {
        if self.fail_delete.lock().unwrap().contains(storage_key) {
            return Err(StorageError::DeleteFailed("scripted failure".to_string()));
        }
        match self.files.lock().unwrap().remove(storage_key) {
            Some(_) => Ok(()),
            None => Err(StorageError::NotFound(storage_key.to_string())),
        }
    }

    async fn exists(&self, storage_key: &str) -> StorageResult<bool> {
        Ok(self.files.lock().unwrap().contains_key(storage_key))
    }

    async fn get_presigned_url(
        &self,
        storage_key: &str,
        _expires_in: Duration,
    ) -> StorageResult<String> {
        if !self.files.lock().unwrap().contains_key(storage_key) {
            return Err(StorageError::NotFound(storage_key.to_string()));
        }
        Ok(format!("https://storage.example.com/{}", storage_key))
    }
}

//! Keyed storage for uploaded payloads.
//!
//! A front-end accepts an upload, `put`s it and hands the [`PayloadHandle`]
//! back to the client, which later asks for it to be processed. The pipeline
//! itself never sees the store; [`preprocess_stored`] only glues the two.
use std::collections::HashMap;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::RwLock;

use tracing::debug;

use crate::config::ProcessingConfig;
use crate::errors::{Error, Result};
use crate::filter::ProcessedRecord;
use crate::parser::detect_format;
use crate::pipeline::preprocess;

/// Opaque key of a stored payload
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PayloadHandle(String);

impl PayloadHandle {
    pub fn new<S: Into<String>>(key: S) -> Self {
        PayloadHandle(key.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PayloadHandle {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// An uploaded file: its name decides how the bytes are read
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredPayload {
    pub filename: String,
    pub content: Vec<u8>,
}

impl StoredPayload {
    pub fn size(&self) -> usize {
        self.content.len()
    }
}

/// Where uploaded payloads live between upload and processing.
///
/// Implementations must be shareable between request handlers.
pub trait PayloadStore: Send + Sync {
    /// Store a payload and return the handle to fetch it with
    fn put(&self, filename: &str, content: Vec<u8>) -> Result<PayloadHandle>;
    /// A copy of the payload, if the handle is known
    fn get(&self, handle: &PayloadHandle) -> Option<StoredPayload>;
    /// Forget a payload; returns whether it was present
    fn delete(&self, handle: &PayloadHandle) -> bool;
}

/// Checks every upload goes through before it is stored
fn validate_upload(filename: &str, content: &[u8]) -> Result<()> {
    detect_format(filename)?;
    if content.is_empty() {
        return Err(Error::EmptyInput("File content is empty".to_string()));
    }
    Ok(())
}

/// A [`PayloadStore`] backed by a map in process memory
#[derive(Debug, Default)]
pub struct MemoryStore {
    payloads: RwLock<HashMap<PayloadHandle, StoredPayload>>,
    counter: AtomicU64,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.payloads
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl PayloadStore for MemoryStore {
    fn put(&self, filename: &str, content: Vec<u8>) -> Result<PayloadHandle> {
        validate_upload(filename, &content)?;
        let n = self.counter.fetch_add(1, Ordering::Relaxed);
        let handle = PayloadHandle(format!("payload-{:08}", n));
        debug!(%handle, filename, bytes = content.len(), "stored payload");

        // every write is a single insert or remove, so a poisoned map is intact
        let mut payloads = self
            .payloads
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        payloads.insert(
            handle.clone(),
            StoredPayload {
                filename: filename.to_string(),
                content,
            },
        );
        Ok(handle)
    }

    fn get(&self, handle: &PayloadHandle) -> Option<StoredPayload> {
        let payloads = self
            .payloads
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        payloads.get(handle).cloned()
    }

    fn delete(&self, handle: &PayloadHandle) -> bool {
        let mut payloads = self
            .payloads
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        payloads.remove(handle).is_some()
    }
}

/// Run [`preprocess`] on a previously stored payload
pub fn preprocess_stored(
    store: &dyn PayloadStore,
    handle: &PayloadHandle,
    config: &ProcessingConfig,
) -> Result<Vec<ProcessedRecord>> {
    let payload = store
        .get(handle)
        .ok_or_else(|| Error::PayloadNotFound(handle.to_string()))?;
    preprocess(&payload.content, &payload.filename, config)
}

#[cfg(test)]
mod test {
    use std::sync::Arc;
    use std::thread;

    use super::*;
    use crate::errors::ErrorKind;

    #[test]
    fn test_put_get_delete() {
        let store = MemoryStore::new();
        let handle = store.put("reads.fa", b">a\nACGT\n".to_vec()).unwrap();
        assert_eq!(store.len(), 1);

        let payload = store.get(&handle).unwrap();
        assert_eq!(payload.filename, "reads.fa");
        assert_eq!(payload.size(), 8);

        assert!(store.delete(&handle));
        assert!(!store.delete(&handle));
        assert!(store.get(&handle).is_none());
        assert!(store.is_empty());
    }

    #[test]
    fn test_poisoned_store_still_serves() {
        let store = Arc::new(MemoryStore::new());
        let handle = store.put("reads.fa", b">a\nACGT\n".to_vec()).unwrap();

        let poisoner = Arc::clone(&store);
        let res = thread::spawn(move || {
            let _guard = poisoner.payloads.write().unwrap();
            panic!("writer died holding the lock");
        })
        .join();
        assert!(res.is_err());
        assert!(store.payloads.is_poisoned());

        assert_eq!(store.len(), 1);
        assert!(!store.is_empty());
        assert!(store.get(&handle).is_some());
        assert!(store.delete(&handle));
        assert!(store.is_empty());
    }

    #[test]
    fn test_put_validates() {
        let store = MemoryStore::new();
        assert_eq!(
            store.put("reads.txt", b">a\nACGT\n".to_vec()).unwrap_err().kind(),
            ErrorKind::UnsupportedFormat
        );
        assert_eq!(
            store.put("reads.fa", Vec::new()).unwrap_err().kind(),
            ErrorKind::EmptyInput
        );
        assert!(store.is_empty());
    }

    #[test]
    fn test_handles_are_unique() {
        let store = Arc::new(MemoryStore::new());
        let threads: Vec<_> = (0..4)
            .map(|_| {
                let store = Arc::clone(&store);
                thread::spawn(move || {
                    (0..25)
                        .map(|_| store.put("r.fq", b"@a\nA\n+\nI\n".to_vec()).unwrap())
                        .collect::<Vec<_>>()
                })
            })
            .collect();
        let mut handles: Vec<PayloadHandle> = threads
            .into_iter()
            .flat_map(|t| t.join().unwrap())
            .collect();
        handles.sort_by(|a, b| a.as_str().cmp(b.as_str()));
        handles.dedup();
        assert_eq!(handles.len(), 100);
        assert_eq!(store.len(), 100);
    }

    #[test]
    fn test_preprocess_stored() {
        let store = MemoryStore::new();
        let handle = store
            .put("reads.fasta", b">seq1\nATCGATCGATCG\n".to_vec())
            .unwrap();
        let config = ProcessingConfig::default();
        let reads = preprocess_stored(&store, &handle, &config).unwrap();
        assert_eq!(reads.len(), 1);
        assert_eq!(reads[0].length, 12);

        let missing = PayloadHandle::new("nope");
        let e = preprocess_stored(&store, &missing, &config).unwrap_err();
        assert_eq!(e.kind(), ErrorKind::PayloadNotFound);
    }
}

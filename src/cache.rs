//! Memoized upload loading keyed by file identity.
//!
//! Re-decoding on every interaction is wasteful, but the cache must be
//! explicit: entries are keyed by (name, byte length, SHA-256 digest) and
//! invalidated manually when a new file replaces the upload. A repeated load
//! of identical bytes returns the same shared table.

use std::collections::HashMap;
use std::sync::Arc;

use log::debug;
use sha2::{Digest, Sha256};

use crate::{ingest, table::Table};

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct FileKey {
    name: String,
    len: usize,
    digest: [u8; 32],
}

impl FileKey {
    fn new(name: &str, bytes: &[u8]) -> Self {
        FileKey {
            name: name.to_string(),
            len: bytes.len(),
            digest: Sha256::digest(bytes).into(),
        }
    }
}

#[derive(Debug, Default)]
pub struct LoadCache {
    entries: HashMap<FileKey, Arc<Table>>,
}

impl LoadCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the normalized table for an upload, decoding at most once per
    /// distinct file identity. Decode failures are handled at the ingest
    /// boundary and cached as empty tables like any other result.
    pub fn load(&mut self, bytes: &[u8], filename: &str) -> Arc<Table> {
        let key = FileKey::new(filename, bytes);
        if let Some(table) = self.entries.get(&key) {
            debug!("Load cache hit for '{filename}'");
            return Arc::clone(table);
        }
        let table = Arc::new(ingest::load_table(bytes, filename));
        self.entries.insert(key, Arc::clone(&table));
        table
    }

    /// Drops every cached table; called when a new upload replaces the
    /// current one.
    pub fn invalidate(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

//! JSON file store: one document per tenant+provider.
//!
//! Layout: `<root>/<tenant>/<provider>.json`. Writes go to a uniquely named
//! temp file that is renamed over the target, so a crash never leaves a
//! half-written document. Every read-modify-write holds an exclusive lock on
//! `<provider>.json.lock`, which serializes writers across processes too.
//! Mapping sources written by older tools (a bare string or an object with
//! `source_column`) are accepted on read and rewritten as arrays.

use std::fs::{self, File, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use billmap_model::{ColumnMapping, DetectedColumn, MappingSuggestionRecord, Provider, TenantId};

use crate::document::{Scope, StoreDocument, group_by_scope};
use crate::error::{Result, StoreError};
use crate::store::MappingStore;
use tempfile::NamedTempFile;

#[derive(Debug)]
pub struct JsonFileStore {
    root: PathBuf,
    // Serializes threads of this process; the lock file covers other processes.
    lock: Mutex<()>,
}

impl JsonFileStore {
    /// Opens a store rooted at `root`, creating the directory if needed.
    pub fn open(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        fs::create_dir_all(&root).map_err(|e| StoreError::Io {
            operation: "create directory",
            path: root.clone(),
            source: e,
        })?;
        Ok(Self {
            root,
            lock: Mutex::new(()),
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path of the document holding `tenant` + `provider`.
    pub fn document_path(&self, tenant: &TenantId, provider: &Provider) -> Result<PathBuf> {
        let tenant = key_segment("tenant", tenant.as_str())?;
        let provider = key_segment("provider", provider.as_str())?;
        Ok(self.root.join(tenant).join(format!("{provider}.json")))
    }

    fn load(&self, path: &Path) -> Result<StoreDocument> {
        let bytes = match fs::read(path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(StoreDocument::default()),
            Err(e) => {
                return Err(StoreError::Io {
                    operation: "read",
                    path: path.to_path_buf(),
                    source: e,
                });
            }
        };
        serde_json::from_slice(&bytes).map_err(|e| StoreError::Deserialization {
            path: path.to_path_buf(),
            source: e,
        })
    }

    fn save(&self, path: &Path, document: &StoreDocument) -> Result<()> {
        let bytes =
            serde_json::to_vec_pretty(document).map_err(|e| StoreError::Serialization {
                path: path.to_path_buf(),
                source: e,
            })?;

        let parent = path.parent().unwrap_or(&self.root);
        let mut temp = NamedTempFile::new_in(parent).map_err(|e| StoreError::Io {
            operation: "create",
            path: parent.to_path_buf(),
            source: e,
        })?;
        temp.write_all(&bytes).map_err(|e| StoreError::Io {
            operation: "write",
            path: temp.path().to_path_buf(),
            source: e,
        })?;
        temp.as_file().sync_all().map_err(|e| StoreError::Io {
            operation: "sync",
            path: temp.path().to_path_buf(),
            source: e,
        })?;
        temp.persist(path).map_err(|e| StoreError::Io {
            operation: "replace",
            path: path.to_path_buf(),
            source: e.error,
        })?;

        tracing::debug!("Saved store document {}", path.display());
        Ok(())
    }

    /// Creates the document directory and takes an exclusive lock on the
    /// document's sidecar lock file. The lock is released when the file drops.
    fn lock_document(&self, path: &Path) -> Result<File> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| StoreError::Io {
                operation: "create directory",
                path: parent.to_path_buf(),
                source: e,
            })?;
        }
        let lock_path = path.with_extension("json.lock");
        let file = OpenOptions::new()
            .create(true)
            .truncate(false)
            .write(true)
            .open(&lock_path)
            .map_err(|e| StoreError::Io {
                operation: "open lock",
                path: lock_path.clone(),
                source: e,
            })?;
        file.lock().map_err(|e| StoreError::Io {
            operation: "lock",
            path: lock_path,
            source: e,
        })?;
        Ok(file)
    }

    fn read<T>(
        &self,
        tenant: &TenantId,
        provider: &Provider,
        view: impl FnOnce(StoreDocument) -> T,
    ) -> Result<T> {
        let path = self.document_path(tenant, provider)?;
        let _guard = self.lock.lock()?;
        Ok(view(self.load(&path)?))
    }

    fn update<'a, T: 'a>(
        &self,
        rows: &'a [T],
        scope_of: impl Fn(&T) -> Scope,
        mut insert: impl FnMut(&mut StoreDocument, Vec<&'a T>) -> usize,
    ) -> Result<usize> {
        let _guard = self.lock.lock()?;
        let mut inserted = 0;
        for (scope, rows) in group_by_scope(rows, scope_of) {
            let path = self.document_path(&scope.tenant, &scope.provider)?;
            let _file_lock = self.lock_document(&path)?;
            let mut document = self.load(&path)?;
            let added = insert(&mut document, rows);
            if added > 0 {
                self.save(&path, &document)?;
            }
            inserted += added;
        }
        Ok(inserted)
    }
}

/// Tenant and provider become path segments, so only plain names are allowed.
fn key_segment<'a>(kind: &'static str, value: &'a str) -> Result<&'a str> {
    let plain = !value.is_empty()
        && !value.starts_with('.')
        && value
            .chars()
            .all(|ch| ch.is_ascii_alphanumeric() || matches!(ch, '-' | '_' | '.'));
    if plain {
        Ok(value)
    } else {
        Err(StoreError::InvalidKey {
            kind,
            value: value.to_string(),
        })
    }
}

impl MappingStore for JsonFileStore {
    fn insert_detected_columns(&self, columns: &[DetectedColumn]) -> Result<usize> {
        self.update(
            columns,
            |column| Scope::new(&column.tenant_id, &column.provider),
            |doc, rows| doc.insert_detected_columns(rows),
        )
    }

    fn find_detected_columns(
        &self,
        tenant: &TenantId,
        provider: &Provider,
    ) -> Result<Vec<DetectedColumn>> {
        self.read(tenant, provider, |doc| doc.detected_columns)
    }

    fn find_mappings(&self, tenant: &TenantId, provider: &Provider) -> Result<Vec<ColumnMapping>> {
        self.read(tenant, provider, |doc| doc.mappings)
    }

    fn insert_suggestions(&self, records: &[MappingSuggestionRecord]) -> Result<usize> {
        self.update(
            records,
            |record| Scope::new(&record.tenant_id, &record.provider),
            |doc, rows| doc.insert_suggestions(rows),
        )
    }

    fn find_suggestions(
        &self,
        tenant: &TenantId,
        provider: &Provider,
    ) -> Result<Vec<MappingSuggestionRecord>> {
        self.read(tenant, provider, |doc| doc.suggestions)
    }

    fn insert_mappings_if_absent(&self, mappings: &[ColumnMapping]) -> Result<usize> {
        self.update(
            mappings,
            |mapping| Scope::new(&mapping.tenant_id, &mapping.provider),
            |doc, rows| doc.insert_mappings_if_absent(rows),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn rejects_path_like_keys() {
        let dir = tempdir().unwrap();
        let store = JsonFileStore::open(dir.path()).unwrap();
        let provider = Provider::new("aws").unwrap();

        for tenant in ["../escape", ".hidden", "a/b"] {
            let tenant = TenantId::new(tenant).unwrap();
            let err = store.document_path(&tenant, &provider).unwrap_err();
            assert!(matches!(err, StoreError::InvalidKey { kind: "tenant", .. }));
        }
    }

    #[test]
    fn missing_document_reads_empty() {
        let dir = tempdir().unwrap();
        let store = JsonFileStore::open(dir.path()).unwrap();
        let tenant = TenantId::new("acme").unwrap();
        let provider = Provider::new("aws").unwrap();
        assert!(store.find_mappings(&tenant, &provider).unwrap().is_empty());
    }

    #[test]
    fn corrupt_document_is_an_error() {
        let dir = tempdir().unwrap();
        let store = JsonFileStore::open(dir.path()).unwrap();
        let tenant = TenantId::new("acme").unwrap();
        let provider = Provider::new("aws").unwrap();
        let path = store.document_path(&tenant, &provider).unwrap();
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, "{ not json").unwrap();

        let err = store.find_mappings(&tenant, &provider).unwrap_err();
        assert!(matches!(err, StoreError::Deserialization { .. }));
    }
}

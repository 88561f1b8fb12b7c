use crate::domain::errors::KVStoreError;
use crate::ports::outbound::{BatchOperation, KeyValueStore};
use parking_lot::RwLock;
use std::collections::HashMap;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

/// File-backed key-value store for single-node runs.
///
/// The whole map is rewritten to a temp file and renamed over the data file
/// after every write, so a crash leaves either the old or the new contents.
pub struct FileBackedKVStore {
    data: RwLock<HashMap<Vec<u8>, Vec<u8>>>,
    path: PathBuf,
}

impl FileBackedKVStore {
    /// Open (or create) the store at `path`.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, KVStoreError> {
        let path = path.as_ref().to_path_buf();

        let data = if path.exists() {
            let data = Self::load_from_file(&path)?;
            #[cfg(feature = "tracing-log")]
            tracing::info!(
                "[wc-01] Loaded {} keys from {}",
                data.len(),
                path.display()
            );
            data
        } else {
            #[cfg(feature = "tracing-log")]
            tracing::info!("[wc-01] No existing storage file at {}", path.display());
            HashMap::new()
        };

        Ok(Self {
            data: RwLock::new(data),
            path,
        })
    }

    /// Location of the data file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load_from_file(path: &Path) -> Result<HashMap<Vec<u8>, Vec<u8>>, KVStoreError> {
        let mut file = std::fs::File::open(path).map_err(io_error)?;
        let mut bytes = Vec::new();
        file.read_to_end(&mut bytes).map_err(io_error)?;

        // Format: [key_len:u32][key][value_len:u32][value]...
        let mut data = HashMap::new();
        let mut cursor = 0;
        while cursor < bytes.len() {
            let key = read_chunk(&bytes, &mut cursor)?;
            let value = read_chunk(&bytes, &mut cursor)?;
            data.insert(key, value);
        }
        Ok(data)
    }

    fn save_to_file(&self, data: &HashMap<Vec<u8>, Vec<u8>>) -> Result<(), KVStoreError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).map_err(io_error)?;
        }

        let mut bytes = Vec::new();
        for (key, value) in data {
            bytes.extend_from_slice(&(key.len() as u32).to_le_bytes());
            bytes.extend_from_slice(key);
            bytes.extend_from_slice(&(value.len() as u32).to_le_bytes());
            bytes.extend_from_slice(value);
        }

        let temp_path = self.path.with_extension("tmp");
        let mut file = std::fs::File::create(&temp_path).map_err(io_error)?;
        file.write_all(&bytes).map_err(io_error)?;
        file.sync_all().map_err(io_error)?;
        std::fs::rename(&temp_path, &self.path).map_err(io_error)?;
        Ok(())
    }
}

fn io_error(e: std::io::Error) -> KVStoreError {
    KVStoreError::IOError {
        message: e.to_string(),
    }
}

fn read_chunk(bytes: &[u8], cursor: &mut usize) -> Result<Vec<u8>, KVStoreError> {
    let truncated = || KVStoreError::CorruptionError {
        message: format!("truncated record at offset {}", cursor),
    };
    let len_bytes: [u8; 4] = bytes
        .get(*cursor..*cursor + 4)
        .and_then(|s| s.try_into().ok())
        .ok_or_else(truncated)?;
    let len = u32::from_le_bytes(len_bytes) as usize;
    let start = *cursor + 4;
    let chunk = bytes.get(start..start + len).ok_or_else(truncated)?.to_vec();
    *cursor = start + len;
    Ok(chunk)
}

impl KeyValueStore for FileBackedKVStore {
    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>, KVStoreError> {
        Ok(self.data.read().get(key).cloned())
    }

    fn put(&self, key: &[u8], value: &[u8]) -> Result<(), KVStoreError> {
        let mut data = self.data.write();
        let previous = data.insert(key.to_vec(), value.to_vec());
        if let Err(e) = self.save_to_file(&data) {
            match previous {
                Some(v) => data.insert(key.to_vec(), v),
                None => data.remove(key),
            };
            return Err(e);
        }
        Ok(())
    }

    fn delete(&self, key: &[u8]) -> Result<(), KVStoreError> {
        let mut data = self.data.write();
        let Some(previous) = data.remove(key) else {
            return Ok(());
        };
        if let Err(e) = self.save_to_file(&data) {
            data.insert(key.to_vec(), previous);
            return Err(e);
        }
        Ok(())
    }

    fn atomic_batch_write(&self, operations: Vec<BatchOperation>) -> Result<(), KVStoreError> {
        let mut data = self.data.write();
        let mut next = data.clone();
        for op in operations {
            match op {
                BatchOperation::Put { key, value } => {
                    next.insert(key, value);
                }
                BatchOperation::Delete { key } => {
                    next.remove(&key);
                }
            }
        }
        self.save_to_file(&next)?;
        *data = next;
        Ok(())
    }

    fn exists(&self, key: &[u8]) -> Result<bool, KVStoreError> {
        Ok(self.data.read().contains_key(key))
    }
}

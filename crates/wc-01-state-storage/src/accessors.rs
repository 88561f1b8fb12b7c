//! # Typed Accessors
//!
//! Reads and writes over the key layout in [`KeyPrefix`]. Write helpers come
//! in two forms: `*_ops` returns the [`BatchOperation`]s so callers can fold
//! them into one atomic commit, `set_*` applies them directly.

use crate::domain::errors::StorageError;
use crate::domain::header::BlockHeader;
use crate::domain::keys::KeyPrefix;
use crate::ports::outbound::{BatchOperation, KeyValueStore};
use shared_types::{BlockId, Id, MessageId};

pub type Result<T> = std::result::Result<T, StorageError>;

/// Operations storing `header` by hash and indexing it by height.
pub fn block_header_ops(header: &BlockHeader) -> Result<Vec<BatchOperation>> {
    let data = header.to_bytes()?;
    Ok(vec![
        BatchOperation::put(KeyPrefix::header_key(&header.hash), data),
        BatchOperation::put(
            KeyPrefix::height_key(header.number),
            header.hash.as_bytes().to_vec(),
        ),
    ])
}

/// Store a block header by hash and index it by height.
pub fn set_block_header<S: KeyValueStore + ?Sized>(store: &S, header: &BlockHeader) -> Result<()> {
    store.atomic_batch_write(block_header_ops(header)?)?;
    Ok(())
}

/// Retrieve a block header by hash.
pub fn get_block_header<S: KeyValueStore + ?Sized>(store: &S, id: &BlockId) -> Result<BlockHeader> {
    let data = store
        .get(&KeyPrefix::header_key(id))?
        .ok_or(StorageError::BlockNotFound { id: *id })?;
    Ok(BlockHeader::from_bytes(&data)?)
}

/// Retrieve the hash of the block indexed at `height`.
pub fn get_block_id_by_height<S: KeyValueStore + ?Sized>(store: &S, height: u64) -> Result<BlockId> {
    let key = KeyPrefix::height_key(height);
    let data = store
        .get(&key)?
        .ok_or(StorageError::HeightNotFound { height })?;
    decode_id(&key, &data)
}

/// Operation moving the last-accepted pointer.
pub fn last_accepted_op(id: &BlockId) -> BatchOperation {
    BatchOperation::put(KeyPrefix::last_accepted_key(), id.as_bytes().to_vec())
}

/// Store the last accepted block id.
pub fn set_last_accepted_block_id<S: KeyValueStore + ?Sized>(store: &S, id: &BlockId) -> Result<()> {
    store.put(&KeyPrefix::last_accepted_key(), id.as_bytes())?;
    Ok(())
}

/// Retrieve the last accepted block id, `None` before genesis.
pub fn get_last_accepted_block_id<S: KeyValueStore + ?Sized>(store: &S) -> Result<Option<BlockId>> {
    let key = KeyPrefix::last_accepted_key();
    match store.get(&key)? {
        Some(data) => decode_id(&key, &data).map(Some),
        None => Ok(None),
    }
}

/// Retrieve the header of the last accepted block.
pub fn get_latest_block_header<S: KeyValueStore + ?Sized>(store: &S) -> Result<BlockHeader> {
    let id = get_last_accepted_block_id(store)?.ok_or(StorageError::MissingGenesis)?;
    get_block_header(store, &id)
}

/// Operation storing a message payload.
pub fn message_op(id: &MessageId, bytes: &[u8]) -> BatchOperation {
    BatchOperation::put(KeyPrefix::message_key(id), bytes.to_vec())
}

/// Store a message payload.
pub fn set_message<S: KeyValueStore + ?Sized>(store: &S, id: &MessageId, bytes: &[u8]) -> Result<()> {
    store.put(&KeyPrefix::message_key(id), bytes)?;
    Ok(())
}

/// Retrieve a message payload by id.
pub fn get_message<S: KeyValueStore + ?Sized>(store: &S, id: &MessageId) -> Result<Vec<u8>> {
    store
        .get(&KeyPrefix::message_key(id))?
        .ok_or(StorageError::MessageNotFound { id: *id })
}

/// Operation storing the message counter.
pub fn last_message_id_op(counter: u64) -> BatchOperation {
    BatchOperation::put(KeyPrefix::last_message_id_key(), counter.to_be_bytes().to_vec())
}

/// Store the message counter.
pub fn set_last_message_id<S: KeyValueStore + ?Sized>(store: &S, counter: u64) -> Result<()> {
    store.put(&KeyPrefix::last_message_id_key(), &counter.to_be_bytes())?;
    Ok(())
}

/// Retrieve the message counter, 0 when never written.
pub fn get_last_message_id<S: KeyValueStore + ?Sized>(store: &S) -> Result<u64> {
    let key = KeyPrefix::last_message_id_key();
    let Some(data) = store.get(&key)? else {
        return Ok(0);
    };
    let arr: [u8; 8] = data.as_slice().try_into().map_err(|_| StorageError::Corrupted {
        key: String::from_utf8_lossy(&key).into_owned(),
        reason: format!("expected 8 bytes, got {}", data.len()),
    })?;
    Ok(u64::from_be_bytes(arr))
}

fn decode_id(key: &[u8], data: &[u8]) -> Result<Id> {
    Id::from_slice(data).map_err(|e| StorageError::Corrupted {
        key: String::from_utf8_lossy(key).into_owned(),
        reason: e.to_string(),
    })
}

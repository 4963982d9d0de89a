/// Key layout for Fjall partitions
///
/// Partition structure:
/// - `col_{collection}`: {document_id:16 bytes} -> Record (JSON)
///
/// Raw UUID bytes keep the partition sorted by creation time.
use super::id::DocumentId;

const PARTITION_PREFIX: &str = "col_";

/// Fjall limits partition names; keep well under its cap
pub const MAX_COLLECTION_NAME_LEN: usize = 64;

/// Whether `name` can be used as a collection name
pub fn is_valid_collection_name(name: &str) -> bool {
    !name.is_empty()
        && name.len() <= MAX_COLLECTION_NAME_LEN
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
}

/// Partition name for a collection: col_{collection}
pub fn partition_name(collection: &str) -> String {
    format!("{}{}", PARTITION_PREFIX, collection)
}

/// Encode a record key: raw 16 id bytes
pub fn encode_record_key(id: &DocumentId) -> Vec<u8> {
    id.as_bytes().to_vec()
}

/// Decode a record key back into an id
pub fn decode_record_key(key: &[u8]) -> Option<DocumentId> {
    DocumentId::from_slice(key)
}

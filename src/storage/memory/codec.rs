//! Versioned JSON record encoding for the in-memory store.
//!
//! Every stored value carries a schema version tag so a record written by a
//! different schema generation is rejected on decode instead of being
//! misread. The storage format is independent of any display format.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::storage::StorageError;

pub(crate) const SCHEMA_VERSION: u32 = 1;

#[derive(Serialize, Deserialize)]
struct Versioned<T> {
    v: u32,
    #[serde(flatten)]
    record: T,
}

pub(crate) fn encode<T: Serialize>(record: &T) -> Result<String, StorageError> {
    serde_json::to_string(&Versioned {
        v: SCHEMA_VERSION,
        record,
    })
    .map_err(|e| StorageError::Codec(e.to_string()))
}

pub(crate) fn decode<T: DeserializeOwned>(raw: &str) -> Result<T, StorageError> {
    let versioned: Versioned<T> =
        serde_json::from_str(raw).map_err(|e| StorageError::Codec(e.to_string()))?;
    if versioned.v != SCHEMA_VERSION {
        return Err(StorageError::Codec(format!(
            "unsupported record version {}",
            versioned.v
        )));
    }
    Ok(versioned.record)
}

use std::collections::BTreeMap;
use std::iter::FromIterator;

use bbc_core::{BbcError, ErrorInfo};
use serde::{de::DeserializeOwned, Serialize};
use serde_json::{Map, Value};
use sha2::{Digest, Sha256};

fn serde_error(code: &str, err: impl ToString) -> BbcError {
    BbcError::Serde(ErrorInfo::new(code, err.to_string()))
}

fn canonicalize(value: Value) -> Value {
    match value {
        Value::Object(map) => {
            let ordered = map
                .into_iter()
                .map(|(key, value)| (key, canonicalize(value)))
                .collect::<BTreeMap<_, _>>();
            Value::Object(Map::from_iter(ordered))
        }
        Value::Array(values) => Value::Array(values.into_iter().map(canonicalize).collect()),
        other => other,
    }
}

/// Serializes a value into JSON bytes with keys in sorted order.
pub fn to_canonical_json_bytes<T: Serialize>(value: &T) -> Result<Vec<u8>, BbcError> {
    let value = serde_json::to_value(value).map_err(|err| serde_error("json-encode", err))?;
    let mut bytes = Vec::new();
    serde_json::to_writer(&mut bytes, &canonicalize(value))
        .map_err(|err| serde_error("json-write", err))?;
    Ok(bytes)
}

/// Hex SHA-256 of the canonical JSON form of `value`.
pub fn stable_hash_string<T: Serialize>(value: &T) -> Result<String, BbcError> {
    let bytes = to_canonical_json_bytes(value)?;
    Ok(format!("{:x}", Sha256::digest(bytes)))
}

pub(crate) fn to_pretty_json<T: Serialize>(value: &T) -> Result<Vec<u8>, BbcError> {
    serde_json::to_vec_pretty(value).map_err(|err| serde_error("json-encode", err))
}

pub(crate) fn from_json_slice<T: DeserializeOwned>(data: &[u8]) -> Result<T, BbcError> {
    serde_json::from_slice(data).map_err(|err| serde_error("json-decode", err))
}

pub(crate) fn to_bincode<T: Serialize>(value: &T) -> Result<Vec<u8>, BbcError> {
    bincode::serialize(value).map_err(|err| serde_error("bincode-serialize", err))
}

pub(crate) fn from_bincode<T: DeserializeOwned>(bytes: &[u8]) -> Result<T, BbcError> {
    bincode::deserialize(bytes).map_err(|err| serde_error("bincode-deserialize", err))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Serialize)]
    struct Swapped {
        b: u32,
        a: u32,
    }

    #[derive(Serialize)]
    struct Ordered {
        a: u32,
        b: u32,
    }

    #[test]
    fn field_order_does_not_change_the_hash() {
        let left = stable_hash_string(&Swapped { b: 2, a: 1 }).unwrap();
        let right = stable_hash_string(&Ordered { a: 1, b: 2 }).unwrap();
        assert_eq!(left, right);
        assert_eq!(left.len(), 64);
    }
}

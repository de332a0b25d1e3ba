use std::collections::BTreeMap;

use tracing::debug;

use crate::tensor::{TensorInfo, decode_tensor_info};
use crate::wire::{Cursor, WireType};
use crate::{Error, Result};

/// One callable entry point of a saved graph
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Signature {
    /// Name under which the signature is registered, e.g. `serving_default`
    pub key: String,
    /// Method the signature implements, e.g. `tensorflow/serving/predict`
    pub method_name: String,
    pub inputs: BTreeMap<String, TensorInfo>,
    pub outputs: BTreeMap<String, TensorInfo>,
}

impl Signature {
    /// Get input tensor information by argument name
    pub fn input(&self, name: &str) -> Option<&TensorInfo> {
        self.inputs.get(name)
    }

    /// Get output tensor information by result name
    pub fn output(&self, name: &str) -> Option<&TensorInfo> {
        self.outputs.get(name)
    }

    /// Get input tensor information, failing if the input is not present
    pub fn require_input(&self, name: &str) -> Result<&TensorInfo> {
        self.input(name).ok_or_else(|| {
            Error::MissingField(format!("input '{}' of signature '{}'", name, self.key))
        })
    }

    /// Get output tensor information, failing if the output is not present
    pub fn require_output(&self, name: &str) -> Result<&TensorInfo> {
        self.output(name).ok_or_else(|| {
            Error::MissingField(format!("output '{}' of signature '{}'", name, self.key))
        })
    }

    /// Check if the signature takes an input with this name
    pub fn has_input(&self, name: &str) -> bool {
        self.inputs.contains_key(name)
    }

    /// Check if the signature produces an output with this name
    pub fn has_output(&self, name: &str) -> bool {
        self.outputs.contains_key(name)
    }

    /// Input argument names, sorted
    pub fn input_names(&self) -> Vec<&str> {
        self.inputs.keys().map(String::as_str).collect()
    }

    /// Output names, sorted
    pub fn output_names(&self) -> Vec<&str> {
        self.outputs.keys().map(String::as_str).collect()
    }
}

// Map entry: key = 1, value = 2
const ENTRY_KEY: u64 = 1;
const ENTRY_VALUE: u64 = 2;

// SignatureDef: inputs = 1, outputs = 2, method_name = 3
const SIG_INPUTS: u64 = 1;
const SIG_OUTPUTS: u64 = 2;
const SIG_METHOD_NAME: u64 = 3;

/// Decode one map-entry sub-message into its key and decoded value.
///
/// Entries with an empty key or an empty value payload are dropped, which
/// also drops values that legitimately encode to zero bytes.
pub fn decode_map_entry<'a, V>(
    bytes: &'a [u8],
    decode_value: impl FnOnce(&'a [u8]) -> V,
) -> Option<(String, V)> {
    let mut cursor = Cursor::new(bytes);
    let mut key = String::new();
    let mut value: &'a [u8] = &[];

    while let Some(tag) = cursor.read_tag() {
        match (tag.field, tag.wire_type) {
            (ENTRY_KEY, WireType::LengthDelimited) => key = cursor.read_string(),
            (ENTRY_VALUE, WireType::LengthDelimited) => value = cursor.read_length_delimited(),
            (_, wire_type) => cursor.skip(wire_type),
        }
    }

    if key.is_empty() || value.is_empty() {
        debug!(
            key = key.as_str(),
            value_len = value.len(),
            "dropping map entry with empty key or value"
        );
        return None;
    }
    Some((key, decode_value(value)))
}

/// Decode a map entry and insert it, replacing any earlier entry with the
/// same key
fn merge_map_entry<'a, V>(
    map: &mut BTreeMap<String, V>,
    bytes: &'a [u8],
    decode_value: impl FnOnce(&'a [u8]) -> V,
) {
    if let Some((key, value)) = decode_map_entry(bytes, decode_value) {
        map.insert(key, value);
    }
}

/// Decode a signature sub-message. `key` is left empty for the caller to fill.
pub fn decode_signature(bytes: &[u8]) -> Signature {
    let mut cursor = Cursor::new(bytes);
    let mut signature = Signature::default();

    while let Some(tag) = cursor.read_tag() {
        match (tag.field, tag.wire_type) {
            (SIG_INPUTS, WireType::LengthDelimited) => merge_map_entry(
                &mut signature.inputs,
                cursor.read_length_delimited(),
                decode_tensor_info,
            ),
            (SIG_OUTPUTS, WireType::LengthDelimited) => merge_map_entry(
                &mut signature.outputs,
                cursor.read_length_delimited(),
                decode_tensor_info,
            ),
            (SIG_METHOD_NAME, WireType::LengthDelimited) => {
                signature.method_name = cursor.read_string()
            }
            (_, wire_type) => cursor.skip(wire_type),
        }
    }

    signature
}

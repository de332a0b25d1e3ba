use std::collections::BTreeMap;

use crate::signature::{Signature, decode_map_entry, decode_signature};
use crate::tensor::TensorInfo;
use crate::wire::{Cursor, WireType};
use crate::{Error, Result};

/// Signatures keyed by signature name
pub type SignatureTable = BTreeMap<String, Signature>;

// MetaGraphDef: meta_info_def = 1, signature_def = 5
const META_INFO_DEF: u64 = 1;
const META_SIGNATURE_DEF: u64 = 5;

// MetaInfoDef: tags = 4, tensorflow_version = 5
const INFO_TAGS: u64 = 4;
const INFO_TF_VERSION: u64 = 5;

/// One meta graph of a saved model: its tag set and signatures
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct MetaGraph {
    /// Tags identifying this graph, e.g. `serve`, in stored order
    pub tags: Vec<String>,
    /// Version of the library that wrote the graph, if recorded
    pub tensorflow_version: String,
    pub signatures: SignatureTable,
}

impl MetaGraph {
    /// Decode a serialized meta graph
    pub fn from_bytes(bytes: &[u8]) -> Self {
        decode_meta_graph(bytes)
    }

    /// Check if a signature with this name exists
    pub fn has_signature(&self, name: &str) -> bool {
        self.signatures.contains_key(name)
    }

    /// Get signature by name
    pub fn signature(&self, name: &str) -> Option<&Signature> {
        self.signatures.get(name)
    }

    /// Get signature by name, failing if it is not present
    pub fn require_signature(&self, name: &str) -> Result<&Signature> {
        self.signature(name)
            .ok_or_else(|| Error::MissingField(format!("signature '{}'", name)))
    }

    /// Get all signature names, sorted
    pub fn signature_names(&self) -> Vec<&str> {
        self.signatures.keys().map(String::as_str).collect()
    }

    /// Check if the graph carries exactly this tag set, ignoring order
    pub fn has_tags(&self, tags: &[&str]) -> bool {
        let mut own: Vec<&str> = self.tags.iter().map(String::as_str).collect();
        let mut wanted = tags.to_vec();
        own.sort_unstable();
        own.dedup();
        wanted.sort_unstable();
        wanted.dedup();
        own == wanted
    }

    /// Print every signature with its inputs and outputs
    pub fn print_signatures(&self) {
        for (name, signature) in &self.signatures {
            println!("Signature: {}", name);
            if !signature.method_name.is_empty() {
                println!("  Method: {}", signature.method_name);
            }
            println!("  Inputs:");
            for (key, info) in &signature.inputs {
                print_tensor_info(key, info);
            }
            println!("  Outputs:");
            for (key, info) in &signature.outputs {
                print_tensor_info(key, info);
            }
        }
    }
}

fn print_tensor_info(key: &str, info: &TensorInfo) {
    println!("    Key: \"{}\"", key);
    println!("      Tensor: {}", info.name);
    println!("      DType:  {}", info.type_code);
    println!("      Shape:  {}", info.shape);
}

/// Decode the signature table of a serialized meta graph.
///
/// Never fails: unknown fields are skipped, malformed entries dropped and
/// truncated data ends the scan. An input without signatures yields an empty
/// table.
pub fn decode_signatures(bytes: &[u8]) -> SignatureTable {
    let mut cursor = Cursor::new(bytes);
    let mut signatures = SignatureTable::new();

    while let Some(tag) = cursor.read_tag() {
        match (tag.field, tag.wire_type) {
            (META_SIGNATURE_DEF, WireType::LengthDelimited) => {
                merge_signature_entry(&mut signatures, cursor.read_length_delimited())
            }
            (_, wire_type) => cursor.skip(wire_type),
        }
    }

    signatures
}

/// Decode a serialized meta graph: signatures plus the tags and version from
/// its meta info.
pub fn decode_meta_graph(bytes: &[u8]) -> MetaGraph {
    let mut cursor = Cursor::new(bytes);
    let mut graph = MetaGraph::default();

    while let Some(tag) = cursor.read_tag() {
        match (tag.field, tag.wire_type) {
            (META_INFO_DEF, WireType::LengthDelimited) => {
                decode_meta_info(cursor.read_length_delimited(), &mut graph)
            }
            (META_SIGNATURE_DEF, WireType::LengthDelimited) => {
                merge_signature_entry(&mut graph.signatures, cursor.read_length_delimited())
            }
            (_, wire_type) => cursor.skip(wire_type),
        }
    }

    graph
}

fn merge_signature_entry(signatures: &mut SignatureTable, entry: &[u8]) {
    if let Some((name, mut signature)) = decode_map_entry(entry, decode_signature) {
        signature.key = name.clone();
        signatures.insert(name, signature);
    }
}

fn decode_meta_info(bytes: &[u8], graph: &mut MetaGraph) {
    let mut cursor = Cursor::new(bytes);
    while let Some(tag) = cursor.read_tag() {
        match (tag.field, tag.wire_type) {
            (INFO_TAGS, WireType::LengthDelimited) => {
                if let Some(tag) = cursor.try_read_length_delimited() {
                    graph.tags.push(String::from_utf8_lossy(tag).into_owned());
                }
            }
            (INFO_TF_VERSION, WireType::LengthDelimited) => {
                graph.tensorflow_version = cursor.read_string()
            }
            (_, wire_type) => cursor.skip(wire_type),
        }
    }
}

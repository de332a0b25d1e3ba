//! Wire-format fixtures built from prost mirrors of the SavedModel messages.

#![allow(dead_code)]

use std::collections::BTreeMap;

use prost::Message;
use prost::encoding::{self, WireType as PbWireType};

#[derive(Clone, PartialEq, Message)]
pub struct DimPb {
    #[prost(int64, tag = "1")]
    pub size: i64,
    #[prost(string, tag = "2")]
    pub name: String,
}

#[derive(Clone, PartialEq, Message)]
pub struct ShapePb {
    #[prost(message, repeated, tag = "2")]
    pub dim: Vec<DimPb>,
    #[prost(bool, tag = "3")]
    pub unknown_rank: bool,
}

#[derive(Clone, PartialEq, Message)]
pub struct TensorInfoPb {
    #[prost(string, tag = "1")]
    pub name: String,
    #[prost(int32, tag = "2")]
    pub dtype: i32,
    #[prost(message, optional, tag = "3")]
    pub tensor_shape: Option<ShapePb>,
}

#[derive(Clone, PartialEq, Message)]
pub struct SignatureDefPb {
    #[prost(btree_map = "string, message", tag = "1")]
    pub inputs: BTreeMap<String, TensorInfoPb>,
    #[prost(btree_map = "string, message", tag = "2")]
    pub outputs: BTreeMap<String, TensorInfoPb>,
    #[prost(string, tag = "3")]
    pub method_name: String,
}

#[derive(Clone, PartialEq, Message)]
pub struct MetaInfoPb {
    #[prost(string, tag = "1")]
    pub meta_graph_version: String,
    #[prost(string, repeated, tag = "4")]
    pub tags: Vec<String>,
    #[prost(string, tag = "5")]
    pub tensorflow_version: String,
}

#[derive(Clone, PartialEq, Message)]
pub struct MetaGraphPb {
    #[prost(message, optional, tag = "1")]
    pub meta_info_def: Option<MetaInfoPb>,
    #[prost(bytes = "vec", tag = "2")]
    pub graph_def: Vec<u8>,
    #[prost(btree_map = "string, message", tag = "5")]
    pub signature_def: BTreeMap<String, SignatureDefPb>,
}

#[derive(Clone, PartialEq, Message)]
pub struct SavedModelPb {
    #[prost(int64, tag = "1")]
    pub saved_model_schema_version: i64,
    #[prost(message, repeated, tag = "2")]
    pub meta_graphs: Vec<MetaGraphPb>,
}

pub const DT_FLOAT: i32 = 1;
pub const DT_INT32: i32 = 3;

pub fn shape(dims: &[i64]) -> ShapePb {
    ShapePb {
        dim: dims
            .iter()
            .map(|&size| DimPb {
                size,
                name: String::new(),
            })
            .collect(),
        unknown_rank: false,
    }
}

pub fn tensor(name: &str, dtype: i32, dims: &[i64]) -> TensorInfoPb {
    TensorInfoPb {
        name: name.to_string(),
        dtype,
        tensor_shape: Some(shape(dims)),
    }
}

/// The `serving_default` signature of a small MNIST classifier
pub fn serving_default() -> SignatureDefPb {
    SignatureDefPb {
        inputs: BTreeMap::from([(
            "input_1".to_string(),
            tensor("serving_default_input_1:0", DT_FLOAT, &[-1, 28, 28, 1]),
        )]),
        outputs: BTreeMap::from([(
            "output_1".to_string(),
            tensor("StatefulPartitionedCall:0", DT_FLOAT, &[-1, 10]),
        )]),
        method_name: "tensorflow/serving/predict".to_string(),
    }
}

pub fn meta_graph(signatures: Vec<(&str, SignatureDefPb)>) -> MetaGraphPb {
    MetaGraphPb {
        meta_info_def: Some(MetaInfoPb {
            meta_graph_version: "v2.15.0".to_string(),
            tags: vec!["serve".to_string()],
            tensorflow_version: "2.15.0".to_string(),
        }),
        graph_def: vec![0x0a, 0x03, b'a', b'b', b'c'],
        signature_def: signatures
            .into_iter()
            .map(|(name, sig)| (name.to_string(), sig))
            .collect(),
    }
}

pub fn encode_varint(value: u64) -> Vec<u8> {
    let mut buf = Vec::new();
    encoding::encode_varint(value, &mut buf);
    buf
}

/// Append a length-delimited field
pub fn put_bytes(buf: &mut Vec<u8>, field: u32, bytes: &[u8]) {
    encoding::encode_key(field, PbWireType::LengthDelimited, buf);
    encoding::encode_varint(bytes.len() as u64, buf);
    buf.extend_from_slice(bytes);
}

/// Append a varint field
pub fn put_varint(buf: &mut Vec<u8>, field: u32, value: u64) {
    encoding::encode_key(field, PbWireType::Varint, buf);
    encoding::encode_varint(value, buf);
}

/// Append a fixed 64-bit field
pub fn put_fixed64(buf: &mut Vec<u8>, field: u32, value: u64) {
    encoding::encode_key(field, PbWireType::SixtyFourBit, buf);
    buf.extend_from_slice(&value.to_le_bytes());
}

/// Append a fixed 32-bit field
pub fn put_fixed32(buf: &mut Vec<u8>, field: u32, value: u32) {
    encoding::encode_key(field, PbWireType::ThirtyTwoBit, buf);
    buf.extend_from_slice(&value.to_le_bytes());
}

/// Encode a map entry by hand so duplicate keys can be produced
pub fn map_entry(key: &str, value: &[u8]) -> Vec<u8> {
    let mut buf = Vec::new();
    put_bytes(&mut buf, 1, key.as_bytes());
    put_bytes(&mut buf, 2, value);
    buf
}

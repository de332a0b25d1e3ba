use std::fmt;

use crate::wire::{Cursor, WireType};

/// Static shape of a signature tensor
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum TensorShape {
    /// Rank not known; the shape carried `unknown_rank` or was absent
    #[default]
    UnknownRank,
    /// Rank zero
    Scalar,
    /// Known rank. Negative sizes mark dimensions of unknown length
    Ranked(Vec<i64>),
}

impl TensorShape {
    /// Dimension sizes, empty for both scalars and unknown rank
    pub fn dims(&self) -> &[i64] {
        match self {
            TensorShape::Ranked(dims) => dims,
            TensorShape::UnknownRank | TensorShape::Scalar => &[],
        }
    }

    /// Number of dimensions, if known
    pub fn rank(&self) -> Option<usize> {
        match self {
            TensorShape::UnknownRank => None,
            TensorShape::Scalar => Some(0),
            TensorShape::Ranked(dims) => Some(dims.len()),
        }
    }

    /// True when the rank and every dimension size are known
    pub fn is_fully_defined(&self) -> bool {
        match self {
            TensorShape::UnknownRank => false,
            TensorShape::Scalar => true,
            TensorShape::Ranked(dims) => dims.iter().all(|&d| d >= 0),
        }
    }
}

impl fmt::Display for TensorShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TensorShape::UnknownRank => write!(f, "<unknown>"),
            TensorShape::Scalar => write!(f, "[]"),
            TensorShape::Ranked(dims) => {
                write!(f, "[")?;
                for (i, d) in dims.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", d)?;
                }
                write!(f, "]")
            }
        }
    }
}

/// A signature input or output
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TensorInfo {
    /// Graph tensor name, e.g. `serving_default_input_1:0`
    pub name: String,
    /// Raw dtype enum value; not interpreted
    pub type_code: i32,
    pub shape: TensorShape,
}

impl TensorInfo {
    /// Tensor name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Dtype code as stored in the model
    pub fn type_code(&self) -> i32 {
        self.type_code
    }

    /// Dimension sizes
    pub fn dims(&self) -> &[i64] {
        self.shape.dims()
    }
}

// TensorShapeProto: dim = 2 (repeated Dim), unknown_rank = 3
// Dim: size = 1
const SHAPE_DIM: u64 = 2;
const SHAPE_UNKNOWN_RANK: u64 = 3;
const DIM_SIZE: u64 = 1;

// TensorInfo: name = 1, dtype = 2, tensor_shape = 3
const INFO_NAME: u64 = 1;
const INFO_DTYPE: u64 = 2;
const INFO_SHAPE: u64 = 3;

/// Decode a shape sub-message
pub fn decode_shape(bytes: &[u8]) -> TensorShape {
    let mut cursor = Cursor::new(bytes);
    let mut dims = Vec::new();
    let mut unknown_rank = false;

    while let Some(tag) = cursor.read_tag() {
        match (tag.field, tag.wire_type) {
            (SHAPE_DIM, WireType::LengthDelimited) => {
                if let Some(dim) = cursor.try_read_length_delimited() {
                    dims.push(decode_dim(dim));
                }
            }
            (SHAPE_UNKNOWN_RANK, WireType::Varint) => unknown_rank = cursor.read_varint() != 0,
            (_, wire_type) => cursor.skip(wire_type),
        }
    }

    if unknown_rank {
        TensorShape::UnknownRank
    } else if dims.is_empty() {
        TensorShape::Scalar
    } else {
        TensorShape::Ranked(dims)
    }
}

/// Size of one dimension; a dim without a size field has size zero
fn decode_dim(bytes: &[u8]) -> i64 {
    let mut cursor = Cursor::new(bytes);
    let mut size = 0i64;
    while let Some(tag) = cursor.read_tag() {
        match (tag.field, tag.wire_type) {
            // int64 on the wire: negatives arrive as 10-byte two's complement
            (DIM_SIZE, WireType::Varint) => size = cursor.read_varint() as i64,
            (_, wire_type) => cursor.skip(wire_type),
        }
    }
    size
}

/// Decode a tensor-info sub-message. Repeated fields overwrite earlier ones.
pub fn decode_tensor_info(bytes: &[u8]) -> TensorInfo {
    let mut cursor = Cursor::new(bytes);
    let mut info = TensorInfo::default();

    while let Some(tag) = cursor.read_tag() {
        match (tag.field, tag.wire_type) {
            (INFO_NAME, WireType::LengthDelimited) => info.name = cursor.read_string(),
            (INFO_DTYPE, WireType::Varint) => info.type_code = cursor.read_varint() as i32,
            (INFO_SHAPE, WireType::LengthDelimited) => {
                if let Some(shape) = cursor.try_read_length_delimited() {
                    info.shape = decode_shape(shape);
                }
            }
            (_, wire_type) => cursor.skip(wire_type),
        }
    }

    info
}

//! # tf-signature-extractor
//!
//! A lightweight reader for the signatures of TensorFlow SavedModels.
//!
//! This crate decodes protobuf wire format directly, without generated code,
//! and extracts:
//! - Signatures (named entry points) of each meta graph
//! - Input and output tensors of each signature (tensor name, dtype code, shape)
//! - Meta graph tags and producer version
//!
//! Decoding is best effort: malformed or truncated data never errors, it only
//! leaves the affected entries out.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use tf_signature_extractor::SavedModel;
//!
//! let model = SavedModel::load_from_dir("my_model")?;
//! let graph = model.require_meta_graph(&["serve"])?;
//! let signature = graph.require_signature("serving_default")?;
//!
//! if let Some(input) = signature.input("input_1") {
//!     println!("{} {:?}", input.name, input.dims());
//! }
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! A meta graph blob obtained elsewhere (for instance from a session loader)
//! can be decoded on its own with [`decode_signatures`].

pub mod error;
pub mod meta_graph;
pub mod model;
pub mod signature;
pub mod tensor;
pub mod wire;

pub use error::{Error, Result};
pub use meta_graph::{MetaGraph, SignatureTable, decode_meta_graph, decode_signatures};
pub use model::SavedModel;
pub use signature::{Signature, decode_map_entry, decode_signature};
pub use tensor::{TensorInfo, TensorShape, decode_shape, decode_tensor_info};
pub use wire::{Cursor, Tag, WireType};

use std::fs::File;
use std::io::Read;
use std::path::Path;

use tracing::{debug, info};

use crate::meta_graph::{MetaGraph, decode_meta_graph};
use crate::wire::{Cursor, WireType};
use crate::{Error, Result};

/// File name of the serialized container inside a SavedModel directory
pub const SAVED_MODEL_FILENAME: &str = "saved_model.pb";

/// Tag of the graph exported for serving
pub const SERVE_TAG: &str = "serve";

// SavedModel: saved_model_schema_version = 1, meta_graphs = 2
const SCHEMA_VERSION: u64 = 1;
const META_GRAPHS: u64 = 2;

/// Main SavedModel container
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SavedModel {
    pub schema_version: i64,
    pub meta_graphs: Vec<MetaGraph>,
}

impl SavedModel {
    /// Load a SavedModel directory, reading its `saved_model.pb`
    pub fn load_from_dir(dir: impl AsRef<Path>) -> Result<Self> {
        Self::load_from_file(dir.as_ref().join(SAVED_MODEL_FILENAME))
    }

    /// Load a serialized SavedModel from file path
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let mut file = File::open(path)?;
        let mut buffer = Vec::new();
        file.read_to_end(&mut buffer)?;
        info!(path = %path.display(), bytes = buffer.len(), "read saved model");
        Self::load_from_bytes(&buffer)
    }

    /// Load a SavedModel from byte slice
    pub fn load_from_bytes(data: &[u8]) -> Result<Self> {
        let mut cursor = Cursor::new(data);
        let mut model = SavedModel {
            schema_version: 0,
            meta_graphs: Vec::new(),
        };

        while let Some(tag) = cursor.read_tag() {
            match (tag.field, tag.wire_type) {
                (SCHEMA_VERSION, WireType::Varint) => {
                    model.schema_version = cursor.read_varint() as i64
                }
                (META_GRAPHS, WireType::LengthDelimited) => {
                    if let Some(graph) = cursor.try_read_length_delimited() {
                        model.meta_graphs.push(decode_meta_graph(graph));
                    }
                }
                (_, wire_type) => cursor.skip(wire_type),
            }
        }

        if model.meta_graphs.is_empty() {
            return Err(Error::InvalidModel(
                "No meta graphs found in saved model".to_string(),
            ));
        }

        for graph in &model.meta_graphs {
            debug!(
                tags = ?graph.tags,
                signatures = graph.signatures.len(),
                "decoded meta graph"
            );
        }

        Ok(model)
    }

    /// Get the meta graph whose tag set equals `tags`, ignoring order
    pub fn meta_graph(&self, tags: &[&str]) -> Option<&MetaGraph> {
        self.meta_graphs.iter().find(|graph| graph.has_tags(tags))
    }

    /// Get the meta graph for `tags`, failing if the model has none
    pub fn require_meta_graph(&self, tags: &[&str]) -> Result<&MetaGraph> {
        self.meta_graph(tags).ok_or_else(|| {
            Error::InvalidModel(format!("No meta graph with tags {:?}", tags))
        })
    }

    /// Get the meta graph exported for serving
    pub fn serving(&self) -> Option<&MetaGraph> {
        self.meta_graph(&[SERVE_TAG])
    }

    /// Get every tag set in the model, in stored order
    pub fn tag_sets(&self) -> Vec<&[String]> {
        self.meta_graphs
            .iter()
            .map(|graph| graph.tags.as_slice())
            .collect()
    }

    /// Print the signatures of every meta graph
    pub fn print_signatures(&self) {
        println!("=== SavedModel (schema v{}) ===", self.schema_version);
        for graph in &self.meta_graphs {
            println!("\n=== Meta graph {:?} ===", graph.tags);
            if !graph.tensorflow_version.is_empty() {
                println!("Written by TensorFlow {}", graph.tensorflow_version);
            }
            graph.print_signatures();
        }
    }
}

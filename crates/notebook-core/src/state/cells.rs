//! Cell types for the notebook document model.

use std::collections::BTreeSet;

use media::Output;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// The three notebook cell kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CellType {
    Code,
    Markdown,
    Raw,
}

/// Per-cell metadata the store actually manipulates, plus a passthrough map
/// for everything else the document format carries.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CellMetadata {
    #[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
    pub tags: BTreeSet<String>,
    #[serde(default)]
    pub input_hidden: bool,
    #[serde(default)]
    pub output_hidden: bool,
    #[serde(default)]
    pub output_expanded: bool,
    #[serde(default, skip_serializing_if = "serde_json::Map::is_empty")]
    pub additional: serde_json::Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CodeCell {
    #[serde(default)]
    pub source: String,
    #[serde(default)]
    pub execution_count: Option<i32>,
    #[serde(default)]
    pub outputs: Vec<Output>,
    #[serde(default)]
    pub metadata: CellMetadata,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MarkdownCell {
    #[serde(default)]
    pub source: String,
    #[serde(default)]
    pub metadata: CellMetadata,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawCell {
    #[serde(default)]
    pub source: String,
    #[serde(default)]
    pub metadata: CellMetadata,
}

/// One notebook cell. The cell id is not stored here; cells live in a map
/// keyed by [`crate::refs::CellId`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "cell_type", rename_all = "snake_case")]
pub enum Cell {
    Code(CodeCell),
    Markdown(MarkdownCell),
    Raw(RawCell),
}

impl Cell {
    /// An empty code cell, the default cell for new notebooks.
    pub fn empty_code() -> Cell {
        Cell::Code(CodeCell::default())
    }

    /// A cell of the given type with the given source.
    pub fn of_type(cell_type: CellType, source: impl Into<String>) -> Cell {
        let source = source.into();
        match cell_type {
            CellType::Code => Cell::Code(CodeCell {
                source,
                ..CodeCell::default()
            }),
            CellType::Markdown => Cell::Markdown(MarkdownCell {
                source,
                metadata: CellMetadata::default(),
            }),
            CellType::Raw => Cell::Raw(RawCell {
                source,
                metadata: CellMetadata::default(),
            }),
        }
    }

    pub fn cell_type(&self) -> CellType {
        match self {
            Cell::Code(_) => CellType::Code,
            Cell::Markdown(_) => CellType::Markdown,
            Cell::Raw(_) => CellType::Raw,
        }
    }

    pub fn source(&self) -> &str {
        match self {
            Cell::Code(c) => &c.source,
            Cell::Markdown(c) => &c.source,
            Cell::Raw(c) => &c.source,
        }
    }

    pub fn set_source(&mut self, source: String) {
        match self {
            Cell::Code(c) => c.source = source,
            Cell::Markdown(c) => c.source = source,
            Cell::Raw(c) => c.source = source,
        }
    }

    pub fn metadata(&self) -> &CellMetadata {
        match self {
            Cell::Code(c) => &c.metadata,
            Cell::Markdown(c) => &c.metadata,
            Cell::Raw(c) => &c.metadata,
        }
    }

    pub fn metadata_mut(&mut self) -> &mut CellMetadata {
        match self {
            Cell::Code(c) => &mut c.metadata,
            Cell::Markdown(c) => &mut c.metadata,
            Cell::Raw(c) => &mut c.metadata,
        }
    }

    /// Convert this cell to another type, preserving source and metadata.
    ///
    /// Leaving the code type drops outputs and the execution count; entering
    /// it starts with empty outputs. Converting to the same type is a no-op.
    pub fn convert_to(self, to: CellType) -> Cell {
        if self.cell_type() == to {
            return self;
        }
        let metadata = self.metadata().clone();
        let source = match self {
            Cell::Code(c) => c.source,
            Cell::Markdown(c) => c.source,
            Cell::Raw(c) => c.source,
        };
        match to {
            CellType::Code => Cell::Code(CodeCell {
                source,
                execution_count: None,
                outputs: Vec::new(),
                metadata,
            }),
            CellType::Markdown => Cell::Markdown(MarkdownCell { source, metadata }),
            CellType::Raw => Cell::Raw(RawCell { source, metadata }),
        }
    }
}

//! Content entities: the tagged union over dummy, notebook, file, and
//! directory documents, plus the notebook document model itself.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use media::MediaBundle;
use serde::{Deserialize, Serialize};

use crate::refs::{CellId, ContentRef, KernelRef};
use crate::state::cells::Cell;

/// What kind of content an entry is, as reported by the contents API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContentKind {
    Notebook,
    File,
    Directory,
    Dummy,
}

/// Execution status of a cell while a kernel works on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CellStatus {
    Queued,
    Busy,
}

/// A pending stdin request from the kernel, shown as a prompt on the cell.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InputRequest {
    pub prompt: String,
    pub password: bool,
}

/// Location of one rich output inside the document, recorded so that
/// `update_display_data` can find every output sharing a display id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplayKeypath {
    pub cell_id: CellId,
    pub output_index: usize,
}

/// Per-notebook transient UI state. Never saved to disk.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TransientState {
    /// Execution status per cell; absence means idle.
    #[serde(default)]
    pub cell_statuses: HashMap<CellId, CellStatus>,
    /// Pending stdin prompts per cell.
    #[serde(default)]
    pub input_requests: HashMap<CellId, InputRequest>,
    /// Pager payloads per cell (help text from `?`-style introspection).
    #[serde(default)]
    pub pagers: HashMap<CellId, Vec<MediaBundle>>,
    /// display_id -> locations of outputs emitted under that id.
    #[serde(default)]
    pub keypaths_for_displays: HashMap<String, Vec<DisplayKeypath>>,
}

impl TransientState {
    /// Drop every piece of transient state attached to one cell.
    pub fn forget_cell(&mut self, id: &CellId) {
        self.cell_statuses.remove(id);
        self.input_requests.remove(id);
        self.pagers.remove(id);
        for keypaths in self.keypaths_for_displays.values_mut() {
            keypaths.retain(|kp| kp.cell_id != *id);
        }
        self.keypaths_for_displays.retain(|_, v| !v.is_empty());
    }
}

/// The notebook document: an ordered cell sequence keyed by cell id.
///
/// Invariant: `cell_order` contains each id exactly once, and the key set of
/// `cell_map` equals the id set of `cell_order`. Every mutation below
/// preserves this.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NotebookDocument {
    pub cell_order: Vec<CellId>,
    pub cell_map: HashMap<CellId, Cell>,
    pub nbformat: i32,
    pub nbformat_minor: i32,
    #[serde(default)]
    pub metadata: serde_json::Map<String, serde_json::Value>,
}

impl Default for NotebookDocument {
    fn default() -> Self {
        NotebookDocument {
            cell_order: Vec::new(),
            cell_map: HashMap::new(),
            nbformat: 4,
            nbformat_minor: 5,
            metadata: serde_json::Map::new(),
        }
    }
}

impl NotebookDocument {
    /// A notebook with a single empty code cell, the shape of a freshly
    /// created document.
    pub fn with_single_code_cell() -> (NotebookDocument, CellId) {
        let mut doc = NotebookDocument::default();
        let id = CellId::new();
        doc.cell_order.push(id);
        doc.cell_map.insert(id, Cell::empty_code());
        (doc, id)
    }

    pub fn len(&self) -> usize {
        self.cell_order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cell_order.is_empty()
    }

    pub fn index_of(&self, id: &CellId) -> Option<usize> {
        self.cell_order.iter().position(|c| c == id)
    }

    pub fn cell(&self, id: &CellId) -> Option<&Cell> {
        self.cell_map.get(id)
    }

    pub fn cell_mut(&mut self, id: &CellId) -> Option<&mut Cell> {
        self.cell_map.get_mut(id)
    }

    /// Insert a cell at an index in the order. Ignored if the id is already
    /// present (the order/map invariant wins over the caller).
    pub fn insert_cell_at(&mut self, index: usize, id: CellId, cell: Cell) {
        if self.cell_map.contains_key(&id) {
            return;
        }
        let index = index.min(self.cell_order.len());
        self.cell_order.insert(index, id);
        self.cell_map.insert(id, cell);
    }

    pub fn push_cell(&mut self, id: CellId, cell: Cell) {
        self.insert_cell_at(self.cell_order.len(), id, cell);
    }

    /// Remove a cell from both the order and the map.
    pub fn remove_cell(&mut self, id: &CellId) -> Option<Cell> {
        let index = self.index_of(id)?;
        self.cell_order.remove(index);
        self.cell_map.remove(id)
    }

    /// Whether the order/map invariant currently holds. Used by tests.
    pub fn is_consistent(&self) -> bool {
        if self.cell_order.len() != self.cell_map.len() {
            return false;
        }
        let mut seen = std::collections::HashSet::new();
        for id in &self.cell_order {
            if !seen.insert(*id) || !self.cell_map.contains_key(id) {
                return false;
            }
        }
        true
    }
}

/// The model owned by a notebook content entity.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NotebookModel {
    pub notebook: NotebookDocument,
    /// The kernel this notebook is bound to, if any.
    pub kernel_ref: Option<KernelRef>,
    /// Which cell has focus.
    pub cell_focused: Option<CellId>,
    /// Which cell's editor has sub-focus.
    pub editor_focused: Option<CellId>,
    /// The single shared clipboard slot; last cut/copy wins.
    pub copied: Option<Cell>,
    /// Unsaved edits exist.
    pub dirty: bool,
    #[serde(default)]
    pub transient: TransientState,
}

impl NotebookModel {
    /// A fresh single-cell notebook, focused on its only cell.
    pub fn new_empty() -> NotebookModel {
        let (notebook, first_cell) = NotebookDocument::with_single_code_cell();
        NotebookModel {
            notebook,
            cell_focused: Some(first_cell),
            ..NotebookModel::default()
        }
    }

    pub fn from_document(notebook: NotebookDocument) -> NotebookModel {
        let cell_focused = notebook.cell_order.first().copied();
        NotebookModel {
            notebook,
            cell_focused,
            ..NotebookModel::default()
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FileModel {
    pub text: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DirectoryModel {
    /// Child entries, each a dummy placeholder content until expanded.
    pub items: Vec<ContentRef>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DummyModel {
    /// What the entry will resolve to, when known (used for listings).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assumed_kind: Option<ContentKind>,
}

/// The variant-specific model of a content entity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentModel {
    Dummy(DummyModel),
    Notebook(NotebookModel),
    File(FileModel),
    Directory(DirectoryModel),
}

impl ContentModel {
    pub fn kind(&self) -> ContentKind {
        match self {
            ContentModel::Dummy(_) => ContentKind::Dummy,
            ContentModel::Notebook(_) => ContentKind::Notebook,
            ContentModel::File(_) => ContentKind::File,
            ContentModel::Directory(_) => ContentKind::Directory,
        }
    }

    pub fn as_notebook(&self) -> Option<&NotebookModel> {
        match self {
            ContentModel::Notebook(nb) => Some(nb),
            _ => None,
        }
    }

    pub fn as_notebook_mut(&mut self) -> Option<&mut NotebookModel> {
        match self {
            ContentModel::Notebook(nb) => Some(nb),
            _ => None,
        }
    }
}

/// One content entity. Exactly one record exists per [`ContentRef`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContentRecord {
    pub filepath: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mimetype: Option<String>,
    pub created: Option<DateTime<Utc>>,
    pub last_saved: Option<DateTime<Utc>>,
    pub loading: bool,
    pub saving: bool,
    pub error: Option<String>,
    pub model: ContentModel,
}

impl ContentRecord {
    /// The placeholder inserted while a fetch is in flight, so consumers can
    /// render a loading skeleton before the round-trip completes.
    pub fn dummy(filepath: impl Into<String>, assumed_kind: Option<ContentKind>) -> Self {
        ContentRecord {
            filepath: filepath.into(),
            mimetype: None,
            created: None,
            last_saved: None,
            loading: false,
            saving: false,
            error: None,
            model: ContentModel::Dummy(DummyModel { assumed_kind }),
        }
    }

    pub fn notebook(filepath: impl Into<String>, model: NotebookModel) -> Self {
        ContentRecord {
            filepath: filepath.into(),
            mimetype: None,
            created: None,
            last_saved: None,
            loading: false,
            saving: false,
            error: None,
            model: ContentModel::Notebook(model),
        }
    }
}

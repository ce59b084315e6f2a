//! Notebook-scoped selectors. These take the already-unwrapped
//! [`NotebookModel`] so callers pay for the variant check once, via
//! [`super::notebook_model`].

use crate::refs::{CellId, ContentRef};
use crate::state::cells::{Cell, CellType};
use crate::state::contents::{CellStatus, InputRequest, NotebookModel};
use crate::state::AppState;

pub fn cell_order(nb: &NotebookModel) -> &[CellId] {
    &nb.notebook.cell_order
}

pub fn cell<'a>(nb: &'a NotebookModel, id: &CellId) -> Option<&'a Cell> {
    nb.notebook.cell(id)
}

pub fn focused_cell(nb: &NotebookModel) -> Option<&Cell> {
    nb.cell_focused.as_ref().and_then(|id| nb.notebook.cell(id))
}

/// Ids of all code cells, in document order.
pub fn code_cell_ids(nb: &NotebookModel) -> Vec<CellId> {
    cell_ids_of_type(nb, CellType::Code)
}

pub fn markdown_cell_ids(nb: &NotebookModel) -> Vec<CellId> {
    cell_ids_of_type(nb, CellType::Markdown)
}

fn cell_ids_of_type(nb: &NotebookModel, cell_type: CellType) -> Vec<CellId> {
    nb.notebook
        .cell_order
        .iter()
        .filter(|id| {
            nb.notebook
                .cell(id)
                .map(|c| c.cell_type() == cell_type)
                .unwrap_or(false)
        })
        .copied()
        .collect()
}

/// Execution status for a cell; absence means idle.
pub fn cell_status(nb: &NotebookModel, id: &CellId) -> Option<CellStatus> {
    nb.transient.cell_statuses.get(id).copied()
}

pub fn input_request<'a>(nb: &'a NotebookModel, id: &CellId) -> Option<&'a InputRequest> {
    nb.transient.input_requests.get(id)
}

pub fn pagers<'a>(nb: &'a NotebookModel, id: &CellId) -> &'a [media::MediaBundle] {
    nb.transient
        .pagers
        .get(id)
        .map(|p| p.as_slice())
        .unwrap_or(&[])
}

pub fn is_dirty(nb: &NotebookModel) -> bool {
    nb.dirty
}

/// Display title for a content: the final path component, without the
/// `.ipynb` extension.
pub fn title(state: &AppState, content_ref: &ContentRef) -> Option<String> {
    let filepath = &super::content(state, content_ref)?.filepath;
    let name = filepath.rsplit('/').next().unwrap_or(filepath);
    Some(name.strip_suffix(".ipynb").unwrap_or(name).to_string())
}

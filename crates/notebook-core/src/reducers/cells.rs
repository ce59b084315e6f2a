//! Cell-structure reducer: the sub-dispatch applied within the notebook
//! content variant.
//!
//! Every operation here preserves the document invariant: `cell_order`
//! contains each id exactly once and `cell_map`'s key set equals the set of
//! ids in `cell_order`.

use log::{debug, warn};
use serde_json::Value;

use crate::actions::{Action, PayloadMessage};
use crate::refs::{CellId, ContentRef};
use crate::state::cells::{Cell, CellType};
use crate::state::contents::{CellStatus, DisplayKeypath, InputRequest, NotebookModel};
use crate::state::AppState;

/// Resolve the notebook model for a content ref, or bail out quietly: cell
/// actions are only legal on the notebook variant.
fn notebook_mut<'a>(
    state: &'a mut AppState,
    content_ref: &ContentRef,
) -> Option<&'a mut NotebookModel> {
    match state.core.entities.contents.by_ref.get_mut(content_ref) {
        Some(record) => {
            let kind = record.model.kind();
            let nb = record.model.as_notebook_mut();
            if nb.is_none() {
                debug!("cell action targets a {:?} content; ignoring", kind);
            }
            nb
        }
        None => None,
    }
}

pub(crate) fn reduce(state: &mut AppState, action: &Action) {
    match action {
        Action::FocusCell { content_ref, id } => {
            if let Some(nb) = notebook_mut(state, content_ref) {
                if nb.notebook.cell_map.contains_key(id) {
                    nb.cell_focused = Some(*id);
                }
            }
        }

        Action::FocusNextCell {
            content_ref,
            id,
            create_cell_if_undefined,
        } => {
            if let Some(nb) = notebook_mut(state, content_ref) {
                focus_next(nb, *id, *create_cell_if_undefined);
            }
        }

        Action::FocusPreviousCell { content_ref, id } => {
            if let Some(nb) = notebook_mut(state, content_ref) {
                let anchor = id.or(nb.cell_focused);
                if let Some(index) = anchor.and_then(|a| nb.notebook.index_of(&a)) {
                    if index > 0 {
                        nb.cell_focused = Some(nb.notebook.cell_order[index - 1]);
                    }
                }
            }
        }

        Action::FocusCellEditor { content_ref, id } => {
            if let Some(nb) = notebook_mut(state, content_ref) {
                nb.editor_focused = *id;
            }
        }

        Action::FocusNextCellEditor { content_ref, id } => {
            if let Some(nb) = notebook_mut(state, content_ref) {
                let anchor = id.or(nb.editor_focused);
                if let Some(index) = anchor.and_then(|a| nb.notebook.index_of(&a)) {
                    if index + 1 < nb.notebook.len() {
                        nb.editor_focused = Some(nb.notebook.cell_order[index + 1]);
                    }
                }
            }
        }

        Action::FocusPreviousCellEditor { content_ref, id } => {
            if let Some(nb) = notebook_mut(state, content_ref) {
                let anchor = id.or(nb.editor_focused);
                if let Some(index) = anchor.and_then(|a| nb.notebook.index_of(&a)) {
                    if index > 0 {
                        nb.editor_focused = Some(nb.notebook.cell_order[index - 1]);
                    }
                }
            }
        }

        Action::CreateCellAbove {
            content_ref,
            id,
            cell_type,
            source,
        } => {
            if let Some(nb) = notebook_mut(state, content_ref) {
                let anchor = id.or(nb.cell_focused);
                let index = anchor.and_then(|a| nb.notebook.index_of(&a)).unwrap_or(0);
                nb.notebook
                    .insert_cell_at(index, CellId::new(), Cell::of_type(*cell_type, source));
                nb.dirty = true;
            }
        }

        Action::CreateCellBelow {
            content_ref,
            id,
            cell_type,
            source,
        } => {
            if let Some(nb) = notebook_mut(state, content_ref) {
                let anchor = id.or(nb.cell_focused);
                insert_below_anchor(nb, anchor, *cell_type, source);
                nb.dirty = true;
            }
        }

        Action::CreateCellAppend {
            content_ref,
            cell_type,
            source,
        } => {
            if let Some(nb) = notebook_mut(state, content_ref) {
                nb.notebook
                    .push_cell(CellId::new(), Cell::of_type(*cell_type, source));
                nb.dirty = true;
            }
        }

        Action::DeleteCell { content_ref, id } => {
            if let Some(nb) = notebook_mut(state, content_ref) {
                if let Some(target) = id.or(nb.cell_focused) {
                    if remove_cell(nb, &target).is_some() {
                        nb.dirty = true;
                    }
                }
            }
        }

        Action::CutCell { content_ref, id } => {
            if let Some(nb) = notebook_mut(state, content_ref) {
                if let Some(target) = id.or(nb.cell_focused) {
                    // Last cut wins: the clipboard is a single shared slot.
                    if let Some(cell) = remove_cell(nb, &target) {
                        nb.copied = Some(cell);
                        nb.dirty = true;
                    }
                }
            }
        }

        Action::CopyCell { content_ref, id } => {
            if let Some(nb) = notebook_mut(state, content_ref) {
                if let Some(target) = id.or(nb.cell_focused) {
                    if let Some(cell) = nb.notebook.cell(&target) {
                        nb.copied = Some(cell.clone());
                    }
                }
            }
        }

        Action::PasteCell { content_ref } => {
            if let Some(nb) = notebook_mut(state, content_ref) {
                // Clone under a fresh id so pasting twice never collides.
                if let Some(cell) = nb.copied.clone() {
                    let anchor = nb.cell_focused;
                    let index = anchor
                        .and_then(|a| nb.notebook.index_of(&a))
                        .map(|i| i + 1)
                        .unwrap_or(nb.notebook.len());
                    nb.notebook.insert_cell_at(index, CellId::new(), cell);
                    nb.dirty = true;
                }
            }
        }

        Action::MoveCell {
            content_ref,
            id,
            destination_id,
            above,
        } => {
            if let Some(nb) = notebook_mut(state, content_ref) {
                move_cell(nb, id, destination_id, *above);
            }
        }

        Action::ChangeCellType {
            content_ref,
            id,
            to,
        } => {
            if let Some(nb) = notebook_mut(state, content_ref) {
                if let Some(target) = id.or(nb.cell_focused) {
                    if let Some(cell) = nb.notebook.cell_map.remove(&target) {
                        let changed = cell.cell_type() != *to;
                        nb.notebook.cell_map.insert(target, cell.convert_to(*to));
                        if changed {
                            nb.dirty = true;
                        }
                    }
                }
            }
        }

        Action::SetInCell {
            content_ref,
            id,
            path,
            value,
        } => {
            if let Some(nb) = notebook_mut(state, content_ref) {
                set_in_cell(nb, id, path, value);
            }
        }

        Action::ToggleTagInCell {
            content_ref,
            id,
            tag,
        } => {
            if let Some(nb) = notebook_mut(state, content_ref) {
                if let Some(cell) = nb.notebook.cell_mut(id) {
                    let tags = &mut cell.metadata_mut().tags;
                    if !tags.remove(tag) {
                        tags.insert(tag.clone());
                    }
                    nb.dirty = true;
                }
            }
        }

        Action::ToggleCellInputVisibility { content_ref, id } => {
            if let Some(nb) = notebook_mut(state, content_ref) {
                if let Some(target) = id.or(nb.cell_focused) {
                    if let Some(cell) = nb.notebook.cell_mut(&target) {
                        let metadata = cell.metadata_mut();
                        metadata.input_hidden = !metadata.input_hidden;
                    }
                }
            }
        }

        Action::ToggleCellOutputVisibility { content_ref, id } => {
            if let Some(nb) = notebook_mut(state, content_ref) {
                if let Some(target) = id.or(nb.cell_focused) {
                    if let Some(cell) = nb.notebook.cell_mut(&target) {
                        let metadata = cell.metadata_mut();
                        metadata.output_hidden = !metadata.output_hidden;
                    }
                }
            }
        }

        Action::UnhideAll {
            content_ref,
            input_hidden,
            output_hidden,
        } => {
            if let Some(nb) = notebook_mut(state, content_ref) {
                for cell in nb.notebook.cell_map.values_mut() {
                    let metadata = cell.metadata_mut();
                    if let Some(hidden) = input_hidden {
                        metadata.input_hidden = *hidden;
                    }
                    if let Some(hidden) = output_hidden {
                        metadata.output_hidden = *hidden;
                    }
                }
            }
        }

        Action::ToggleOutputExpansion { content_ref, id } => {
            if let Some(nb) = notebook_mut(state, content_ref) {
                if let Some(cell) = nb.notebook.cell_mut(id) {
                    let metadata = cell.metadata_mut();
                    metadata.output_expanded = !metadata.output_expanded;
                }
            }
        }

        Action::ClearOutputs { content_ref, id } => {
            if let Some(nb) = notebook_mut(state, content_ref) {
                if let Some(target) = id.or(nb.cell_focused) {
                    clear_cell_outputs(nb, &target);
                    nb.dirty = true;
                }
            }
        }

        Action::ClearAllOutputs { content_ref } => {
            if let Some(nb) = notebook_mut(state, content_ref) {
                let ids: Vec<CellId> = nb.notebook.cell_order.clone();
                for id in ids {
                    clear_cell_outputs(nb, &id);
                }
                nb.transient.keypaths_for_displays.clear();
                nb.dirty = true;
            }
        }

        Action::AppendOutput {
            content_ref,
            id,
            output,
        } => {
            if let Some(nb) = notebook_mut(state, content_ref) {
                let display_id = output.display_id().map(|s| s.to_string());
                if let Some(Cell::Code(code)) = nb.notebook.cell_mut(id) {
                    code.outputs.push(output.clone());
                    let output_index = code.outputs.len() - 1;
                    if let Some(display_id) = display_id {
                        nb.transient
                            .keypaths_for_displays
                            .entry(display_id)
                            .or_default()
                            .push(DisplayKeypath {
                                cell_id: *id,
                                output_index,
                            });
                    }
                }
            }
        }

        Action::UpdateDisplay {
            content_ref,
            display_id,
            data,
            metadata,
        } => {
            if let Some(nb) = notebook_mut(state, content_ref) {
                let keypaths = nb
                    .transient
                    .keypaths_for_displays
                    .get(display_id)
                    .cloned()
                    .unwrap_or_default();
                for keypath in keypaths {
                    if let Some(Cell::Code(code)) = nb.notebook.cell_mut(&keypath.cell_id) {
                        if let Some(output) = code.outputs.get_mut(keypath.output_index) {
                            output.update_display_data(data.clone(), metadata.clone());
                        }
                    }
                }
            }
        }

        Action::AcceptPayloadMessage {
            content_ref,
            id,
            payload,
        } => {
            if let Some(nb) = notebook_mut(state, content_ref) {
                match payload {
                    PayloadMessage::Page { data } => {
                        nb.transient.pagers.entry(*id).or_default().push(data.clone());
                    }
                    PayloadMessage::SetNextInput { text, replace } => {
                        if *replace {
                            if let Some(cell) = nb.notebook.cell_mut(id) {
                                cell.set_source(text.clone());
                                nb.dirty = true;
                            }
                        } else {
                            insert_below_anchor(nb, Some(*id), CellType::Code, text);
                            nb.dirty = true;
                        }
                    }
                }
            }
        }

        Action::SendExecuteRequest { content_ref, id } => {
            if let Some(nb) = notebook_mut(state, content_ref) {
                nb.transient.cell_statuses.insert(*id, CellStatus::Queued);
                nb.transient.pagers.remove(id);
                nb.transient.input_requests.remove(id);
            }
        }

        Action::ExecuteCanceled { content_ref, id } => {
            if let Some(nb) = notebook_mut(state, content_ref) {
                nb.transient.cell_statuses.remove(id);
            }
        }

        Action::UpdateCellStatus {
            content_ref,
            id,
            status,
        } => {
            if let Some(nb) = notebook_mut(state, content_ref) {
                match status {
                    Some(status) => {
                        nb.transient.cell_statuses.insert(*id, *status);
                    }
                    None => {
                        nb.transient.cell_statuses.remove(id);
                    }
                }
            }
        }

        Action::PromptInputRequest {
            content_ref,
            id,
            prompt,
            password,
        } => {
            if let Some(nb) = notebook_mut(state, content_ref) {
                nb.transient.input_requests.insert(
                    *id,
                    InputRequest {
                        prompt: prompt.clone(),
                        password: *password,
                    },
                );
            }
        }

        Action::SendInputReply {
            content_ref, id, ..
        } => {
            if let Some(nb) = notebook_mut(state, content_ref) {
                nb.transient.input_requests.remove(id);
            }
        }

        _ => {}
    }
}

/// Focus the cell after the anchor, appending a new empty code cell when
/// asked to and there is nothing to focus (anchor is last, the notebook is
/// empty, or no cell is focused).
fn focus_next(nb: &mut NotebookModel, id: Option<CellId>, create_cell_if_undefined: bool) {
    let anchor = id.or(nb.cell_focused);
    match anchor.and_then(|a| nb.notebook.index_of(&a)) {
        Some(index) if index + 1 < nb.notebook.len() => {
            nb.cell_focused = Some(nb.notebook.cell_order[index + 1]);
        }
        _ if create_cell_if_undefined => {
            let new_id = CellId::new();
            nb.notebook.push_cell(new_id, Cell::empty_code());
            nb.cell_focused = Some(new_id);
            nb.dirty = true;
        }
        _ => {}
    }
}

fn insert_below_anchor(
    nb: &mut NotebookModel,
    anchor: Option<CellId>,
    cell_type: CellType,
    source: &str,
) {
    let index = anchor
        .and_then(|a| nb.notebook.index_of(&a))
        .map(|i| i + 1)
        .unwrap_or(nb.notebook.len());
    nb.notebook
        .insert_cell_at(index, CellId::new(), Cell::of_type(cell_type, source));
}

/// Remove a cell along with its transient state, fixing up focus pointers.
fn remove_cell(nb: &mut NotebookModel, id: &CellId) -> Option<Cell> {
    let index = nb.notebook.index_of(id)?;
    let cell = nb.notebook.remove_cell(id)?;
    nb.transient.forget_cell(id);
    if nb.cell_focused == Some(*id) {
        // Prefer the cell that slid into the removed slot, else the previous.
        nb.cell_focused = nb
            .notebook
            .cell_order
            .get(index)
            .or_else(|| nb.notebook.cell_order.get(index.wrapping_sub(1)))
            .copied();
    }
    if nb.editor_focused == Some(*id) {
        nb.editor_focused = None;
    }
    Some(cell)
}

fn move_cell(nb: &mut NotebookModel, id: &CellId, destination_id: &CellId, above: bool) {
    if id == destination_id {
        return;
    }
    let source_index = match nb.notebook.index_of(id) {
        Some(index) => index,
        None => return,
    };
    if nb.notebook.index_of(destination_id).is_none() {
        return;
    }
    nb.notebook.cell_order.remove(source_index);
    // Recompute after removal; the destination may have shifted.
    let dest_index = match nb.notebook.index_of(destination_id) {
        Some(index) => index,
        None => return,
    };
    let insert_at = if above { dest_index } else { dest_index + 1 };
    nb.notebook.cell_order.insert(insert_at, *id);
    nb.dirty = true;
}

fn clear_cell_outputs(nb: &mut NotebookModel, id: &CellId) {
    if let Some(Cell::Code(code)) = nb.notebook.cell_mut(id) {
        code.outputs.clear();
        code.execution_count = None;
    }
    for keypaths in nb.transient.keypaths_for_displays.values_mut() {
        keypaths.retain(|kp| kp.cell_id != *id);
    }
    nb.transient.keypaths_for_displays.retain(|_, v| !v.is_empty());
}

/// The generic path+value setter. Known paths get typed handling; anything
/// else lands in the cell's passthrough metadata or is dropped with a
/// warning.
fn set_in_cell(nb: &mut NotebookModel, id: &CellId, path: &[String], value: &Value) {
    let Some(cell) = nb.notebook.cell_mut(id) else {
        return;
    };
    match path.first().map(|s| s.as_str()) {
        Some("source") => {
            cell.set_source(value.as_str().map(|s| s.to_string()).unwrap_or_default());
            nb.dirty = true;
        }
        Some("execution_count") => {
            if let Cell::Code(code) = cell {
                code.execution_count = value.as_i64().map(|n| n as i32);
            }
        }
        Some("metadata") if path.len() == 2 => {
            cell.metadata_mut()
                .additional
                .insert(path[1].clone(), value.clone());
            nb.dirty = true;
        }
        other => {
            warn!("set_in_cell: unsupported path {:?}", other);
        }
    }
}

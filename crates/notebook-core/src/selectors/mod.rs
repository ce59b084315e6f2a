//! Read-side derivations over [`AppState`].
//!
//! Every selector is a pure function of the state plus keyed arguments.
//! Lookups that can legitimately miss return `Option`; the one place a
//! caller asserts a variant (`notebook_model`) returns a typed error
//! instead, so notebook-only consumers get a diagnosable failure rather
//! than a silent `None`.

pub mod cache;
pub mod notebook;

use thiserror::Error;

use crate::refs::{ContentRef, KernelRef};
use crate::state::contents::{ContentKind, ContentModel, ContentRecord, NotebookModel};
use crate::state::kernels::KernelRecord;
use crate::state::kernelspecs::{Kernelspec, KernelspecsByRefRecord};
use crate::state::AppState;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SelectorError {
    #[error("no content for ref {0}")]
    ContentMissing(ContentRef),
    #[error("content {content_ref} is a {actual:?}, expected a notebook")]
    NotANotebook {
        content_ref: ContentRef,
        actual: ContentKind,
    },
}

/// Direct keyed lookup. Missing refs are an expected condition, not an
/// error.
pub fn content<'a>(state: &'a AppState, content_ref: &ContentRef) -> Option<&'a ContentRecord> {
    state.core.entities.contents.by_ref.get(content_ref)
}

/// The variant-specific model of a content, if the content exists.
pub fn model<'a>(state: &'a AppState, content_ref: &ContentRef) -> Option<&'a ContentModel> {
    content(state, content_ref).map(|record| &record.model)
}

/// The notebook model behind a ref, or a typed error naming what was
/// actually there.
pub fn notebook_model<'a>(
    state: &'a AppState,
    content_ref: &ContentRef,
) -> Result<&'a NotebookModel, SelectorError> {
    let record =
        content(state, content_ref).ok_or(SelectorError::ContentMissing(*content_ref))?;
    record
        .model
        .as_notebook()
        .ok_or(SelectorError::NotANotebook {
            content_ref: *content_ref,
            actual: record.model.kind(),
        })
}

/// Two-hop join: content -> bound kernel ref -> kernel record. `None` at
/// either hop.
pub fn kernel_by_content_ref<'a>(
    state: &'a AppState,
    content_ref: &ContentRef,
) -> Option<&'a KernelRecord> {
    let kernel_ref = model(state, content_ref)?.as_notebook()?.kernel_ref?;
    kernel(state, &kernel_ref)
}

pub fn kernel<'a>(state: &'a AppState, kernel_ref: &KernelRef) -> Option<&'a KernelRecord> {
    state.core.entities.kernels.by_ref.get(kernel_ref)
}

/// Reverse lookup by filepath. Linear in the number of open contents,
/// which stays small in practice.
pub fn content_ref_by_filepath(state: &AppState, filepath: &str) -> Option<ContentRef> {
    state
        .core
        .entities
        .contents
        .by_ref
        .iter()
        .find(|(_, record)| record.filepath == filepath)
        .map(|(content_ref, _)| *content_ref)
}

/// The kernelspec catalog the "current" pointer designates, if set and
/// fetched.
pub fn current_kernelspecs(state: &AppState) -> Option<&KernelspecsByRefRecord> {
    let kernelspecs_ref = state.core.current_kernelspecs_ref?;
    state.core.entities.kernelspecs.by_ref.get(&kernelspecs_ref)
}

/// The kernelspec record backing a running kernel, joined by name through
/// the current catalog.
pub fn kernelspec_by_kernel<'a>(
    state: &'a AppState,
    kernel_ref: &KernelRef,
) -> Option<&'a Kernelspec> {
    let name = kernel(state, kernel_ref)?.kernelspec_name.as_deref()?;
    current_kernelspecs(state)?.by_name.get(name)
}

/// The first MIME type of an output that both carries data and has a
/// registered transform, in display-order priority.
pub fn richest_media_type<'a>(state: &'a AppState, output: &media::Output) -> Option<&'a str> {
    let transforms = &state.core.entities.transforms;
    media::richest_media_type(output, &transforms.display_order, &transforms.by_id)
}

pub fn modal_type(state: &AppState) -> Option<&str> {
    state.core.entities.modals.modal_type.as_deref()
}

pub fn theme(state: &AppState) -> &str {
    state
        .config
        .get("theme")
        .and_then(|v| v.as_str())
        .unwrap_or("light")
}

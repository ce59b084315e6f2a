//! Content lifecycle reducer: fetch, save, rename, create, dispose.

use chrono::Utc;
use log::{debug, warn};

use crate::actions::{Action, FetchedContent};
use crate::state::contents::{
    ContentKind, ContentModel, ContentRecord, DirectoryModel, FileModel, NotebookModel,
};
use crate::state::AppState;

pub(crate) fn reduce(state: &mut AppState, action: &Action) {
    match action {
        Action::FetchContent {
            content_ref,
            filepath,
        } => {
            // Insert a dummy placeholder immediately so consumers can render
            // a loading skeleton before the round-trip completes. A refetch
            // of an existing record just flips its loading flag.
            let record = state
                .core
                .entities
                .contents
                .by_ref
                .entry(*content_ref)
                .or_insert_with(|| ContentRecord::dummy(filepath.clone(), None));
            record.loading = true;
            record.error = None;
        }

        Action::FetchContentFulfilled {
            content_ref,
            filepath,
            model,
            created,
            last_saved,
        } => {
            // Replace the record wholesale at the same ref. The variant tag
            // of a resolved record never changes in place.
            let model = resolve_model(state, model);
            let record = ContentRecord {
                filepath: filepath.clone(),
                mimetype: fetched_mimetype(action),
                created: *created,
                last_saved: *last_saved,
                loading: false,
                saving: false,
                error: None,
                model,
            };
            state
                .core
                .entities
                .contents
                .by_ref
                .insert(*content_ref, record);
        }

        Action::FetchContentFailed {
            content_ref,
            filepath,
            error,
        } => {
            if let Some(record) = state.core.entities.contents.by_ref.get_mut(content_ref) {
                record.loading = false;
                record.error = Some(error.clone());
                debug!("fetch failed for {}: {}", filepath, error);
            }
        }

        Action::Save { content_ref } | Action::PublishToBookstore { content_ref } => {
            if let Some(record) = state.core.entities.contents.by_ref.get_mut(content_ref) {
                record.saving = true;
            }
        }

        Action::SaveFulfilled {
            content_ref,
            last_saved,
        } => {
            if let Some(record) = state.core.entities.contents.by_ref.get_mut(content_ref) {
                record.saving = false;
                record.error = None;
                record.last_saved = Some(last_saved.unwrap_or_else(Utc::now));
                if let Some(nb) = record.model.as_notebook_mut() {
                    nb.dirty = false;
                }
            }
        }

        Action::SaveFailed { content_ref, error }
        | Action::PublishToBookstoreFailed { content_ref, error } => {
            // Prior state stays intact; the failure is surfaced, not rolled
            // back into a deleted or reset record.
            if let Some(record) = state.core.entities.contents.by_ref.get_mut(content_ref) {
                record.saving = false;
                record.error = Some(error.clone());
            }
        }

        Action::PublishToBookstoreSucceeded { content_ref } => {
            if let Some(record) = state.core.entities.contents.by_ref.get_mut(content_ref) {
                record.saving = false;
                record.error = None;
            }
        }

        Action::SaveAs {
            content_ref,
            filepath,
        } => {
            if let Some(record) = state.core.entities.contents.by_ref.get_mut(content_ref) {
                record.saving = true;
                record.filepath = filepath.clone();
            }
        }

        Action::SaveAsFulfilled {
            content_ref,
            filepath,
            last_saved,
        } => {
            if let Some(record) = state.core.entities.contents.by_ref.get_mut(content_ref) {
                record.saving = false;
                record.error = None;
                record.filepath = filepath.clone();
                record.last_saved = Some(last_saved.unwrap_or_else(Utc::now));
                if let Some(nb) = record.model.as_notebook_mut() {
                    nb.dirty = false;
                }
            }
        }

        Action::SaveAsFailed { content_ref, error } => {
            if let Some(record) = state.core.entities.contents.by_ref.get_mut(content_ref) {
                record.saving = false;
                record.error = Some(error.clone());
            }
        }

        // Optimistic rename: apply the new filepath now, revert on failure.
        Action::ChangeContentName {
            content_ref,
            filepath,
            ..
        } => {
            if let Some(record) = state.core.entities.contents.by_ref.get_mut(content_ref) {
                record.filepath = filepath.clone();
            }
        }

        Action::ChangeContentNameFulfilled {
            content_ref,
            filepath,
            ..
        } => {
            if let Some(record) = state.core.entities.contents.by_ref.get_mut(content_ref) {
                record.filepath = filepath.clone();
                record.error = None;
            }
        }

        Action::ChangeContentNameFailed {
            content_ref,
            prev_file_path,
            error,
            ..
        } => {
            if let Some(record) = state.core.entities.contents.by_ref.get_mut(content_ref) {
                record.filepath = prev_file_path.clone();
                record.error = Some(error.clone());
            }
        }

        Action::NewNotebook {
            content_ref,
            kernel_ref,
            filepath,
            ..
        } => {
            let mut model = NotebookModel::new_empty();
            model.kernel_ref = *kernel_ref;
            state
                .core
                .entities
                .contents
                .by_ref
                .insert(*content_ref, ContentRecord::notebook(filepath.clone(), model));
        }

        Action::UpdateFileText { content_ref, text } => {
            if let Some(record) = state.core.entities.contents.by_ref.get_mut(content_ref) {
                match &mut record.model {
                    ContentModel::File(file) => file.text = text.clone(),
                    other => warn!(
                        "update_file_text targets a {:?} content; ignoring",
                        other.kind()
                    ),
                }
            }
        }

        Action::ExecuteFailed { content_ref, error } => {
            if let Some(record) = state.core.entities.contents.by_ref.get_mut(content_ref) {
                record.error = Some(error.clone());
            }
        }

        Action::DisposeContent { content_ref } => {
            state.core.entities.contents.by_ref.remove(content_ref);
        }

        // Consumed by the async runner only.
        Action::CloseNotebook { .. } | Action::DownloadContent { .. } => {}

        _ => {}
    }
}

/// Turn a fetched payload into a content model, creating dummy child
/// records for directory listings.
fn resolve_model(state: &mut AppState, fetched: &FetchedContent) -> ContentModel {
    match fetched {
        FetchedContent::Notebook { content } => {
            ContentModel::Notebook(NotebookModel::from_document(content.clone()))
        }
        FetchedContent::File { content, .. } => ContentModel::File(FileModel {
            text: content.clone(),
        }),
        FetchedContent::Directory { items } => {
            let mut sorted = items.clone();
            // Directories first, then everything else, each group by name.
            sorted.sort_by(|a, b| {
                let a_dir = a.kind == ContentKind::Directory;
                let b_dir = b.kind == ContentKind::Directory;
                b_dir
                    .cmp(&a_dir)
                    .then_with(|| a.name.to_lowercase().cmp(&b.name.to_lowercase()))
            });
            let mut child_refs = Vec::with_capacity(sorted.len());
            for item in &sorted {
                let child_ref = crate::refs::ContentRef::new();
                state.core.entities.contents.by_ref.insert(
                    child_ref,
                    ContentRecord::dummy(item.path.clone(), Some(item.kind)),
                );
                child_refs.push(child_ref);
            }
            ContentModel::Directory(DirectoryModel { items: child_refs })
        }
    }
}

fn fetched_mimetype(action: &Action) -> Option<String> {
    match action {
        Action::FetchContentFulfilled {
            model: FetchedContent::File { mimetype, .. },
            ..
        } => mimetype.clone(),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::refs::ContentRef;
    use crate::state::contents::NotebookDocument;
    use crate::store::Store;

    fn fetch_notebook(store: &mut Store, content_ref: ContentRef, filepath: &str) {
        store.dispatch(Action::FetchContent {
            content_ref,
            filepath: filepath.to_string(),
        });
        store.dispatch(Action::FetchContentFulfilled {
            content_ref,
            filepath: filepath.to_string(),
            model: FetchedContent::Notebook {
                content: NotebookDocument::with_single_code_cell().0,
            },
            created: None,
            last_saved: None,
        });
    }

    #[test]
    fn test_fetch_inserts_dummy_placeholder_immediately() {
        let mut store = Store::new();
        let content_ref = ContentRef::new();
        store.dispatch(Action::FetchContent {
            content_ref,
            filepath: "nb.ipynb".to_string(),
        });

        let record = &store.state().core.entities.contents.by_ref[&content_ref];
        assert_eq!(record.model.kind(), ContentKind::Dummy);
        assert!(record.loading);
        assert_eq!(record.filepath, "nb.ipynb");
    }

    #[test]
    fn test_fulfilled_replaces_variant_preserving_ref() {
        let mut store = Store::new();
        let content_ref = ContentRef::new();
        fetch_notebook(&mut store, content_ref, "nb.ipynb");

        let record = &store.state().core.entities.contents.by_ref[&content_ref];
        assert_eq!(record.model.kind(), ContentKind::Notebook);
        assert!(!record.loading);
    }

    #[test]
    fn test_fetch_failed_records_error_and_keeps_record() {
        let mut store = Store::new();
        let content_ref = ContentRef::new();
        store.dispatch(Action::FetchContent {
            content_ref,
            filepath: "gone.ipynb".to_string(),
        });
        store.dispatch(Action::FetchContentFailed {
            content_ref,
            filepath: "gone.ipynb".to_string(),
            error: "404".to_string(),
        });

        let record = &store.state().core.entities.contents.by_ref[&content_ref];
        assert_eq!(record.error.as_deref(), Some("404"));
        assert!(!record.loading);
        assert_eq!(record.model.kind(), ContentKind::Dummy);
    }

    #[test]
    fn test_directory_listing_creates_dummy_children_sorted() {
        let mut store = Store::new();
        let content_ref = ContentRef::new();
        store.dispatch(Action::FetchContentFulfilled {
            content_ref,
            filepath: "/".to_string(),
            model: FetchedContent::Directory {
                items: vec![
                    crate::actions::DirectoryItem {
                        name: "b.ipynb".to_string(),
                        path: "/b.ipynb".to_string(),
                        kind: ContentKind::Notebook,
                        last_modified: None,
                    },
                    crate::actions::DirectoryItem {
                        name: "sub".to_string(),
                        path: "/sub".to_string(),
                        kind: ContentKind::Directory,
                        last_modified: None,
                    },
                ],
            },
            created: None,
            last_saved: None,
        });

        let state = store.state();
        let record = &state.core.entities.contents.by_ref[&content_ref];
        let items = match &record.model {
            ContentModel::Directory(dir) => &dir.items,
            other => panic!("expected directory, got {:?}", other.kind()),
        };
        assert_eq!(items.len(), 2);
        // Directory entry sorts ahead of the notebook.
        let first = &state.core.entities.contents.by_ref[&items[0]];
        assert_eq!(first.filepath, "/sub");
        assert_eq!(first.model.kind(), ContentKind::Dummy);
    }

    #[test]
    fn test_save_fulfilled_stamps_last_saved_and_clears_dirty() {
        let mut store = Store::new();
        let content_ref = ContentRef::new();
        fetch_notebook(&mut store, content_ref, "nb.ipynb");
        store.dispatch(Action::CreateCellAppend {
            content_ref,
            cell_type: crate::state::cells::CellType::Code,
            source: "x = 1".to_string(),
        });
        assert!(store.state().core.entities.contents.by_ref[&content_ref]
            .model
            .as_notebook()
            .unwrap()
            .dirty);

        store.dispatch(Action::Save { content_ref });
        assert!(store.state().core.entities.contents.by_ref[&content_ref].saving);

        store.dispatch(Action::SaveFulfilled {
            content_ref,
            last_saved: None,
        });
        let record = &store.state().core.entities.contents.by_ref[&content_ref];
        assert!(!record.saving);
        assert!(record.last_saved.is_some());
        assert!(!record.model.as_notebook().unwrap().dirty);
    }

    #[test]
    fn test_save_failed_surfaces_error_without_rollback() {
        let mut store = Store::new();
        let content_ref = ContentRef::new();
        fetch_notebook(&mut store, content_ref, "nb.ipynb");
        store.dispatch(Action::Save { content_ref });
        store.dispatch(Action::SaveFailed {
            content_ref,
            error: "disk full".to_string(),
        });

        let record = &store.state().core.entities.contents.by_ref[&content_ref];
        assert_eq!(record.error.as_deref(), Some("disk full"));
        assert!(!record.saving);
        assert_eq!(record.model.kind(), ContentKind::Notebook);
    }

    #[test]
    fn test_rename_is_optimistic_and_reverts_on_failure() {
        let mut store = Store::new();
        let content_ref = ContentRef::new();
        fetch_notebook(&mut store, content_ref, "old.ipynb");

        store.dispatch(Action::ChangeContentName {
            content_ref,
            filepath: "new.ipynb".to_string(),
            prev_file_path: "old.ipynb".to_string(),
        });
        assert_eq!(
            store.state().core.entities.contents.by_ref[&content_ref].filepath,
            "new.ipynb"
        );

        store.dispatch(Action::ChangeContentNameFailed {
            content_ref,
            filepath: "new.ipynb".to_string(),
            prev_file_path: "old.ipynb".to_string(),
            error: "name taken".to_string(),
        });
        let record = &store.state().core.entities.contents.by_ref[&content_ref];
        assert_eq!(record.filepath, "old.ipynb");
        assert_eq!(record.error.as_deref(), Some("name taken"));
    }

    #[test]
    fn test_new_notebook_creates_single_cell_document() {
        let mut store = Store::new();
        let content_ref = ContentRef::new();
        store.dispatch(Action::NewNotebook {
            content_ref,
            kernel_ref: None,
            kernelspec_name: Some("python3".to_string()),
            cwd: "/".to_string(),
            filepath: "Untitled.ipynb".to_string(),
        });

        let record = &store.state().core.entities.contents.by_ref[&content_ref];
        let nb = record.model.as_notebook().unwrap();
        assert_eq!(nb.notebook.len(), 1);
        assert!(nb.kernel_ref.is_none());
    }

    #[test]
    fn test_dispose_removes_record() {
        let mut store = Store::new();
        let content_ref = ContentRef::new();
        fetch_notebook(&mut store, content_ref, "nb.ipynb");
        store.dispatch(Action::DisposeContent { content_ref });
        assert!(!store
            .state()
            .core
            .entities
            .contents
            .by_ref
            .contains_key(&content_ref));
    }

    #[test]
    fn test_update_file_text_sets_text_on_file_variant() {
        let mut store = Store::new();
        let content_ref = ContentRef::new();
        store.dispatch(Action::FetchContentFulfilled {
            content_ref,
            filepath: "notes.md".to_string(),
            model: FetchedContent::File {
                content: "old".to_string(),
                mimetype: Some("text/markdown".to_string()),
            },
            created: None,
            last_saved: None,
        });
        store.dispatch(Action::UpdateFileText {
            content_ref,
            text: "new".to_string(),
        });

        let record = &store.state().core.entities.contents.by_ref[&content_ref];
        match &record.model {
            ContentModel::File(file) => assert_eq!(file.text, "new"),
            other => panic!("expected file, got {:?}", other.kind()),
        }
        assert_eq!(record.mimetype.as_deref(), Some("text/markdown"));
    }

    #[test]
    fn test_actions_for_missing_refs_are_no_ops() {
        let mut store = Store::new();
        let content_ref = ContentRef::new();
        store.dispatch(Action::SaveFulfilled {
            content_ref,
            last_saved: None,
        });
        store.dispatch(Action::UpdateFileText {
            content_ref,
            text: "x".to_string(),
        });
        assert!(store.state().core.entities.contents.by_ref.is_empty());
    }
}

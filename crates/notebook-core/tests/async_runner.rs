//! Exercises the provider seam the way an async runner would: await the
//! collaborator, then feed its outcome back into the store as
//! fulfilled/failed actions.

use notebook_core::actions::{Action, FetchedContent};
use notebook_core::providers::{ContentProvider, InMemoryContentProvider, ProviderError};
use notebook_core::refs::{CellId, ContentRef};
use notebook_core::selectors;
use notebook_core::state::cells::{Cell, CellType};
use notebook_core::state::contents::{ContentKind, NotebookDocument};
use notebook_core::Store;

async fn run_fetch(
    store: &mut Store,
    provider: &InMemoryContentProvider,
    content_ref: ContentRef,
    filepath: &str,
) {
    store.dispatch(Action::FetchContent {
        content_ref,
        filepath: filepath.to_string(),
    });
    match provider.fetch(filepath).await {
        Ok(model) => store.dispatch(Action::FetchContentFulfilled {
            content_ref,
            filepath: filepath.to_string(),
            model,
            created: None,
            last_saved: None,
        }),
        Err(err) => store.dispatch(Action::FetchContentFailed {
            content_ref,
            filepath: filepath.to_string(),
            error: err.to_string(),
        }),
    }
}

#[tokio::test]
async fn fetch_round_trip_lands_in_the_store() {
    let provider = InMemoryContentProvider::new();
    let mut doc = NotebookDocument::default();
    doc.push_cell(CellId::new(), Cell::of_type(CellType::Code, "1 + 1"));
    provider.insert("scratch.ipynb", FetchedContent::Notebook { content: doc });

    let mut store = Store::new();
    let content_ref = ContentRef::new();
    run_fetch(&mut store, &provider, content_ref, "scratch.ipynb").await;

    let nb = selectors::notebook_model(store.state(), &content_ref).unwrap();
    assert_eq!(nb.notebook.len(), 1);
    assert!(!nb.dirty);
}

#[tokio::test]
async fn failed_fetch_surfaces_the_error() {
    let provider = InMemoryContentProvider::new();
    let mut store = Store::new();
    let content_ref = ContentRef::new();
    run_fetch(&mut store, &provider, content_ref, "ghost.ipynb").await;

    let record = selectors::content(store.state(), &content_ref).unwrap();
    assert!(record.error.as_deref().unwrap().contains("ghost.ipynb"));
    assert!(!record.loading);
    assert_eq!(record.model.kind(), ContentKind::Dummy);
}

#[tokio::test]
async fn save_round_trip_clears_the_dirty_flag() {
    let provider = InMemoryContentProvider::new();
    provider.insert(
        "work.ipynb",
        FetchedContent::Notebook {
            content: NotebookDocument::default(),
        },
    );

    let mut store = Store::new();
    let content_ref = ContentRef::new();
    run_fetch(&mut store, &provider, content_ref, "work.ipynb").await;

    store.dispatch(Action::CreateCellAppend {
        content_ref,
        cell_type: CellType::Code,
        source: "edited".to_string(),
    });
    assert!(selectors::notebook_model(store.state(), &content_ref)
        .unwrap()
        .dirty);

    store.dispatch(Action::Save { content_ref });
    let snapshot = selectors::notebook_model(store.state(), &content_ref)
        .unwrap()
        .notebook
        .clone();
    let result = provider
        .save(
            "work.ipynb",
            &FetchedContent::Notebook { content: snapshot },
        )
        .await;
    assert!(result.is_ok());
    store.dispatch(Action::SaveFulfilled {
        content_ref,
        last_saved: None,
    });

    let record = selectors::content(store.state(), &content_ref).unwrap();
    assert!(!record.saving);
    assert!(record.last_saved.is_some());
    assert!(!record.model.as_notebook().unwrap().dirty);
}

#[tokio::test]
async fn list_feeds_a_directory_fulfillment() {
    let provider = InMemoryContentProvider::new();
    provider.insert(
        "project/a.ipynb",
        FetchedContent::Notebook {
            content: NotebookDocument::default(),
        },
    );
    provider.insert(
        "project/readme.md",
        FetchedContent::File {
            content: "# readme".to_string(),
            mimetype: Some("text/markdown".to_string()),
        },
    );

    let mut store = Store::new();
    let content_ref = ContentRef::new();
    let items = provider.list("project").await.unwrap();
    store.dispatch(Action::FetchContentFulfilled {
        content_ref,
        filepath: "project".to_string(),
        model: FetchedContent::Directory { items },
        created: None,
        last_saved: None,
    });

    let record = selectors::content(store.state(), &content_ref).unwrap();
    assert_eq!(record.model.kind(), ContentKind::Directory);
    // Every listed child got its own dummy record for later expansion.
    assert_eq!(store.state().core.entities.contents.by_ref.len(), 3);
}

#[tokio::test]
async fn provider_not_found_is_a_typed_error() {
    let provider = InMemoryContentProvider::new();
    let err = provider.fetch("nope").await.unwrap_err();
    assert!(matches!(err, ProviderError::NotFound(_)));
}

//! End-to-end properties of the store: construct a state, dispatch a
//! sequence of actions, assert on the resulting state and selector outputs.

use notebook_core::actions::{Action, FetchedContent, LaunchedKernel};
use notebook_core::refs::{CellId, ContentRef, KernelRef};
use notebook_core::selectors;
use notebook_core::state::cells::{Cell, CellType};
use notebook_core::state::contents::{ContentKind, NotebookDocument};
use notebook_core::state::kernels::{KernelStatus, RestartOutputHandling};
use notebook_core::Store;
use media::Transform;
use serde_json::json;

fn notebook_with_cells(n: usize) -> (NotebookDocument, Vec<CellId>) {
    let mut doc = NotebookDocument::default();
    let mut ids = Vec::new();
    for i in 0..n {
        let id = CellId::new();
        doc.push_cell(id, Cell::of_type(CellType::Code, format!("cell {}", i)));
        ids.push(id);
    }
    (doc, ids)
}

fn open_notebook(store: &mut Store, doc: NotebookDocument) -> ContentRef {
    let content_ref = ContentRef::new();
    store.dispatch(Action::FetchContentFulfilled {
        content_ref,
        filepath: "nb.ipynb".to_string(),
        model: FetchedContent::Notebook { content: doc },
        created: None,
        last_saved: None,
    });
    content_ref
}

#[test]
fn fetched_content_variant_matches_the_model() {
    let mut store = Store::new();
    let content_ref = ContentRef::new();
    store.dispatch(Action::FetchContent {
        content_ref,
        filepath: "report.ipynb".to_string(),
    });
    assert_eq!(
        selectors::content(store.state(), &content_ref)
            .map(|r| r.model.kind()),
        Some(ContentKind::Dummy)
    );

    store.dispatch(Action::FetchContentFulfilled {
        content_ref,
        filepath: "report.ipynb".to_string(),
        model: FetchedContent::Notebook {
            content: NotebookDocument::default(),
        },
        created: None,
        last_saved: None,
    });

    let record = selectors::content(store.state(), &content_ref).unwrap();
    assert_eq!(record.model.kind(), ContentKind::Notebook);
    assert!(!record.loading);
}

#[test]
fn order_map_invariant_holds_under_arbitrary_edit_sequences() {
    let (doc, ids) = notebook_with_cells(5);
    let mut store = Store::new();
    let content_ref = open_notebook(&mut store, doc);

    let actions = vec![
        Action::CutCell {
            content_ref,
            id: Some(ids[0]),
        },
        Action::PasteCell { content_ref },
        Action::CreateCellBelow {
            content_ref,
            id: Some(ids[2]),
            cell_type: CellType::Markdown,
            source: "# note".to_string(),
        },
        Action::MoveCell {
            content_ref,
            id: ids[4],
            destination_id: ids[1],
            above: true,
        },
        Action::DeleteCell {
            content_ref,
            id: Some(ids[3]),
        },
        Action::PasteCell { content_ref },
        Action::CreateCellAppend {
            content_ref,
            cell_type: CellType::Code,
            source: "tail".to_string(),
        },
    ];
    for action in actions {
        store.dispatch(action);
        let nb = selectors::notebook_model(store.state(), &content_ref).unwrap();
        assert!(nb.notebook.is_consistent());
        assert_eq!(nb.notebook.cell_order.len(), nb.notebook.cell_map.len());
    }
}

#[test]
fn cut_then_paste_twice_round_trip() {
    let (doc, ids) = notebook_with_cells(2);
    let mut store = Store::new();
    let content_ref = open_notebook(&mut store, doc);

    store.dispatch(Action::CutCell {
        content_ref,
        id: Some(ids[0]),
    });
    store.dispatch(Action::PasteCell { content_ref });
    store.dispatch(Action::PasteCell { content_ref });

    let nb = selectors::notebook_model(store.state(), &content_ref).unwrap();
    assert_eq!(nb.notebook.len(), 3);
    let pasted: Vec<CellId> = nb
        .notebook
        .cell_order
        .iter()
        .filter(|id| **id != ids[1])
        .copied()
        .collect();
    assert_eq!(pasted.len(), 2);
    assert_ne!(pasted[0], pasted[1]);
    for id in &pasted {
        assert_ne!(id, &ids[0]);
        assert_eq!(nb.notebook.cell(id).unwrap().source(), "cell 0");
    }
}

#[test]
fn add_transform_is_idempotent() {
    let mut once = Store::new();
    once.dispatch(Action::AddTransform {
        media_type: "text/html".to_string(),
        transform: Transform::new("text/html", "HTML"),
    });

    let mut twice = Store::new();
    for _ in 0..2 {
        twice.dispatch(Action::AddTransform {
            media_type: "text/html".to_string(),
            transform: Transform::new("text/html", "HTML"),
        });
    }

    let a = &once.state().core.entities.transforms;
    let b = &twice.state().core.entities.transforms;
    assert_eq!(a.display_order, b.display_order);
    assert_eq!(a.by_id.len(), b.by_id.len());
    assert_eq!(
        a.by_id["text/html"].display_name,
        b.by_id["text/html"].display_name
    );
}

#[test]
fn handler_availability_overrides_display_priority() {
    let mut store = Store::new();
    store.dispatch(Action::AddTransform {
        media_type: "text/plain".to_string(),
        transform: Transform::new("text/plain", "Plain"),
    });

    let mut data = media::MediaBundle::new();
    data.insert("text/html".to_string(), json!("<b>rich</b>"));
    data.insert("text/plain".to_string(), json!("plain"));
    let output = media::Output::DisplayData {
        data,
        metadata: media::MediaBundle::new(),
        transient: None,
    };

    // text/html outranks text/plain in the default order but has no handler.
    assert_eq!(
        selectors::richest_media_type(store.state(), &output),
        Some("text/plain")
    );
}

#[test]
fn kernel_status_transitions_and_terminal_dead() {
    let (doc, _) = notebook_with_cells(1);
    let mut store = Store::new();
    let content_ref = open_notebook(&mut store, doc);
    let kernel_ref = KernelRef::new();

    store.dispatch(Action::LaunchKernelSuccessful {
        kernel_ref,
        content_ref,
        kernel: LaunchedKernel {
            kernelspec_name: "python3".to_string(),
            session_id: "s1".to_string(),
            cwd: "/".to_string(),
        },
        select_next_kernel: true,
    });
    let status = |store: &Store| store.state().core.entities.kernels.by_ref[&kernel_ref].status;
    assert_eq!(status(&store), KernelStatus::Idle);

    store.dispatch(Action::RestartKernel {
        kernel_ref,
        content_ref,
        output_handling: RestartOutputHandling::None,
    });
    assert_eq!(status(&store), KernelStatus::Restarting);

    store.dispatch(Action::LaunchKernelSuccessful {
        kernel_ref,
        content_ref,
        kernel: LaunchedKernel {
            kernelspec_name: "python3".to_string(),
            session_id: "s2".to_string(),
            cwd: "/".to_string(),
        },
        select_next_kernel: true,
    });
    assert_eq!(status(&store), KernelStatus::Idle);

    store.dispatch(Action::KillKernel {
        kernel_ref,
        restarting: false,
    });
    assert_eq!(status(&store), KernelStatus::Dead);

    // Dead is terminal: a further restart for the same ref is a no-op.
    store.dispatch(Action::RestartKernel {
        kernel_ref,
        content_ref,
        output_handling: RestartOutputHandling::None,
    });
    assert_eq!(status(&store), KernelStatus::Dead);
}

#[test]
fn content_ref_by_filepath_returns_the_original_ref() {
    let (doc, _) = notebook_with_cells(1);
    let mut store = Store::new();
    let content_ref = open_notebook(&mut store, doc);

    assert_eq!(
        selectors::content_ref_by_filepath(store.state(), "nb.ipynb"),
        Some(content_ref)
    );
    assert_eq!(
        selectors::content_ref_by_filepath(store.state(), "never-fetched.ipynb"),
        None
    );
}

#[test]
fn focus_next_with_create_grows_a_one_cell_notebook() {
    let (doc, ids) = notebook_with_cells(1);
    let mut store = Store::new();
    let content_ref = open_notebook(&mut store, doc);

    store.dispatch(Action::FocusCell {
        content_ref,
        id: ids[0],
    });
    store.dispatch(Action::FocusNextCell {
        content_ref,
        id: None,
        create_cell_if_undefined: true,
    });

    let nb = selectors::notebook_model(store.state(), &content_ref).unwrap();
    assert_eq!(nb.notebook.len(), 2);
    let second = nb.notebook.cell_order[1];
    assert_eq!(nb.cell_focused, Some(second));
    let cell = nb.notebook.cell(&second).unwrap();
    assert_eq!(cell.cell_type(), CellType::Code);
    assert_eq!(cell.source(), "");
}

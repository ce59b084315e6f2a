//! Notebook application core: a typed action vocabulary, a normalized
//! entity store updated by pure reducers, and selector functions deriving
//! read views.
//!
//! ## Shape
//!
//! All mutation flows through [`Store::dispatch`]; entities (contents,
//! kernels, kernelspecs, hosts, transforms, comms) live in keyed
//! collections addressed by opaque refs from [`refs`]. Asynchronous work is
//! modeled as request/fulfilled/failed action triples; the async runner
//! that performs the I/O sits behind the traits in [`providers`] and is a
//! consumer of the action stream, not part of the core.
//!
//! ```
//! use notebook_core::actions::{Action, FetchedContent};
//! use notebook_core::refs::ContentRef;
//! use notebook_core::state::contents::NotebookDocument;
//! use notebook_core::{selectors, Store};
//!
//! let mut store = Store::new();
//! let content_ref = ContentRef::new();
//! store.dispatch(Action::FetchContentFulfilled {
//!     content_ref,
//!     filepath: "scratch.ipynb".to_string(),
//!     model: FetchedContent::Notebook { content: NotebookDocument::default() },
//!     created: None,
//!     last_saved: None,
//! });
//! assert!(selectors::notebook_model(store.state(), &content_ref).is_ok());
//! ```

pub mod actions;
pub mod providers;
pub mod reducers;
pub mod refs;
pub mod selectors;
pub mod state;
pub mod store;

pub use actions::Action;
pub use state::AppState;
pub use store::Store;

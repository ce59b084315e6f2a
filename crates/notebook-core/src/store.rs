//! The single-writer store.
//!
//! One store instance owns one [`AppState`]. Dispatch applies actions in
//! call order through the root reducer and bumps a monotonically increasing
//! revision, which doubles as the cache key for memoized selectors.
//!
//! Concurrency is the caller's problem by construction: wrap the store in
//! whatever single-writer discipline the host application already has (a
//! `tokio::sync::Mutex`, an actor task draining an mpsc channel). The store
//! itself has no interior locking.

use log::trace;

use crate::actions::Action;
use crate::reducers;
use crate::state::AppState;

#[derive(Debug, Default)]
pub struct Store {
    state: AppState,
    revision: u64,
}

impl Store {
    pub fn new() -> Store {
        Store::default()
    }

    /// A store starting from a pre-built state, for host applications that
    /// hydrate from a snapshot.
    pub fn with_state(state: AppState) -> Store {
        Store { state, revision: 0 }
    }

    /// Apply one action. Unrecognized actions are no-ops in every reducer
    /// but still bump the revision; dispatch order is the only clock.
    pub fn dispatch(&mut self, action: Action) {
        trace!("dispatch #{}: {:?}", self.revision + 1, action);
        reducers::reduce(&mut self.state, &action);
        self.revision += 1;
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    /// The number of actions applied so far. Strictly increases with every
    /// dispatch, including no-op ones.
    pub fn revision(&self) -> u64 {
        self.revision
    }
}

//! Entity reducers: pure functions from `(state, action)` to the next state.
//!
//! One reducer per entity family. Each matches only the action variants it
//! owns and leaves state untouched for everything else, which lets the root
//! reducer be a plain composition with no dispatch table. Reducers never
//! panic and never partially apply: an action either fully lands on the
//! slice or changes nothing.

mod app;
mod cells;
mod comms;
mod contents;
mod kernels;
mod kernelspecs;
mod transforms;

use crate::actions::Action;
use crate::state::AppState;

/// Apply one action to the whole store.
///
/// Every family reducer observes a consistent snapshot of the entire state
/// at the time of its invocation; actions are applied strictly in dispatch
/// order by the single-writer store.
pub fn reduce(state: &mut AppState, action: &Action) {
    contents::reduce(state, action);
    cells::reduce(state, action);
    kernels::reduce(state, action);
    kernelspecs::reduce(state, action);
    transforms::reduce(state, action);
    comms::reduce(state, action);
    app::reduce(state, action);
}

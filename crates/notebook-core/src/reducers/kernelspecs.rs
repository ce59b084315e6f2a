//! Kernelspec catalog reducer. Catalogs are fetched wholesale per host; a
//! refetch replaces the previous record rather than merging into it.

use crate::actions::Action;
use crate::state::kernelspecs::KernelspecsByRefRecord;
use crate::state::AppState;

pub(crate) fn reduce(state: &mut AppState, action: &Action) {
    match action {
        Action::FetchKernelspecs {
            kernelspecs_ref, ..
        } => {
            state.core.current_kernelspecs_ref = Some(*kernelspecs_ref);
        }

        Action::FetchKernelspecsFulfilled {
            kernelspecs_ref,
            host_ref,
            default_kernel_name,
            kernelspecs,
        } => {
            state.core.entities.kernelspecs.by_ref.insert(
                *kernelspecs_ref,
                KernelspecsByRefRecord {
                    host_ref: Some(*host_ref),
                    default_kernel_name: default_kernel_name.clone(),
                    by_name: kernelspecs.clone(),
                    error: None,
                },
            );
        }

        Action::FetchKernelspecsFailed {
            kernelspecs_ref,
            error,
        } => {
            let record = state
                .core
                .entities
                .kernelspecs
                .by_ref
                .entry(*kernelspecs_ref)
                .or_default();
            record.error = Some(error.clone());
        }

        _ => {}
    }
}

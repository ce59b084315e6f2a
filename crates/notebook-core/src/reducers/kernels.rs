//! Kernel lifecycle reducer.
//!
//! Status transitions live here: launch, interrupt, kill, restart, shutdown,
//! disposal. `Dead` is terminal; any transition out of it is refused, which
//! makes stale async completions harmless.

use chrono::Utc;
use log::{debug, warn};

use crate::actions::Action;
use crate::refs::KernelRef;
use crate::state::kernels::{KernelRecord, KernelStatus};
use crate::state::AppState;

fn kernel_mut<'a>(state: &'a mut AppState, kernel_ref: &KernelRef) -> Option<&'a mut KernelRecord> {
    let record = state.core.entities.kernels.by_ref.get_mut(kernel_ref);
    if record.is_none() {
        debug!("kernel action for unknown ref {}", kernel_ref);
    }
    record
}

/// Start (or restart) a launch under a ref. Fresh refs get a new record;
/// an existing record is updated in place so the fields a restart consumer
/// still needs (`restart_output_handling`, captured stdout/stderr) survive
/// the kill-then-relaunch sequence. Dead refs stay dead.
fn begin_launch(state: &mut AppState, kernel_ref: &KernelRef, kernelspec_name: &str, cwd: &str) {
    if let Some(existing) = state.core.entities.kernels.by_ref.get(kernel_ref) {
        if existing.status.is_terminal() {
            warn!("launch requested for dead kernel {}; ignoring", kernel_ref);
            return;
        }
    }
    let record = state
        .core
        .entities
        .kernels
        .by_ref
        .entry(*kernel_ref)
        .or_default();
    record.status = KernelStatus::Launching;
    record.kernelspec_name = Some(kernelspec_name.to_string());
    record.cwd = cwd.to_string();
    record.session_id = None;
    record.error = None;
}

pub(crate) fn reduce(state: &mut AppState, action: &Action) {
    match action {
        Action::LaunchKernelBySpec {
            kernel_ref,
            kernelspec,
            cwd,
            ..
        } => {
            begin_launch(state, kernel_ref, &kernelspec.name, cwd);
        }

        Action::LaunchKernelByName {
            kernel_ref,
            kernelspec_name,
            cwd,
            ..
        } => {
            begin_launch(state, kernel_ref, kernelspec_name, cwd);
        }

        Action::LaunchKernelSuccessful {
            kernel_ref,
            content_ref,
            kernel,
            select_next_kernel,
        } => {
            // A success report for a kernel already killed is stale; drop it.
            if let Some(existing) = state.core.entities.kernels.by_ref.get(kernel_ref) {
                if existing.status.is_terminal() {
                    warn!("launch success for dead kernel {}; ignoring", kernel_ref);
                    return;
                }
            }

            // Update in place: a relaunch mid-restart must keep the
            // restart_output_handling value (and captured streams) for the
            // consumer that reads them after this action lands.
            let record = state
                .core
                .entities
                .kernels
                .by_ref
                .entry(*kernel_ref)
                .or_default();
            record.status = KernelStatus::Idle;
            record.kernelspec_name = Some(kernel.kernelspec_name.clone());
            record.cwd = kernel.cwd.clone();
            record.session_id = Some(kernel.session_id.clone());
            record.last_activity = Some(Utc::now());
            record.error = None;

            if *select_next_kernel {
                bind_kernel_to_content(state, kernel_ref, content_ref);
            }
        }

        Action::LaunchKernelFailed {
            kernel_ref,
            content_ref,
            error,
        } => {
            let record = state
                .core
                .entities
                .kernels
                .by_ref
                .entry(*kernel_ref)
                .or_default();
            record.status = KernelStatus::Dead;
            record.error = Some(error.clone());
            if let Some(content_ref) = content_ref {
                if let Some(content) = state.core.entities.contents.by_ref.get_mut(content_ref) {
                    content.error = Some(error.clone());
                }
            }
        }

        Action::InterruptKernel { kernel_ref } => {
            if let Some(record) = kernel_mut(state, kernel_ref) {
                if !record.status.is_interruptible() {
                    debug!("interrupt requested while {}", record.status);
                }
            }
        }

        Action::InterruptKernelSuccessful { .. } => {
            // The kernel reports its own idle transition via SetExecutionState.
        }

        Action::InterruptKernelFailed { kernel_ref, error } => {
            if let Some(record) = kernel_mut(state, kernel_ref) {
                record.error = Some(error.clone());
            }
        }

        Action::KillKernel {
            kernel_ref,
            restarting,
        } => {
            if let Some(record) = kernel_mut(state, kernel_ref) {
                if record.status.is_terminal() {
                    return;
                }
                record.status = if *restarting {
                    KernelStatus::Restarting
                } else {
                    KernelStatus::Dead
                };
            }
        }

        Action::KillKernelSuccessful { kernel_ref } => {
            if let Some(record) = kernel_mut(state, kernel_ref) {
                // A restart keeps the record alive through the kill phase.
                if record.status != KernelStatus::Restarting {
                    record.status = KernelStatus::Dead;
                }
            }
        }

        Action::KillKernelFailed { kernel_ref, error } => {
            if let Some(record) = kernel_mut(state, kernel_ref) {
                record.error = Some(error.clone());
            }
        }

        Action::RestartKernel {
            kernel_ref,
            output_handling,
            ..
        } => {
            if let Some(record) = kernel_mut(state, kernel_ref) {
                if record.status.is_terminal() {
                    warn!("restart requested for dead kernel {}", kernel_ref);
                    return;
                }
                record.status = KernelStatus::Restarting;
                record.restart_output_handling = Some(*output_handling);
            }
        }

        Action::RestartKernelSuccessful { kernel_ref, .. } => {
            if let Some(record) = kernel_mut(state, kernel_ref) {
                record.status = KernelStatus::Idle;
                record.last_activity = Some(Utc::now());
                record.error = None;
            }
        }

        Action::RestartKernelFailed {
            kernel_ref,
            content_ref,
            error,
        } => {
            if let Some(record) = kernel_mut(state, kernel_ref) {
                record.status = KernelStatus::Dead;
                record.error = Some(error.clone());
            }
            if let Some(content) = state.core.entities.contents.by_ref.get_mut(content_ref) {
                content.error = Some(error.clone());
            }
        }

        Action::SetExecutionState { kernel_ref, status } => {
            if let Some(record) = kernel_mut(state, kernel_ref) {
                if record.status.is_terminal() {
                    debug!("execution state {} for dead kernel; ignoring", status);
                    return;
                }
                record.status = *status;
                record.last_activity = Some(Utc::now());
            }
        }

        Action::SetKernelInfo { kernel_ref, info } => {
            if let Some(record) = kernel_mut(state, kernel_ref) {
                record.info = Some(info.clone());
            }
        }

        Action::KernelRawStdout { kernel_ref, text } => {
            if let Some(record) = kernel_mut(state, kernel_ref) {
                record.stdout.push_str(text);
            }
        }

        Action::KernelRawStderr { kernel_ref, text } => {
            if let Some(record) = kernel_mut(state, kernel_ref) {
                record.stderr.push_str(text);
            }
        }

        Action::ShutdownReplySucceeded { kernel_ref } | Action::ShutdownReplyTimedOut { kernel_ref } => {
            if let Some(record) = kernel_mut(state, kernel_ref) {
                record.status = KernelStatus::Dead;
            }
        }

        Action::DisposeKernel { kernel_ref } => {
            state.core.entities.kernels.by_ref.remove(kernel_ref);
            // Unbind any content still pointing at the disposed kernel.
            for record in state.core.entities.contents.by_ref.values_mut() {
                if let Some(nb) = record.model.as_notebook_mut() {
                    if nb.kernel_ref == Some(*kernel_ref) {
                        nb.kernel_ref = None;
                    }
                }
            }
        }

        _ => {}
    }
}

/// Point a notebook content at its new kernel and drop the record for the
/// kernel it previously used.
fn bind_kernel_to_content(
    state: &mut AppState,
    kernel_ref: &KernelRef,
    content_ref: &crate::refs::ContentRef,
) {
    let old_kernel_ref = state
        .core
        .entities
        .contents
        .by_ref
        .get_mut(content_ref)
        .and_then(|record| record.model.as_notebook_mut())
        .and_then(|nb| {
            let old = nb.kernel_ref;
            nb.kernel_ref = Some(*kernel_ref);
            old
        });

    if let Some(old) = old_kernel_ref {
        if old != *kernel_ref {
            state.core.entities.kernels.by_ref.remove(&old);
        }
    }
}

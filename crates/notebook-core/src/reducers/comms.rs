//! Comm channel reducer.
//!
//! `comm_open` establishes the model with its initial state, `comm_msg` with
//! `method: "update"` merges state deltas key-wise, `comm_close` drops the
//! channel. Updates for unknown comms are ignored; they can arrive
//! out of order around a close.

use log::debug;
use serde_json::{json, Value};

use crate::actions::Action;
use crate::state::comms::CommInfo;
use crate::state::AppState;

pub(crate) fn reduce(state: &mut AppState, action: &Action) {
    match action {
        Action::RegisterCommTarget { name } => {
            state.core.entities.comms.targets.insert(name.clone());
        }

        Action::CommOpen {
            comm_id,
            target_name,
            target_module,
            data,
            buffers,
            ..
        } => {
            let comms = &mut state.core.entities.comms;
            // ipywidgets puts the model state under data.state.
            let model = data.get("state").cloned().unwrap_or_else(|| json!({}));
            comms.models.insert(comm_id.clone(), model);
            comms.info.insert(
                comm_id.clone(),
                CommInfo {
                    target_name: target_name.clone(),
                    target_module: target_module.clone(),
                },
            );
            if !buffers.is_empty() {
                comms.buffers.insert(comm_id.clone(), buffers.clone());
            }
        }

        Action::CommMessage { comm_id, data, .. } => {
            if data.get("method").and_then(Value::as_str) != Some("update") {
                return;
            }
            let Some(model) = state.core.entities.comms.models.get_mut(comm_id) else {
                debug!("comm update for unknown comm {}; ignoring", comm_id);
                return;
            };
            if let (Some(existing), Some(delta)) = (
                model.as_object_mut(),
                data.get("state").and_then(Value::as_object),
            ) {
                for (key, value) in delta {
                    existing.insert(key.clone(), value.clone());
                }
            }
        }

        Action::CommClose { comm_id } => {
            let comms = &mut state.core.entities.comms;
            comms.models.remove(comm_id);
            comms.info.remove(comm_id);
            comms.buffers.remove(comm_id);
        }

        _ => {}
    }
}

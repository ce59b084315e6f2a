//! App-level reducer: hosts, modals, configuration, notifications and the
//! catch-all error sink.

use log::warn;
use serde_json::Value;

use crate::actions::Action;
use crate::state::AppState;

pub(crate) fn reduce(state: &mut AppState, action: &Action) {
    match action {
        Action::OpenModal { modal_type } => {
            state.core.entities.modals.modal_type = Some(modal_type.clone());
        }

        Action::CloseModal => {
            state.core.entities.modals.modal_type = None;
        }

        Action::SetNotificationSystem { handle } => {
            state.app.notification_system = Some(handle.clone());
        }

        Action::SetTheme { theme } => {
            state.config.set("theme", Value::String(theme.clone()));
        }

        Action::SetConfigAtKey { key, value } => {
            state.config.set(key.clone(), value.clone());
        }

        Action::MergeConfig { config } => {
            for (key, value) in config {
                state.config.set(key.clone(), value.clone());
            }
        }

        Action::SetGithubToken { github_token } => {
            state.app.github_token = Some(github_token.clone());
        }

        Action::SetAppHost { host } => {
            state.app.host = host.clone();
        }

        Action::AddHost { host_ref, host } => {
            state
                .core
                .entities
                .hosts
                .by_ref
                .insert(*host_ref, host.clone());
        }

        Action::CoreError { error } => {
            warn!("unroutable failure: {}", error);
            state.app.error = Some(error.clone());
        }

        _ => {}
    }
}

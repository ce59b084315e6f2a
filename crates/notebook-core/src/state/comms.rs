//! Comm channel state for the widget protocol's open/message/close lifecycle.

use std::collections::{BTreeSet, HashMap};

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Identity of a comm channel as assigned by the kernel side.
pub type CommId = String;

/// What a comm channel was opened against.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CommInfo {
    pub target_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_module: Option<String>,
}

/// Comm bookkeeping: registered targets plus per-comm model state and info.
///
/// Model state is merged key-wise from `comm_msg` updates, so a late-joining
/// consumer can reconstruct widget models from the stored snapshot.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CommsState {
    /// Target names the frontend has registered a handler for.
    pub targets: BTreeSet<String>,
    /// comm_id -> merged model state.
    pub models: HashMap<CommId, Value>,
    /// comm_id -> target info from the opening message.
    pub info: HashMap<CommId, CommInfo>,
    /// comm_id -> binary buffers delivered with the opening message.
    #[serde(default)]
    pub buffers: HashMap<CommId, Vec<Value>>,
}

//! Host records: connection targets for content and kernel services.

use serde::{Deserialize, Serialize};

/// A remote Jupyter server reachable over HTTP/WebSocket.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct JupyterHost {
    /// Scheme + authority, e.g. `"https://hub.example.org"`.
    pub origin: String,
    /// Path prefix under the origin, e.g. `"/user/alice"`.
    #[serde(default)]
    pub base_path: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
    /// Whether requests cross origins (affects credential handling upstream).
    #[serde(default)]
    pub cross_domain: bool,
}

/// The local machine, served by an embedded backend.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LocalHost {
    #[serde(default)]
    pub base_path: String,
}

/// A connection target. Exactly one host is active per app instance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum HostRecord {
    Jupyter(JupyterHost),
    Local(LocalHost),
}

impl HostRecord {
    pub fn host_type(&self) -> &'static str {
        match self {
            HostRecord::Jupyter(_) => "jupyter",
            HostRecord::Local(_) => "local",
        }
    }
}

impl Default for HostRecord {
    fn default() -> Self {
        HostRecord::Local(LocalHost::default())
    }
}

//! Kernelspec catalogs: which kernel types a host can launch.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::refs::HostRef;

/// One installable/launchable kernel type.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Kernelspec {
    pub name: String,
    pub display_name: String,
    pub language: String,
    #[serde(default)]
    pub argv: Vec<String>,
    #[serde(default)]
    pub env: HashMap<String, String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resource_dir: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interrupt_mode: Option<String>,
}

/// The catalog fetched for one host.
///
/// Immutable once fetched: a refetch replaces the whole record, there is no
/// incremental patch path.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct KernelspecsByRefRecord {
    pub host_ref: Option<HostRef>,
    pub default_kernel_name: String,
    pub by_name: HashMap<String, Kernelspec>,
    pub error: Option<String>,
}

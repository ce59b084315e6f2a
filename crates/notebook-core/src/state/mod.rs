//! The application state container: normalized entity collections plus the
//! handful of singleton pointers (current host, current kernelspecs ref,
//! open modal, config).
//!
//! Nothing in here mutates itself; every change flows through the reducers
//! in [`crate::reducers`].

pub mod cells;
pub mod comms;
pub mod contents;
pub mod hosts;
pub mod kernels;
pub mod kernelspecs;

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use media::{default_display_order, Transform};
use serde::Serialize;
use serde_json::Value;

use crate::refs::{ContentRef, HostRef, KernelRef, KernelspecsRef};
use crate::state::comms::CommsState;
use crate::state::contents::ContentRecord;
use crate::state::hosts::HostRecord;
use crate::state::kernels::KernelRecord;
use crate::state::kernelspecs::KernelspecsByRefRecord;

/// Severity of a user-facing notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationLevel {
    Info,
    Warning,
    Error,
}

/// A user-facing notification produced by consumers of the store (the async
/// runner, menu handlers). The store itself never emits these.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Notification {
    pub level: NotificationLevel,
    pub title: String,
    pub message: String,
}

/// Opaque handle to whatever surfaces notifications in the frontend.
///
/// Stored in state so consumers can reach it; reducers only store the
/// handle, they never invoke it.
#[derive(Clone)]
pub struct NotificationHandle(Arc<dyn Fn(Notification) + Send + Sync>);

impl NotificationHandle {
    pub fn new(f: impl Fn(Notification) + Send + Sync + 'static) -> Self {
        NotificationHandle(Arc::new(f))
    }

    pub fn notify(&self, notification: Notification) {
        (self.0)(notification)
    }
}

impl fmt::Debug for NotificationHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("NotificationHandle")
    }
}

/// App-level singletons: the active host and global odds and ends.
#[derive(Debug, Clone, Default, Serialize)]
pub struct AppRecord {
    /// The current connection target. Exactly one host is active at a time,
    /// so this is a plain record rather than a keyed lookup.
    pub host: HostRecord,
    pub version: String,
    pub github_token: Option<String>,
    /// Sink for otherwise-unroutable failures (the `CoreError` action).
    pub error: Option<String>,
    #[serde(skip)]
    pub notification_system: Option<NotificationHandle>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct ContentsState {
    pub by_ref: HashMap<ContentRef, ContentRecord>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct KernelsState {
    pub by_ref: HashMap<KernelRef, KernelRecord>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct KernelspecsState {
    pub by_ref: HashMap<KernelspecsRef, KernelspecsByRefRecord>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct HostsState {
    pub by_ref: HashMap<HostRef, HostRecord>,
}

/// The MIME transform registry: renderer descriptors keyed by MIME type,
/// plus the display-priority order consulted by `richest_media_type`.
#[derive(Debug, Clone, Serialize)]
pub struct TransformsState {
    pub by_id: HashMap<String, Transform>,
    pub display_order: Vec<String>,
}

impl Default for TransformsState {
    fn default() -> Self {
        TransformsState {
            by_id: HashMap::new(),
            display_order: default_display_order(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct ModalsState {
    /// The open modal's string key, if one is open.
    pub modal_type: Option<String>,
}

/// Every normalized entity family.
#[derive(Debug, Clone, Default, Serialize)]
pub struct EntitiesState {
    pub contents: ContentsState,
    pub kernels: KernelsState,
    pub kernelspecs: KernelspecsState,
    pub hosts: HostsState,
    pub transforms: TransformsState,
    pub comms: CommsState,
    pub modals: ModalsState,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct CoreState {
    /// The catalog the UI currently shows; resolved by pointer, not by scan.
    pub current_kernelspecs_ref: Option<KernelspecsRef>,
    pub entities: EntitiesState,
}

/// Flat string-keyed configuration. The theme lives at key `"theme"`.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ConfigState {
    pub at: serde_json::Map<String, Value>,
}

impl ConfigState {
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.at.get(key)
    }

    pub fn set(&mut self, key: impl Into<String>, value: Value) {
        self.at.insert(key.into(), value);
    }
}

/// The whole application state. Constructed per store instance; there is no
/// ambient global.
#[derive(Debug, Clone, Default, Serialize)]
pub struct AppState {
    pub app: AppRecord,
    pub core: CoreState,
    pub config: ConfigState,
}

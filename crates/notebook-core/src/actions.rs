//! The action vocabulary: every mutation the store understands, as one
//! closed sum type.
//!
//! One variant per action keeps the discriminants compiler-checked for
//! uniqueness and lets reducers match exhaustively. Constructing an action
//! is pure; asynchronous work is modeled as request/fulfilled/failed
//! triples, with the terminal actions dispatched later by the async runner.
//!
//! Failed variants carry their error as a plain string payload; the failing
//! operation's entity keeps its prior state (see the reducers).

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use media::{MediaBundle, Output, Transform};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::refs::{CellId, ContentRef, HostRef, KernelRef, KernelspecsRef};
use crate::state::cells::CellType;
use crate::state::contents::{CellStatus, ContentKind, NotebookDocument};
use crate::state::hosts::HostRecord;
use crate::state::kernels::{KernelInfo, KernelStatus, RestartOutputHandling};
use crate::state::kernelspecs::Kernelspec;
use crate::state::NotificationHandle;

/// A directory listing entry as reported by the contents API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DirectoryItem {
    pub name: String,
    pub path: String,
    pub kind: ContentKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_modified: Option<DateTime<Utc>>,
}

/// The resolved body of a fetch, already parsed by the contents provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum FetchedContent {
    Notebook {
        content: NotebookDocument,
    },
    File {
        content: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        mimetype: Option<String>,
    },
    Directory {
        items: Vec<DirectoryItem>,
    },
}

/// The kernel description delivered by a successful launch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LaunchedKernel {
    pub kernelspec_name: String,
    /// Opaque transport session handle.
    pub session_id: String,
    pub cwd: String,
}

/// An execute-reply payload message, routed to the cell that triggered it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "source", rename_all = "snake_case")]
pub enum PayloadMessage {
    /// Pager content (`?`-style introspection help).
    Page { data: MediaBundle },
    /// Replace the cell's source, or seed a new cell below it.
    SetNextInput { text: String, replace: bool },
}

/// Every action the store accepts, grouped by family.
#[derive(Debug, Clone)]
pub enum Action {
    // ------------------------------------------------------------------
    // Cell focus
    // ------------------------------------------------------------------
    FocusCell {
        content_ref: ContentRef,
        id: CellId,
    },
    /// Focus the cell after `id` (or after the focused cell when `id` is
    /// `None`). With `create_cell_if_undefined`, append and focus a new
    /// empty code cell when there is no next cell.
    FocusNextCell {
        content_ref: ContentRef,
        id: Option<CellId>,
        create_cell_if_undefined: bool,
    },
    FocusPreviousCell {
        content_ref: ContentRef,
        id: Option<CellId>,
    },
    FocusCellEditor {
        content_ref: ContentRef,
        id: Option<CellId>,
    },
    FocusNextCellEditor {
        content_ref: ContentRef,
        id: Option<CellId>,
    },
    FocusPreviousCellEditor {
        content_ref: ContentRef,
        id: Option<CellId>,
    },

    // ------------------------------------------------------------------
    // Cell structure
    // ------------------------------------------------------------------
    CreateCellAbove {
        content_ref: ContentRef,
        /// Anchor cell; the focused cell when `None`.
        id: Option<CellId>,
        cell_type: CellType,
        source: String,
    },
    CreateCellBelow {
        content_ref: ContentRef,
        id: Option<CellId>,
        cell_type: CellType,
        source: String,
    },
    CreateCellAppend {
        content_ref: ContentRef,
        cell_type: CellType,
        source: String,
    },
    /// Delete a cell; the focused cell when `id` is `None`.
    DeleteCell {
        content_ref: ContentRef,
        id: Option<CellId>,
    },
    /// Remove a cell into the single clipboard slot. Last cut/copy wins.
    CutCell {
        content_ref: ContentRef,
        id: Option<CellId>,
    },
    CopyCell {
        content_ref: ContentRef,
        id: Option<CellId>,
    },
    /// Insert a clone of the clipboard cell (fresh id) below the focused
    /// cell, or append when nothing is focused.
    PasteCell {
        content_ref: ContentRef,
    },
    MoveCell {
        content_ref: ContentRef,
        id: CellId,
        destination_id: CellId,
        above: bool,
    },
    ChangeCellType {
        content_ref: ContentRef,
        id: Option<CellId>,
        to: CellType,
    },
    /// Generic path+value setter inside a cell; implements source and
    /// execution-count updates.
    SetInCell {
        content_ref: ContentRef,
        id: CellId,
        path: Vec<String>,
        value: Value,
    },
    ToggleTagInCell {
        content_ref: ContentRef,
        id: CellId,
        tag: String,
    },

    // ------------------------------------------------------------------
    // Cell visibility and outputs
    // ------------------------------------------------------------------
    ToggleCellInputVisibility {
        content_ref: ContentRef,
        id: Option<CellId>,
    },
    ToggleCellOutputVisibility {
        content_ref: ContentRef,
        id: Option<CellId>,
    },
    /// Set visibility across all cells; `None` leaves that axis alone.
    UnhideAll {
        content_ref: ContentRef,
        input_hidden: Option<bool>,
        output_hidden: Option<bool>,
    },
    ToggleOutputExpansion {
        content_ref: ContentRef,
        id: CellId,
    },
    ClearOutputs {
        content_ref: ContentRef,
        id: Option<CellId>,
    },
    ClearAllOutputs {
        content_ref: ContentRef,
    },
    AppendOutput {
        content_ref: ContentRef,
        id: CellId,
        output: Output,
    },
    /// Update every output previously emitted under `display_id`.
    UpdateDisplay {
        content_ref: ContentRef,
        display_id: String,
        data: MediaBundle,
        metadata: MediaBundle,
    },
    AcceptPayloadMessage {
        content_ref: ContentRef,
        id: CellId,
        payload: PayloadMessage,
    },

    // ------------------------------------------------------------------
    // Cell execution bookkeeping
    // ------------------------------------------------------------------
    SendExecuteRequest {
        content_ref: ContentRef,
        id: CellId,
    },
    ExecuteCanceled {
        content_ref: ContentRef,
        id: CellId,
    },
    ExecuteFailed {
        content_ref: ContentRef,
        error: String,
    },
    UpdateCellStatus {
        content_ref: ContentRef,
        id: CellId,
        /// `None` clears the status back to idle.
        status: Option<CellStatus>,
    },
    PromptInputRequest {
        content_ref: ContentRef,
        id: CellId,
        prompt: String,
        password: bool,
    },
    SendInputReply {
        content_ref: ContentRef,
        id: CellId,
        value: String,
    },

    // ------------------------------------------------------------------
    // Content lifecycle
    // ------------------------------------------------------------------
    FetchContent {
        content_ref: ContentRef,
        filepath: String,
    },
    FetchContentFulfilled {
        content_ref: ContentRef,
        filepath: String,
        model: FetchedContent,
        created: Option<DateTime<Utc>>,
        last_saved: Option<DateTime<Utc>>,
    },
    FetchContentFailed {
        content_ref: ContentRef,
        filepath: String,
        error: String,
    },
    DownloadContent {
        content_ref: ContentRef,
    },
    Save {
        content_ref: ContentRef,
    },
    SaveFulfilled {
        content_ref: ContentRef,
        /// Server-reported timestamp; "now" when absent.
        last_saved: Option<DateTime<Utc>>,
    },
    SaveFailed {
        content_ref: ContentRef,
        error: String,
    },
    SaveAs {
        content_ref: ContentRef,
        filepath: String,
    },
    SaveAsFulfilled {
        content_ref: ContentRef,
        filepath: String,
        last_saved: Option<DateTime<Utc>>,
    },
    SaveAsFailed {
        content_ref: ContentRef,
        error: String,
    },
    /// Optimistic rename: the reducer applies `filepath` immediately and
    /// reverts to `prev_file_path` on failure.
    ChangeContentName {
        content_ref: ContentRef,
        filepath: String,
        prev_file_path: String,
    },
    ChangeContentNameFulfilled {
        content_ref: ContentRef,
        filepath: String,
        prev_file_path: String,
    },
    ChangeContentNameFailed {
        content_ref: ContentRef,
        filepath: String,
        prev_file_path: String,
        error: String,
    },
    NewNotebook {
        content_ref: ContentRef,
        kernel_ref: Option<KernelRef>,
        kernelspec_name: Option<String>,
        cwd: String,
        filepath: String,
    },
    /// Consumed by the async runner (kernel shutdown + dispose sequencing);
    /// the reducers leave state untouched.
    CloseNotebook {
        content_ref: ContentRef,
    },
    DisposeContent {
        content_ref: ContentRef,
    },
    PublishToBookstore {
        content_ref: ContentRef,
    },
    PublishToBookstoreSucceeded {
        content_ref: ContentRef,
    },
    PublishToBookstoreFailed {
        content_ref: ContentRef,
        error: String,
    },
    UpdateFileText {
        content_ref: ContentRef,
        text: String,
    },

    // ------------------------------------------------------------------
    // Kernel lifecycle
    // ------------------------------------------------------------------
    LaunchKernelBySpec {
        kernel_ref: KernelRef,
        content_ref: ContentRef,
        kernelspec: Kernelspec,
        cwd: String,
        select_next_kernel: bool,
    },
    LaunchKernelByName {
        kernel_ref: KernelRef,
        content_ref: ContentRef,
        kernelspec_name: String,
        cwd: String,
        select_next_kernel: bool,
    },
    LaunchKernelSuccessful {
        kernel_ref: KernelRef,
        content_ref: ContentRef,
        kernel: LaunchedKernel,
        select_next_kernel: bool,
    },
    LaunchKernelFailed {
        kernel_ref: KernelRef,
        content_ref: Option<ContentRef>,
        error: String,
    },
    ChangeKernelByName {
        content_ref: ContentRef,
        old_kernel_ref: Option<KernelRef>,
        kernelspec_name: String,
    },
    InterruptKernel {
        kernel_ref: KernelRef,
    },
    InterruptKernelSuccessful {
        kernel_ref: KernelRef,
    },
    InterruptKernelFailed {
        kernel_ref: KernelRef,
        error: String,
    },
    /// `restarting` distinguishes kill-as-part-of-restart from a
    /// user-initiated halt; only the latter is terminal.
    KillKernel {
        kernel_ref: KernelRef,
        restarting: bool,
    },
    KillKernelSuccessful {
        kernel_ref: KernelRef,
    },
    KillKernelFailed {
        kernel_ref: KernelRef,
        error: String,
    },
    RestartKernel {
        kernel_ref: KernelRef,
        content_ref: ContentRef,
        output_handling: RestartOutputHandling,
    },
    RestartKernelSuccessful {
        kernel_ref: KernelRef,
        content_ref: ContentRef,
    },
    RestartKernelFailed {
        kernel_ref: KernelRef,
        content_ref: ContentRef,
        error: String,
    },
    SetExecutionState {
        kernel_ref: KernelRef,
        status: KernelStatus,
    },
    SetKernelInfo {
        kernel_ref: KernelRef,
        info: KernelInfo,
    },
    KernelRawStdout {
        kernel_ref: KernelRef,
        text: String,
    },
    KernelRawStderr {
        kernel_ref: KernelRef,
        text: String,
    },
    ShutdownReplySucceeded {
        kernel_ref: KernelRef,
    },
    ShutdownReplyTimedOut {
        kernel_ref: KernelRef,
    },
    DisposeKernel {
        kernel_ref: KernelRef,
    },

    // ------------------------------------------------------------------
    // Kernelspecs
    // ------------------------------------------------------------------
    FetchKernelspecs {
        kernelspecs_ref: KernelspecsRef,
        host_ref: HostRef,
    },
    FetchKernelspecsFulfilled {
        kernelspecs_ref: KernelspecsRef,
        host_ref: HostRef,
        default_kernel_name: String,
        kernelspecs: HashMap<String, Kernelspec>,
    },
    FetchKernelspecsFailed {
        kernelspecs_ref: KernelspecsRef,
        error: String,
    },

    // ------------------------------------------------------------------
    // Comms
    // ------------------------------------------------------------------
    RegisterCommTarget {
        name: String,
    },
    CommOpen {
        comm_id: String,
        target_name: String,
        target_module: Option<String>,
        data: Value,
        metadata: Value,
        buffers: Vec<Value>,
    },
    CommMessage {
        comm_id: String,
        data: Value,
        metadata: Value,
        buffers: Vec<Value>,
    },
    CommClose {
        comm_id: String,
    },

    // ------------------------------------------------------------------
    // Global
    // ------------------------------------------------------------------
    OpenModal {
        modal_type: String,
    },
    CloseModal,
    SetNotificationSystem {
        handle: NotificationHandle,
    },
    SetTheme {
        theme: String,
    },
    SetConfigAtKey {
        key: String,
        value: Value,
    },
    MergeConfig {
        config: serde_json::Map<String, Value>,
    },
    AddTransform {
        media_type: String,
        transform: Transform,
    },
    RemoveTransform {
        media_type: String,
    },
    SetGithubToken {
        github_token: String,
    },
    SetAppHost {
        host: HostRecord,
    },
    AddHost {
        host_ref: HostRef,
        host: HostRecord,
    },
    /// Catch-all sink for otherwise-unroutable async failures. Never halts
    /// the reducer pipeline.
    CoreError {
        error: String,
    },
}

/// Pull binary buffers out of a raw protocol message, tolerating the two
/// historically inconsistent field names (`buffers` and `blob`).
fn extract_buffers(msg: &Value) -> Vec<Value> {
    msg.get("buffers")
        .or_else(|| msg.get("blob"))
        .and_then(|v| v.as_array())
        .cloned()
        .unwrap_or_default()
}

impl Action {
    /// Build a [`Action::CommOpen`] from a raw `comm_open` protocol message.
    ///
    /// Returns `None` when the message lacks a `comm_id` or `target_name`.
    pub fn comm_open_from_message(msg: &Value) -> Option<Action> {
        let content = msg.get("content").unwrap_or(msg);
        Some(Action::CommOpen {
            comm_id: content.get("comm_id")?.as_str()?.to_string(),
            target_name: content.get("target_name")?.as_str()?.to_string(),
            target_module: content
                .get("target_module")
                .and_then(|v| v.as_str())
                .map(|s| s.to_string()),
            data: content.get("data").cloned().unwrap_or(Value::Null),
            metadata: msg.get("metadata").cloned().unwrap_or(Value::Null),
            buffers: extract_buffers(msg),
        })
    }

    /// Build a [`Action::CommMessage`] from a raw `comm_msg` protocol message.
    pub fn comm_message_from_message(msg: &Value) -> Option<Action> {
        let content = msg.get("content").unwrap_or(msg);
        Some(Action::CommMessage {
            comm_id: content.get("comm_id")?.as_str()?.to_string(),
            data: content.get("data").cloned().unwrap_or(Value::Null),
            metadata: msg.get("metadata").cloned().unwrap_or(Value::Null),
            buffers: extract_buffers(msg),
        })
    }
}

//! Kernel entities: live or launching execution backends.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Kernel status.
///
/// `Dead` is terminal: a dead kernel is never resurrected; a fresh launch
/// happens under a new [`crate::refs::KernelRef`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KernelStatus {
    /// No transport bound yet; the initial state.
    NotConnected,
    /// Launch requested, transport coming up.
    Launching,
    /// Ready for execute requests.
    Idle,
    /// Executing code.
    Busy,
    /// Transport connected, kernel still starting.
    Starting,
    /// Restart in progress (kill-then-relaunch).
    Restarting,
    /// Transport lost.
    Disconnected,
    /// Killed or failed unrecoverably. Terminal.
    Dead,
}

impl KernelStatus {
    /// Terminal states admit no further transitions.
    pub fn is_terminal(&self) -> bool {
        matches!(self, KernelStatus::Dead)
    }

    /// Whether a toolbar should offer "interrupt" for this status.
    pub fn is_interruptible(&self) -> bool {
        matches!(self, KernelStatus::Busy)
    }

    /// Whether execute requests can be submitted right now.
    pub fn can_accept_execution(&self) -> bool {
        matches!(self, KernelStatus::Idle | KernelStatus::Busy)
    }
}

impl std::fmt::Display for KernelStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            KernelStatus::NotConnected => "not_connected",
            KernelStatus::Launching => "launching",
            KernelStatus::Idle => "idle",
            KernelStatus::Busy => "busy",
            KernelStatus::Starting => "starting",
            KernelStatus::Restarting => "restarting",
            KernelStatus::Disconnected => "disconnected",
            KernelStatus::Dead => "dead",
        };
        write!(f, "{}", s)
    }
}

/// What to do with cell outputs after a restart completes.
///
/// The reducer only threads this value through state; the async runner reads
/// it after a successful restart and decides whether to clear or re-run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RestartOutputHandling {
    None,
    ClearAll,
    RunAll,
}

/// Info reported by a kernel once its transport is up.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct KernelInfo {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub implementation: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub banner: Option<String>,
}

/// One kernel entity. Exactly one record exists per [`crate::refs::KernelRef`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KernelRecord {
    pub status: KernelStatus,
    pub kernelspec_name: Option<String>,
    /// Opaque handle to the transport session. The core never interprets it.
    pub session_id: Option<String>,
    pub cwd: String,
    pub info: Option<KernelInfo>,
    /// Raw stdout captured from locally spawned kernel processes.
    #[serde(default)]
    pub stdout: String,
    /// Raw stderr captured from locally spawned kernel processes.
    #[serde(default)]
    pub stderr: String,
    /// Threaded through for the restart consumer; see [`RestartOutputHandling`].
    pub restart_output_handling: Option<RestartOutputHandling>,
    pub last_activity: Option<DateTime<Utc>>,
    pub error: Option<String>,
}

impl KernelRecord {
    /// A record for a kernel whose launch was just requested.
    pub fn launching(kernelspec_name: impl Into<String>, cwd: impl Into<String>) -> Self {
        KernelRecord {
            status: KernelStatus::Launching,
            kernelspec_name: Some(kernelspec_name.into()),
            session_id: None,
            cwd: cwd.into(),
            info: None,
            stdout: String::new(),
            stderr: String::new(),
            restart_output_handling: None,
            last_activity: None,
            error: None,
        }
    }
}

impl Default for KernelRecord {
    fn default() -> Self {
        KernelRecord {
            status: KernelStatus::NotConnected,
            kernelspec_name: None,
            session_id: None,
            cwd: String::new(),
            info: None,
            stdout: String::new(),
            stderr: String::new(),
            restart_output_handling: None,
            last_activity: None,
            error: None,
        }
    }
}

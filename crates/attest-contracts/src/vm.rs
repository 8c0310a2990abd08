//! Terminal states reported by an execution engine.

use std::fmt;

use serde::{Deserialize, Serialize};

/// The state an `ExecutionEngine` reports after `execute()` returns.
///
/// Only `Halted` counts as a successful run. Anything else is reported by the
/// verifier as `VerificationError::ExecutionFault`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VmState {
    /// Not started, or stopped before reaching a terminal state.
    Running,
    /// Ran to completion.
    Halted,
    /// Hit an invalid instruction, a stack error, or a resource limit.
    Faulted,
    /// Stopped by the engine's host without completing.
    Aborted,
}

impl VmState {
    pub fn is_halted(self) -> bool {
        matches!(self, VmState::Halted)
    }
}

impl fmt::Display for VmState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            VmState::Running => "running",
            VmState::Halted => "halted",
            VmState::Faulted => "faulted",
            VmState::Aborted => "aborted",
        };
        f.write_str(name)
    }
}

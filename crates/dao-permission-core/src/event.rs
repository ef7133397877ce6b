//! Events emitted by the permission contract's state-mutating calls.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A confirmation event. Each write call is confirmed by exactly one of these.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PermissionEvent {
    SetRoot,
    AddOwner,
    RemoveOwner,
}

impl PermissionEvent {
    /// The event name as declared in the contract ABI.
    pub const fn name(&self) -> &'static str {
        match self {
            PermissionEvent::SetRoot => "SetRoot",
            PermissionEvent::AddOwner => "AddOwner",
            PermissionEvent::RemoveOwner => "RemoveOwner",
        }
    }
}

impl fmt::Display for PermissionEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

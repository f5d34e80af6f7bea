//! The role and capability vocabulary the host's authorization layer checks
//! before invoking engine operations.
//!
//! A closed set of role variants with an explicit hierarchy level and a
//! capability table, replacing wildcard permission strings. The engine
//! itself stays role-agnostic; it only ever sees a caller id to stamp on
//! approval decisions.

use serde::{Deserialize, Serialize};

/// What a caller is allowed to do with the scheduling engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Capability {
    /// Read templates and occurrences.
    ViewSchedule,
    /// Create, update, and deactivate templates.
    ManageTemplates,
    /// Approve or reject pending templates.
    ApproveTemplates,
    /// Run occurrence generation.
    GenerateOccurrences,
}

/// Caller roles, lowest to highest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Teacher,
    Scheduler,
    Manager,
    Admin,
}

impl Role {
    /// Position in the hierarchy; higher levels hold every capability of the
    /// levels below.
    pub fn level(self) -> u8 {
        match self {
            Role::Teacher => 0,
            Role::Scheduler => 1,
            Role::Manager => 2,
            Role::Admin => 3,
        }
    }

    /// The capability set granted to this role.
    pub fn capabilities(self) -> &'static [Capability] {
        match self {
            Role::Teacher => &[Capability::ViewSchedule],
            Role::Scheduler => &[
                Capability::ViewSchedule,
                Capability::ManageTemplates,
                Capability::GenerateOccurrences,
            ],
            Role::Manager => &[
                Capability::ViewSchedule,
                Capability::ManageTemplates,
                Capability::GenerateOccurrences,
                Capability::ApproveTemplates,
            ],
            Role::Admin => &[
                Capability::ViewSchedule,
                Capability::ManageTemplates,
                Capability::GenerateOccurrences,
                Capability::ApproveTemplates,
            ],
        }
    }

    /// Whether this role holds the given capability.
    pub fn allows(self, capability: Capability) -> bool {
        self.capabilities().contains(&capability)
    }
}

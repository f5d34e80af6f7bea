//! Approval workflow states for schedule templates.

use serde::{Deserialize, Serialize};

/// Where a template stands in the manager sign-off workflow.
///
/// `Pending` may move to `Approved` or `Rejected`. `Approved` and
/// `AutoApproved` are terminal eligible-for-expansion states. `Rejected` is
/// terminal and non-recoverable: a rejected template is edited and
/// resubmitted as a new pending template, never un-rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApprovalStatus {
    #[default]
    Pending,
    Approved,
    Rejected,
    /// Granted at creation time when the deployment policy does not require
    /// manager approval.
    AutoApproved,
}

impl ApprovalStatus {
    /// Whether templates in this state may produce occurrences and take part
    /// in the active conflict scan.
    pub fn is_eligible(self) -> bool {
        matches!(self, ApprovalStatus::Approved | ApprovalStatus::AutoApproved)
    }

    /// Whether a manager decision (approve or reject) is still open.
    pub fn is_decidable(self) -> bool {
        self == ApprovalStatus::Pending
    }

    /// Whether the workflow permits moving from `self` to `to`.
    pub fn may_transition(self, to: ApprovalStatus) -> bool {
        matches!(
            (self, to),
            (ApprovalStatus::Pending, ApprovalStatus::Approved)
                | (ApprovalStatus::Pending, ApprovalStatus::Rejected)
        )
    }
}

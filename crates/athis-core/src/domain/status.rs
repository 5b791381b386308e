//! Demand status machine.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::errors::AthisError;

/// Status of a demand.
///
/// State transitions:
/// - Pending -> UnderReview | Approved | Rejected
/// - UnderReview -> Approved | Rejected
/// - Approved, Rejected: terminal
///
/// Self-transitions are never allowed, so a duplicated staff action is
/// reported instead of silently accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DemandStatus {
    Pending,
    UnderReview,
    Approved,
    Rejected,
}

/// Every legal edge of the lifecycle. Anything not listed is rejected.
const TRANSITIONS: &[(DemandStatus, DemandStatus)] = &[
    (DemandStatus::Pending, DemandStatus::UnderReview),
    // Skips review; kept because no audit rule requires review first.
    (DemandStatus::Pending, DemandStatus::Approved),
    (DemandStatus::Pending, DemandStatus::Rejected),
    (DemandStatus::UnderReview, DemandStatus::Approved),
    (DemandStatus::UnderReview, DemandStatus::Rejected),
];

impl DemandStatus {
    pub const ALL: [DemandStatus; 4] = [
        DemandStatus::Pending,
        DemandStatus::UnderReview,
        DemandStatus::Approved,
        DemandStatus::Rejected,
    ];

    pub fn can_transition_to(self, next: DemandStatus) -> bool {
        TRANSITIONS.contains(&(self, next))
    }

    /// Targets reachable in one step from this status.
    pub fn allowed_next(self) -> Vec<DemandStatus> {
        TRANSITIONS
            .iter()
            .filter(|(from, _)| *from == self)
            .map(|(_, to)| *to)
            .collect()
    }

    /// Is this a terminal state (no further transitions)?
    pub fn is_terminal(self) -> bool {
        matches!(self, DemandStatus::Approved | DemandStatus::Rejected)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            DemandStatus::Pending => "pending",
            DemandStatus::UnderReview => "under_review",
            DemandStatus::Approved => "approved",
            DemandStatus::Rejected => "rejected",
        }
    }

    /// Label shown to staff.
    pub fn label(self) -> &'static str {
        match self {
            DemandStatus::Pending => "Pending",
            DemandStatus::UnderReview => "Under review",
            DemandStatus::Approved => "Approved",
            DemandStatus::Rejected => "Rejected",
        }
    }
}

impl fmt::Display for DemandStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DemandStatus {
    type Err = AthisError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        DemandStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == s.trim())
            .ok_or_else(|| AthisError::validation(format!("unknown demand status '{s}'")))
    }
}

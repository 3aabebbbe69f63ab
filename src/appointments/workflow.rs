//! Appointment status workflow.
//!
//! Five states, `Pending` initial. The only restricted edge set is the
//! staff path out of `Pending`: a pending appointment can only be approved
//! or rejected. Once an appointment has left `Pending`, any of the five
//! values may be written over the current one; nothing is hard-terminal
//! because records are never deleted.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::RepoError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Status {
    Pending,
    Approved,
    Rejected,
    Cancelled,
    Completed,
}

impl Status {
    pub const ALL: [Status; 5] = [
        Status::Pending,
        Status::Approved,
        Status::Rejected,
        Status::Cancelled,
        Status::Completed,
    ];

    /// Strict parse; anything outside the five values is rejected before
    /// any store mutation is attempted.
    pub fn parse(s: &str) -> Option<Status> {
        match s {
            "Pending" => Some(Status::Pending),
            "Approved" => Some(Status::Approved),
            "Rejected" => Some(Status::Rejected),
            "Cancelled" => Some(Status::Cancelled),
            "Completed" => Some(Status::Completed),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Status::Pending => "Pending",
            Status::Approved => "Approved",
            Status::Rejected => "Rejected",
            Status::Cancelled => "Cancelled",
            Status::Completed => "Completed",
        }
    }
}

impl Default for Status {
    fn default() -> Self {
        Status::Pending
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    Changed,
    /// Requested value equals the current one; accepted as a no-op.
    Unchanged,
}

/// Decide whether `requested` may replace `current`. Writing the current
/// value back is always a no-op success, checked before the Pending
/// restriction so that re-submitting a pending appointment as `Pending`
/// does not trip the staff rule.
pub fn check_transition(current: Status, requested: Status) -> Result<Transition, RepoError> {
    if requested == current {
        return Ok(Transition::Unchanged);
    }
    if current == Status::Pending
        && !matches!(requested, Status::Approved | Status::Rejected)
    {
        return Err(RepoError::Transition(
            "Can only approve or reject pending appointments".into(),
        ));
    }
    Ok(Transition::Changed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pending_can_be_approved_or_rejected() {
        assert_eq!(
            check_transition(Status::Pending, Status::Approved).unwrap(),
            Transition::Changed
        );
        assert_eq!(
            check_transition(Status::Pending, Status::Rejected).unwrap(),
            Transition::Changed
        );
    }

    #[test]
    fn pending_cannot_jump_to_cancelled_or_completed() {
        assert!(check_transition(Status::Pending, Status::Cancelled).is_err());
        assert!(check_transition(Status::Pending, Status::Completed).is_err());
    }

    #[test]
    fn same_value_is_a_noop_even_for_pending() {
        assert_eq!(
            check_transition(Status::Pending, Status::Pending).unwrap(),
            Transition::Unchanged
        );
        assert_eq!(
            check_transition(Status::Completed, Status::Completed).unwrap(),
            Transition::Unchanged
        );
    }

    #[test]
    fn non_pending_states_accept_any_value() {
        for requested in Status::ALL {
            assert!(check_transition(Status::Approved, requested).is_ok());
            assert!(check_transition(Status::Rejected, requested).is_ok());
            assert!(check_transition(Status::Cancelled, requested).is_ok());
            assert!(check_transition(Status::Completed, requested).is_ok());
        }
    }

    #[test]
    fn approved_appointment_can_still_be_cancelled() {
        // The restriction only gates the Pending edge.
        assert_eq!(
            check_transition(Status::Approved, Status::Cancelled).unwrap(),
            Transition::Changed
        );
    }

    #[test]
    fn parse_accepts_exactly_the_five_values() {
        for status in Status::ALL {
            assert_eq!(Status::parse(status.as_str()), Some(status));
        }
        assert_eq!(Status::parse("NotARealStatus"), None);
        assert_eq!(Status::parse("pending"), None);
        assert_eq!(Status::parse(""), None);
    }

    #[test]
    fn status_serializes_as_its_wire_name() {
        assert_eq!(
            serde_json::to_string(&Status::Pending).unwrap(),
            "\"Pending\""
        );
        assert_eq!(
            serde_json::to_string(&Status::Cancelled).unwrap(),
            "\"Cancelled\""
        );
    }
}

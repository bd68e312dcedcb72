//! Booking record, lifecycle states and the transition table.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use thiserror::Error;

/// Lifecycle state of a booking.
///
/// The wire strings ("Pending", "Checked-in", ...) are the historical
/// format and are what gets stored in the `status` column.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum BookingStatus {
    Pending,
    Confirmed,
    #[serde(rename = "Checked-in")]
    CheckedIn,
    #[serde(rename = "Checked-out")]
    CheckedOut,
    Cancelled,
}

impl BookingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "Pending",
            Self::Confirmed => "Confirmed",
            Self::CheckedIn => "Checked-in",
            Self::CheckedOut => "Checked-out",
            Self::Cancelled => "Cancelled",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "Pending" => Some(Self::Pending),
            "Confirmed" => Some(Self::Confirmed),
            "Checked-in" => Some(Self::CheckedIn),
            "Checked-out" => Some(Self::CheckedOut),
            "Cancelled" => Some(Self::Cancelled),
            _ => None,
        }
    }

    /// Terminal states admit no further action.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Cancelled | Self::CheckedOut)
    }

    /// Apply a lifecycle action, returning the next state.
    ///
    /// The full transition table:
    /// Pending -> Confirmed | Cancelled,
    /// Confirmed -> Checked-in | Cancelled,
    /// Checked-in -> Checked-out.
    pub fn apply(self, action: BookingAction) -> Result<BookingStatus, TransitionError> {
        use BookingAction::*;
        use BookingStatus::*;

        match (self, action) {
            (Pending, Confirm) => Ok(Confirmed),
            (Pending, Cancel) => Ok(Cancelled),
            (Confirmed, Cancel) => Ok(Cancelled),
            (Confirmed, CheckIn) => Ok(CheckedIn),
            (CheckedIn, CheckOut) => Ok(CheckedOut),
            (from, action) => Err(TransitionError::Invalid { from, action }),
        }
    }
}

impl std::fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A lifecycle action requested against a booking.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BookingAction {
    Confirm,
    Cancel,
    CheckIn,
    CheckOut,
}

impl std::fmt::Display for BookingAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Confirm => write!(f, "confirm"),
            Self::Cancel => write!(f, "cancel"),
            Self::CheckIn => write!(f, "check in"),
            Self::CheckOut => write!(f, "check out"),
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TransitionError {
    #[error("cannot {action} a booking that is {from}")]
    Invalid {
        from: BookingStatus,
        action: BookingAction,
    },
    #[error("booking has unrecognized status {0:?}")]
    UnknownStatus(String),
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Booking {
    pub id: String,
    pub villa_id: String,
    /// Villa attributes are copied at creation time; later catalog edits
    /// must not rewrite booking history.
    pub villa_name: String,
    pub villa_image: String,
    pub check_in: String,
    pub check_out: String,
    pub guests: i64,
    pub total_price: i64,
    pub status: String,
    pub customer_name: String,
    pub customer_phone: Option<String>,
    pub message: Option<String>,
    /// Owning account, absent for staff-entered sample records
    pub user_id: Option<String>,
    pub user_email: String,
    /// Actual arrival time (HH:MM), recorded at check-in
    pub actual_check_in: Option<String>,
    /// Actual departure time (HH:MM), recorded at check-out
    pub actual_check_out: Option<String>,
    pub created_at: String,
}

impl Booking {
    pub fn status_enum(&self) -> Result<BookingStatus, TransitionError> {
        BookingStatus::parse(&self.status)
            .ok_or_else(|| TransitionError::UnknownStatus(self.status.clone()))
    }
}

#[derive(Debug, Deserialize)]
pub struct CreateBookingRequest {
    pub villa_id: String,
    pub check_in: String,
    pub check_out: String,
    pub guests: i64,
    /// Contact fields default to the account profile when omitted
    pub customer_name: Option<String>,
    pub customer_phone: Option<String>,
    pub message: Option<String>,
}

/// Payload for the admin check-in/check-out actions.
#[derive(Debug, Deserialize)]
pub struct RecordTimeRequest {
    /// Actual arrival or departure time, HH:MM
    pub time: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_round_trip() {
        for status in [
            BookingStatus::Pending,
            BookingStatus::Confirmed,
            BookingStatus::CheckedIn,
            BookingStatus::CheckedOut,
            BookingStatus::Cancelled,
        ] {
            assert_eq!(BookingStatus::parse(status.as_str()), Some(status));
        }
        assert_eq!(BookingStatus::parse("checked-in"), None);
        assert_eq!(BookingStatus::parse(""), None);
    }

    #[test]
    fn test_wire_strings_are_historical_format() {
        assert_eq!(BookingStatus::CheckedIn.as_str(), "Checked-in");
        assert_eq!(BookingStatus::CheckedOut.as_str(), "Checked-out");
        assert_eq!(
            serde_json::to_string(&BookingStatus::CheckedIn).unwrap(),
            "\"Checked-in\""
        );
    }

    #[test]
    fn test_happy_path_walk() {
        let status = BookingStatus::Pending
            .apply(BookingAction::Confirm)
            .and_then(|s| s.apply(BookingAction::CheckIn))
            .and_then(|s| s.apply(BookingAction::CheckOut))
            .unwrap();
        assert_eq!(status, BookingStatus::CheckedOut);
        assert!(status.is_terminal());
    }

    #[test]
    fn test_cancel_from_pending_and_confirmed() {
        assert_eq!(
            BookingStatus::Pending.apply(BookingAction::Cancel),
            Ok(BookingStatus::Cancelled)
        );
        assert_eq!(
            BookingStatus::Confirmed.apply(BookingAction::Cancel),
            Ok(BookingStatus::Cancelled)
        );
    }

    #[test]
    fn test_terminal_states_reject_everything() {
        for terminal in [BookingStatus::Cancelled, BookingStatus::CheckedOut] {
            assert!(terminal.is_terminal());
            for action in [
                BookingAction::Confirm,
                BookingAction::Cancel,
                BookingAction::CheckIn,
                BookingAction::CheckOut,
            ] {
                assert!(terminal.apply(action).is_err());
            }
        }
    }

    #[test]
    fn test_invalid_transitions() {
        // No skipping straight to checked-in, no cancel after check-in
        assert!(BookingStatus::Pending.apply(BookingAction::CheckIn).is_err());
        assert!(BookingStatus::Pending.apply(BookingAction::CheckOut).is_err());
        assert!(BookingStatus::CheckedIn.apply(BookingAction::Cancel).is_err());
        assert!(BookingStatus::CheckedIn.apply(BookingAction::Confirm).is_err());
        assert!(BookingStatus::Confirmed.apply(BookingAction::Confirm).is_err());
        assert!(BookingStatus::Confirmed.apply(BookingAction::CheckOut).is_err());
    }

    #[test]
    fn test_transition_error_message_names_both_sides() {
        let err = BookingStatus::Cancelled
            .apply(BookingAction::Confirm)
            .unwrap_err();
        assert_eq!(err.to_string(), "cannot confirm a booking that is Cancelled");
    }
}

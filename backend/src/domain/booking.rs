//! Booking aggregate, status state machine, and client contact details.

use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

use chrono::{DateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use super::tenant::TenantId;

/// Appointment lifecycle status.
///
/// `Pending` and `Confirmed` occupy the booked interval; `Cancelled` and
/// `Finalized` are terminal and release it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum BookingStatus {
    /// Awaiting tenant approval. Occupies its slot.
    Pending,
    /// Booked. Occupies its slot.
    Confirmed,
    /// Cancelled with a reason. Terminal.
    Cancelled,
    /// Service delivered. Terminal.
    Finalized,
}

impl BookingStatus {
    /// Stable storage/wire representation.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Confirmed => "confirmed",
            Self::Cancelled => "cancelled",
            Self::Finalized => "finalized",
        }
    }

    /// Whether a booking in this status blocks its interval.
    pub fn is_occupying(self) -> bool {
        matches!(self, Self::Pending | Self::Confirmed)
    }

    /// Whether the state machine permits moving to `next`.
    ///
    /// ```text
    /// pending ──► confirmed ──► finalized
    ///    │            │
    ///    └──► cancelled ◄┘
    /// ```
    pub fn can_transition_to(self, next: Self) -> bool {
        matches!(
            (self, next),
            (Self::Pending, Self::Confirmed)
                | (Self::Pending, Self::Cancelled)
                | (Self::Confirmed, Self::Finalized)
                | (Self::Confirmed, Self::Cancelled)
        )
    }
}

impl fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown status string.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown booking status: {0}")]
pub struct ParseBookingStatusError(pub String);

impl FromStr for BookingStatus {
    type Err = ParseBookingStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "confirmed" => Ok(Self::Confirmed),
            "cancelled" => Ok(Self::Cancelled),
            "finalized" => Ok(Self::Finalized),
            other => Err(ParseBookingStatusError(other.to_owned())),
        }
    }
}

/// Validation errors raised by [`ClientContact`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ContactValidationError {
    /// Names shorter than three characters are rejected.
    #[error("client name must be at least 3 characters")]
    NameTooShort,
    /// Phone numbers normalize to 10 or 11 digits.
    #[error("client phone must contain 10 or 11 digits")]
    PhoneDigitCount,
    /// Optional email must look like an address when present.
    #[error("client email is not a valid address")]
    MalformedEmail,
}

fn email_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("valid email pattern"))
}

/// Validated client contact details attached to a booking.
///
/// The phone is normalized to bare digits on construction; formatting
/// characters in the input are accepted and stripped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientContact {
    name: String,
    phone: String,
    email: Option<String>,
}

impl ClientContact {
    /// Validate and construct contact details.
    pub fn new(
        name: impl Into<String>,
        phone: &str,
        email: Option<&str>,
    ) -> Result<Self, ContactValidationError> {
        let name = name.into().trim().to_owned();
        if name.chars().count() < 3 {
            return Err(ContactValidationError::NameTooShort);
        }

        let digits: String = phone.chars().filter(char::is_ascii_digit).collect();
        if !(10..=11).contains(&digits.chars().count()) {
            return Err(ContactValidationError::PhoneDigitCount);
        }

        let email = match email.map(str::trim) {
            None | Some("") => None,
            Some(raw) => {
                if !email_pattern().is_match(raw) {
                    return Err(ContactValidationError::MalformedEmail);
                }
                Some(raw.to_owned())
            }
        };

        Ok(Self {
            name,
            phone: digits,
            email,
        })
    }

    /// Client display name, trimmed.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Phone number as bare digits.
    pub fn phone(&self) -> &str {
        &self.phone
    }

    /// Optional email address.
    pub fn email(&self) -> Option<&str> {
        self.email.as_deref()
    }
}

/// A booked appointment.
///
/// Created only by the admission controller; mutated only through the status
/// transitions in the lifecycle service. `starts_at`/`ends_at` are absolute
/// instants; the buffered footprint is `[occupied_from, occupied_until)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Booking {
    pub id: Uuid,
    pub tenant_id: TenantId,
    pub professional_id: Uuid,
    pub service_id: Uuid,
    pub starts_at: DateTime<Utc>,
    pub ends_at: DateTime<Utc>,
    pub occupied_from: DateTime<Utc>,
    pub occupied_until: DateTime<Utc>,
    pub contact: ClientContact,
    pub status: BookingStatus,
    pub cancellation_reason: Option<String>,
    pub cancelled_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

//! Weekly business hours and blocked periods.
//!
//! Business hours answer "is the tenant open on this weekday, and when".
//! Blocked periods carve intervals out of an open day, either for one
//! professional or for everyone, either on a specific date or recurring on a
//! weekday.

use chrono::{Datelike, NaiveDate, NaiveTime};
use uuid::Uuid;

use super::slots::TimeInterval;
use super::tenant::TenantId;

/// Weekday index used throughout the schema: 0 = Sunday .. 6 = Saturday.
pub fn weekday_index(date: NaiveDate) -> u8 {
    u8::try_from(date.weekday().num_days_from_sunday()).unwrap_or(0)
}

/// English weekday name for response metadata.
pub fn weekday_name(date: NaiveDate) -> &'static str {
    match weekday_index(date) {
        0 => "Sunday",
        1 => "Monday",
        2 => "Tuesday",
        3 => "Wednesday",
        4 => "Thursday",
        5 => "Friday",
        _ => "Saturday",
    }
}

/// Validation errors for schedule entities.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ScheduleValidationError {
    /// Opening must precede closing.
    #[error("opens_at must be before closes_at")]
    InvertedHours,
    /// A block must cover a non-empty interval.
    #[error("block start_time must be before end_time")]
    InvertedBlock,
    /// Weekday indexes run 0 (Sunday) through 6 (Saturday).
    #[error("weekday index must be 0..=6, got {value}")]
    WeekdayOutOfRange { value: u8 },
    /// A recurring block needs a weekday to recur on.
    #[error("a block without a date must carry a weekday")]
    RecurringBlockWithoutWeekday,
}

/// The open/close window for one (tenant, weekday) pair.
///
/// At most one active record exists per pair; absence means closed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BusinessHours {
    tenant_id: TenantId,
    weekday: u8,
    opens_at: NaiveTime,
    closes_at: NaiveTime,
    active: bool,
}

impl BusinessHours {
    /// Validate and construct a business-hours record.
    pub fn new(
        tenant_id: TenantId,
        weekday: u8,
        opens_at: NaiveTime,
        closes_at: NaiveTime,
        active: bool,
    ) -> Result<Self, ScheduleValidationError> {
        if weekday > 6 {
            return Err(ScheduleValidationError::WeekdayOutOfRange { value: weekday });
        }
        if opens_at >= closes_at {
            return Err(ScheduleValidationError::InvertedHours);
        }
        Ok(Self {
            tenant_id,
            weekday,
            opens_at,
            closes_at,
            active,
        })
    }

    /// Owning tenant.
    pub fn tenant_id(&self) -> TenantId {
        self.tenant_id
    }

    /// Weekday index (0 = Sunday).
    pub fn weekday(&self) -> u8 {
        self.weekday
    }

    /// Opening time.
    pub fn opens_at(&self) -> NaiveTime {
        self.opens_at
    }

    /// Closing time.
    pub fn closes_at(&self) -> NaiveTime {
        self.closes_at
    }

    /// Whether this record is in force. Inactive records read as closed.
    pub fn is_active(&self) -> bool {
        self.active
    }
}

/// A recurring or one-off interval during which bookings are rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockedPeriod {
    id: Uuid,
    tenant_id: TenantId,
    /// `None` applies the block to every professional of the tenant.
    professional_id: Option<Uuid>,
    /// `None` makes the block recur on `weekday`.
    date: Option<NaiveDate>,
    weekday: Option<u8>,
    start_time: NaiveTime,
    end_time: NaiveTime,
    reason: String,
}

impl BlockedPeriod {
    /// Validate and construct a blocked period.
    #[expect(clippy::too_many_arguments, reason = "flat row shape from storage")]
    pub fn new(
        id: Uuid,
        tenant_id: TenantId,
        professional_id: Option<Uuid>,
        date: Option<NaiveDate>,
        weekday: Option<u8>,
        start_time: NaiveTime,
        end_time: NaiveTime,
        reason: String,
    ) -> Result<Self, ScheduleValidationError> {
        if start_time >= end_time {
            return Err(ScheduleValidationError::InvertedBlock);
        }
        if let Some(value) = weekday
            && value > 6
        {
            return Err(ScheduleValidationError::WeekdayOutOfRange { value });
        }
        if date.is_none() && weekday.is_none() {
            return Err(ScheduleValidationError::RecurringBlockWithoutWeekday);
        }
        Ok(Self {
            id,
            tenant_id,
            professional_id,
            date,
            weekday,
            start_time,
            end_time,
            reason,
        })
    }

    /// Block identifier.
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Owning tenant.
    pub fn tenant_id(&self) -> TenantId {
        self.tenant_id
    }

    /// Professional the block is scoped to, if any.
    pub fn professional_id(&self) -> Option<Uuid> {
        self.professional_id
    }

    /// Why the interval is blocked (lunch, cleaning, ...).
    pub fn reason(&self) -> &str {
        &self.reason
    }

    /// Whether this block applies to `date`: either the dates match exactly,
    /// or the block is recurring and the weekday matches.
    pub fn applies_on(&self, date: NaiveDate) -> bool {
        match self.date {
            Some(own) => own == date,
            None => self.weekday == Some(weekday_index(date)),
        }
    }

    /// Whether this block constrains `professional_id` (wildcard blocks
    /// constrain everyone).
    pub fn applies_to_professional(&self, professional_id: Uuid) -> bool {
        self.professional_id.is_none_or(|own| own == professional_id)
    }

    /// The blocked interval anchored on a concrete date.
    pub fn interval_on(&self, date: NaiveDate) -> Option<TimeInterval> {
        TimeInterval::new(date.and_time(self.start_time), date.and_time(self.end_time))
    }
}

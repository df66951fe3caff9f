//! Tenant identity and per-tenant booking configuration.
//!
//! Every operation in this core takes the tenant as an explicit input; there
//! is no ambient tenant state. The [`TenantContext`] carries the scheduling
//! knobs the engine needs: the tenant's civil timezone, the slot granularity,
//! the initial status given to admitted bookings, and the booking horizon.

use chrono_tz::Tz;
use uuid::Uuid;

use super::booking::BookingStatus;
use super::slots::SlotGranularity;

/// Default number of days into the future a date may be queried or booked.
pub const DEFAULT_BOOKING_HORIZON_DAYS: u32 = 90;

/// Opaque tenant identifier. Scopes every other entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TenantId(Uuid);

impl TenantId {
    /// Wrap an already-parsed UUID.
    pub fn from_uuid(id: Uuid) -> Self {
        Self(id)
    }

    /// Access the underlying UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl std::fmt::Display for TenantId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// Resolved tenant configuration, immutable for the duration of a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TenantContext {
    /// The tenant this configuration belongs to.
    pub id: TenantId,
    /// Civil timezone all business hours, blocks, and dates are expressed in.
    pub timezone: Tz,
    /// Granularity of generated candidate slots.
    pub slot_granularity: SlotGranularity,
    /// Status newly admitted bookings start in. `Confirmed` unless the tenant
    /// runs an approval workflow.
    pub initial_status: BookingStatus,
    /// How far into the future availability may be queried, in days.
    pub booking_horizon_days: u32,
}

impl TenantContext {
    /// Build a context with the default granularity (30 minutes), initial
    /// status (`Confirmed`), and horizon (90 days).
    pub fn new(id: TenantId, timezone: Tz) -> Self {
        Self {
            id,
            timezone,
            slot_granularity: SlotGranularity::default(),
            initial_status: BookingStatus::Confirmed,
            booking_horizon_days: DEFAULT_BOOKING_HORIZON_DAYS,
        }
    }

    /// Override the slot granularity.
    pub fn with_slot_granularity(mut self, granularity: SlotGranularity) -> Self {
        self.slot_granularity = granularity;
        self
    }

    /// Override the initial status assigned on admission.
    pub fn with_initial_status(mut self, status: BookingStatus) -> Self {
        self.initial_status = status;
        self
    }

    /// Override the booking horizon.
    pub fn with_booking_horizon_days(mut self, days: u32) -> Self {
        self.booking_horizon_days = days;
        self
    }
}

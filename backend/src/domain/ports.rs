//! Domain ports defining the edges of the hexagon.
//!
//! Driving ports are the use-case traits the HTTP adapter calls, with typed
//! request/response payloads. Driven ports describe how the domain expects to
//! interact with adapters (tenant directory, catalog, schedule, booking
//! ledger, wall clock). Each driven port exposes a strongly typed error enum
//! so adapters map their failures into predictable variants.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use uuid::Uuid;

use super::availability::DayAvailability;
use super::booking::{Booking, BookingStatus, ClientContact};
use super::catalog::{Professional, Service};
use super::error::DomainError;
use super::schedule::{BlockedPeriod, BusinessHours};
use super::tenant::{TenantContext, TenantId};

// ---------------------------------------------------------------------------
// Driving ports (use cases)
// ---------------------------------------------------------------------------

/// Request payload for the availability query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GetAvailabilityRequest {
    pub tenant_id: TenantId,
    pub professional_id: Uuid,
    pub service_id: Uuid,
    /// Target calendar date in the tenant's civil timezone.
    pub date: NaiveDate,
}

/// Availability listing use case.
#[async_trait]
pub trait AvailabilityQuery: Send + Sync {
    /// Classify every candidate slot of the requested day.
    async fn get_availability(
        &self,
        request: GetAvailabilityRequest,
    ) -> Result<DayAvailability, DomainError>;
}

/// Request payload for booking admission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateBookingRequest {
    pub tenant_id: TenantId,
    pub professional_id: Uuid,
    pub service_id: Uuid,
    /// Requested service start instant.
    pub starts_at: DateTime<Utc>,
    pub contact: ClientContact,
}

/// Response payload for a successful admission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateBookingResponse {
    pub booking_id: Uuid,
    /// The status the booking was created in (tenant-configured).
    pub status: BookingStatus,
}

/// Booking admission use case: atomic check-and-insert.
#[async_trait]
pub trait BookingAdmission: Send + Sync {
    /// Admit or reject a booking for one specific slot.
    async fn create_booking(
        &self,
        request: CreateBookingRequest,
    ) -> Result<CreateBookingResponse, DomainError>;
}

/// Request payload for cancellation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CancelBookingRequest {
    pub tenant_id: TenantId,
    pub booking_id: Uuid,
    /// Required, non-empty after trimming.
    pub reason: String,
}

/// Request payload for a status transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateBookingStatusRequest {
    pub tenant_id: TenantId,
    pub booking_id: Uuid,
    pub status: BookingStatus,
    /// Required iff `status` is `Cancelled`.
    pub cancellation_reason: Option<String>,
}

/// Booking lifecycle use case enforcing the status state machine.
#[async_trait]
pub trait BookingLifecycle: Send + Sync {
    /// Cancel an occupying booking, recording the reason and timestamp.
    async fn cancel_booking(&self, request: CancelBookingRequest) -> Result<(), DomainError>;

    /// Apply a status transition. Times are never editable through this
    /// path; rescheduling is cancel + create-new.
    async fn update_status(&self, request: UpdateBookingStatusRequest) -> Result<(), DomainError>;
}

/// Booking read use case.
#[async_trait]
pub trait BookingsQuery: Send + Sync {
    /// Fetch one booking within the tenant scope.
    async fn get_booking(
        &self,
        tenant_id: TenantId,
        booking_id: Uuid,
    ) -> Result<Booking, DomainError>;
}

// ---------------------------------------------------------------------------
// Driven port errors
// ---------------------------------------------------------------------------

/// Errors surfaced by the tenant directory adapter.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TenantDirectoryError {
    /// Directory backend unavailable.
    #[error("tenant directory connection failed: {message}")]
    Connection { message: String },
    /// Lookup failed or returned corrupt configuration.
    #[error("tenant directory lookup failed: {message}")]
    Query { message: String },
}

impl TenantDirectoryError {
    /// Helper for connection failures.
    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection {
            message: message.into(),
        }
    }

    /// Helper for lookup failures.
    pub fn query(message: impl Into<String>) -> Self {
        Self::Query {
            message: message.into(),
        }
    }
}

/// Errors surfaced by the catalog adapter.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CatalogRepositoryError {
    /// Catalog backend unavailable.
    #[error("catalog repository connection failed: {message}")]
    Connection { message: String },
    /// Query failed or a row failed domain validation.
    #[error("catalog repository query failed: {message}")]
    Query { message: String },
}

impl CatalogRepositoryError {
    /// Helper for connection failures.
    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection {
            message: message.into(),
        }
    }

    /// Helper for query failures.
    pub fn query(message: impl Into<String>) -> Self {
        Self::Query {
            message: message.into(),
        }
    }
}

/// Errors surfaced by the schedule adapters (hours and blocks).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ScheduleRepositoryError {
    /// Schedule backend unavailable.
    #[error("schedule repository connection failed: {message}")]
    Connection { message: String },
    /// Query failed or a row failed domain validation.
    #[error("schedule repository query failed: {message}")]
    Query { message: String },
}

impl ScheduleRepositoryError {
    /// Helper for connection failures.
    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection {
            message: message.into(),
        }
    }

    /// Helper for query failures.
    pub fn query(message: impl Into<String>) -> Self {
        Self::Query {
            message: message.into(),
        }
    }
}

/// Errors surfaced by the booking ledger adapter.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BookingRepositoryError {
    /// Ledger backend unavailable.
    #[error("booking repository connection failed: {message}")]
    Connection { message: String },
    /// Query or mutation failed.
    #[error("booking repository query failed: {message}")]
    Query { message: String },
    /// The atomic admission step found an overlapping occupying booking, or
    /// the storage constraint rejected the insert under a concurrent race.
    #[error("slot conflict for professional {professional_id}")]
    SlotConflict { professional_id: Uuid },
}

impl BookingRepositoryError {
    /// Helper for connection failures.
    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection {
            message: message.into(),
        }
    }

    /// Helper for query failures.
    pub fn query(message: impl Into<String>) -> Self {
        Self::Query {
            message: message.into(),
        }
    }

    /// Helper for admission conflicts.
    pub fn slot_conflict(professional_id: Uuid) -> Self {
        Self::SlotConflict { professional_id }
    }
}

impl From<TenantDirectoryError> for DomainError {
    fn from(err: TenantDirectoryError) -> Self {
        match err {
            TenantDirectoryError::Connection { message } => Self::service_unavailable(message),
            TenantDirectoryError::Query { message } => Self::internal(message),
        }
    }
}

impl From<CatalogRepositoryError> for DomainError {
    fn from(err: CatalogRepositoryError) -> Self {
        match err {
            CatalogRepositoryError::Connection { message } => Self::service_unavailable(message),
            CatalogRepositoryError::Query { message } => Self::internal(message),
        }
    }
}

impl From<ScheduleRepositoryError> for DomainError {
    fn from(err: ScheduleRepositoryError) -> Self {
        match err {
            ScheduleRepositoryError::Connection { message } => Self::service_unavailable(message),
            ScheduleRepositoryError::Query { message } => Self::internal(message),
        }
    }
}

impl From<BookingRepositoryError> for DomainError {
    fn from(err: BookingRepositoryError) -> Self {
        match err {
            BookingRepositoryError::Connection { message } => Self::service_unavailable(message),
            BookingRepositoryError::Query { message } => Self::internal(message),
            BookingRepositoryError::SlotConflict { .. } => {
                Self::slot_unavailable("the requested slot is no longer available")
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Driven ports
// ---------------------------------------------------------------------------

/// Read-only tenant resolution (slug handling lives outside this core).
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TenantDirectory: Send + Sync {
    /// Resolve a tenant id to its configuration, or `None` when unknown.
    async fn resolve(
        &self,
        tenant_id: TenantId,
    ) -> Result<Option<TenantContext>, TenantDirectoryError>;
}

/// Read-only access to services and professionals.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CatalogRepository: Send + Sync {
    /// Fetch a service by id within the tenant scope (active or not).
    async fn find_service(
        &self,
        tenant_id: TenantId,
        service_id: Uuid,
    ) -> Result<Option<Service>, CatalogRepositoryError>;

    /// Fetch a professional by id within the tenant scope (active or not).
    async fn find_professional(
        &self,
        tenant_id: TenantId,
        professional_id: Uuid,
    ) -> Result<Option<Professional>, CatalogRepositoryError>;

    /// Whether the professional is associated with the service.
    async fn professional_offers_service(
        &self,
        tenant_id: TenantId,
        professional_id: Uuid,
        service_id: Uuid,
    ) -> Result<bool, CatalogRepositoryError>;
}

/// Weekly business-hours lookup.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BusinessHoursRepository: Send + Sync {
    /// The active record for a weekday, or `None` (closed).
    async fn hours_for_weekday(
        &self,
        tenant_id: TenantId,
        weekday: u8,
    ) -> Result<Option<BusinessHours>, ScheduleRepositoryError>;
}

/// Blocked-period lookup for one professional and date.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BlockedPeriodRepository: Send + Sync {
    /// Blocks applying to the date: dated matches plus recurring weekday
    /// matches, scoped to the professional or to everyone. Results may
    /// overlap each other; callers treat them as a union.
    async fn blocks_for_date(
        &self,
        tenant_id: TenantId,
        professional_id: Uuid,
        date: NaiveDate,
    ) -> Result<Vec<BlockedPeriod>, ScheduleRepositoryError>;
}

/// Buffered footprint of an existing occupying booking.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OccupiedInterval {
    /// Inclusive start of the footprint.
    pub from: DateTime<Utc>,
    /// Exclusive end of the footprint.
    pub until: DateTime<Utc>,
}

/// Row the admission controller asks the ledger to insert.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewBookingRecord {
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
}

/// The booking ledger: the only port whose writes carry the no-double-booking
/// invariant.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BookingRepository: Send + Sync {
    /// Buffered footprints of occupying bookings for a professional whose
    /// intervals intersect `[from, until)`.
    async fn occupied_between(
        &self,
        tenant_id: TenantId,
        professional_id: Uuid,
        from: DateTime<Utc>,
        until: DateTime<Utc>,
    ) -> Result<Vec<OccupiedInterval>, BookingRepositoryError>;

    /// Atomically re-check the footprint against occupying bookings and
    /// insert the record in the same transaction. A conflicting booking,
    /// found by the re-read or by the storage constraint, yields
    /// [`BookingRepositoryError::SlotConflict`] and inserts nothing.
    async fn admit(&self, record: &NewBookingRecord) -> Result<(), BookingRepositoryError>;

    /// Fetch one booking within the tenant scope.
    async fn find_by_id(
        &self,
        tenant_id: TenantId,
        booking_id: Uuid,
    ) -> Result<Option<Booking>, BookingRepositoryError>;

    /// Guarded status transition: applies `next` only while the stored
    /// status still equals `expected_current`. Returns `false` when the
    /// guard missed (a concurrent transition won), mutating nothing.
    async fn transition_status(
        &self,
        tenant_id: TenantId,
        booking_id: Uuid,
        expected_current: BookingStatus,
        next: BookingStatus,
        cancellation_reason: Option<String>,
        cancelled_at: Option<DateTime<Utc>>,
    ) -> Result<bool, BookingRepositoryError>;
}

/// Wall-clock port so "not in the past" rules stay testable.
#[cfg_attr(test, mockall::automock)]
pub trait Clock: Send + Sync {
    /// Current instant.
    fn now_utc(&self) -> DateTime<Utc>;
}

/// Production clock reading the system time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_utc(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

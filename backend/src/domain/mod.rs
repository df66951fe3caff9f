//! Domain layer: entities, ports, and the scheduling services.
//!
//! Everything in here is transport and storage agnostic. Inbound adapters
//! drive the use-case traits in [`ports`]; outbound adapters implement the
//! repository traits. The services own the algorithms: slot classification,
//! atomic admission, and the booking status machine.

pub mod admission;
pub mod availability;
pub mod booking;
pub mod catalog;
pub mod error;
pub mod lifecycle;
pub mod ports;
pub mod schedule;
pub mod slots;
pub mod tenant;

pub use admission::AdmissionService;
pub use availability::{AvailabilityService, DayAvailability, SlotVerdict, UnavailableReason};
pub use booking::{Booking, BookingStatus, ClientContact, ContactValidationError};
pub use catalog::{CatalogValidationError, Professional, Service};
pub use error::{DomainError, ErrorCode};
pub use lifecycle::BookingLifecycleService;
pub use ports::{
    AvailabilityQuery, BlockedPeriodRepository, BookingAdmission, BookingLifecycle,
    BookingRepository, BookingRepositoryError, BookingsQuery, BusinessHoursRepository,
    CancelBookingRequest, CatalogRepository, CatalogRepositoryError, Clock,
    CreateBookingRequest, CreateBookingResponse, GetAvailabilityRequest, NewBookingRecord,
    OccupiedInterval, ScheduleRepositoryError, SystemClock, TenantDirectory,
    TenantDirectoryError, UpdateBookingStatusRequest,
};
pub use schedule::{
    BlockedPeriod, BusinessHours, ScheduleValidationError, weekday_index, weekday_name,
};
pub use slots::{SlotGranularity, SlotGranularityError, TimeInterval, slot_starts};
pub use tenant::{DEFAULT_BOOKING_HORIZON_DAYS, TenantContext, TenantId};

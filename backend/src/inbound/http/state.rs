//! Shared HTTP adapter state.
//!
//! HTTP handlers accept this state via `actix_web::web::Data` so they only
//! depend on domain ports (use-cases) and remain testable without I/O.

use std::sync::Arc;

use crate::domain::ports::{AvailabilityQuery, BookingAdmission, BookingLifecycle, BookingsQuery};

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub availability: Arc<dyn AvailabilityQuery>,
    pub admission: Arc<dyn BookingAdmission>,
    pub lifecycle: Arc<dyn BookingLifecycle>,
    pub bookings: Arc<dyn BookingsQuery>,
}

impl HttpState {
    /// Bundle the use-case ports for handler injection.
    pub fn new(
        availability: Arc<dyn AvailabilityQuery>,
        admission: Arc<dyn BookingAdmission>,
        lifecycle: Arc<dyn BookingLifecycle>,
        bookings: Arc<dyn BookingsQuery>,
    ) -> Self {
        Self {
            availability,
            admission,
            lifecycle,
            bookings,
        }
    }
}

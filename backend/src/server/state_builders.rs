//! Builders wiring the Diesel adapters into the use-case services.

use std::sync::Arc;

use actix_web::web;

use crate::domain::ports::SystemClock;
use crate::domain::{AdmissionService, AvailabilityService, BookingLifecycleService};
use crate::inbound::http::state::HttpState;
use crate::outbound::persistence::{
    DbPool, DieselBookingRepository, DieselCatalogRepository, DieselScheduleRepository,
    DieselTenantDirectory,
};

/// Build the shared HTTP state from database-backed adapters.
pub(super) fn build_http_state(pool: &DbPool) -> web::Data<HttpState> {
    let tenants = Arc::new(DieselTenantDirectory::new(pool.clone()));
    let catalog = Arc::new(DieselCatalogRepository::new(pool.clone()));
    let schedule = Arc::new(DieselScheduleRepository::new(pool.clone()));
    let bookings = Arc::new(DieselBookingRepository::new(pool.clone()));
    let clock = Arc::new(SystemClock);

    let availability = Arc::new(AvailabilityService::new(
        tenants.clone(),
        catalog.clone(),
        schedule.clone(),
        schedule.clone(),
        bookings.clone(),
        clock.clone(),
    ));
    let admission = Arc::new(AdmissionService::new(
        tenants.clone(),
        catalog,
        schedule.clone(),
        schedule,
        bookings.clone(),
        clock.clone(),
    ));
    // One service instance serves both the lifecycle and the read port.
    let lifecycle = Arc::new(BookingLifecycleService::new(tenants, bookings, clock));

    web::Data::new(HttpState::new(
        availability,
        admission,
        lifecycle.clone(),
        lifecycle,
    ))
}

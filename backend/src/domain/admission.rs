//! Booking admission: the atomic decide-and-insert path.
//!
//! Admission re-runs the availability check for the single chosen slot and
//! hands the insert to the ledger, which performs the authoritative re-check
//! and insert inside one transaction. A storage-level conflict is an
//! expected outcome under concurrency, retried at most once by re-running
//! the admission check rather than blindly re-inserting.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tracing::{debug, info};
use uuid::Uuid;

use super::availability::{
    classify, load_snapshot, occupied_interval, resolve_catalog, resolve_tenant,
};
use super::catalog::Service;
use super::error::DomainError;
use super::ports::{
    BlockedPeriodRepository, BookingAdmission, BookingRepository, BookingRepositoryError,
    BusinessHoursRepository, CatalogRepository, Clock, CreateBookingRequest,
    CreateBookingResponse, NewBookingRecord, TenantDirectory,
};
use super::tenant::TenantContext;

/// Implements [`BookingAdmission`] over the driven ports.
pub struct AdmissionService {
    tenants: Arc<dyn TenantDirectory>,
    catalog: Arc<dyn CatalogRepository>,
    hours: Arc<dyn BusinessHoursRepository>,
    blocks: Arc<dyn BlockedPeriodRepository>,
    bookings: Arc<dyn BookingRepository>,
    clock: Arc<dyn Clock>,
}

impl AdmissionService {
    /// Wire the service to its collaborators.
    pub fn new(
        tenants: Arc<dyn TenantDirectory>,
        catalog: Arc<dyn CatalogRepository>,
        hours: Arc<dyn BusinessHoursRepository>,
        blocks: Arc<dyn BlockedPeriodRepository>,
        bookings: Arc<dyn BookingRepository>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            tenants,
            catalog,
            hours,
            blocks,
            bookings,
            clock,
        }
    }

    /// Pre-admission slot check for one start instant. `Ok(())` means the
    /// slot looked free at read time; the ledger still has the final word.
    async fn check_slot(
        &self,
        tenant: &TenantContext,
        professional_id: Uuid,
        service: &Service,
        starts_at: DateTime<Utc>,
    ) -> Result<(), DomainError> {
        let local_start = starts_at.with_timezone(&tenant.timezone).naive_local();
        let date = local_start.date();
        let snapshot = load_snapshot(
            self.hours.as_ref(),
            self.blocks.as_ref(),
            self.bookings.as_ref(),
            tenant,
            professional_id,
            date,
        )
        .await?;
        let footprint = occupied_interval(service, local_start)?;
        match classify(&snapshot, professional_id, date, &footprint) {
            None => Ok(()),
            Some(reason) => Err(DomainError::slot_unavailable(reason.to_string())),
        }
    }
}

#[async_trait]
impl BookingAdmission for AdmissionService {
    async fn create_booking(
        &self,
        request: CreateBookingRequest,
    ) -> Result<CreateBookingResponse, DomainError> {
        let tenant = resolve_tenant(self.tenants.as_ref(), request.tenant_id).await?;
        let (professional, service) = resolve_catalog(
            self.catalog.as_ref(),
            tenant.id,
            request.professional_id,
            request.service_id,
        )
        .await?;

        if request.starts_at <= self.clock.now_utc() {
            return Err(DomainError::invalid_request("start time is in the past"));
        }

        self.check_slot(&tenant, professional.id(), &service, request.starts_at)
            .await?;

        let record = NewBookingRecord {
            id: Uuid::new_v4(),
            tenant_id: tenant.id,
            professional_id: professional.id(),
            service_id: service.id(),
            starts_at: request.starts_at,
            ends_at: request.starts_at + service.duration(),
            occupied_from: request.starts_at - service.buffer_before(),
            occupied_until: request.starts_at + service.duration() + service.buffer_after(),
            contact: request.contact,
            status: tenant.initial_status,
        };

        match self.bookings.admit(&record).await {
            Ok(()) => {
                info!(booking_id = %record.id, professional_id = %record.professional_id,
                    "booking admitted");
                return Ok(CreateBookingResponse {
                    booking_id: record.id,
                    status: record.status,
                });
            }
            Err(BookingRepositoryError::SlotConflict { .. }) => {
                debug!(professional_id = %record.professional_id,
                    "admission lost a race, re-checking once");
            }
            Err(other) => return Err(other.into()),
        }

        // The losing side of a race re-runs the full check: the winner's
        // booking now shows up as a footprint and yields a specific reason.
        self.check_slot(&tenant, professional.id(), &service, request.starts_at)
            .await?;

        // The conflicting booking may have been cancelled between the
        // constraint rejection and the re-check; try once more.
        match self.bookings.admit(&record).await {
            Ok(()) => {
                info!(booking_id = %record.id, professional_id = %record.professional_id,
                    "booking admitted on retry");
                Ok(CreateBookingResponse {
                    booking_id: record.id,
                    status: record.status,
                })
            }
            Err(err) => Err(err.into()),
        }
    }
}

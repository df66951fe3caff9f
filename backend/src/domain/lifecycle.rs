//! Booking lifecycle: cancellation and guarded status transitions.
//!
//! The status machine is enforced twice: here, against the booking as read,
//! and in the ledger, which applies the transition only while the stored
//! status still matches what was read. A missed guard means a concurrent
//! transition won and the caller gets a conflict instead of a silent lost
//! update.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::info;
use uuid::Uuid;

use super::availability::resolve_tenant;
use super::booking::{Booking, BookingStatus};
use super::error::DomainError;
use super::ports::{
    BookingLifecycle, BookingRepository, BookingsQuery, CancelBookingRequest, Clock,
    TenantDirectory, UpdateBookingStatusRequest,
};
use super::tenant::TenantId;

/// Implements [`BookingLifecycle`] and [`BookingsQuery`] over the ledger.
pub struct BookingLifecycleService {
    tenants: Arc<dyn TenantDirectory>,
    bookings: Arc<dyn BookingRepository>,
    clock: Arc<dyn Clock>,
}

impl BookingLifecycleService {
    /// Wire the service to its collaborators.
    pub fn new(
        tenants: Arc<dyn TenantDirectory>,
        bookings: Arc<dyn BookingRepository>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            tenants,
            bookings,
            clock,
        }
    }

    async fn load_booking(
        &self,
        tenant_id: TenantId,
        booking_id: Uuid,
    ) -> Result<Booking, DomainError> {
        resolve_tenant(self.tenants.as_ref(), tenant_id).await?;
        self.bookings
            .find_by_id(tenant_id, booking_id)
            .await?
            .ok_or_else(|| DomainError::not_found("booking not found"))
    }

    async fn apply_transition(
        &self,
        booking: &Booking,
        next: BookingStatus,
        cancellation_reason: Option<&str>,
    ) -> Result<(), DomainError> {
        if !booking.status.can_transition_to(next) {
            return Err(DomainError::conflict(format!(
                "cannot transition a {} booking to {}",
                booking.status, next
            )));
        }

        let cancelled_at =
            (next == BookingStatus::Cancelled).then(|| self.clock.now_utc());
        let applied = self
            .bookings
            .transition_status(
                booking.tenant_id,
                booking.id,
                booking.status,
                next,
                cancellation_reason.map(ToOwned::to_owned),
                cancelled_at,
            )
            .await?;
        if !applied {
            return Err(DomainError::conflict(
                "booking was modified concurrently, re-fetch and retry",
            ));
        }
        info!(booking_id = %booking.id, from = %booking.status, to = %next,
            "booking status transitioned");
        Ok(())
    }
}

#[async_trait]
impl BookingLifecycle for BookingLifecycleService {
    async fn cancel_booking(&self, request: CancelBookingRequest) -> Result<(), DomainError> {
        let reason = request.reason.trim();
        if reason.is_empty() {
            return Err(DomainError::invalid_request(
                "cancellation reason is required",
            ));
        }

        let booking = self
            .load_booking(request.tenant_id, request.booking_id)
            .await?;
        // Fail closed instead of reporting idempotent success.
        match booking.status {
            BookingStatus::Cancelled => {
                return Err(DomainError::conflict("booking is already cancelled"));
            }
            BookingStatus::Finalized => {
                return Err(DomainError::conflict(
                    "a finalized booking cannot be cancelled",
                ));
            }
            BookingStatus::Pending | BookingStatus::Confirmed => {}
        }

        self.apply_transition(&booking, BookingStatus::Cancelled, Some(reason))
            .await
    }

    async fn update_status(&self, request: UpdateBookingStatusRequest) -> Result<(), DomainError> {
        let reason = request
            .cancellation_reason
            .as_deref()
            .map(str::trim)
            .filter(|r| !r.is_empty());
        if request.status == BookingStatus::Cancelled && reason.is_none() {
            return Err(DomainError::invalid_request(
                "cancellation reason is required",
            ));
        }
        if request.status != BookingStatus::Cancelled && reason.is_some() {
            return Err(DomainError::invalid_request(
                "a cancellation reason only applies when cancelling",
            ));
        }

        let booking = self
            .load_booking(request.tenant_id, request.booking_id)
            .await?;
        self.apply_transition(&booking, request.status, reason).await
    }
}

#[async_trait]
impl BookingsQuery for BookingLifecycleService {
    async fn get_booking(
        &self,
        tenant_id: TenantId,
        booking_id: Uuid,
    ) -> Result<Booking, DomainError> {
        self.load_booking(tenant_id, booking_id).await
    }
}

//! Availability evaluation: the core slot-classification algorithm.
//!
//! For a tenant, professional, service, and date, the evaluator produces a
//! verdict for every candidate slot of the day. A slot's buffered occupied
//! interval must fit inside business hours and must not intersect existing
//! occupying bookings or applicable blocked periods. Rejection reasons are
//! checked in that order; the first hit wins.
//!
//! All interval arithmetic happens in the tenant's civil timezone. The
//! booking ledger stores UTC instants, so the day's footprints are converted
//! to local time once, when the snapshot is loaded.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Days, LocalResult, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc};
use chrono_tz::Tz;
use uuid::Uuid;

use super::catalog::{Professional, Service};
use super::error::DomainError;
use super::ports::{
    AvailabilityQuery, BlockedPeriodRepository, BookingRepository, BusinessHoursRepository,
    CatalogRepository, Clock, GetAvailabilityRequest, TenantDirectory,
};
use super::schedule::{BlockedPeriod, BusinessHours, weekday_index};
use super::slots::{TimeInterval, slot_starts};
use super::tenant::{TenantContext, TenantId};

/// Why a candidate slot cannot be booked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UnavailableReason {
    /// The buffered footprint does not fit inside the open/close window.
    OutsideBusinessHours,
    /// The footprint intersects an existing occupying booking.
    Booked,
    /// The footprint intersects a blocked period. Carries the block's reason.
    Blocked(String),
}

impl std::fmt::Display for UnavailableReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::OutsideBusinessHours => f.write_str("outside business hours"),
            Self::Booked => f.write_str("booked"),
            Self::Blocked(reason) => f.write_str(reason),
        }
    }
}

/// Verdict for one candidate slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlotVerdict {
    /// The advertised start time (buffers do not shift it).
    pub time: NaiveTime,
    /// `None` means bookable.
    pub reason: Option<UnavailableReason>,
}

impl SlotVerdict {
    /// Whether the slot can be booked.
    pub fn is_available(&self) -> bool {
        self.reason.is_none()
    }
}

/// The full classified day, in ascending slot order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DayAvailability {
    pub date: NaiveDate,
    /// Weekday index, 0 = Sunday.
    pub weekday: u8,
    pub slots: Vec<SlotVerdict>,
}

impl DayAvailability {
    /// Number of candidate slots.
    pub fn total_slots(&self) -> usize {
        self.slots.len()
    }

    /// Number of bookable slots.
    pub fn available_slots(&self) -> usize {
        self.slots.iter().filter(|s| s.is_available()).count()
    }
}

/// Everything the classifier needs for one (professional, date) pair,
/// already converted to tenant-local time.
#[derive(Debug, Clone)]
pub(crate) struct ScheduleSnapshot {
    /// `None` means closed all day.
    pub(crate) hours: Option<BusinessHours>,
    pub(crate) blocks: Vec<BlockedPeriod>,
    /// Buffered footprints of existing occupying bookings.
    pub(crate) occupied: Vec<TimeInterval>,
}

/// Convert a tenant-local civil time to UTC. Ambiguous times (clocks rolled
/// back) resolve to the earliest instant; times inside a spring-forward gap
/// do not exist and yield `None`.
pub(crate) fn local_to_utc(tz: Tz, local: NaiveDateTime) -> Option<DateTime<Utc>> {
    match tz.from_local_datetime(&local) {
        LocalResult::Single(instant) => Some(instant.with_timezone(&Utc)),
        LocalResult::Ambiguous(earliest, _) => Some(earliest.with_timezone(&Utc)),
        LocalResult::None => None,
    }
}

/// First valid instant of a tenant-local calendar day. Walks forward in
/// one-hour steps when midnight falls inside a DST gap.
pub(crate) fn day_start_utc(tz: Tz, date: NaiveDate) -> DateTime<Utc> {
    for hour in 0..=3 {
        if let Some(time) = NaiveTime::from_hms_opt(hour, 0, 0)
            && let Some(instant) = local_to_utc(tz, date.and_time(time))
        {
            return instant;
        }
    }
    // No real timezone hides four consecutive midnights.
    Utc.from_utc_datetime(&date.and_time(NaiveTime::MIN))
}

/// Resolve the tenant or fail with `unauthorized`.
pub(crate) async fn resolve_tenant(
    directory: &dyn TenantDirectory,
    tenant_id: TenantId,
) -> Result<TenantContext, DomainError> {
    directory
        .resolve(tenant_id)
        .await?
        .ok_or_else(|| DomainError::unauthorized("unknown tenant"))
}

/// Resolve and validate the (professional, service) pair for a booking
/// operation: both must exist in the tenant, be active, and be associated.
pub(crate) async fn resolve_catalog(
    catalog: &dyn CatalogRepository,
    tenant_id: TenantId,
    professional_id: Uuid,
    service_id: Uuid,
) -> Result<(Professional, Service), DomainError> {
    let service = catalog
        .find_service(tenant_id, service_id)
        .await?
        .ok_or_else(|| DomainError::not_found("service not found"))?;
    if !service.is_active() {
        return Err(DomainError::invalid_request("service is inactive"));
    }

    let professional = catalog
        .find_professional(tenant_id, professional_id)
        .await?
        .ok_or_else(|| DomainError::not_found("professional not found"))?;
    if !professional.is_active() {
        return Err(DomainError::invalid_request("professional is inactive"));
    }

    if !catalog
        .professional_offers_service(tenant_id, professional_id, service_id)
        .await?
    {
        return Err(DomainError::invalid_request(
            "professional does not offer this service",
        ));
    }

    Ok((professional, service))
}

/// Load the schedule snapshot for one professional and date. When the day is
/// closed the blocks and ledger are not consulted.
pub(crate) async fn load_snapshot(
    hours_repo: &dyn BusinessHoursRepository,
    blocks_repo: &dyn BlockedPeriodRepository,
    bookings_repo: &dyn BookingRepository,
    tenant: &TenantContext,
    professional_id: Uuid,
    date: NaiveDate,
) -> Result<ScheduleSnapshot, DomainError> {
    let hours = hours_repo
        .hours_for_weekday(tenant.id, weekday_index(date))
        .await?
        .filter(BusinessHours::is_active);
    if hours.is_none() {
        return Ok(ScheduleSnapshot {
            hours: None,
            blocks: Vec::new(),
            occupied: Vec::new(),
        });
    }

    let blocks = blocks_repo
        .blocks_for_date(tenant.id, professional_id, date)
        .await?;

    let tz = tenant.timezone;
    let window_from = day_start_utc(tz, date);
    let window_until = day_start_utc(
        tz,
        date.checked_add_days(Days::new(1))
            .ok_or_else(|| DomainError::internal("date overflow computing day window"))?,
    );
    let occupied = bookings_repo
        .occupied_between(tenant.id, professional_id, window_from, window_until)
        .await?
        .into_iter()
        .filter_map(|footprint| {
            TimeInterval::new(
                footprint.from.with_timezone(&tz).naive_local(),
                footprint.until.with_timezone(&tz).naive_local(),
            )
        })
        .collect();

    Ok(ScheduleSnapshot {
        hours,
        blocks,
        occupied,
    })
}

/// Classify one buffered footprint against the snapshot. Rejections are
/// ranked: out of hours, then booked, then blocked.
pub(crate) fn classify(
    snapshot: &ScheduleSnapshot,
    professional_id: Uuid,
    date: NaiveDate,
    occupied: &TimeInterval,
) -> Option<UnavailableReason> {
    let Some(hours) = snapshot.hours.as_ref() else {
        return Some(UnavailableReason::OutsideBusinessHours);
    };
    let open_window = TimeInterval::new(
        date.and_time(hours.opens_at()),
        date.and_time(hours.closes_at()),
    )?;
    if !occupied.within(&open_window) {
        return Some(UnavailableReason::OutsideBusinessHours);
    }

    if snapshot
        .occupied
        .iter()
        .any(|existing| existing.overlaps(occupied))
    {
        return Some(UnavailableReason::Booked);
    }

    let blocking = snapshot.blocks.iter().find(|block| {
        block.applies_on(date)
            && block.applies_to_professional(professional_id)
            && block
                .interval_on(date)
                .is_some_and(|interval| interval.overlaps(occupied))
    });
    if let Some(block) = blocking {
        let reason = block.reason().trim();
        return Some(UnavailableReason::Blocked(if reason.is_empty() {
            "blocked".to_owned()
        } else {
            reason.to_owned()
        }));
    }

    None
}

/// The buffered footprint a slot starting at `start_local` would occupy.
pub(crate) fn occupied_interval(
    service: &Service,
    start_local: NaiveDateTime,
) -> Result<TimeInterval, DomainError> {
    TimeInterval::new(
        start_local - service.buffer_before(),
        start_local + service.duration() + service.buffer_after(),
    )
    .ok_or_else(|| DomainError::internal("service occupies an empty interval"))
}

/// Implements [`AvailabilityQuery`] over the driven ports.
pub struct AvailabilityService {
    tenants: Arc<dyn TenantDirectory>,
    catalog: Arc<dyn CatalogRepository>,
    hours: Arc<dyn BusinessHoursRepository>,
    blocks: Arc<dyn BlockedPeriodRepository>,
    bookings: Arc<dyn BookingRepository>,
    clock: Arc<dyn Clock>,
}

impl AvailabilityService {
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

    fn validate_date(&self, tenant: &TenantContext, date: NaiveDate) -> Result<(), DomainError> {
        let today = self
            .clock
            .now_utc()
            .with_timezone(&tenant.timezone)
            .date_naive();
        if date < today {
            return Err(DomainError::invalid_request("date is in the past"));
        }
        let horizon = today
            .checked_add_days(Days::new(u64::from(tenant.booking_horizon_days)))
            .ok_or_else(|| DomainError::internal("date overflow computing booking horizon"))?;
        if date > horizon {
            return Err(DomainError::invalid_request(
                "date is beyond the booking horizon",
            ));
        }
        Ok(())
    }
}

#[async_trait]
impl AvailabilityQuery for AvailabilityService {
    async fn get_availability(
        &self,
        request: GetAvailabilityRequest,
    ) -> Result<DayAvailability, DomainError> {
        let tenant = resolve_tenant(self.tenants.as_ref(), request.tenant_id).await?;
        let (professional, service) = resolve_catalog(
            self.catalog.as_ref(),
            tenant.id,
            request.professional_id,
            request.service_id,
        )
        .await?;
        self.validate_date(&tenant, request.date)?;

        let snapshot = load_snapshot(
            self.hours.as_ref(),
            self.blocks.as_ref(),
            self.bookings.as_ref(),
            &tenant,
            professional.id(),
            request.date,
        )
        .await?;

        let Some(hours) = snapshot.hours.as_ref() else {
            // Closed all day: an empty slot list, not an error.
            return Ok(DayAvailability {
                date: request.date,
                weekday: weekday_index(request.date),
                slots: Vec::new(),
            });
        };

        let mut slots = Vec::new();
        for start in slot_starts(hours.opens_at(), hours.closes_at(), tenant.slot_granularity) {
            let footprint = occupied_interval(&service, request.date.and_time(start))?;
            let reason = classify(&snapshot, professional.id(), request.date, &footprint);
            slots.push(SlotVerdict {
                time: start,
                reason,
            });
        }

        Ok(DayAvailability {
            date: request.date,
            weekday: weekday_index(request.date),
            slots,
        })
    }
}

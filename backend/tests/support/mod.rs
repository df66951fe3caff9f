//! Shared in-memory test doubles and fixtures for the engine suites.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, NaiveTime, TimeZone, Utc};
use uuid::Uuid;

use booking_backend::domain::ports::{
    BlockedPeriodRepository, BookingRepository, BookingRepositoryError, BusinessHoursRepository,
    CatalogRepository, CatalogRepositoryError, Clock, NewBookingRecord, OccupiedInterval,
    ScheduleRepositoryError, TenantDirectory, TenantDirectoryError,
};
use booking_backend::domain::{
    AdmissionService, AvailabilityService, BlockedPeriod, Booking, BookingLifecycleService,
    BookingStatus, BusinessHours, Professional, Service, TenantContext, TenantId,
};

pub const TENANT_UUID: &str = "9c8b1c2a-4f6e-4d2b-8a31-0f6f6d7a1b2c";
pub const PROFESSIONAL_UUID: &str = "2f4a9d7e-1b3c-4e5f-9a8b-7c6d5e4f3a2b";
pub const SERVICE_UUID: &str = "6e5d4c3b-2a1f-4e9d-8c7b-6a5f4e3d2c1b";

/// A Tuesday well inside the default booking horizon.
pub fn target_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 9, 1).expect("valid date")
}

/// Fixed "now" a week before the target date.
pub fn fixed_now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 8, 25, 12, 0, 0).single().expect("valid instant")
}

pub fn t(h: u32, m: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(h, m, 0).expect("valid time")
}

/// Clock pinned to a fixed instant.
pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn now_utc(&self) -> DateTime<Utc> {
        self.0
    }
}

/// Tenant directory backed by a map.
#[derive(Default)]
pub struct InMemoryTenantDirectory {
    tenants: HashMap<Uuid, TenantContext>,
}

impl InMemoryTenantDirectory {
    pub fn with(ctx: TenantContext) -> Self {
        let mut tenants = HashMap::new();
        tenants.insert(*ctx.id.as_uuid(), ctx);
        Self { tenants }
    }
}

#[async_trait]
impl TenantDirectory for InMemoryTenantDirectory {
    async fn resolve(
        &self,
        tenant_id: TenantId,
    ) -> Result<Option<TenantContext>, TenantDirectoryError> {
        Ok(self.tenants.get(tenant_id.as_uuid()).cloned())
    }
}

/// Catalog holding one professional and one service.
pub struct InMemoryCatalog {
    pub professional: Professional,
    pub service: Service,
    pub offers: bool,
}

#[async_trait]
impl CatalogRepository for InMemoryCatalog {
    async fn find_service(
        &self,
        tenant_id: TenantId,
        service_id: Uuid,
    ) -> Result<Option<Service>, CatalogRepositoryError> {
        let found = self.service.tenant_id() == tenant_id && self.service.id() == service_id;
        Ok(found.then(|| self.service.clone()))
    }

    async fn find_professional(
        &self,
        tenant_id: TenantId,
        professional_id: Uuid,
    ) -> Result<Option<Professional>, CatalogRepositoryError> {
        let found = self.professional.tenant_id() == tenant_id
            && self.professional.id() == professional_id;
        Ok(found.then(|| self.professional.clone()))
    }

    async fn professional_offers_service(
        &self,
        _tenant_id: TenantId,
        _professional_id: Uuid,
        _service_id: Uuid,
    ) -> Result<bool, CatalogRepositoryError> {
        Ok(self.offers)
    }
}

/// Schedule store with weekly hours and blocked periods.
#[derive(Default)]
pub struct InMemorySchedule {
    pub hours: HashMap<u8, BusinessHours>,
    pub blocks: Vec<BlockedPeriod>,
}

#[async_trait]
impl BusinessHoursRepository for InMemorySchedule {
    async fn hours_for_weekday(
        &self,
        _tenant_id: TenantId,
        weekday: u8,
    ) -> Result<Option<BusinessHours>, ScheduleRepositoryError> {
        Ok(self.hours.get(&weekday).cloned())
    }
}

#[async_trait]
impl BlockedPeriodRepository for InMemorySchedule {
    async fn blocks_for_date(
        &self,
        _tenant_id: TenantId,
        professional_id: Uuid,
        date: NaiveDate,
    ) -> Result<Vec<BlockedPeriod>, ScheduleRepositoryError> {
        Ok(self
            .blocks
            .iter()
            .filter(|block| block.applies_to_professional(professional_id))
            .filter(|block| block.applies_on(date))
            .cloned()
            .collect())
    }
}

/// Booking ledger over a mutex-guarded vector. Mirrors the storage
/// semantics: overlap re-check at admission and guarded transitions.
#[derive(Default)]
pub struct InMemoryLedger {
    bookings: Mutex<Vec<Booking>>,
}

impl InMemoryLedger {
    pub fn len(&self) -> usize {
        self.bookings.lock().expect("ledger poisoned").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Seed a booking directly, bypassing admission.
    pub fn insert(&self, booking: Booking) {
        self.bookings.lock().expect("ledger poisoned").push(booking);
    }
}

fn overlaps(existing: &Booking, from: DateTime<Utc>, until: DateTime<Utc>) -> bool {
    existing.occupied_from < until && existing.occupied_until > from
}

#[async_trait]
impl BookingRepository for InMemoryLedger {
    async fn occupied_between(
        &self,
        tenant_id: TenantId,
        professional_id: Uuid,
        from: DateTime<Utc>,
        until: DateTime<Utc>,
    ) -> Result<Vec<OccupiedInterval>, BookingRepositoryError> {
        let guard = self.bookings.lock().expect("ledger poisoned");
        let mut intervals: Vec<OccupiedInterval> = guard
            .iter()
            .filter(|b| b.tenant_id == tenant_id && b.professional_id == professional_id)
            .filter(|b| b.status.is_occupying())
            .filter(|b| overlaps(b, from, until))
            .map(|b| OccupiedInterval {
                from: b.occupied_from,
                until: b.occupied_until,
            })
            .collect();
        intervals.sort_by_key(|interval| interval.from);
        Ok(intervals)
    }

    async fn admit(&self, record: &NewBookingRecord) -> Result<(), BookingRepositoryError> {
        let mut guard = self.bookings.lock().expect("ledger poisoned");
        let conflict = guard.iter().any(|b| {
            b.professional_id == record.professional_id
                && b.status.is_occupying()
                && overlaps(b, record.occupied_from, record.occupied_until)
        });
        if conflict {
            return Err(BookingRepositoryError::slot_conflict(record.professional_id));
        }
        guard.push(Booking {
            id: record.id,
            tenant_id: record.tenant_id,
            professional_id: record.professional_id,
            service_id: record.service_id,
            starts_at: record.starts_at,
            ends_at: record.ends_at,
            occupied_from: record.occupied_from,
            occupied_until: record.occupied_until,
            contact: record.contact.clone(),
            status: record.status,
            cancellation_reason: None,
            cancelled_at: None,
            created_at: fixed_now(),
            updated_at: fixed_now(),
        });
        Ok(())
    }

    async fn find_by_id(
        &self,
        tenant_id: TenantId,
        booking_id: Uuid,
    ) -> Result<Option<Booking>, BookingRepositoryError> {
        let guard = self.bookings.lock().expect("ledger poisoned");
        Ok(guard
            .iter()
            .find(|b| b.tenant_id == tenant_id && b.id == booking_id)
            .cloned())
    }

    async fn transition_status(
        &self,
        tenant_id: TenantId,
        booking_id: Uuid,
        expected_current: BookingStatus,
        next: BookingStatus,
        cancellation_reason: Option<String>,
        cancelled_at: Option<DateTime<Utc>>,
    ) -> Result<bool, BookingRepositoryError> {
        let mut guard = self.bookings.lock().expect("ledger poisoned");
        let Some(booking) = guard.iter_mut().find(|b| {
            b.tenant_id == tenant_id && b.id == booking_id && b.status == expected_current
        }) else {
            return Ok(false);
        };
        booking.status = next;
        booking.cancellation_reason = cancellation_reason;
        booking.cancelled_at = cancelled_at;
        booking.updated_at = fixed_now();
        Ok(true)
    }
}

/// One tenant, one professional, one service, shared ledger.
pub struct Fixture {
    pub ctx: TenantContext,
    pub professional_id: Uuid,
    pub service_id: Uuid,
    pub directory: Arc<InMemoryTenantDirectory>,
    pub catalog: Arc<InMemoryCatalog>,
    pub schedule: Arc<InMemorySchedule>,
    pub ledger: Arc<InMemoryLedger>,
    pub clock: Arc<FixedClock>,
}

impl Fixture {
    /// Salon-style tenant in America/Sao_Paulo: 30-minute slots, open
    /// 09:00-18:00 on the target weekday, one 30-minute service without
    /// buffers.
    pub fn salon() -> Self {
        Self::with_service(30, 0, 0)
    }

    /// Same tenant shape with a custom service duration and buffers.
    pub fn with_service(duration: u32, before: u32, after: u32) -> Self {
        let tenant_id = TenantId::from_uuid(TENANT_UUID.parse().expect("valid uuid"));
        let professional_id: Uuid = PROFESSIONAL_UUID.parse().expect("valid uuid");
        let service_id: Uuid = SERVICE_UUID.parse().expect("valid uuid");
        let ctx = TenantContext::new(tenant_id, chrono_tz::America::Sao_Paulo);

        let professional =
            Professional::new(professional_id, tenant_id, "Bruna Lima".to_owned(), true);
        let service = Service::new(
            service_id,
            tenant_id,
            "Corte".to_owned(),
            duration,
            3000,
            before,
            after,
            true,
        )
        .expect("valid service");

        let weekday = booking_backend::domain::weekday_index(target_date());
        let mut hours = HashMap::new();
        hours.insert(
            weekday,
            BusinessHours::new(tenant_id, weekday, t(9, 0), t(18, 0), true)
                .expect("valid hours"),
        );

        let directory = Arc::new(InMemoryTenantDirectory::with(ctx.clone()));
        Self {
            ctx,
            professional_id,
            service_id,
            directory,
            catalog: Arc::new(InMemoryCatalog {
                professional,
                service,
                offers: true,
            }),
            schedule: Arc::new(InMemorySchedule {
                hours,
                blocks: Vec::new(),
            }),
            ledger: Arc::new(InMemoryLedger::default()),
            clock: Arc::new(FixedClock(fixed_now())),
        }
    }

    /// Replace the tenant context (and directory) after builder overrides.
    pub fn with_context(mut self, ctx: TenantContext) -> Self {
        self.directory = Arc::new(InMemoryTenantDirectory::with(ctx.clone()));
        self.ctx = ctx;
        self
    }

    /// Replace the blocked periods.
    pub fn with_blocks(mut self, blocks: Vec<BlockedPeriod>) -> Self {
        self.schedule = Arc::new(InMemorySchedule {
            hours: self.schedule.hours.clone(),
            blocks,
        });
        self
    }

    pub fn availability(&self) -> AvailabilityService {
        AvailabilityService::new(
            self.directory.clone(),
            self.catalog.clone(),
            self.schedule.clone(),
            self.schedule.clone(),
            self.ledger.clone(),
            self.clock.clone(),
        )
    }

    pub fn admission(&self) -> AdmissionService {
        AdmissionService::new(
            self.directory.clone(),
            self.catalog.clone(),
            self.schedule.clone(),
            self.schedule.clone(),
            self.ledger.clone(),
            self.clock.clone(),
        )
    }

    pub fn lifecycle(&self) -> BookingLifecycleService {
        BookingLifecycleService::new(
            self.directory.clone(),
            self.ledger.clone(),
            self.clock.clone(),
        )
    }

    /// The tenant-local slot start as a UTC instant. Sao Paulo holds UTC-3
    /// year round since 2019.
    pub fn slot_utc(&self, h: u32, m: u32) -> DateTime<Utc> {
        let local = target_date().and_time(t(h, m));
        self.ctx
            .timezone
            .from_local_datetime(&local)
            .single()
            .expect("unambiguous local time")
            .with_timezone(&Utc)
    }
}

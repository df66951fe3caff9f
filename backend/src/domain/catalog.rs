//! Catalog entities: services and the professionals who perform them.
//!
//! Both are read-only inputs to the engine. CRUD lives elsewhere; the engine
//! only cares about durations, buffers, and the active flag.

use chrono::Duration;
use uuid::Uuid;

use super::tenant::TenantId;

/// Validation errors raised by the catalog constructors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CatalogValidationError {
    /// A service must take a positive amount of time.
    #[error("service duration must be greater than zero minutes")]
    NonPositiveDuration,
    /// Prices are non-negative.
    #[error("service price must not be negative")]
    NegativePrice,
}

/// A bookable service offered by a tenant.
///
/// The buffers extend the footprint that must be clear around a booking; the
/// advertised slot time stays the service start.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Service {
    id: Uuid,
    tenant_id: TenantId,
    name: String,
    duration_minutes: u32,
    price_cents: i64,
    buffer_before_minutes: u32,
    buffer_after_minutes: u32,
    active: bool,
}

impl Service {
    /// Validate and construct a service.
    #[expect(clippy::too_many_arguments, reason = "flat row shape from storage")]
    pub fn new(
        id: Uuid,
        tenant_id: TenantId,
        name: String,
        duration_minutes: u32,
        price_cents: i64,
        buffer_before_minutes: u32,
        buffer_after_minutes: u32,
        active: bool,
    ) -> Result<Self, CatalogValidationError> {
        if duration_minutes == 0 {
            return Err(CatalogValidationError::NonPositiveDuration);
        }
        if price_cents < 0 {
            return Err(CatalogValidationError::NegativePrice);
        }
        Ok(Self {
            id,
            tenant_id,
            name,
            duration_minutes,
            price_cents,
            buffer_before_minutes,
            buffer_after_minutes,
            active,
        })
    }

    /// Service identifier.
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Owning tenant.
    pub fn tenant_id(&self) -> TenantId {
        self.tenant_id
    }

    /// Display name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Core service duration.
    pub fn duration(&self) -> Duration {
        Duration::minutes(i64::from(self.duration_minutes))
    }

    /// Core service duration in minutes.
    pub fn duration_minutes(&self) -> u32 {
        self.duration_minutes
    }

    /// Price in the tenant's currency, in cents.
    pub fn price_cents(&self) -> i64 {
        self.price_cents
    }

    /// Clearance required before the service starts.
    pub fn buffer_before(&self) -> Duration {
        Duration::minutes(i64::from(self.buffer_before_minutes))
    }

    /// Clearance required after the service ends.
    pub fn buffer_after(&self) -> Duration {
        Duration::minutes(i64::from(self.buffer_after_minutes))
    }

    /// Whether the service is bookable. Soft-deleted services stay in
    /// storage with `active = false`.
    pub fn is_active(&self) -> bool {
        self.active
    }
}

/// A professional who performs services for a tenant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Professional {
    id: Uuid,
    tenant_id: TenantId,
    name: String,
    active: bool,
}

impl Professional {
    /// Construct a professional.
    pub fn new(id: Uuid, tenant_id: TenantId, name: String, active: bool) -> Self {
        Self {
            id,
            tenant_id,
            name,
            active,
        }
    }

    /// Professional identifier.
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Owning tenant.
    pub fn tenant_id(&self) -> TenantId {
        self.tenant_id
    }

    /// Display name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Whether the professional currently takes bookings.
    pub fn is_active(&self) -> bool {
        self.active
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn tenant() -> TenantId {
        TenantId::from_uuid(Uuid::new_v4())
    }

    #[rstest]
    fn zero_duration_is_rejected() {
        let err = Service::new(
            Uuid::new_v4(),
            tenant(),
            "Corte".to_owned(),
            0,
            3000,
            0,
            0,
            true,
        )
        .expect_err("zero duration must fail");
        assert_eq!(err, CatalogValidationError::NonPositiveDuration);
    }

    #[rstest]
    fn negative_price_is_rejected() {
        let err = Service::new(
            Uuid::new_v4(),
            tenant(),
            "Corte".to_owned(),
            30,
            -1,
            0,
            0,
            true,
        )
        .expect_err("negative price must fail");
        assert_eq!(err, CatalogValidationError::NegativePrice);
    }

    #[rstest]
    fn buffers_convert_to_durations() {
        let service = Service::new(
            Uuid::new_v4(),
            tenant(),
            "Manicure".to_owned(),
            45,
            5000,
            10,
            15,
            true,
        )
        .expect("valid service");
        assert_eq!(service.duration(), Duration::minutes(45));
        assert_eq!(service.buffer_before(), Duration::minutes(10));
        assert_eq!(service.buffer_after(), Duration::minutes(15));
    }
}

//! PostgreSQL-backed tenant directory.
//!
//! Resolves tenant ids to their scheduling configuration. A row that fails
//! domain validation (unknown timezone, degenerate granularity) is reported
//! as a query error rather than silently patched: a tenant with corrupt
//! configuration must not take bookings.

use async_trait::async_trait;
use chrono_tz::Tz;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use tracing::warn;

use crate::domain::ports::{TenantDirectory, TenantDirectoryError};
use crate::domain::{BookingStatus, SlotGranularity, TenantContext, TenantId};

use super::error_mapping::{map_diesel_error, map_pool_error};
use super::models::TenantRow;
use super::pool::DbPool;
use super::schema::tenants;

/// Diesel-backed implementation of the [`TenantDirectory`] port.
#[derive(Clone)]
pub struct DieselTenantDirectory {
    pool: DbPool,
}

impl DieselTenantDirectory {
    /// Create a new directory over the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn row_to_context(row: TenantRow) -> Result<TenantContext, TenantDirectoryError> {
    let timezone: Tz = row.timezone.parse().map_err(|_| {
        warn!(tenant_id = %row.id, timezone = row.timezone, "unknown tenant timezone");
        TenantDirectoryError::query("tenant has an unknown timezone")
    })?;

    let granularity = u32::try_from(row.slot_granularity_minutes)
        .ok()
        .and_then(|m| SlotGranularity::from_minutes(m).ok())
        .ok_or_else(|| {
            warn!(tenant_id = %row.id, minutes = row.slot_granularity_minutes,
                "invalid tenant slot granularity");
            TenantDirectoryError::query("tenant has an invalid slot granularity")
        })?;

    let initial_status = match row.initial_status.as_str() {
        "pending" => BookingStatus::Pending,
        "confirmed" => BookingStatus::Confirmed,
        other => {
            warn!(tenant_id = %row.id, status = other, "invalid tenant initial status");
            return Err(TenantDirectoryError::query(
                "tenant has an invalid initial booking status",
            ));
        }
    };

    let horizon = u32::try_from(row.booking_horizon_days).map_err(|_| {
        warn!(tenant_id = %row.id, days = row.booking_horizon_days,
            "negative tenant booking horizon");
        TenantDirectoryError::query("tenant has an invalid booking horizon")
    })?;

    Ok(TenantContext::new(TenantId::from_uuid(row.id), timezone)
        .with_slot_granularity(granularity)
        .with_initial_status(initial_status)
        .with_booking_horizon_days(horizon))
}

#[async_trait]
impl TenantDirectory for DieselTenantDirectory {
    async fn resolve(
        &self,
        tenant_id: TenantId,
    ) -> Result<Option<TenantContext>, TenantDirectoryError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| map_pool_error(err, TenantDirectoryError::connection))?;

        let row: Option<TenantRow> = tenants::table
            .filter(tenants::id.eq(tenant_id.as_uuid()))
            .select(TenantRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(|err| {
                map_diesel_error(err, TenantDirectoryError::query, TenantDirectoryError::connection)
            })?;

        row.map(row_to_context).transpose()
    }
}

//! PostgreSQL-backed schedule reads: weekly hours and blocked periods.
//!
//! One adapter implements both schedule ports; the two tables always travel
//! together in the availability path.

use async_trait::async_trait;
use chrono::NaiveDate;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use tracing::warn;
use uuid::Uuid;

use crate::domain::ports::{
    BlockedPeriodRepository, BusinessHoursRepository, ScheduleRepositoryError,
};
use crate::domain::{BlockedPeriod, BusinessHours, TenantId, weekday_index};

use super::error_mapping::{map_diesel_error, map_pool_error};
use super::models::{BlockedPeriodRow, BusinessHoursRow};
use super::pool::DbPool;
use super::schema::{blocked_periods, business_hours};

/// Diesel-backed implementation of the schedule ports.
#[derive(Clone)]
pub struct DieselScheduleRepository {
    pool: DbPool,
}

impl DieselScheduleRepository {
    /// Create a new repository over the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_err(err: diesel::result::Error) -> ScheduleRepositoryError {
    map_diesel_error(
        err,
        ScheduleRepositoryError::query,
        ScheduleRepositoryError::connection,
    )
}

fn row_to_hours(row: BusinessHoursRow) -> Result<BusinessHours, ScheduleRepositoryError> {
    let weekday = u8::try_from(row.weekday).unwrap_or(u8::MAX);
    BusinessHours::new(
        TenantId::from_uuid(row.tenant_id),
        weekday,
        row.opens_at,
        row.closes_at,
        row.active,
    )
    .map_err(|err| {
        warn!(tenant_id = %row.tenant_id, error = %err, "business hours row failed validation");
        ScheduleRepositoryError::query("business hours row failed validation")
    })
}

fn row_to_block(row: BlockedPeriodRow) -> Result<BlockedPeriod, ScheduleRepositoryError> {
    let weekday = match row.weekday {
        Some(raw) => Some(u8::try_from(raw).unwrap_or(u8::MAX)),
        None => None,
    };
    BlockedPeriod::new(
        row.id,
        TenantId::from_uuid(row.tenant_id),
        row.professional_id,
        row.date,
        weekday,
        row.start_time,
        row.end_time,
        row.reason,
    )
    .map_err(|err| {
        warn!(block_id = %row.id, error = %err, "blocked period row failed validation");
        ScheduleRepositoryError::query("blocked period row failed validation")
    })
}

#[async_trait]
impl BusinessHoursRepository for DieselScheduleRepository {
    async fn hours_for_weekday(
        &self,
        tenant_id: TenantId,
        weekday: u8,
    ) -> Result<Option<BusinessHours>, ScheduleRepositoryError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| map_pool_error(err, ScheduleRepositoryError::connection))?;

        let row: Option<BusinessHoursRow> = business_hours::table
            .filter(business_hours::tenant_id.eq(tenant_id.as_uuid()))
            .filter(business_hours::weekday.eq(i16::from(weekday)))
            .filter(business_hours::active.eq(true))
            .select(BusinessHoursRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_err)?;

        row.map(row_to_hours).transpose()
    }
}

#[async_trait]
impl BlockedPeriodRepository for DieselScheduleRepository {
    async fn blocks_for_date(
        &self,
        tenant_id: TenantId,
        professional_id: Uuid,
        date: NaiveDate,
    ) -> Result<Vec<BlockedPeriod>, ScheduleRepositoryError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| map_pool_error(err, ScheduleRepositoryError::connection))?;

        let weekday = i16::from(weekday_index(date));
        let rows: Vec<BlockedPeriodRow> = blocked_periods::table
            .filter(blocked_periods::tenant_id.eq(tenant_id.as_uuid()))
            .filter(
                blocked_periods::professional_id
                    .is_null()
                    .or(blocked_periods::professional_id.eq(professional_id)),
            )
            .filter(
                blocked_periods::date.eq(date).or(blocked_periods::date
                    .is_null()
                    .and(blocked_periods::weekday.eq(weekday))),
            )
            .order_by(blocked_periods::start_time)
            .select(BlockedPeriodRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_err)?;

        rows.into_iter().map(row_to_block).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveTime;
    use rstest::rstest;

    fn t(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).expect("valid time")
    }

    #[rstest]
    fn hours_row_converts() {
        let row = BusinessHoursRow {
            tenant_id: Uuid::new_v4(),
            weekday: 2,
            opens_at: t(9, 0),
            closes_at: t(18, 0),
            active: true,
        };
        let hours = row_to_hours(row).expect("valid row converts");
        assert_eq!(hours.weekday(), 2);
    }

    #[rstest]
    fn out_of_range_weekday_is_rejected() {
        let row = BusinessHoursRow {
            tenant_id: Uuid::new_v4(),
            weekday: 9,
            opens_at: t(9, 0),
            closes_at: t(18, 0),
            active: true,
        };
        assert!(row_to_hours(row).is_err());
    }

    #[rstest]
    fn recurring_block_row_converts() {
        let row = BlockedPeriodRow {
            id: Uuid::new_v4(),
            tenant_id: Uuid::new_v4(),
            professional_id: None,
            date: None,
            weekday: Some(1),
            start_time: t(12, 0),
            end_time: t(13, 0),
            reason: "lunch".to_owned(),
        };
        let block = row_to_block(row).expect("valid row converts");
        assert!(block.professional_id().is_none());
    }
}

//! PostgreSQL-backed booking ledger.
//!
//! `admit` is the write path the no-double-booking invariant hangs on: it
//! re-checks for an overlapping footprint and inserts inside one transaction,
//! serialised per professional by a `FOR UPDATE` row lock. The
//! `bookings_no_overlap` exclusion constraint backstops the same invariant
//! at the storage layer.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::dsl::exists;
use diesel::prelude::*;
use diesel_async::AsyncConnection as _;
use diesel_async::RunQueryDsl;
use diesel_async::scoped_futures::ScopedFutureExt as _;
use tracing::warn;
use uuid::Uuid;

use crate::domain::ports::{
    BookingRepository, BookingRepositoryError, NewBookingRecord, OccupiedInterval,
};
use crate::domain::{Booking, BookingStatus, ClientContact, TenantId};

use super::error_mapping::{map_diesel_error, map_pool_error};
use super::models::{BookingRow, NewBookingRow};
use super::pool::DbPool;
use super::schema::{bookings, professionals};

/// Storage statuses that occupy a professional's time.
const OCCUPYING_STATUSES: [&str; 2] = ["pending", "confirmed"];

/// Exclusion constraint guarding overlapping footprints per professional.
const NO_OVERLAP_CONSTRAINT: &str = "bookings_no_overlap";

/// Diesel-backed implementation of [`BookingRepository`].
#[derive(Clone)]
pub struct DieselBookingRepository {
    pool: DbPool,
}

impl DieselBookingRepository {
    /// Create a new repository over the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

/// Error type threaded through the admission transaction so an overlap found
/// by the re-read rolls the insert back.
#[derive(Debug)]
enum TxError {
    Diesel(diesel::result::Error),
    Conflict,
}

impl From<diesel::result::Error> for TxError {
    fn from(err: diesel::result::Error) -> Self {
        Self::Diesel(err)
    }
}

fn map_err(err: diesel::result::Error) -> BookingRepositoryError {
    map_diesel_error(
        err,
        BookingRepositoryError::query,
        BookingRepositoryError::connection,
    )
}

fn is_overlap_violation(err: &diesel::result::Error) -> bool {
    matches!(
        err,
        diesel::result::Error::DatabaseError(_, info)
            if info.constraint_name() == Some(NO_OVERLAP_CONSTRAINT)
    )
}

fn row_to_booking(row: BookingRow) -> Result<Booking, BookingRepositoryError> {
    let status: BookingStatus = row.status.parse().map_err(|_| {
        warn!(booking_id = %row.id, status = %row.status, "unrecognised booking status");
        BookingRepositoryError::query("unrecognised booking status")
    })?;
    let contact = ClientContact::new(row.client_name, &row.client_phone, row.client_email.as_deref())
        .map_err(|err| {
            warn!(booking_id = %row.id, error = %err, "stored contact failed validation");
            BookingRepositoryError::query("stored contact failed validation")
        })?;
    Ok(Booking {
        id: row.id,
        tenant_id: TenantId::from_uuid(row.tenant_id),
        professional_id: row.professional_id,
        service_id: row.service_id,
        starts_at: row.starts_at,
        ends_at: row.ends_at,
        occupied_from: row.occupied_from,
        occupied_until: row.occupied_until,
        contact,
        status,
        cancellation_reason: row.cancellation_reason,
        cancelled_at: row.cancelled_at,
        created_at: row.created_at,
        updated_at: row.updated_at,
    })
}

#[async_trait]
impl BookingRepository for DieselBookingRepository {
    async fn occupied_between(
        &self,
        tenant_id: TenantId,
        professional_id: Uuid,
        from: DateTime<Utc>,
        until: DateTime<Utc>,
    ) -> Result<Vec<OccupiedInterval>, BookingRepositoryError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| map_pool_error(err, BookingRepositoryError::connection))?;

        let rows: Vec<(DateTime<Utc>, DateTime<Utc>)> = bookings::table
            .filter(bookings::tenant_id.eq(tenant_id.as_uuid()))
            .filter(bookings::professional_id.eq(professional_id))
            .filter(bookings::status.eq_any(OCCUPYING_STATUSES))
            .filter(bookings::occupied_from.lt(until))
            .filter(bookings::occupied_until.gt(from))
            .order_by(bookings::occupied_from)
            .select((bookings::occupied_from, bookings::occupied_until))
            .load(&mut conn)
            .await
            .map_err(map_err)?;

        Ok(rows
            .into_iter()
            .map(|(from, until)| OccupiedInterval { from, until })
            .collect())
    }

    async fn admit(&self, record: &NewBookingRecord) -> Result<(), BookingRepositoryError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| map_pool_error(err, BookingRepositoryError::connection))?;

        let row = NewBookingRow {
            id: record.id,
            tenant_id: *record.tenant_id.as_uuid(),
            professional_id: record.professional_id,
            service_id: record.service_id,
            starts_at: record.starts_at,
            ends_at: record.ends_at,
            occupied_from: record.occupied_from,
            occupied_until: record.occupied_until,
            client_name: record.contact.name(),
            client_phone: record.contact.phone(),
            client_email: record.contact.email(),
            status: record.status.as_str(),
        };

        let result: Result<(), TxError> = conn
            .transaction(|conn| {
                async move {
                    // Serialise concurrent admissions for the same
                    // professional; the lock is released on commit.
                    let _locked: Uuid = professionals::table
                        .filter(professionals::id.eq(row.professional_id))
                        .filter(professionals::tenant_id.eq(row.tenant_id))
                        .select(professionals::id)
                        .for_update()
                        .first(conn)
                        .await?;

                    let taken: bool = diesel::select(exists(
                        bookings::table
                            .filter(bookings::professional_id.eq(row.professional_id))
                            .filter(bookings::status.eq_any(OCCUPYING_STATUSES))
                            .filter(bookings::occupied_from.lt(row.occupied_until))
                            .filter(bookings::occupied_until.gt(row.occupied_from)),
                    ))
                    .get_result(conn)
                    .await?;
                    if taken {
                        return Err(TxError::Conflict);
                    }

                    diesel::insert_into(bookings::table)
                        .values(&row)
                        .execute(conn)
                        .await?;
                    Ok(())
                }
                .scope_boxed()
            })
            .await;

        match result {
            Ok(()) => Ok(()),
            Err(TxError::Conflict) => {
                Err(BookingRepositoryError::slot_conflict(record.professional_id))
            }
            Err(TxError::Diesel(err)) if is_overlap_violation(&err) => {
                Err(BookingRepositoryError::slot_conflict(record.professional_id))
            }
            Err(TxError::Diesel(err)) => Err(map_err(err)),
        }
    }

    async fn find_by_id(
        &self,
        tenant_id: TenantId,
        booking_id: Uuid,
    ) -> Result<Option<Booking>, BookingRepositoryError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| map_pool_error(err, BookingRepositoryError::connection))?;

        let row: Option<BookingRow> = bookings::table
            .filter(bookings::id.eq(booking_id))
            .filter(bookings::tenant_id.eq(tenant_id.as_uuid()))
            .select(BookingRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_err)?;

        row.map(row_to_booking).transpose()
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
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| map_pool_error(err, BookingRepositoryError::connection))?;

        let affected = diesel::update(
            bookings::table
                .filter(bookings::id.eq(booking_id))
                .filter(bookings::tenant_id.eq(tenant_id.as_uuid()))
                .filter(bookings::status.eq(expected_current.as_str())),
        )
        .set((
            bookings::status.eq(next.as_str()),
            bookings::cancellation_reason.eq(cancellation_reason),
            bookings::cancelled_at.eq(cancelled_at),
            bookings::updated_at.eq(diesel::dsl::now),
        ))
        .execute(&mut conn)
        .await
        .map_err(map_err)?;

        Ok(affected == 1)
    }
}

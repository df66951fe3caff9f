//! Internal Diesel row structs for database operations.
//!
//! These types are implementation details of the persistence layer and must
//! never be exposed to the domain. They exist solely to satisfy Diesel's
//! type requirements for queries and mutations.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use super::schema::{
    blocked_periods, bookings, business_hours, professionals, services, tenants,
};

/// Row struct for reading tenant configuration.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = tenants)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct TenantRow {
    pub id: Uuid,
    #[expect(dead_code, reason = "schema field; the engine keys on id alone")]
    pub name: String,
    pub timezone: String,
    pub slot_granularity_minutes: i32,
    pub initial_status: String,
    pub booking_horizon_days: i32,
}

/// Row struct for reading weekly business hours.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = business_hours)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct BusinessHoursRow {
    pub tenant_id: Uuid,
    pub weekday: i16,
    pub opens_at: NaiveTime,
    pub closes_at: NaiveTime,
    pub active: bool,
}

/// Row struct for reading blocked periods.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = blocked_periods)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct BlockedPeriodRow {
    pub id: Uuid,
    pub tenant_id: Uuid,
    pub professional_id: Option<Uuid>,
    pub date: Option<NaiveDate>,
    pub weekday: Option<i16>,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub reason: String,
}

/// Row struct for reading services.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = services)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct ServiceRow {
    pub id: Uuid,
    pub tenant_id: Uuid,
    pub name: String,
    pub duration_minutes: i32,
    pub price_cents: i64,
    pub buffer_before_minutes: i32,
    pub buffer_after_minutes: i32,
    pub active: bool,
}

/// Row struct for reading professionals.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = professionals)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct ProfessionalRow {
    pub id: Uuid,
    pub tenant_id: Uuid,
    pub name: String,
    pub active: bool,
}

/// Row struct for reading bookings.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = bookings)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct BookingRow {
    pub id: Uuid,
    pub tenant_id: Uuid,
    pub professional_id: Uuid,
    pub service_id: Uuid,
    pub starts_at: DateTime<Utc>,
    pub ends_at: DateTime<Utc>,
    pub occupied_from: DateTime<Utc>,
    pub occupied_until: DateTime<Utc>,
    pub client_name: String,
    pub client_phone: String,
    pub client_email: Option<String>,
    pub status: String,
    pub cancellation_reason: Option<String>,
    pub cancelled_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Insertable struct for admitting new bookings.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = bookings)]
pub(crate) struct NewBookingRow<'a> {
    pub id: Uuid,
    pub tenant_id: Uuid,
    pub professional_id: Uuid,
    pub service_id: Uuid,
    pub starts_at: DateTime<Utc>,
    pub ends_at: DateTime<Utc>,
    pub occupied_from: DateTime<Utc>,
    pub occupied_until: DateTime<Utc>,
    pub client_name: &'a str,
    pub client_phone: &'a str,
    pub client_email: Option<&'a str>,
    pub status: &'a str,
}

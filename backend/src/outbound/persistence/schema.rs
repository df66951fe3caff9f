//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match the migrations exactly; `diesel
//! print-schema` can regenerate them from a live database. The exclusion
//! constraint `bookings_no_overlap` on `bookings` has no Diesel
//! representation and lives only in the migrations.

diesel::table! {
    /// Tenant registry with per-tenant scheduling configuration.
    tenants (id) {
        /// Primary key: UUID v4 identifier.
        id -> Uuid,
        /// Human-readable tenant name.
        name -> Varchar,
        /// IANA timezone name, e.g. `America/Sao_Paulo`.
        timezone -> Varchar,
        /// Candidate slot spacing in minutes.
        slot_granularity_minutes -> Int4,
        /// Status given to admitted bookings: `pending` or `confirmed`.
        initial_status -> Varchar,
        /// How far ahead availability may be queried, in days.
        booking_horizon_days -> Int4,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Weekly open/close windows; at most one active row per
    /// (tenant, weekday).
    business_hours (id) {
        id -> Uuid,
        tenant_id -> Uuid,
        /// 0 = Sunday .. 6 = Saturday.
        weekday -> Int2,
        opens_at -> Time,
        closes_at -> Time,
        active -> Bool,
    }
}

diesel::table! {
    /// One-off (dated) or recurring (weekday) blocked intervals.
    blocked_periods (id) {
        id -> Uuid,
        tenant_id -> Uuid,
        /// Null applies the block to every professional of the tenant.
        professional_id -> Nullable<Uuid>,
        /// Null makes the block recur on `weekday`.
        date -> Nullable<Date>,
        weekday -> Nullable<Int2>,
        start_time -> Time,
        end_time -> Time,
        reason -> Varchar,
    }
}

diesel::table! {
    /// Bookable services. Soft deletion flips `active`.
    services (id) {
        id -> Uuid,
        tenant_id -> Uuid,
        name -> Varchar,
        duration_minutes -> Int4,
        price_cents -> Int8,
        buffer_before_minutes -> Int4,
        buffer_after_minutes -> Int4,
        active -> Bool,
    }
}

diesel::table! {
    /// Professionals who perform services. Soft deletion flips `active`.
    professionals (id) {
        id -> Uuid,
        tenant_id -> Uuid,
        name -> Varchar,
        active -> Bool,
    }
}

diesel::table! {
    /// Many-to-many association between professionals and services.
    professional_services (professional_id, service_id) {
        professional_id -> Uuid,
        service_id -> Uuid,
    }
}

diesel::table! {
    /// The booking ledger. `occupied_from`/`occupied_until` denormalize the
    /// buffered footprint so the overlap check and the exclusion constraint
    /// run against stored columns.
    bookings (id) {
        id -> Uuid,
        tenant_id -> Uuid,
        professional_id -> Uuid,
        service_id -> Uuid,
        starts_at -> Timestamptz,
        ends_at -> Timestamptz,
        occupied_from -> Timestamptz,
        occupied_until -> Timestamptz,
        client_name -> Varchar,
        /// Bare digits after normalization.
        client_phone -> Varchar,
        client_email -> Nullable<Varchar>,
        /// `pending`, `confirmed`, `cancelled`, or `finalized`.
        status -> Varchar,
        cancellation_reason -> Nullable<Varchar>,
        cancelled_at -> Nullable<Timestamptz>,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::joinable!(professional_services -> professionals (professional_id));
diesel::joinable!(professional_services -> services (service_id));

diesel::allow_tables_to_appear_in_same_query!(
    tenants,
    business_hours,
    blocked_periods,
    services,
    professionals,
    professional_services,
    bookings,
);

//! PostgreSQL persistence adapters using Diesel ORM.
//!
//! Concrete implementations of the domain repository ports, backed by
//! PostgreSQL through `diesel-async` with `bb8` connection pooling.
//!
//! The booking ledger is the one adapter with teeth: its `admit` path runs
//! the overlap re-check and the insert in a single transaction, and the
//! schema backs it up with an exclusion constraint so the no-double-booking
//! invariant holds even if application logic is bypassed.

mod diesel_booking_repository;
mod diesel_catalog_repository;
mod diesel_schedule_repository;
mod diesel_tenant_directory;
mod error_mapping;
mod models;
mod pool;
mod schema;

pub use diesel_booking_repository::DieselBookingRepository;
pub use diesel_catalog_repository::DieselCatalogRepository;
pub use diesel_schedule_repository::DieselScheduleRepository;
pub use diesel_tenant_directory::DieselTenantDirectory;
pub use pool::{DbPool, PoolConfig, PoolError};

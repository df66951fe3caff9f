//! HTTP inbound adapter exposing the REST endpoints.

pub mod availability;
pub mod bookings;
pub mod error;
pub mod health;
pub mod state;
pub mod tenant;
pub mod validation;

pub use error::ApiResult;

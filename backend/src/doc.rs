//! OpenAPI documentation configuration.
//!
//! [`ApiDoc`] generates the OpenAPI specification for the REST API. It
//! registers the availability, booking, and health paths, the wire schemas,
//! and the tenant header security scheme. The generated document backs
//! Swagger UI in debug builds.

use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::domain::{BookingStatus, DomainError, ErrorCode};
use crate::inbound::http::availability::{AvailabilityResponse, SlotSchema};
use crate::inbound::http::bookings::{
    BookingCreatedResponse, BookingResponse, CancelBookingBody, CreateBookingBody,
    UpdateBookingBody,
};

/// Enrich the generated document with the tenant header security scheme.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            "TenantHeader",
            SecurityScheme::ApiKey(ApiKey::Header(ApiKeyValue::with_description(
                "x-tenant-id",
                "Tenant identifier scoping every request.",
            ))),
        );
    }
}

/// OpenAPI document for the REST API.
/// Swagger UI is enabled in debug builds only.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "Booking backend API",
        description = "HTTP interface for availability listings, booking admission, and health probes."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    security(("TenantHeader" = [])),
    paths(
        crate::inbound::http::availability::get_availability,
        crate::inbound::http::bookings::create_booking,
        crate::inbound::http::bookings::get_booking,
        crate::inbound::http::bookings::cancel_booking,
        crate::inbound::http::bookings::update_booking,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        AvailabilityResponse,
        SlotSchema,
        CreateBookingBody,
        BookingCreatedResponse,
        BookingResponse,
        CancelBookingBody,
        UpdateBookingBody,
        BookingStatus,
        DomainError,
        ErrorCode,
    )),
    tags(
        (name = "availability", description = "Day availability listings"),
        (name = "bookings", description = "Booking admission and lifecycle"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;

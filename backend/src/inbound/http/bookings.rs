//! Booking HTTP handlers.
//!
//! ```text
//! POST  /api/v1/bookings
//! GET   /api/v1/bookings/{id}
//! POST  /api/v1/bookings/{id}/cancel
//! PATCH /api/v1/bookings/{id}
//! ```

use std::str::FromStr;

use actix_web::{HttpResponse, get, patch, post, web};
use serde::{Deserialize, Serialize};
use serde_json::json;
use utoipa::ToSchema;

use crate::domain::ports::{
    CancelBookingRequest, CreateBookingRequest, UpdateBookingStatusRequest,
};
use crate::domain::{Booking, BookingStatus, DomainError};
use crate::inbound::http::ApiResult;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::tenant::TenantHeader;
use crate::inbound::http::validation::{
    missing_field_error, parse_contact, parse_rfc3339_timestamp, parse_uuid,
};

/// Request payload for booking admission.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateBookingBody {
    pub professional_id: Option<String>,
    pub service_id: Option<String>,
    /// RFC 3339 instant.
    pub starts_at: Option<String>,
    pub client_name: Option<String>,
    pub client_phone: Option<String>,
    pub client_email: Option<String>,
}

/// Response payload for a successful admission.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BookingCreatedResponse {
    pub booking_id: String,
    #[schema(example = "confirmed")]
    pub status: String,
}

/// Booking details on the wire.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BookingResponse {
    pub id: String,
    pub professional_id: String,
    pub service_id: String,
    pub starts_at: String,
    pub ends_at: String,
    pub client_name: String,
    pub client_phone: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_email: Option<String>,
    #[schema(example = "confirmed")]
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cancellation_reason: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cancelled_at: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl From<Booking> for BookingResponse {
    fn from(booking: Booking) -> Self {
        Self {
            id: booking.id.to_string(),
            professional_id: booking.professional_id.to_string(),
            service_id: booking.service_id.to_string(),
            starts_at: booking.starts_at.to_rfc3339(),
            ends_at: booking.ends_at.to_rfc3339(),
            client_name: booking.contact.name().to_owned(),
            client_phone: booking.contact.phone().to_owned(),
            client_email: booking.contact.email().map(str::to_owned),
            status: booking.status.to_string(),
            cancellation_reason: booking.cancellation_reason,
            cancelled_at: booking.cancelled_at.map(|at| at.to_rfc3339()),
            created_at: booking.created_at.to_rfc3339(),
            updated_at: booking.updated_at.to_rfc3339(),
        }
    }
}

/// Request payload for cancellation.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct CancelBookingBody {
    pub reason: Option<String>,
}

/// Request payload for a status transition.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateBookingBody {
    #[schema(example = "finalized")]
    pub status: Option<String>,
    pub cancellation_reason: Option<String>,
}

fn invalid_status_error(value: &str) -> DomainError {
    DomainError::invalid_request(
        "status must be one of pending, confirmed, cancelled, finalized",
    )
    .with_details(json!({
        "field": "status",
        "value": value,
        "code": "invalid_status",
    }))
}

/// Admit a booking for one chosen slot.
#[utoipa::path(
    post,
    path = "/api/v1/bookings",
    request_body = CreateBookingBody,
    params(("x-tenant-id" = String, Header, description = "Tenant UUID")),
    responses(
        (status = 201, description = "Booking admitted", body = BookingCreatedResponse),
        (status = 400, description = "Invalid request", body = DomainError),
        (status = 401, description = "Unknown tenant", body = DomainError),
        (status = 404, description = "Professional or service not found", body = DomainError),
        (status = 409, description = "Slot no longer available", body = DomainError),
        (status = 503, description = "Service unavailable", body = DomainError)
    ),
    tags = ["bookings"],
    operation_id = "createBooking"
)]
#[post("/bookings")]
pub async fn create_booking(
    state: web::Data<HttpState>,
    tenant: TenantHeader,
    body: web::Json<CreateBookingBody>,
) -> ApiResult<HttpResponse> {
    let body = body.into_inner();
    let professional_id = body
        .professional_id
        .ok_or_else(|| missing_field_error("professionalId"))?;
    let service_id = body
        .service_id
        .ok_or_else(|| missing_field_error("serviceId"))?;
    let starts_at = body
        .starts_at
        .ok_or_else(|| missing_field_error("startsAt"))?;
    let client_name = body
        .client_name
        .ok_or_else(|| missing_field_error("clientName"))?;
    let client_phone = body
        .client_phone
        .ok_or_else(|| missing_field_error("clientPhone"))?;

    let request = CreateBookingRequest {
        tenant_id: tenant.tenant_id(),
        professional_id: parse_uuid(&professional_id, "professionalId")?,
        service_id: parse_uuid(&service_id, "serviceId")?,
        starts_at: parse_rfc3339_timestamp(&starts_at, "startsAt")?,
        contact: parse_contact(&client_name, &client_phone, body.client_email.as_deref())?,
    };

    let response = state.admission.create_booking(request).await?;
    Ok(HttpResponse::Created().json(BookingCreatedResponse {
        booking_id: response.booking_id.to_string(),
        status: response.status.to_string(),
    }))
}

/// Fetch one booking.
#[utoipa::path(
    get,
    path = "/api/v1/bookings/{id}",
    params(
        ("id" = String, Path, description = "Booking UUID"),
        ("x-tenant-id" = String, Header, description = "Tenant UUID")
    ),
    responses(
        (status = 200, description = "Booking details", body = BookingResponse),
        (status = 401, description = "Unknown tenant", body = DomainError),
        (status = 404, description = "Booking not found", body = DomainError)
    ),
    tags = ["bookings"],
    operation_id = "getBooking"
)]
#[get("/bookings/{id}")]
pub async fn get_booking(
    state: web::Data<HttpState>,
    tenant: TenantHeader,
    path: web::Path<String>,
) -> ApiResult<web::Json<BookingResponse>> {
    let booking_id = parse_uuid(&path.into_inner(), "id")?;
    let booking = state
        .bookings
        .get_booking(tenant.tenant_id(), booking_id)
        .await?;
    Ok(web::Json(BookingResponse::from(booking)))
}

/// Cancel a booking, recording the reason.
#[utoipa::path(
    post,
    path = "/api/v1/bookings/{id}/cancel",
    request_body = CancelBookingBody,
    params(
        ("id" = String, Path, description = "Booking UUID"),
        ("x-tenant-id" = String, Header, description = "Tenant UUID")
    ),
    responses(
        (status = 204, description = "Booking cancelled"),
        (status = 400, description = "Missing reason", body = DomainError),
        (status = 401, description = "Unknown tenant", body = DomainError),
        (status = 404, description = "Booking not found", body = DomainError),
        (status = 409, description = "Booking already terminal", body = DomainError)
    ),
    tags = ["bookings"],
    operation_id = "cancelBooking"
)]
#[post("/bookings/{id}/cancel")]
pub async fn cancel_booking(
    state: web::Data<HttpState>,
    tenant: TenantHeader,
    path: web::Path<String>,
    body: web::Json<CancelBookingBody>,
) -> ApiResult<HttpResponse> {
    let booking_id = parse_uuid(&path.into_inner(), "id")?;
    let reason = body
        .into_inner()
        .reason
        .ok_or_else(|| missing_field_error("reason"))?;

    state
        .lifecycle
        .cancel_booking(CancelBookingRequest {
            tenant_id: tenant.tenant_id(),
            booking_id,
            reason,
        })
        .await?;
    Ok(HttpResponse::NoContent().finish())
}

/// Transition a booking's status. Time fields are never editable here;
/// rescheduling is cancel + create-new.
#[utoipa::path(
    patch,
    path = "/api/v1/bookings/{id}",
    request_body = UpdateBookingBody,
    params(
        ("id" = String, Path, description = "Booking UUID"),
        ("x-tenant-id" = String, Header, description = "Tenant UUID")
    ),
    responses(
        (status = 204, description = "Status updated"),
        (status = 400, description = "Invalid request", body = DomainError),
        (status = 401, description = "Unknown tenant", body = DomainError),
        (status = 404, description = "Booking not found", body = DomainError),
        (status = 409, description = "Transition not allowed", body = DomainError)
    ),
    tags = ["bookings"],
    operation_id = "updateBooking"
)]
#[patch("/bookings/{id}")]
pub async fn update_booking(
    state: web::Data<HttpState>,
    tenant: TenantHeader,
    path: web::Path<String>,
    body: web::Json<UpdateBookingBody>,
) -> ApiResult<HttpResponse> {
    let booking_id = parse_uuid(&path.into_inner(), "id")?;
    let body = body.into_inner();
    let raw_status = body.status.ok_or_else(|| missing_field_error("status"))?;
    let status =
        BookingStatus::from_str(&raw_status).map_err(|_| invalid_status_error(&raw_status))?;

    state
        .lifecycle
        .update_status(UpdateBookingStatusRequest {
            tenant_id: tenant.tenant_id(),
            booking_id,
            status,
            cancellation_reason: body.cancellation_reason,
        })
        .await?;
    Ok(HttpResponse::NoContent().finish())
}

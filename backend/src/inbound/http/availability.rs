//! Availability HTTP handler.
//!
//! ```text
//! GET /api/v1/availability?professionalId&serviceId&date=YYYY-MM-DD
//! ```

use actix_web::{get, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::ports::GetAvailabilityRequest;
use crate::domain::{DayAvailability, DomainError, weekday_name};
use crate::inbound::http::ApiResult;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::tenant::TenantHeader;
use crate::inbound::http::validation::{missing_field_error, parse_date, parse_uuid};

/// Raw query parameters; parsed and validated by hand so failures name the
/// offending field.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AvailabilityParams {
    pub professional_id: Option<String>,
    pub service_id: Option<String>,
    pub date: Option<String>,
}

/// One classified slot on the wire.
#[derive(Debug, Serialize, ToSchema)]
pub struct SlotSchema {
    /// Slot start in `HH:MM`.
    #[schema(example = "09:30")]
    pub time: String,
    pub available: bool,
    /// Present only for unavailable slots.
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(example = "booked")]
    pub reason: Option<String>,
}

/// Response payload for the availability listing.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AvailabilityResponse {
    /// ISO date, `YYYY-MM-DD`.
    #[schema(example = "2026-09-01")]
    pub date: String,
    /// Display form, `DD/MM/YYYY`.
    #[schema(example = "01/09/2026")]
    pub formatted_date: String,
    /// English weekday name.
    #[schema(example = "Tuesday")]
    pub weekday: String,
    pub total_slots: usize,
    pub available_slots: usize,
    pub slots: Vec<SlotSchema>,
}

impl From<DayAvailability> for AvailabilityResponse {
    fn from(day: DayAvailability) -> Self {
        let slots = day
            .slots
            .iter()
            .map(|slot| SlotSchema {
                time: slot.time.format("%H:%M").to_string(),
                available: slot.is_available(),
                reason: slot.reason.as_ref().map(ToString::to_string),
            })
            .collect();
        Self {
            date: day.date.format("%Y-%m-%d").to_string(),
            formatted_date: day.date.format("%d/%m/%Y").to_string(),
            weekday: weekday_name(day.date).to_owned(),
            total_slots: day.total_slots(),
            available_slots: day.available_slots(),
            slots,
        }
    }
}

/// Classify every candidate slot of a day for one professional and service.
#[utoipa::path(
    get,
    path = "/api/v1/availability",
    params(
        ("professionalId" = String, Query, description = "Professional UUID"),
        ("serviceId" = String, Query, description = "Service UUID"),
        ("date" = String, Query, description = "Target date, YYYY-MM-DD"),
        ("x-tenant-id" = String, Header, description = "Tenant UUID")
    ),
    responses(
        (status = 200, description = "Classified slots in ascending order", body = AvailabilityResponse),
        (status = 400, description = "Invalid request", body = DomainError),
        (status = 401, description = "Unknown tenant", body = DomainError),
        (status = 404, description = "Professional or service not found", body = DomainError),
        (status = 503, description = "Service unavailable", body = DomainError)
    ),
    tags = ["availability"],
    operation_id = "getAvailability"
)]
#[get("/availability")]
pub async fn get_availability(
    state: web::Data<HttpState>,
    tenant: TenantHeader,
    params: web::Query<AvailabilityParams>,
) -> ApiResult<web::Json<AvailabilityResponse>> {
    let params = params.into_inner();
    let professional_id = params
        .professional_id
        .ok_or_else(|| missing_field_error("professionalId"))?;
    let service_id = params
        .service_id
        .ok_or_else(|| missing_field_error("serviceId"))?;
    let date = params.date.ok_or_else(|| missing_field_error("date"))?;

    let request = GetAvailabilityRequest {
        tenant_id: tenant.tenant_id(),
        professional_id: parse_uuid(&professional_id, "professionalId")?,
        service_id: parse_uuid(&service_id, "serviceId")?,
        date: parse_date(&date, "date")?,
    };

    let day = state.availability.get_availability(request).await?;
    Ok(web::Json(AvailabilityResponse::from(day)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::availability::{SlotVerdict, UnavailableReason};
    use chrono::{NaiveDate, NaiveTime};
    use rstest::rstest;
    use serde_json::json;

    #[rstest]
    fn response_metadata_matches_the_day() {
        let date = NaiveDate::from_ymd_opt(2026, 9, 1).expect("valid date");
        let day = DayAvailability {
            date,
            weekday: 2,
            slots: vec![
                SlotVerdict {
                    time: NaiveTime::from_hms_opt(9, 0, 0).expect("valid time"),
                    reason: None,
                },
                SlotVerdict {
                    time: NaiveTime::from_hms_opt(9, 30, 0).expect("valid time"),
                    reason: Some(UnavailableReason::Booked),
                },
            ],
        };

        let response = AvailabilityResponse::from(day);
        assert_eq!(response.date, "2026-09-01");
        assert_eq!(response.formatted_date, "01/09/2026");
        assert_eq!(response.weekday, "Tuesday");
        assert_eq!(response.total_slots, 2);
        assert_eq!(response.available_slots, 1);

        let wire = serde_json::to_value(&response.slots).expect("serializable slots");
        assert_eq!(
            wire,
            json!([
                { "time": "09:00", "available": true },
                { "time": "09:30", "available": false, "reason": "booked" },
            ])
        );
    }
}

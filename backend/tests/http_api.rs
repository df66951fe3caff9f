//! HTTP surface tests: routing, tenant header handling, status codes, and
//! wire shapes over in-memory adapters.

#[expect(
    dead_code,
    reason = "Shared doubles include helpers used only by other suites."
)]
mod support;

use std::sync::Arc;

use actix_http::Request;
use actix_web::body::BoxBody;
use actix_web::dev::{Service, ServiceResponse};
use actix_web::http::StatusCode;
use actix_web::test::{self, TestRequest};
use actix_web::{App, web};
use rstest::rstest;
use serde_json::Value;

use booking_backend::inbound::http::availability::get_availability;
use booking_backend::inbound::http::bookings::{
    cancel_booking, create_booking, get_booking, update_booking,
};
use booking_backend::inbound::http::state::HttpState;

use support::{Fixture, PROFESSIONAL_UUID, SERVICE_UUID, TENANT_UUID};

async fn init_app(
    fixture: &Fixture,
) -> impl Service<Request, Response = ServiceResponse<BoxBody>, Error = actix_web::Error> {
    let availability = Arc::new(fixture.availability());
    let admission = Arc::new(fixture.admission());
    let lifecycle = Arc::new(fixture.lifecycle());
    let state = web::Data::new(HttpState::new(
        availability,
        admission,
        lifecycle.clone(),
        lifecycle,
    ));

    test::init_service(
        App::new().app_data(state).service(
            web::scope("/api/v1")
                .service(get_availability)
                .service(create_booking)
                .service(get_booking)
                .service(cancel_booking)
                .service(update_booking),
        ),
    )
    .await
}

fn availability_uri() -> String {
    format!(
        "/api/v1/availability?professionalId={PROFESSIONAL_UUID}&serviceId={SERVICE_UUID}&date=2026-09-01"
    )
}

fn create_body(fixture: &Fixture, h: u32, m: u32) -> Value {
    serde_json::json!({
        "professionalId": PROFESSIONAL_UUID,
        "serviceId": SERVICE_UUID,
        "startsAt": fixture.slot_utc(h, m).to_rfc3339(),
        "clientName": "Ana Souza",
        "clientPhone": "(11) 98765-4321",
        "clientEmail": "ana@example.com",
    })
}

#[rstest]
#[actix_rt::test]
async fn missing_tenant_header_is_unauthorized() {
    let fixture = Fixture::salon();
    let app = init_app(&fixture).await;

    let res = test::call_service(
        &app,
        TestRequest::get().uri(&availability_uri()).to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
}

#[rstest]
#[actix_rt::test]
async fn availability_lists_classified_slots() {
    let fixture = Fixture::salon();
    let app = init_app(&fixture).await;

    let res = test::call_service(
        &app,
        TestRequest::get()
            .uri(&availability_uri())
            .insert_header(("x-tenant-id", TENANT_UUID))
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::OK);

    let body: Value = test::read_body_json(res).await;
    assert_eq!(body["date"], "2026-09-01");
    assert_eq!(body["formattedDate"], "01/09/2026");
    assert_eq!(body["weekday"], "Tuesday");
    assert_eq!(body["totalSlots"], 18);
    assert_eq!(body["slots"][0]["time"], "09:00");
    assert_eq!(body["slots"][0]["available"], true);
    assert!(body["slots"][0].get("reason").is_none());
}

#[rstest]
#[actix_rt::test]
async fn missing_query_field_names_the_field() {
    let fixture = Fixture::salon();
    let app = init_app(&fixture).await;

    let res = test::call_service(
        &app,
        TestRequest::get()
            .uri("/api/v1/availability?serviceId=abc&date=2026-09-01")
            .insert_header(("x-tenant-id", TENANT_UUID))
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let body: Value = test::read_body_json(res).await;
    assert_eq!(body["details"]["field"], "professionalId");
    assert_eq!(body["details"]["code"], "missing_field");
}

#[rstest]
#[actix_rt::test]
async fn booking_round_trip_over_http() {
    let fixture = Fixture::salon();
    let app = init_app(&fixture).await;

    let res = test::call_service(
        &app,
        TestRequest::post()
            .uri("/api/v1/bookings")
            .insert_header(("x-tenant-id", TENANT_UUID))
            .set_json(create_body(&fixture, 10, 0))
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::CREATED);
    let created: Value = test::read_body_json(res).await;
    assert_eq!(created["status"], "confirmed");
    let booking_id = created["bookingId"].as_str().expect("booking id").to_owned();

    let res = test::call_service(
        &app,
        TestRequest::get()
            .uri(&format!("/api/v1/bookings/{booking_id}"))
            .insert_header(("x-tenant-id", TENANT_UUID))
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::OK);
    let fetched: Value = test::read_body_json(res).await;
    assert_eq!(fetched["id"], booking_id.as_str());
    assert_eq!(fetched["clientName"], "Ana Souza");
    assert_eq!(fetched["clientPhone"], "11987654321");
}

#[rstest]
#[actix_rt::test]
async fn double_booking_returns_conflict() {
    let fixture = Fixture::salon();
    let app = init_app(&fixture).await;

    let admit = || {
        TestRequest::post()
            .uri("/api/v1/bookings")
            .insert_header(("x-tenant-id", TENANT_UUID))
            .set_json(create_body(&fixture, 10, 0))
            .to_request()
    };
    let first = test::call_service(&app, admit()).await;
    assert_eq!(first.status(), StatusCode::CREATED);

    let second = test::call_service(&app, admit()).await;
    assert_eq!(second.status(), StatusCode::CONFLICT);
    let body: Value = test::read_body_json(second).await;
    assert_eq!(body["code"], "slot_unavailable");
}

#[rstest]
#[actix_rt::test]
async fn invalid_contact_is_attributed_to_its_field() {
    let fixture = Fixture::salon();
    let app = init_app(&fixture).await;

    let mut body = create_body(&fixture, 10, 0);
    body["clientPhone"] = Value::from("123");
    let res = test::call_service(
        &app,
        TestRequest::post()
            .uri("/api/v1/bookings")
            .insert_header(("x-tenant-id", TENANT_UUID))
            .set_json(body)
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(res).await;
    assert_eq!(body["details"]["field"], "clientPhone");
}

#[rstest]
#[actix_rt::test]
async fn cancel_and_repeat_cancel() {
    let fixture = Fixture::salon();
    let app = init_app(&fixture).await;

    let res = test::call_service(
        &app,
        TestRequest::post()
            .uri("/api/v1/bookings")
            .insert_header(("x-tenant-id", TENANT_UUID))
            .set_json(create_body(&fixture, 11, 0))
            .to_request(),
    )
    .await;
    let created: Value = test::read_body_json(res).await;
    let booking_id = created["bookingId"].as_str().expect("booking id").to_owned();

    let cancel = |reason: &str| {
        TestRequest::post()
            .uri(&format!("/api/v1/bookings/{booking_id}/cancel"))
            .insert_header(("x-tenant-id", TENANT_UUID))
            .set_json(serde_json::json!({ "reason": reason }))
            .to_request()
    };
    let first = test::call_service(&app, cancel("cliente desmarcou")).await;
    assert_eq!(first.status(), StatusCode::NO_CONTENT);

    let second = test::call_service(&app, cancel("de novo")).await;
    assert_eq!(second.status(), StatusCode::CONFLICT);
    let body: Value = test::read_body_json(second).await;
    assert_eq!(body["code"], "conflict");
}

#[rstest]
#[actix_rt::test]
async fn unknown_booking_is_not_found() {
    let fixture = Fixture::salon();
    let app = init_app(&fixture).await;

    let res = test::call_service(
        &app,
        TestRequest::get()
            .uri("/api/v1/bookings/00000000-0000-0000-0000-000000000000")
            .insert_header(("x-tenant-id", TENANT_UUID))
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}

#[rstest]
#[actix_rt::test]
async fn patch_rejects_unknown_status() {
    let fixture = Fixture::salon();
    let app = init_app(&fixture).await;

    let res = test::call_service(
        &app,
        TestRequest::patch()
            .uri(&format!(
                "/api/v1/bookings/{}",
                "00000000-0000-0000-0000-000000000001"
            ))
            .insert_header(("x-tenant-id", TENANT_UUID))
            .set_json(serde_json::json!({ "status": "archived" }))
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(res).await;
    assert_eq!(body["details"]["code"], "invalid_status");
}

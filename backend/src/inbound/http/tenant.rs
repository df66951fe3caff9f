//! Tenant identification for inbound requests.
//!
//! Every API route is tenant scoped. The caller states the tenant in the
//! `x-tenant-id` header; a missing or malformed header reads as "not a
//! member of any tenant" and yields 401 before any handler logic runs.
//! Whether the id resolves to a real tenant is checked by the domain.

use std::future::{Ready, ready};

use actix_web::{FromRequest, HttpRequest, dev::Payload};
use uuid::Uuid;

use crate::domain::{DomainError, TenantId};

/// Header carrying the tenant identity.
pub const TENANT_HEADER: &str = "x-tenant-id";

/// Extractor for the tenant stated in the request headers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TenantHeader(pub TenantId);

impl TenantHeader {
    /// The stated tenant id.
    pub fn tenant_id(&self) -> TenantId {
        self.0
    }
}

fn extract(req: &HttpRequest) -> Result<TenantHeader, DomainError> {
    let raw = req
        .headers()
        .get(TENANT_HEADER)
        .ok_or_else(|| DomainError::unauthorized("missing x-tenant-id header"))?
        .to_str()
        .map_err(|_| DomainError::unauthorized("x-tenant-id header is not valid UTF-8"))?;
    let id = Uuid::parse_str(raw.trim())
        .map_err(|_| DomainError::unauthorized("x-tenant-id header is not a valid UUID"))?;
    Ok(TenantHeader(TenantId::from_uuid(id)))
}

impl FromRequest for TenantHeader {
    type Error = DomainError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(extract(req))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::test::TestRequest;
    use rstest::rstest;

    #[rstest]
    fn well_formed_header_is_accepted() {
        let id = Uuid::new_v4();
        let req = TestRequest::default()
            .insert_header((TENANT_HEADER, id.to_string()))
            .to_http_request();
        let header = extract(&req).expect("valid header extracts");
        assert_eq!(header.tenant_id(), TenantId::from_uuid(id));
    }

    #[rstest]
    fn missing_header_is_unauthorized() {
        let req = TestRequest::default().to_http_request();
        let err = extract(&req).expect_err("missing header must fail");
        assert_eq!(err.code(), crate::domain::ErrorCode::Unauthorized);
    }

    #[rstest]
    #[case("not-a-uuid")]
    #[case("")]
    fn malformed_header_is_unauthorized(#[case] raw: &str) {
        let req = TestRequest::default()
            .insert_header((TENANT_HEADER, raw))
            .to_http_request();
        let err = extract(&req).expect_err("malformed header must fail");
        assert_eq!(err.code(), crate::domain::ErrorCode::Unauthorized);
    }
}

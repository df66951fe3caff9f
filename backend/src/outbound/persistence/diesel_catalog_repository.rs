//! PostgreSQL-backed catalog reads: services, professionals, and their
//! association.

use async_trait::async_trait;
use diesel::dsl::exists;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use tracing::warn;
use uuid::Uuid;

use crate::domain::ports::{CatalogRepository, CatalogRepositoryError};
use crate::domain::{Professional, Service, TenantId};

use super::error_mapping::{map_diesel_error, map_pool_error};
use super::models::{ProfessionalRow, ServiceRow};
use super::pool::DbPool;
use super::schema::{professional_services, professionals, services};

/// Diesel-backed implementation of the [`CatalogRepository`] port.
#[derive(Clone)]
pub struct DieselCatalogRepository {
    pool: DbPool,
}

impl DieselCatalogRepository {
    /// Create a new repository over the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_err(err: diesel::result::Error) -> CatalogRepositoryError {
    map_diesel_error(
        err,
        CatalogRepositoryError::query,
        CatalogRepositoryError::connection,
    )
}

fn row_to_service(row: ServiceRow) -> Result<Service, CatalogRepositoryError> {
    let duration = u32::try_from(row.duration_minutes).unwrap_or(0);
    let before = u32::try_from(row.buffer_before_minutes).unwrap_or(0);
    let after = u32::try_from(row.buffer_after_minutes).unwrap_or(0);
    Service::new(
        row.id,
        TenantId::from_uuid(row.tenant_id),
        row.name,
        duration,
        row.price_cents,
        before,
        after,
        row.active,
    )
    .map_err(|err| {
        warn!(service_id = %row.id, error = %err, "service row failed validation");
        CatalogRepositoryError::query("service row failed validation")
    })
}

#[async_trait]
impl CatalogRepository for DieselCatalogRepository {
    async fn find_service(
        &self,
        tenant_id: TenantId,
        service_id: Uuid,
    ) -> Result<Option<Service>, CatalogRepositoryError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| map_pool_error(err, CatalogRepositoryError::connection))?;

        let row: Option<ServiceRow> = services::table
            .filter(services::id.eq(service_id))
            .filter(services::tenant_id.eq(tenant_id.as_uuid()))
            .select(ServiceRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_err)?;

        row.map(row_to_service).transpose()
    }

    async fn find_professional(
        &self,
        tenant_id: TenantId,
        professional_id: Uuid,
    ) -> Result<Option<Professional>, CatalogRepositoryError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| map_pool_error(err, CatalogRepositoryError::connection))?;

        let row: Option<ProfessionalRow> = professionals::table
            .filter(professionals::id.eq(professional_id))
            .filter(professionals::tenant_id.eq(tenant_id.as_uuid()))
            .select(ProfessionalRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_err)?;

        Ok(row.map(|row| {
            Professional::new(row.id, TenantId::from_uuid(row.tenant_id), row.name, row.active)
        }))
    }

    async fn professional_offers_service(
        &self,
        _tenant_id: TenantId,
        professional_id: Uuid,
        service_id: Uuid,
    ) -> Result<bool, CatalogRepositoryError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| map_pool_error(err, CatalogRepositoryError::connection))?;

        // Tenant scoping is enforced by the find_* lookups; the association
        // table carries no tenant column of its own.
        diesel::select(exists(
            professional_services::table
                .filter(professional_services::professional_id.eq(professional_id))
                .filter(professional_services::service_id.eq(service_id)),
        ))
        .get_result(&mut conn)
        .await
        .map_err(map_err)
    }
}

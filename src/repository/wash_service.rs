use diesel::prelude::*;
use pushkind_common::repository::errors::{RepositoryError, RepositoryResult};

use crate::{
    domain::wash_service::{
        NewWashService as DomainNewWashService, UpdateWashService as DomainUpdateWashService,
        WashService as DomainWashService, WashServiceListQuery,
    },
    models::wash_service::{
        NewWashService as DbNewWashService, UpdateWashService as DbUpdateWashService,
        WashService as DbWashService,
    },
    repository::{DieselRepository, WashServiceReader, WashServiceWriter},
    schema::services,
};

impl WashServiceReader for DieselRepository {
    fn get_service_by_id(
        &self,
        id: i32,
        hub_id: i32,
    ) -> RepositoryResult<Option<DomainWashService>> {
        let mut conn = self.conn()?;
        let service = services::table
            .filter(services::id.eq(id))
            .filter(services::hub_id.eq(hub_id))
            .first::<DbWashService>(&mut conn)
            .optional()?;

        Ok(service.map(Into::into))
    }

    fn list_services(
        &self,
        query: WashServiceListQuery,
    ) -> RepositoryResult<Vec<DomainWashService>> {
        let mut conn = self.conn()?;

        let mut items = services::table
            .filter(services::hub_id.eq(query.hub_id))
            .into_boxed::<diesel::sqlite::Sqlite>();

        if let Some(ids) = query.branch_ids {
            items = items.filter(services::branch_id.eq_any(ids));
        }

        if let Some(branch_id) = query.branch_id {
            items = items.filter(services::branch_id.eq(branch_id));
        }

        if !query.include_inactive {
            items = items.filter(services::is_active.eq(true));
        }

        let rows = items
            .order((services::branch_id.asc(), services::name.asc()))
            .load::<DbWashService>(&mut conn)?;

        Ok(rows.into_iter().map(Into::into).collect())
    }
}

impl WashServiceWriter for DieselRepository {
    fn create_service(
        &self,
        new_service: &DomainNewWashService,
    ) -> RepositoryResult<DomainWashService> {
        let mut conn = self.conn()?;
        let db_new = DbNewWashService::from(new_service);

        let created = diesel::insert_into(services::table)
            .values(&db_new)
            .get_result::<DbWashService>(&mut conn)?;

        Ok(created.into())
    }

    fn update_service(
        &self,
        service_id: i32,
        hub_id: i32,
        updates: &DomainUpdateWashService,
    ) -> RepositoryResult<DomainWashService> {
        let mut conn = self.conn()?;
        let db_updates = DbUpdateWashService::from(updates);

        let target = services::table
            .filter(services::id.eq(service_id))
            .filter(services::hub_id.eq(hub_id));

        let updated = diesel::update(target)
            .set(&db_updates)
            .get_result::<DbWashService>(&mut conn)?;

        Ok(updated.into())
    }

    fn delete_service(&self, service_id: i32, hub_id: i32) -> RepositoryResult<()> {
        let mut conn = self.conn()?;

        let target = services::table
            .filter(services::id.eq(service_id))
            .filter(services::hub_id.eq(hub_id));

        let deleted = diesel::delete(target).execute(&mut conn)?;
        if deleted == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }
}

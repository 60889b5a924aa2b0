use diesel::prelude::*;
use diesel::sqlite::Sqlite;
use pushkind_common::repository::errors::{RepositoryError, RepositoryResult};

use crate::{
    domain::franchise::{
        Franchise as DomainFranchise, FranchiseListQuery, NewFranchise as DomainNewFranchise,
        UpdateFranchise as DomainUpdateFranchise,
    },
    models::franchise::{
        Franchise as DbFranchise, NewFranchise as DbNewFranchise,
        UpdateFranchise as DbUpdateFranchise,
    },
    repository::{DieselRepository, FranchiseReader, FranchiseWriter, page_bounds},
    schema::franchises,
};

fn filtered(query: &FranchiseListQuery) -> franchises::BoxedQuery<'static, Sqlite> {
    let mut boxed = franchises::table
        .filter(franchises::hub_id.eq(query.hub_id))
        .into_boxed::<Sqlite>();

    if let Some(term) = query.search.as_ref() {
        let pattern = format!("%{}%", term);
        boxed = boxed.filter(
            franchises::name
                .like(pattern.clone())
                .or(franchises::contact_email.like(pattern)),
        );
    }

    boxed
}

impl FranchiseReader for DieselRepository {
    fn get_franchise_by_id(
        &self,
        id: i32,
        hub_id: i32,
    ) -> RepositoryResult<Option<DomainFranchise>> {
        let mut conn = self.conn()?;
        let franchise = franchises::table
            .filter(franchises::id.eq(id))
            .filter(franchises::hub_id.eq(hub_id))
            .first::<DbFranchise>(&mut conn)
            .optional()?;

        Ok(franchise.map(Into::into))
    }

    fn list_franchises(
        &self,
        query: FranchiseListQuery,
    ) -> RepositoryResult<(usize, Vec<DomainFranchise>)> {
        let mut conn = self.conn()?;

        let total = filtered(&query).count().get_result::<i64>(&mut conn)? as usize;

        let mut items = filtered(&query).order(franchises::name.asc());
        if let Some(pagination) = &query.pagination {
            let (offset, limit) = page_bounds(pagination.page, pagination.per_page);
            items = items.offset(offset).limit(limit);
        }

        let rows = items.load::<DbFranchise>(&mut conn)?;
        Ok((total, rows.into_iter().map(Into::into).collect()))
    }
}

impl FranchiseWriter for DieselRepository {
    fn create_franchise(
        &self,
        new_franchise: &DomainNewFranchise,
    ) -> RepositoryResult<DomainFranchise> {
        let mut conn = self.conn()?;
        let db_new = DbNewFranchise::from(new_franchise);

        let created = diesel::insert_into(franchises::table)
            .values(&db_new)
            .get_result::<DbFranchise>(&mut conn)?;

        Ok(created.into())
    }

    fn update_franchise(
        &self,
        franchise_id: i32,
        hub_id: i32,
        updates: &DomainUpdateFranchise,
    ) -> RepositoryResult<DomainFranchise> {
        let mut conn = self.conn()?;
        let db_updates = DbUpdateFranchise::from(updates);

        let target = franchises::table
            .filter(franchises::id.eq(franchise_id))
            .filter(franchises::hub_id.eq(hub_id));

        let updated = diesel::update(target)
            .set(&db_updates)
            .get_result::<DbFranchise>(&mut conn)?;

        Ok(updated.into())
    }

    fn delete_franchise(&self, franchise_id: i32, hub_id: i32) -> RepositoryResult<()> {
        let mut conn = self.conn()?;

        let target = franchises::table
            .filter(franchises::id.eq(franchise_id))
            .filter(franchises::hub_id.eq(hub_id));

        let deleted = diesel::delete(target).execute(&mut conn)?;
        if deleted == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }
}

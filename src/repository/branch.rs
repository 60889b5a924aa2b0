use chrono::Local;
use diesel::prelude::*;
use diesel::sqlite::Sqlite;
use pushkind_common::repository::errors::{RepositoryError, RepositoryResult};

use crate::{
    domain::branch::{
        Branch as DomainBranch, BranchListQuery, NewBranch as DomainNewBranch,
        UpdateBranch as DomainUpdateBranch,
    },
    models::branch::{Branch as DbBranch, NewBranch as DbNewBranch, UpdateBranch as DbUpdateBranch},
    repository::{BranchReader, BranchWriter, DieselRepository, page_bounds},
    schema::branches,
};

fn filtered(query: &BranchListQuery) -> branches::BoxedQuery<'static, Sqlite> {
    let mut boxed = branches::table
        .filter(branches::hub_id.eq(query.hub_id))
        .into_boxed::<Sqlite>();

    if let Some(ids) = query.branch_ids.as_ref() {
        boxed = boxed.filter(branches::id.eq_any(ids.clone()));
    }

    if let Some(franchise_id) = query.franchise_id {
        boxed = boxed.filter(branches::franchise_id.eq(franchise_id));
    }

    if !query.include_inactive {
        boxed = boxed.filter(branches::is_active.eq(true));
    }

    if let Some(term) = query.search.as_ref() {
        let pattern = format!("%{}%", term);
        boxed = boxed.filter(
            branches::name
                .like(pattern.clone())
                .or(branches::address.like(pattern)),
        );
    }

    boxed
}

impl BranchReader for DieselRepository {
    fn get_branch_by_id(&self, id: i32, hub_id: i32) -> RepositoryResult<Option<DomainBranch>> {
        let mut conn = self.conn()?;
        let branch = branches::table
            .filter(branches::id.eq(id))
            .filter(branches::hub_id.eq(hub_id))
            .first::<DbBranch>(&mut conn)
            .optional()?;

        Ok(branch.map(Into::into))
    }

    fn list_branches(
        &self,
        query: BranchListQuery,
    ) -> RepositoryResult<(usize, Vec<DomainBranch>)> {
        let mut conn = self.conn()?;

        let total = filtered(&query).count().get_result::<i64>(&mut conn)? as usize;

        let mut items = filtered(&query).order((branches::is_active.desc(), branches::name.asc()));
        if let Some(pagination) = &query.pagination {
            let (offset, limit) = page_bounds(pagination.page, pagination.per_page);
            items = items.offset(offset).limit(limit);
        }

        let rows = items.load::<DbBranch>(&mut conn)?;
        Ok((total, rows.into_iter().map(Into::into).collect()))
    }

    fn list_branch_ids(&self, hub_id: i32, franchise_id: i32) -> RepositoryResult<Vec<i32>> {
        let mut conn = self.conn()?;
        let ids = branches::table
            .filter(branches::hub_id.eq(hub_id))
            .filter(branches::franchise_id.eq(franchise_id))
            .select(branches::id)
            .order(branches::id.asc())
            .load::<i32>(&mut conn)?;

        Ok(ids)
    }
}

impl BranchWriter for DieselRepository {
    fn create_branch(&self, new_branch: &DomainNewBranch) -> RepositoryResult<DomainBranch> {
        let mut conn = self.conn()?;
        let db_new = DbNewBranch::from(new_branch);

        let created = diesel::insert_into(branches::table)
            .values(&db_new)
            .get_result::<DbBranch>(&mut conn)?;

        Ok(created.into())
    }

    fn update_branch(
        &self,
        branch_id: i32,
        hub_id: i32,
        updates: &DomainUpdateBranch,
    ) -> RepositoryResult<DomainBranch> {
        let mut conn = self.conn()?;
        let db_updates = DbUpdateBranch::from(updates);

        let target = branches::table
            .filter(branches::id.eq(branch_id))
            .filter(branches::hub_id.eq(hub_id));

        let updated = diesel::update(target)
            .set(&db_updates)
            .get_result::<DbBranch>(&mut conn)?;

        Ok(updated.into())
    }

    fn delete_branch(&self, branch_id: i32, hub_id: i32) -> RepositoryResult<()> {
        let mut conn = self.conn()?;

        let target = branches::table
            .filter(branches::id.eq(branch_id))
            .filter(branches::hub_id.eq(hub_id));

        let deleted = diesel::delete(target).execute(&mut conn)?;
        if deleted == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }

    fn set_branch_image(
        &self,
        branch_id: i32,
        hub_id: i32,
        image_url: &str,
    ) -> RepositoryResult<DomainBranch> {
        let mut conn = self.conn()?;

        let target = branches::table
            .filter(branches::id.eq(branch_id))
            .filter(branches::hub_id.eq(hub_id));

        let updated = diesel::update(target)
            .set((
                branches::image_url.eq(Some(image_url)),
                branches::updated_at.eq(Local::now().naive_utc()),
            ))
            .get_result::<DbBranch>(&mut conn)?;

        Ok(updated.into())
    }

    fn set_branch_rating(&self, branch_id: i32, hub_id: i32, rating: f64) -> RepositoryResult<()> {
        let mut conn = self.conn()?;

        let target = branches::table
            .filter(branches::id.eq(branch_id))
            .filter(branches::hub_id.eq(hub_id));

        let updated = diesel::update(target)
            .set(branches::rating.eq(rating))
            .execute(&mut conn)?;
        if updated == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }
}

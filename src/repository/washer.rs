use diesel::prelude::*;
use diesel::sqlite::{Sqlite, SqliteConnection};
use pushkind_common::repository::errors::{RepositoryError, RepositoryResult};

use crate::{
    domain::washer::{
        NewWasher as DomainNewWasher, ScheduleSlot, UpdateWasher as DomainUpdateWasher,
        Washer as DomainWasher, WasherListQuery,
    },
    models::washer::{
        NewWasher as DbNewWasher, NewWasherSchedule as DbNewWasherSchedule,
        UpdateWasher as DbUpdateWasher, Washer as DbWasher, WasherSchedule as DbWasherSchedule,
    },
    repository::{DieselRepository, WasherReader, WasherWriter, page_bounds},
    schema::{washer_schedules, washers},
};

fn filtered(query: &WasherListQuery) -> washers::BoxedQuery<'static, Sqlite> {
    let mut boxed = washers::table
        .filter(washers::hub_id.eq(query.hub_id))
        .into_boxed::<Sqlite>();

    if let Some(ids) = query.branch_ids.as_ref() {
        boxed = boxed.filter(washers::branch_id.eq_any(ids.clone()));
    }

    if let Some(branch_id) = query.branch_id {
        boxed = boxed.filter(washers::branch_id.eq(branch_id));
    }

    if let Some(status) = query.status {
        boxed = boxed.filter(washers::status.eq(status.as_str()));
    }

    if let Some(term) = query.search.as_ref() {
        let pattern = format!("%{}%", term);
        boxed = boxed.filter(
            washers::name
                .like(pattern.clone())
                .or(washers::phone.like(pattern.clone()))
                .or(washers::email.like(pattern)),
        );
    }

    boxed
}

fn load_schedule(conn: &mut SqliteConnection, washer_id: i32) -> RepositoryResult<Vec<ScheduleSlot>> {
    let rows = washer_schedules::table
        .filter(washer_schedules::washer_id.eq(washer_id))
        .order(washer_schedules::day_of_week.asc())
        .load::<DbWasherSchedule>(conn)?;

    Ok(rows.into_iter().map(Into::into).collect())
}

fn washer_exists(conn: &mut SqliteConnection, washer_id: i32, hub_id: i32) -> RepositoryResult<bool> {
    let found = washers::table
        .filter(washers::id.eq(washer_id))
        .filter(washers::hub_id.eq(hub_id))
        .select(washers::id)
        .first::<i32>(conn)
        .optional()?;

    Ok(found.is_some())
}

impl WasherReader for DieselRepository {
    fn get_washer_by_id(&self, id: i32, hub_id: i32) -> RepositoryResult<Option<DomainWasher>> {
        let mut conn = self.conn()?;
        let washer = washers::table
            .filter(washers::id.eq(id))
            .filter(washers::hub_id.eq(hub_id))
            .first::<DbWasher>(&mut conn)
            .optional()?;

        Ok(washer.map(Into::into))
    }

    fn list_washers(&self, query: WasherListQuery) -> RepositoryResult<(usize, Vec<DomainWasher>)> {
        let mut conn = self.conn()?;

        let total = filtered(&query).count().get_result::<i64>(&mut conn)? as usize;

        let mut items = filtered(&query).order(washers::name.asc());
        if let Some(pagination) = &query.pagination {
            let (offset, limit) = page_bounds(pagination.page, pagination.per_page);
            items = items.offset(offset).limit(limit);
        }

        let rows = items.load::<DbWasher>(&mut conn)?;
        Ok((total, rows.into_iter().map(Into::into).collect()))
    }

    fn get_washer_schedule(
        &self,
        washer_id: i32,
        hub_id: i32,
    ) -> RepositoryResult<Vec<ScheduleSlot>> {
        let mut conn = self.conn()?;

        if !washer_exists(&mut conn, washer_id, hub_id)? {
            return Err(RepositoryError::NotFound);
        }

        load_schedule(&mut conn, washer_id)
    }
}

impl WasherWriter for DieselRepository {
    fn create_washer(&self, new_washer: &DomainNewWasher) -> RepositoryResult<DomainWasher> {
        let mut conn = self.conn()?;
        let db_new = DbNewWasher::from(new_washer);

        let created = diesel::insert_into(washers::table)
            .values(&db_new)
            .get_result::<DbWasher>(&mut conn)?;

        Ok(created.into())
    }

    fn update_washer(
        &self,
        washer_id: i32,
        hub_id: i32,
        updates: &DomainUpdateWasher,
    ) -> RepositoryResult<DomainWasher> {
        let mut conn = self.conn()?;
        let db_updates = DbUpdateWasher::from(updates);

        let target = washers::table
            .filter(washers::id.eq(washer_id))
            .filter(washers::hub_id.eq(hub_id));

        let updated = diesel::update(target)
            .set(&db_updates)
            .get_result::<DbWasher>(&mut conn)?;

        Ok(updated.into())
    }

    fn delete_washer(&self, washer_id: i32, hub_id: i32) -> RepositoryResult<()> {
        let mut conn = self.conn()?;

        conn.transaction::<(), RepositoryError, _>(|conn| {
            if !washer_exists(conn, washer_id, hub_id)? {
                return Err(RepositoryError::NotFound);
            }

            diesel::delete(
                washer_schedules::table.filter(washer_schedules::washer_id.eq(washer_id)),
            )
            .execute(conn)?;
            diesel::delete(washers::table.filter(washers::id.eq(washer_id))).execute(conn)?;

            Ok(())
        })
    }

    fn replace_washer_schedule(
        &self,
        washer_id: i32,
        hub_id: i32,
        slots: &[ScheduleSlot],
    ) -> RepositoryResult<Vec<ScheduleSlot>> {
        let mut conn = self.conn()?;

        conn.transaction::<Vec<ScheduleSlot>, RepositoryError, _>(|conn| {
            if !washer_exists(conn, washer_id, hub_id)? {
                return Err(RepositoryError::NotFound);
            }

            diesel::delete(
                washer_schedules::table.filter(washer_schedules::washer_id.eq(washer_id)),
            )
            .execute(conn)?;

            let rows: Vec<DbNewWasherSchedule> = slots
                .iter()
                .map(|slot| DbNewWasherSchedule::from_domain(washer_id, slot))
                .collect();

            if !rows.is_empty() {
                diesel::insert_into(washer_schedules::table)
                    .values(&rows)
                    .execute(conn)?;
            }

            load_schedule(conn, washer_id)
        })
    }
}

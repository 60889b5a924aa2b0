use std::collections::HashMap;

use chrono::Local;
use diesel::prelude::*;
use diesel::sqlite::{Sqlite, SqliteConnection};
use pushkind_common::repository::errors::{RepositoryError, RepositoryResult};

use crate::{
    domain::admin::{Admin as DomainAdmin, AdminListQuery, NewAdmin as DomainNewAdmin},
    models::admin::{
        Admin as DbAdmin, BranchAdmin as DbBranchAdmin, NewAdmin as DbNewAdmin,
        NewBranchAdmin as DbNewBranchAdmin,
    },
    repository::{AdminReader, AdminWriter, DieselRepository, page_bounds},
    schema::{admins, branch_admins},
};

fn filtered(query: &AdminListQuery) -> admins::BoxedQuery<'static, Sqlite> {
    let mut boxed = admins::table
        .filter(admins::hub_id.eq(query.hub_id))
        .into_boxed::<Sqlite>();

    if let Some(role) = query.role {
        boxed = boxed.filter(admins::role.eq(role.as_str()));
    }

    if let Some(term) = query.search.as_ref() {
        let pattern = format!("%{}%", term);
        boxed = boxed.filter(admins::name.like(pattern.clone()).or(admins::email.like(pattern)));
    }

    boxed
}

fn load_assignments(
    conn: &mut SqliteConnection,
    admin_ids: &[i32],
) -> RepositoryResult<HashMap<i32, Vec<DbBranchAdmin>>> {
    if admin_ids.is_empty() {
        return Ok(HashMap::new());
    }

    let rows = branch_admins::table
        .filter(branch_admins::admin_id.eq_any(admin_ids))
        .order(branch_admins::branch_id.asc())
        .load::<DbBranchAdmin>(conn)?;

    let mut map: HashMap<i32, Vec<DbBranchAdmin>> = HashMap::new();
    for row in rows {
        map.entry(row.admin_id).or_default().push(row);
    }

    Ok(map)
}

fn with_assignments(conn: &mut SqliteConnection, admin: DbAdmin) -> RepositoryResult<DomainAdmin> {
    let mut assignments = load_assignments(conn, &[admin.id])?;
    let rows = assignments.remove(&admin.id).unwrap_or_default();
    Ok(admin.into_domain(rows))
}

fn insert_assignments(
    conn: &mut SqliteConnection,
    admin_id: i32,
    branch_ids: &[i32],
) -> RepositoryResult<()> {
    let rows: Vec<DbNewBranchAdmin> = branch_ids
        .iter()
        .map(|branch_id| DbNewBranchAdmin {
            admin_id,
            branch_id: *branch_id,
        })
        .collect();

    if !rows.is_empty() {
        diesel::insert_into(branch_admins::table)
            .values(&rows)
            .execute(conn)?;
    }

    Ok(())
}

impl AdminReader for DieselRepository {
    fn get_admin_by_id(&self, id: i32, hub_id: i32) -> RepositoryResult<Option<DomainAdmin>> {
        let mut conn = self.conn()?;
        let admin = admins::table
            .filter(admins::id.eq(id))
            .filter(admins::hub_id.eq(hub_id))
            .first::<DbAdmin>(&mut conn)
            .optional()?;

        match admin {
            Some(admin) => Ok(Some(with_assignments(&mut conn, admin)?)),
            None => Ok(None),
        }
    }

    fn get_admin_by_email(&self, email: &str, hub_id: i32) -> RepositoryResult<Option<DomainAdmin>> {
        let mut conn = self.conn()?;
        let normalized = email.trim().to_lowercase();
        let admin = admins::table
            .filter(admins::email.eq(normalized))
            .filter(admins::hub_id.eq(hub_id))
            .first::<DbAdmin>(&mut conn)
            .optional()?;

        match admin {
            Some(admin) => Ok(Some(with_assignments(&mut conn, admin)?)),
            None => Ok(None),
        }
    }

    fn list_admins(&self, query: AdminListQuery) -> RepositoryResult<(usize, Vec<DomainAdmin>)> {
        let mut conn = self.conn()?;

        let total = filtered(&query).count().get_result::<i64>(&mut conn)? as usize;

        let mut items = filtered(&query).order(admins::email.asc());
        if let Some(pagination) = &query.pagination {
            let (offset, limit) = page_bounds(pagination.page, pagination.per_page);
            items = items.offset(offset).limit(limit);
        }

        let rows = items.load::<DbAdmin>(&mut conn)?;
        let ids: Vec<i32> = rows.iter().map(|admin| admin.id).collect();
        let mut assignments = load_assignments(&mut conn, &ids)?;

        let admins = rows
            .into_iter()
            .map(|admin| {
                let branch_rows = assignments.remove(&admin.id).unwrap_or_default();
                admin.into_domain(branch_rows)
            })
            .collect();

        Ok((total, admins))
    }
}

impl AdminWriter for DieselRepository {
    fn create_admin(&self, new_admin: &DomainNewAdmin) -> RepositoryResult<DomainAdmin> {
        let mut conn = self.conn()?;
        let db_new = DbNewAdmin::from(new_admin);

        conn.transaction::<DomainAdmin, RepositoryError, _>(|conn| {
            let created = diesel::insert_into(admins::table)
                .values(&db_new)
                .get_result::<DbAdmin>(conn)?;

            insert_assignments(conn, created.id, &new_admin.branch_ids)?;
            with_assignments(conn, created)
        })
    }

    fn replace_branch_assignments(
        &self,
        admin_id: i32,
        hub_id: i32,
        branch_ids: &[i32],
    ) -> RepositoryResult<DomainAdmin> {
        let mut conn = self.conn()?;

        conn.transaction::<DomainAdmin, RepositoryError, _>(|conn| {
            let target = admins::table
                .filter(admins::id.eq(admin_id))
                .filter(admins::hub_id.eq(hub_id));

            let admin = diesel::update(target)
                .set(admins::updated_at.eq(Local::now().naive_utc()))
                .get_result::<DbAdmin>(conn)?;

            diesel::delete(branch_admins::table.filter(branch_admins::admin_id.eq(admin.id)))
                .execute(conn)?;
            insert_assignments(conn, admin.id, branch_ids)?;

            with_assignments(conn, admin)
        })
    }

    fn delete_admin(&self, admin_id: i32, hub_id: i32) -> RepositoryResult<()> {
        let mut conn = self.conn()?;

        conn.transaction::<(), RepositoryError, _>(|conn| {
            let exists = admins::table
                .filter(admins::id.eq(admin_id))
                .filter(admins::hub_id.eq(hub_id))
                .select(admins::id)
                .first::<i32>(conn)
                .optional()?;

            if exists.is_none() {
                return Err(RepositoryError::NotFound);
            }

            diesel::delete(branch_admins::table.filter(branch_admins::admin_id.eq(admin_id)))
                .execute(conn)?;
            diesel::delete(admins::table.filter(admins::id.eq(admin_id))).execute(conn)?;

            Ok(())
        })
    }
}

use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::domain::admin::{Admin as DomainAdmin, NewAdmin as DomainNewAdmin};

#[derive(Debug, Clone, Identifiable, Queryable, Selectable)]
#[diesel(table_name = crate::schema::admins)]
pub struct Admin {
    pub id: i32,
    pub hub_id: i32,
    pub email: String,
    pub name: String,
    pub role: String,
    pub franchise_id: Option<i32>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Debug, Clone, Identifiable, Queryable, Selectable, Associations)]
#[diesel(table_name = crate::schema::branch_admins)]
#[diesel(belongs_to(Admin, foreign_key = admin_id))]
pub struct BranchAdmin {
    pub id: i32,
    pub admin_id: i32,
    pub branch_id: i32,
    pub created_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::admins)]
pub struct NewAdmin<'a> {
    pub hub_id: i32,
    pub email: &'a str,
    pub name: &'a str,
    pub role: &'a str,
    pub franchise_id: Option<i32>,
    pub updated_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::branch_admins)]
pub struct NewBranchAdmin {
    pub admin_id: i32,
    pub branch_id: i32,
}

impl Admin {
    pub fn into_domain(self, branch_admins: Vec<BranchAdmin>) -> DomainAdmin {
        DomainAdmin {
            id: self.id,
            hub_id: self.hub_id,
            email: self.email,
            name: self.name,
            role: self.role.parse().unwrap_or_default(),
            franchise_id: self.franchise_id,
            branch_ids: branch_admins.into_iter().map(|row| row.branch_id).collect(),
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

impl<'a> From<&'a DomainNewAdmin> for NewAdmin<'a> {
    fn from(value: &'a DomainNewAdmin) -> Self {
        Self {
            hub_id: value.hub_id,
            email: value.email.as_str(),
            name: value.name.as_str(),
            role: value.role.as_str(),
            franchise_id: value.franchise_id,
            updated_at: value.updated_at,
        }
    }
}

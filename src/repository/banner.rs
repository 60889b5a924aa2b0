use diesel::prelude::*;
use pushkind_common::repository::errors::{RepositoryError, RepositoryResult};

use crate::{
    domain::banner::{
        Banner as DomainBanner, NewBanner as DomainNewBanner, UpdateBanner as DomainUpdateBanner,
    },
    models::banner::{Banner as DbBanner, NewBanner as DbNewBanner, UpdateBanner as DbUpdateBanner},
    repository::{BannerReader, BannerWriter, DieselRepository},
    schema::banners,
};

impl BannerReader for DieselRepository {
    fn get_banner_by_id(&self, id: i32, hub_id: i32) -> RepositoryResult<Option<DomainBanner>> {
        let mut conn = self.conn()?;
        let banner = banners::table
            .filter(banners::id.eq(id))
            .filter(banners::hub_id.eq(hub_id))
            .first::<DbBanner>(&mut conn)
            .optional()?;

        Ok(banner.map(Into::into))
    }

    fn list_banners(&self, hub_id: i32) -> RepositoryResult<Vec<DomainBanner>> {
        let mut conn = self.conn()?;
        let rows = banners::table
            .filter(banners::hub_id.eq(hub_id))
            .order((banners::position.asc(), banners::id.asc()))
            .load::<DbBanner>(&mut conn)?;

        Ok(rows.into_iter().map(Into::into).collect())
    }
}

impl BannerWriter for DieselRepository {
    fn create_banner(&self, new_banner: &DomainNewBanner) -> RepositoryResult<DomainBanner> {
        let mut conn = self.conn()?;
        let db_new = DbNewBanner::from(new_banner);

        let created = diesel::insert_into(banners::table)
            .values(&db_new)
            .get_result::<DbBanner>(&mut conn)?;

        Ok(created.into())
    }

    fn update_banner(
        &self,
        banner_id: i32,
        hub_id: i32,
        updates: &DomainUpdateBanner,
    ) -> RepositoryResult<DomainBanner> {
        let mut conn = self.conn()?;
        let db_updates = DbUpdateBanner::from(updates);

        let target = banners::table
            .filter(banners::id.eq(banner_id))
            .filter(banners::hub_id.eq(hub_id));

        let updated = diesel::update(target)
            .set(&db_updates)
            .get_result::<DbBanner>(&mut conn)?;

        Ok(updated.into())
    }

    fn delete_banner(&self, banner_id: i32, hub_id: i32) -> RepositoryResult<()> {
        let mut conn = self.conn()?;

        let target = banners::table
            .filter(banners::id.eq(banner_id))
            .filter(banners::hub_id.eq(hub_id));

        let deleted = diesel::delete(target).execute(&mut conn)?;
        if deleted == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }
}

use diesel::prelude::*;
use pushkind_common::repository::errors::{RepositoryError, RepositoryResult};

use crate::{
    domain::offer::{
        NewOffer as DomainNewOffer, Offer as DomainOffer, UpdateOffer as DomainUpdateOffer,
    },
    models::offer::{NewOffer as DbNewOffer, Offer as DbOffer, UpdateOffer as DbUpdateOffer},
    repository::{DieselRepository, OfferReader, OfferWriter},
    schema::offers,
};

impl OfferReader for DieselRepository {
    fn get_offer_by_id(&self, id: i32, hub_id: i32) -> RepositoryResult<Option<DomainOffer>> {
        let mut conn = self.conn()?;
        let offer = offers::table
            .filter(offers::id.eq(id))
            .filter(offers::hub_id.eq(hub_id))
            .first::<DbOffer>(&mut conn)
            .optional()?;

        Ok(offer.map(Into::into))
    }

    fn list_offers(&self, hub_id: i32) -> RepositoryResult<Vec<DomainOffer>> {
        let mut conn = self.conn()?;
        let rows = offers::table
            .filter(offers::hub_id.eq(hub_id))
            .order((offers::is_active.desc(), offers::created_at.desc()))
            .load::<DbOffer>(&mut conn)?;

        Ok(rows.into_iter().map(Into::into).collect())
    }
}

impl OfferWriter for DieselRepository {
    fn create_offer(&self, new_offer: &DomainNewOffer) -> RepositoryResult<DomainOffer> {
        let mut conn = self.conn()?;
        let db_new = DbNewOffer::from(new_offer);

        let created = diesel::insert_into(offers::table)
            .values(&db_new)
            .get_result::<DbOffer>(&mut conn)?;

        Ok(created.into())
    }

    fn update_offer(
        &self,
        offer_id: i32,
        hub_id: i32,
        updates: &DomainUpdateOffer,
    ) -> RepositoryResult<DomainOffer> {
        let mut conn = self.conn()?;
        let db_updates = DbUpdateOffer::from(updates);

        let target = offers::table
            .filter(offers::id.eq(offer_id))
            .filter(offers::hub_id.eq(hub_id));

        let updated = diesel::update(target)
            .set(&db_updates)
            .get_result::<DbOffer>(&mut conn)?;

        Ok(updated.into())
    }

    fn delete_offer(&self, offer_id: i32, hub_id: i32) -> RepositoryResult<()> {
        let mut conn = self.conn()?;

        let target = offers::table
            .filter(offers::id.eq(offer_id))
            .filter(offers::hub_id.eq(hub_id));

        let deleted = diesel::delete(target).execute(&mut conn)?;
        if deleted == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }
}

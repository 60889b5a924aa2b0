use diesel::prelude::*;
use pushkind_common::repository::errors::{RepositoryError, RepositoryResult};

use crate::{
    domain::product_category::{
        NewProductCategory as DomainNewProductCategory, ProductCategory as DomainProductCategory,
        UpdateProductCategory as DomainUpdateProductCategory,
    },
    models::product_category::{
        NewProductCategory as DbNewProductCategory, ProductCategory as DbProductCategory,
        UpdateProductCategory as DbUpdateProductCategory,
    },
    repository::{DieselRepository, ProductCategoryReader, ProductCategoryWriter},
    schema::{product_categories, products},
};

impl ProductCategoryReader for DieselRepository {
    fn get_product_category_by_id(
        &self,
        id: i32,
        hub_id: i32,
    ) -> RepositoryResult<Option<DomainProductCategory>> {
        let mut conn = self.conn()?;
        let category = product_categories::table
            .filter(product_categories::id.eq(id))
            .filter(product_categories::hub_id.eq(hub_id))
            .first::<DbProductCategory>(&mut conn)
            .optional()?;

        Ok(category.map(Into::into))
    }

    fn list_product_categories(&self, hub_id: i32) -> RepositoryResult<Vec<DomainProductCategory>> {
        let mut conn = self.conn()?;
        let rows = product_categories::table
            .filter(product_categories::hub_id.eq(hub_id))
            .order(product_categories::name.asc())
            .load::<DbProductCategory>(&mut conn)?;

        Ok(rows.into_iter().map(Into::into).collect())
    }
}

impl ProductCategoryWriter for DieselRepository {
    fn create_product_category(
        &self,
        new_category: &DomainNewProductCategory,
    ) -> RepositoryResult<DomainProductCategory> {
        let mut conn = self.conn()?;
        let db_new = DbNewProductCategory::from(new_category);

        let created = diesel::insert_into(product_categories::table)
            .values(&db_new)
            .get_result::<DbProductCategory>(&mut conn)?;

        Ok(created.into())
    }

    fn update_product_category(
        &self,
        category_id: i32,
        hub_id: i32,
        updates: &DomainUpdateProductCategory,
    ) -> RepositoryResult<DomainProductCategory> {
        let mut conn = self.conn()?;
        let db_updates = DbUpdateProductCategory::from(updates);

        let target = product_categories::table
            .filter(product_categories::id.eq(category_id))
            .filter(product_categories::hub_id.eq(hub_id));

        let updated = diesel::update(target)
            .set(&db_updates)
            .get_result::<DbProductCategory>(&mut conn)?;

        Ok(updated.into())
    }

    fn delete_product_category(&self, category_id: i32, hub_id: i32) -> RepositoryResult<()> {
        let mut conn = self.conn()?;

        conn.transaction::<(), RepositoryError, _>(|conn| {
            diesel::update(
                products::table
                    .filter(products::category_id.eq(category_id))
                    .filter(products::hub_id.eq(hub_id)),
            )
            .set(products::category_id.eq(None::<i32>))
            .execute(conn)?;

            let target = product_categories::table
                .filter(product_categories::id.eq(category_id))
                .filter(product_categories::hub_id.eq(hub_id));

            let deleted = diesel::delete(target).execute(conn)?;
            if deleted == 0 {
                return Err(RepositoryError::NotFound);
            }

            Ok(())
        })
    }
}

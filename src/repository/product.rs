use chrono::Local;
use diesel::prelude::*;
use diesel::sqlite::Sqlite;
use pushkind_common::repository::errors::{RepositoryError, RepositoryResult};

use crate::{
    domain::product::{
        NewProduct as DomainNewProduct, Product as DomainProduct, ProductListQuery,
        UpdateProduct as DomainUpdateProduct,
    },
    models::product::{
        NewProduct as DbNewProduct, Product as DbProduct, UpdateProduct as DbUpdateProduct,
    },
    repository::{DieselRepository, ProductReader, ProductWriter, page_bounds},
    schema::{order_items, products},
};

fn filtered(query: &ProductListQuery) -> products::BoxedQuery<'static, Sqlite> {
    let mut boxed = products::table
        .filter(products::hub_id.eq(query.hub_id))
        .into_boxed::<Sqlite>();

    if !query.include_archived {
        boxed = boxed.filter(products::is_archived.eq(false));
    }

    if let Some(category_id) = query.category_id {
        boxed = boxed.filter(products::category_id.eq(category_id));
    }

    if let Some(term) = query.search.as_ref() {
        let pattern = format!("%{}%", term);
        boxed = boxed.filter(
            products::name
                .like(pattern.clone())
                .or(products::sku.like(pattern.clone()))
                .or(products::description.like(pattern)),
        );
    }

    boxed
}

impl ProductReader for DieselRepository {
    fn get_product_by_id(&self, id: i32, hub_id: i32) -> RepositoryResult<Option<DomainProduct>> {
        let mut conn = self.conn()?;
        let product = products::table
            .filter(products::id.eq(id))
            .filter(products::hub_id.eq(hub_id))
            .first::<DbProduct>(&mut conn)
            .optional()?;

        Ok(product.map(Into::into))
    }

    fn list_products(
        &self,
        query: ProductListQuery,
    ) -> RepositoryResult<(usize, Vec<DomainProduct>)> {
        let mut conn = self.conn()?;

        let total = filtered(&query).count().get_result::<i64>(&mut conn)? as usize;

        let mut items =
            filtered(&query).order((products::is_archived.asc(), products::created_at.desc()));
        if let Some(pagination) = &query.pagination {
            let (offset, limit) = page_bounds(pagination.page, pagination.per_page);
            items = items.offset(offset).limit(limit);
        }

        let rows = items.load::<DbProduct>(&mut conn)?;
        Ok((total, rows.into_iter().map(Into::into).collect()))
    }
}

impl ProductWriter for DieselRepository {
    fn create_product(&self, new_product: &DomainNewProduct) -> RepositoryResult<DomainProduct> {
        let mut conn = self.conn()?;
        let db_new = DbNewProduct::from(new_product);

        let created = diesel::insert_into(products::table)
            .values(&db_new)
            .get_result::<DbProduct>(&mut conn)?;

        Ok(created.into())
    }

    fn create_products(&self, new_products: &[DomainNewProduct]) -> RepositoryResult<usize> {
        let mut conn = self.conn()?;
        let rows: Vec<DbNewProduct> = new_products.iter().map(DbNewProduct::from).collect();

        conn.transaction::<usize, RepositoryError, _>(|conn| {
            let inserted = diesel::insert_into(products::table)
                .values(&rows)
                .execute(conn)?;
            Ok(inserted)
        })
    }

    fn update_product(
        &self,
        product_id: i32,
        hub_id: i32,
        updates: &DomainUpdateProduct,
    ) -> RepositoryResult<DomainProduct> {
        let mut conn = self.conn()?;
        let db_updates = DbUpdateProduct::from(updates);

        let target = products::table
            .filter(products::id.eq(product_id))
            .filter(products::hub_id.eq(hub_id));

        let updated = diesel::update(target)
            .set(&db_updates)
            .get_result::<DbProduct>(&mut conn)?;

        Ok(updated.into())
    }

    fn delete_product(&self, product_id: i32, hub_id: i32) -> RepositoryResult<()> {
        let mut conn = self.conn()?;

        conn.transaction::<(), RepositoryError, _>(|conn| {
            let target = products::table
                .filter(products::id.eq(product_id))
                .filter(products::hub_id.eq(hub_id));

            let exists = target
                .clone()
                .select(products::id)
                .first::<i32>(conn)
                .optional()?;
            if exists.is_none() {
                return Err(RepositoryError::NotFound);
            }

            // Order lines keep their copied name and price.
            diesel::update(order_items::table.filter(order_items::product_id.eq(product_id)))
                .set(order_items::product_id.eq(None::<i32>))
                .execute(conn)?;
            diesel::delete(target).execute(conn)?;

            Ok(())
        })
    }

    fn set_product_image(
        &self,
        product_id: i32,
        hub_id: i32,
        image_url: &str,
    ) -> RepositoryResult<DomainProduct> {
        let mut conn = self.conn()?;

        let target = products::table
            .filter(products::id.eq(product_id))
            .filter(products::hub_id.eq(hub_id));

        let updated = diesel::update(target)
            .set((
                products::image_url.eq(Some(image_url)),
                products::updated_at.eq(Local::now().naive_utc()),
            ))
            .get_result::<DbProduct>(&mut conn)?;

        Ok(updated.into())
    }
}

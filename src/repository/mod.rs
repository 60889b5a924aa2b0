use pushkind_common::db::{DbConnection, DbPool};
use pushkind_common::repository::errors::RepositoryResult;

use crate::domain::{
    admin::{Admin, AdminListQuery, NewAdmin},
    banner::{Banner, NewBanner, UpdateBanner},
    booking::{Booking, BookingListQuery, NewBooking, UpdateBooking},
    branch::{Branch, BranchListQuery, NewBranch, UpdateBranch},
    franchise::{Franchise, FranchiseListQuery, NewFranchise, UpdateFranchise},
    offer::{NewOffer, Offer, UpdateOffer},
    order::{NewOrder, Order, OrderListQuery, OrderStatus},
    payment::{NewPayment, Payment, PaymentListQuery},
    product::{NewProduct, Product, ProductListQuery, UpdateProduct},
    product_category::{NewProductCategory, ProductCategory, UpdateProductCategory},
    review::{NewReview, Review, ReviewListQuery},
    wash_service::{NewWashService, UpdateWashService, WashService, WashServiceListQuery},
    washer::{NewWasher, ScheduleSlot, UpdateWasher, Washer, WasherListQuery},
};

pub mod admin;
pub mod banner;
pub mod booking;
pub mod branch;
pub mod franchise;
pub mod offer;
pub mod order;
pub mod payment;
pub mod product;
pub mod product_category;
pub mod review;
pub mod wash_service;
pub mod washer;

#[cfg(test)]
pub mod mock;

#[derive(Clone)]
/// Diesel-backed repository implementation that wraps an r2d2 pool.
pub struct DieselRepository {
    pool: DbPool, // r2d2::Pool is cheap to clone
}

impl DieselRepository {
    /// Create a new repository using the provided connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    fn conn(&self) -> RepositoryResult<DbConnection> {
        Ok(self.pool.get()?)
    }
}

/// Offset and limit derived from a 1-based page. Pages past the addressable
/// range saturate, so they simply come back empty.
pub(crate) fn page_bounds(page: usize, per_page: usize) -> (i64, i64) {
    let offset = (page.max(1) - 1).saturating_mul(per_page);
    (
        i64::try_from(offset).unwrap_or(i64::MAX),
        i64::try_from(per_page).unwrap_or(i64::MAX),
    )
}

pub trait FranchiseReader {
    fn get_franchise_by_id(&self, id: i32, hub_id: i32) -> RepositoryResult<Option<Franchise>>;
    fn list_franchises(
        &self,
        query: FranchiseListQuery,
    ) -> RepositoryResult<(usize, Vec<Franchise>)>;
}

pub trait FranchiseWriter {
    fn create_franchise(&self, new_franchise: &NewFranchise) -> RepositoryResult<Franchise>;
    fn update_franchise(
        &self,
        franchise_id: i32,
        hub_id: i32,
        updates: &UpdateFranchise,
    ) -> RepositoryResult<Franchise>;
    fn delete_franchise(&self, franchise_id: i32, hub_id: i32) -> RepositoryResult<()>;
}

pub trait BranchReader {
    fn get_branch_by_id(&self, id: i32, hub_id: i32) -> RepositoryResult<Option<Branch>>;
    fn list_branches(&self, query: BranchListQuery) -> RepositoryResult<(usize, Vec<Branch>)>;
    /// Identifiers of every branch that belongs to the franchise.
    fn list_branch_ids(&self, hub_id: i32, franchise_id: i32) -> RepositoryResult<Vec<i32>>;
}

pub trait BranchWriter {
    fn create_branch(&self, new_branch: &NewBranch) -> RepositoryResult<Branch>;
    fn update_branch(
        &self,
        branch_id: i32,
        hub_id: i32,
        updates: &UpdateBranch,
    ) -> RepositoryResult<Branch>;
    fn delete_branch(&self, branch_id: i32, hub_id: i32) -> RepositoryResult<()>;
    fn set_branch_image(
        &self,
        branch_id: i32,
        hub_id: i32,
        image_url: &str,
    ) -> RepositoryResult<Branch>;
    fn set_branch_rating(&self, branch_id: i32, hub_id: i32, rating: f64) -> RepositoryResult<()>;
}

pub trait AdminReader {
    fn get_admin_by_id(&self, id: i32, hub_id: i32) -> RepositoryResult<Option<Admin>>;
    fn get_admin_by_email(&self, email: &str, hub_id: i32) -> RepositoryResult<Option<Admin>>;
    fn list_admins(&self, query: AdminListQuery) -> RepositoryResult<(usize, Vec<Admin>)>;
}

pub trait AdminWriter {
    /// Inserts the admin together with its branch assignments.
    fn create_admin(&self, new_admin: &NewAdmin) -> RepositoryResult<Admin>;
    fn replace_branch_assignments(
        &self,
        admin_id: i32,
        hub_id: i32,
        branch_ids: &[i32],
    ) -> RepositoryResult<Admin>;
    fn delete_admin(&self, admin_id: i32, hub_id: i32) -> RepositoryResult<()>;
}

pub trait WashServiceReader {
    fn get_service_by_id(&self, id: i32, hub_id: i32) -> RepositoryResult<Option<WashService>>;
    fn list_services(&self, query: WashServiceListQuery) -> RepositoryResult<Vec<WashService>>;
}

pub trait WashServiceWriter {
    fn create_service(&self, new_service: &NewWashService) -> RepositoryResult<WashService>;
    fn update_service(
        &self,
        service_id: i32,
        hub_id: i32,
        updates: &UpdateWashService,
    ) -> RepositoryResult<WashService>;
    fn delete_service(&self, service_id: i32, hub_id: i32) -> RepositoryResult<()>;
}

pub trait WasherReader {
    fn get_washer_by_id(&self, id: i32, hub_id: i32) -> RepositoryResult<Option<Washer>>;
    fn list_washers(&self, query: WasherListQuery) -> RepositoryResult<(usize, Vec<Washer>)>;
    /// Weekly slots ordered by day of week.
    fn get_washer_schedule(&self, washer_id: i32, hub_id: i32)
    -> RepositoryResult<Vec<ScheduleSlot>>;
}

pub trait WasherWriter {
    fn create_washer(&self, new_washer: &NewWasher) -> RepositoryResult<Washer>;
    fn update_washer(
        &self,
        washer_id: i32,
        hub_id: i32,
        updates: &UpdateWasher,
    ) -> RepositoryResult<Washer>;
    fn delete_washer(&self, washer_id: i32, hub_id: i32) -> RepositoryResult<()>;
    fn replace_washer_schedule(
        &self,
        washer_id: i32,
        hub_id: i32,
        slots: &[ScheduleSlot],
    ) -> RepositoryResult<Vec<ScheduleSlot>>;
}

pub trait BookingReader {
    fn get_booking_by_id(&self, id: i32, hub_id: i32) -> RepositoryResult<Option<Booking>>;
    fn list_bookings(&self, query: BookingListQuery) -> RepositoryResult<(usize, Vec<Booking>)>;
}

pub trait BookingWriter {
    fn create_booking(&self, new_booking: &NewBooking) -> RepositoryResult<Booking>;
    fn update_booking(
        &self,
        booking_id: i32,
        hub_id: i32,
        updates: &UpdateBooking,
    ) -> RepositoryResult<Booking>;
    fn delete_booking(&self, booking_id: i32, hub_id: i32) -> RepositoryResult<()>;
}

pub trait PaymentReader {
    fn get_payment_by_id(&self, id: i32, hub_id: i32) -> RepositoryResult<Option<Payment>>;
    fn get_payment_by_gateway_reference(
        &self,
        reference: &str,
        hub_id: i32,
    ) -> RepositoryResult<Option<Payment>>;
    fn list_payments(&self, query: PaymentListQuery) -> RepositoryResult<(usize, Vec<Payment>)>;
}

pub trait PaymentWriter {
    fn create_payment(&self, new_payment: &NewPayment) -> RepositoryResult<Payment>;
    /// Adds `refund_cents` to the refunded amount and updates the status.
    fn record_refund(
        &self,
        payment_id: i32,
        hub_id: i32,
        refund_cents: i32,
    ) -> RepositoryResult<Payment>;
}

pub trait ProductCategoryReader {
    fn get_product_category_by_id(
        &self,
        id: i32,
        hub_id: i32,
    ) -> RepositoryResult<Option<ProductCategory>>;
    fn list_product_categories(&self, hub_id: i32) -> RepositoryResult<Vec<ProductCategory>>;
}

pub trait ProductCategoryWriter {
    fn create_product_category(
        &self,
        new_category: &NewProductCategory,
    ) -> RepositoryResult<ProductCategory>;
    fn update_product_category(
        &self,
        category_id: i32,
        hub_id: i32,
        updates: &UpdateProductCategory,
    ) -> RepositoryResult<ProductCategory>;
    fn delete_product_category(&self, category_id: i32, hub_id: i32) -> RepositoryResult<()>;
}

pub trait ProductReader {
    fn get_product_by_id(&self, id: i32, hub_id: i32) -> RepositoryResult<Option<Product>>;
    fn list_products(&self, query: ProductListQuery) -> RepositoryResult<(usize, Vec<Product>)>;
}

pub trait ProductWriter {
    fn create_product(&self, new_product: &NewProduct) -> RepositoryResult<Product>;
    /// Inserts all products in one transaction and returns the inserted count.
    fn create_products(&self, new_products: &[NewProduct]) -> RepositoryResult<usize>;
    fn update_product(
        &self,
        product_id: i32,
        hub_id: i32,
        updates: &UpdateProduct,
    ) -> RepositoryResult<Product>;
    fn delete_product(&self, product_id: i32, hub_id: i32) -> RepositoryResult<()>;
    fn set_product_image(
        &self,
        product_id: i32,
        hub_id: i32,
        image_url: &str,
    ) -> RepositoryResult<Product>;
}

pub trait OrderReader {
    fn get_order_by_id(&self, id: i32, hub_id: i32) -> RepositoryResult<Option<Order>>;
    fn list_orders(&self, query: OrderListQuery) -> RepositoryResult<(usize, Vec<Order>)>;
}

pub trait OrderWriter {
    fn create_order(&self, new_order: &NewOrder) -> RepositoryResult<Order>;
    fn update_order_status(
        &self,
        order_id: i32,
        hub_id: i32,
        status: OrderStatus,
    ) -> RepositoryResult<Order>;
}

pub trait ReviewReader {
    fn get_review_by_id(&self, id: i32, hub_id: i32) -> RepositoryResult<Option<Review>>;
    fn get_review_by_booking(&self, booking_id: i32, hub_id: i32)
    -> RepositoryResult<Option<Review>>;
    fn list_reviews(&self, query: ReviewListQuery) -> RepositoryResult<(usize, Vec<Review>)>;
}

pub trait ReviewWriter {
    fn create_review(&self, new_review: &NewReview) -> RepositoryResult<Review>;
    fn delete_review(&self, review_id: i32, hub_id: i32) -> RepositoryResult<()>;
}

pub trait BannerReader {
    fn get_banner_by_id(&self, id: i32, hub_id: i32) -> RepositoryResult<Option<Banner>>;
    /// Banners ordered by position.
    fn list_banners(&self, hub_id: i32) -> RepositoryResult<Vec<Banner>>;
}

pub trait BannerWriter {
    fn create_banner(&self, new_banner: &NewBanner) -> RepositoryResult<Banner>;
    fn update_banner(
        &self,
        banner_id: i32,
        hub_id: i32,
        updates: &UpdateBanner,
    ) -> RepositoryResult<Banner>;
    fn delete_banner(&self, banner_id: i32, hub_id: i32) -> RepositoryResult<()>;
}

pub trait OfferReader {
    fn get_offer_by_id(&self, id: i32, hub_id: i32) -> RepositoryResult<Option<Offer>>;
    fn list_offers(&self, hub_id: i32) -> RepositoryResult<Vec<Offer>>;
}

pub trait OfferWriter {
    fn create_offer(&self, new_offer: &NewOffer) -> RepositoryResult<Offer>;
    fn update_offer(
        &self,
        offer_id: i32,
        hub_id: i32,
        updates: &UpdateOffer,
    ) -> RepositoryResult<Offer>;
    fn delete_offer(&self, offer_id: i32, hub_id: i32) -> RepositoryResult<()>;
}

#[cfg(test)]
mod tests {
    use super::page_bounds;

    #[test]
    fn page_bounds_start_at_the_first_page() {
        assert_eq!(page_bounds(0, 20), (0, 20));
        assert_eq!(page_bounds(1, 20), (0, 20));
        assert_eq!(page_bounds(3, 20), (40, 20));
    }

    #[test]
    fn page_bounds_saturate_on_huge_pages() {
        assert_eq!(page_bounds(usize::MAX, 20), (i64::MAX, 20));
        assert_eq!(page_bounds(usize::MAX / 10, 20).0, i64::MAX);
    }
}

use mockall::mock;

use super::{
    AdminReader, AdminWriter, BannerReader, BannerWriter, BookingReader, BookingWriter,
    BranchReader, BranchWriter, FranchiseReader, FranchiseWriter, OfferReader, OfferWriter,
    OrderReader, OrderWriter, PaymentReader, PaymentWriter, ProductCategoryReader,
    ProductCategoryWriter, ProductReader, ProductWriter, ReviewReader, ReviewWriter,
    WashServiceReader, WashServiceWriter, WasherReader, WasherWriter,
};
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
use pushkind_common::repository::errors::RepositoryResult;

// Services take one repository bounded by several traits, so a single mock
// implements all of them.
mock! {
    pub Repository {}

    impl FranchiseReader for Repository {
        fn get_franchise_by_id(&self, id: i32, hub_id: i32) -> RepositoryResult<Option<Franchise>>;
        fn list_franchises(&self, query: FranchiseListQuery) -> RepositoryResult<(usize, Vec<Franchise>)>;
    }

    impl FranchiseWriter for Repository {
        fn create_franchise(&self, new_franchise: &NewFranchise) -> RepositoryResult<Franchise>;
        fn update_franchise(&self, franchise_id: i32, hub_id: i32, updates: &UpdateFranchise) -> RepositoryResult<Franchise>;
        fn delete_franchise(&self, franchise_id: i32, hub_id: i32) -> RepositoryResult<()>;
    }

    impl BranchReader for Repository {
        fn get_branch_by_id(&self, id: i32, hub_id: i32) -> RepositoryResult<Option<Branch>>;
        fn list_branches(&self, query: BranchListQuery) -> RepositoryResult<(usize, Vec<Branch>)>;
        fn list_branch_ids(&self, hub_id: i32, franchise_id: i32) -> RepositoryResult<Vec<i32>>;
    }

    impl BranchWriter for Repository {
        fn create_branch(&self, new_branch: &NewBranch) -> RepositoryResult<Branch>;
        fn update_branch(&self, branch_id: i32, hub_id: i32, updates: &UpdateBranch) -> RepositoryResult<Branch>;
        fn delete_branch(&self, branch_id: i32, hub_id: i32) -> RepositoryResult<()>;
        fn set_branch_image(&self, branch_id: i32, hub_id: i32, image_url: &str) -> RepositoryResult<Branch>;
        fn set_branch_rating(&self, branch_id: i32, hub_id: i32, rating: f64) -> RepositoryResult<()>;
    }

    impl AdminReader for Repository {
        fn get_admin_by_id(&self, id: i32, hub_id: i32) -> RepositoryResult<Option<Admin>>;
        fn get_admin_by_email(&self, email: &str, hub_id: i32) -> RepositoryResult<Option<Admin>>;
        fn list_admins(&self, query: AdminListQuery) -> RepositoryResult<(usize, Vec<Admin>)>;
    }

    impl AdminWriter for Repository {
        fn create_admin(&self, new_admin: &NewAdmin) -> RepositoryResult<Admin>;
        fn replace_branch_assignments(&self, admin_id: i32, hub_id: i32, branch_ids: &[i32]) -> RepositoryResult<Admin>;
        fn delete_admin(&self, admin_id: i32, hub_id: i32) -> RepositoryResult<()>;
    }

    impl WashServiceReader for Repository {
        fn get_service_by_id(&self, id: i32, hub_id: i32) -> RepositoryResult<Option<WashService>>;
        fn list_services(&self, query: WashServiceListQuery) -> RepositoryResult<Vec<WashService>>;
    }

    impl WashServiceWriter for Repository {
        fn create_service(&self, new_service: &NewWashService) -> RepositoryResult<WashService>;
        fn update_service(&self, service_id: i32, hub_id: i32, updates: &UpdateWashService) -> RepositoryResult<WashService>;
        fn delete_service(&self, service_id: i32, hub_id: i32) -> RepositoryResult<()>;
    }

    impl WasherReader for Repository {
        fn get_washer_by_id(&self, id: i32, hub_id: i32) -> RepositoryResult<Option<Washer>>;
        fn list_washers(&self, query: WasherListQuery) -> RepositoryResult<(usize, Vec<Washer>)>;
        fn get_washer_schedule(&self, washer_id: i32, hub_id: i32) -> RepositoryResult<Vec<ScheduleSlot>>;
    }

    impl WasherWriter for Repository {
        fn create_washer(&self, new_washer: &NewWasher) -> RepositoryResult<Washer>;
        fn update_washer(&self, washer_id: i32, hub_id: i32, updates: &UpdateWasher) -> RepositoryResult<Washer>;
        fn delete_washer(&self, washer_id: i32, hub_id: i32) -> RepositoryResult<()>;
        fn replace_washer_schedule(&self, washer_id: i32, hub_id: i32, slots: &[ScheduleSlot]) -> RepositoryResult<Vec<ScheduleSlot>>;
    }

    impl BookingReader for Repository {
        fn get_booking_by_id(&self, id: i32, hub_id: i32) -> RepositoryResult<Option<Booking>>;
        fn list_bookings(&self, query: BookingListQuery) -> RepositoryResult<(usize, Vec<Booking>)>;
    }

    impl BookingWriter for Repository {
        fn create_booking(&self, new_booking: &NewBooking) -> RepositoryResult<Booking>;
        fn update_booking(&self, booking_id: i32, hub_id: i32, updates: &UpdateBooking) -> RepositoryResult<Booking>;
        fn delete_booking(&self, booking_id: i32, hub_id: i32) -> RepositoryResult<()>;
    }

    impl PaymentReader for Repository {
        fn get_payment_by_id(&self, id: i32, hub_id: i32) -> RepositoryResult<Option<Payment>>;
        fn get_payment_by_gateway_reference(&self, reference: &str, hub_id: i32) -> RepositoryResult<Option<Payment>>;
        fn list_payments(&self, query: PaymentListQuery) -> RepositoryResult<(usize, Vec<Payment>)>;
    }

    impl PaymentWriter for Repository {
        fn create_payment(&self, new_payment: &NewPayment) -> RepositoryResult<Payment>;
        fn record_refund(&self, payment_id: i32, hub_id: i32, refund_cents: i32) -> RepositoryResult<Payment>;
    }

    impl ProductCategoryReader for Repository {
        fn get_product_category_by_id(&self, id: i32, hub_id: i32) -> RepositoryResult<Option<ProductCategory>>;
        fn list_product_categories(&self, hub_id: i32) -> RepositoryResult<Vec<ProductCategory>>;
    }

    impl ProductCategoryWriter for Repository {
        fn create_product_category(&self, new_category: &NewProductCategory) -> RepositoryResult<ProductCategory>;
        fn update_product_category(&self, category_id: i32, hub_id: i32, updates: &UpdateProductCategory) -> RepositoryResult<ProductCategory>;
        fn delete_product_category(&self, category_id: i32, hub_id: i32) -> RepositoryResult<()>;
    }

    impl ProductReader for Repository {
        fn get_product_by_id(&self, id: i32, hub_id: i32) -> RepositoryResult<Option<Product>>;
        fn list_products(&self, query: ProductListQuery) -> RepositoryResult<(usize, Vec<Product>)>;
    }

    impl ProductWriter for Repository {
        fn create_product(&self, new_product: &NewProduct) -> RepositoryResult<Product>;
        fn create_products(&self, new_products: &[NewProduct]) -> RepositoryResult<usize>;
        fn update_product(&self, product_id: i32, hub_id: i32, updates: &UpdateProduct) -> RepositoryResult<Product>;
        fn delete_product(&self, product_id: i32, hub_id: i32) -> RepositoryResult<()>;
        fn set_product_image(&self, product_id: i32, hub_id: i32, image_url: &str) -> RepositoryResult<Product>;
    }

    impl OrderReader for Repository {
        fn get_order_by_id(&self, id: i32, hub_id: i32) -> RepositoryResult<Option<Order>>;
        fn list_orders(&self, query: OrderListQuery) -> RepositoryResult<(usize, Vec<Order>)>;
    }

    impl OrderWriter for Repository {
        fn create_order(&self, new_order: &NewOrder) -> RepositoryResult<Order>;
        fn update_order_status(&self, order_id: i32, hub_id: i32, status: OrderStatus) -> RepositoryResult<Order>;
    }

    impl ReviewReader for Repository {
        fn get_review_by_id(&self, id: i32, hub_id: i32) -> RepositoryResult<Option<Review>>;
        fn get_review_by_booking(&self, booking_id: i32, hub_id: i32) -> RepositoryResult<Option<Review>>;
        fn list_reviews(&self, query: ReviewListQuery) -> RepositoryResult<(usize, Vec<Review>)>;
    }

    impl ReviewWriter for Repository {
        fn create_review(&self, new_review: &NewReview) -> RepositoryResult<Review>;
        fn delete_review(&self, review_id: i32, hub_id: i32) -> RepositoryResult<()>;
    }

    impl BannerReader for Repository {
        fn get_banner_by_id(&self, id: i32, hub_id: i32) -> RepositoryResult<Option<Banner>>;
        fn list_banners(&self, hub_id: i32) -> RepositoryResult<Vec<Banner>>;
    }

    impl BannerWriter for Repository {
        fn create_banner(&self, new_banner: &NewBanner) -> RepositoryResult<Banner>;
        fn update_banner(&self, banner_id: i32, hub_id: i32, updates: &UpdateBanner) -> RepositoryResult<Banner>;
        fn delete_banner(&self, banner_id: i32, hub_id: i32) -> RepositoryResult<()>;
    }

    impl OfferReader for Repository {
        fn get_offer_by_id(&self, id: i32, hub_id: i32) -> RepositoryResult<Option<Offer>>;
        fn list_offers(&self, hub_id: i32) -> RepositoryResult<Vec<Offer>>;
    }

    impl OfferWriter for Repository {
        fn create_offer(&self, new_offer: &NewOffer) -> RepositoryResult<Offer>;
        fn update_offer(&self, offer_id: i32, hub_id: i32, updates: &UpdateOffer) -> RepositoryResult<Offer>;
        fn delete_offer(&self, offer_id: i32, hub_id: i32) -> RepositoryResult<()>;
    }
}

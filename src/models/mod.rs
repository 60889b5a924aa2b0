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

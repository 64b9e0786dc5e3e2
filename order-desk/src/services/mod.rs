//! Service layer
//!
//! # Services
//!
//! - [`OrderService`] - order list batch, status updates, detail, stats
//! - [`MenuService`] - categories, foods, sides and their links
//! - [`ImageService`] - image uploads to the blob store
//! - [`AuthService`] - sign-in

pub mod auth_service;
pub mod image_service;
pub mod menu_service;
pub mod order_service;

pub use auth_service::AuthService;
pub use image_service::{ImageService, UploadedImage};
pub use menu_service::{MenuService, SideGroup, foods_in_category, group_sides_by_type};
pub use order_service::{
    DashboardOverview, OrderBatch, OrderDetail, OrderService, PaymentRow, PaymentsSummary,
};

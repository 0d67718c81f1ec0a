//! Textile catalog domain.
//!
//! Holds the product model, the in-memory [`ProductStore`] with change
//! notification, and the pure filter/sort view used by catalog pages. Nothing
//! here persists: every store starts from its injected (or seeded) products.

pub mod config;
pub mod filter;
pub mod format;
pub mod inquiry;
pub mod product;
pub mod seed;
pub mod stats;
pub mod store;

pub use config::{CatalogConfig, ConfigError};
pub use filter::{CatalogCriteria, Choice, PriceRange, SortBy, admin_search, featured, filter_products};
pub use inquiry::InquiryLinks;
pub use product::{
    Category, Material, Product, ProductFormData, ProductPatch, StockPolicy, StockStatus,
};
pub use stats::InventoryStats;
pub use store::{ProductChange, ProductStore, Snapshot};

pub use loomcraft_core::ProductId;
pub use loomcraft_events::Event;

//! Dashboard figures derived from a product list.

use serde::Serialize;

use crate::product::{Product, StockStatus};

/// Admin dashboard summary.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct InventoryStats {
    pub total_products: usize,
    pub in_stock: usize,
    pub low_stock: usize,
    pub out_of_stock: usize,
    /// Sum of `price_per_meter * quantity` over all products.
    pub total_value: f64,
}

impl InventoryStats {
    pub fn from_products(products: &[Product]) -> Self {
        products.iter().fold(Self::default(), |mut stats, p| {
            stats.total_products += 1;
            match p.status() {
                StockStatus::InStock => stats.in_stock += 1,
                StockStatus::LowStock => stats.low_stock += 1,
                StockStatus::OutOfStock => stats.out_of_stock += 1,
            }
            stats.total_value += p.stock_value();
            stats
        })
    }

    pub fn count(&self, status: StockStatus) -> usize {
        match status {
            StockStatus::InStock => self.in_stock,
            StockStatus::LowStock => self.low_stock,
            StockStatus::OutOfStock => self.out_of_stock,
        }
    }
}

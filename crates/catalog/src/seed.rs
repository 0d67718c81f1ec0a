//! Seed catalog loaded into a fresh store.
//!
//! Ids are fixed so that links and CLI lookups stay valid across restarts,
//! even though admin edits do not.

use chrono::{DateTime, TimeZone, Utc};
use uuid::Uuid;

use loomcraft_core::ProductId;

use crate::product::{Category, Material, Product, ProductFormData, StockPolicy};

fn seed_id(n: u128) -> ProductId {
    ProductId::from_uuid(Uuid::from_u128(0x0190_0000_0000_7000_8000_0000_0000_0000 | n))
}

fn on(year: i32, month: u32, day: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(year, month, day, 9, 0, 0)
        .single()
        .unwrap_or_default()
}

/// The initial product list, newest first.
pub fn initial_products(policy: &StockPolicy) -> Vec<Product> {
    let rows: [(u128, DateTime<Utc>, ProductFormData); 8] = [
        (
            1,
            on(2025, 3, 18),
            ProductFormData::new("Royal Blue Silk", Category::Silk, Material::PremiumGrade, 1850.0, 120.0)
                .with_description("Lustrous mulberry silk with a soft drape, dyed in deep royal blue.")
                .with_gsm(60)
                .with_width("44 inches")
                .with_image_url("/images/royal-blue-silk.jpg"),
        ),
        (
            2,
            on(2025, 3, 11),
            ProductFormData::new("Egyptian Cotton", Category::Cotton, Material::Natural, 450.0, 340.0)
                .with_description("Long-staple Egyptian cotton, breathable and durable for shirting.")
                .with_gsm(120)
                .with_width("58 inches")
                .with_image_url("/images/egyptian-cotton.jpg"),
        ),
        (
            3,
            on(2025, 3, 2),
            ProductFormData::new("Belgian Linen", Category::Linen, Material::Organic, 780.0, 15.0)
                .with_description("Stonewashed Belgian flax linen with a relaxed, textured hand.")
                .with_gsm(185)
                .with_width("55 inches")
                .with_image_url("/images/belgian-linen.jpg"),
        ),
        (
            4,
            on(2025, 2, 21),
            ProductFormData::new("Crimson Velvet", Category::Velvet, Material::Blended, 1450.0, 0.0)
                .with_description("Plush crushed velvet in rich crimson for evening wear and upholstery.")
                .with_gsm(320)
                .with_width("54 inches")
                .with_image_url("/images/crimson-velvet.jpg"),
        ),
        (
            5,
            on(2025, 2, 9),
            ProductFormData::new("Ivory Chiffon", Category::Chiffon, Material::Blended, 380.0, 210.0)
                .with_description("Sheer, lightweight chiffon with a graceful flow for bridal layers.")
                .with_gsm(45)
                .with_width("44 inches")
                .with_image_url("/images/ivory-chiffon.jpg"),
        ),
        (
            6,
            on(2025, 1, 27),
            ProductFormData::new("Merino Wool Suiting", Category::Wool, Material::Natural, 2400.0, 8.0)
                .with_description("Fine merino suiting wool, warm yet breathable, for tailored jackets.")
                .with_gsm(280)
                .with_width("60 inches")
                .with_image_url("/images/merino-wool.jpg"),
        ),
        (
            7,
            on(2025, 1, 14),
            ProductFormData::new("Champagne Satin", Category::Satin, Material::PremiumGrade, 650.0, 95.0)
                .with_description("High-sheen duchess satin in champagne with a crisp body.")
                .with_gsm(150)
                .with_width("58 inches")
                .with_image_url("/images/champagne-satin.jpg"),
        ),
        (
            8,
            on(2024, 12, 30),
            ProductFormData::new("Recycled Indigo Denim", Category::Denim, Material::Recycled, 520.0, 180.0)
                .with_description("Rigid 12 oz denim woven from recycled cotton fibres, indigo dyed.")
                .with_gsm(400)
                .with_width("62 inches")
                .with_image_url("/images/indigo-denim.jpg"),
        ),
    ];

    rows.into_iter()
        .map(|(n, created_at, form)| Product::new(seed_id(n), form, created_at, policy))
        .collect()
}

//! Pre-filled inquiry links for a product (WhatsApp and e-mail).
//!
//! Links are plain URI constructions; nothing is sent or received.

use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use serde::Serialize;

use crate::config::CatalogConfig;
use crate::product::Product;

/// Characters left as-is by JavaScript's `encodeURIComponent`.
const URI_COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

fn encode(text: &str) -> String {
    utf8_percent_encode(text, URI_COMPONENT).to_string()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InquiryLinks {
    pub whatsapp: String,
    pub email: String,
}

impl InquiryLinks {
    pub fn for_product(product: &Product, config: &CatalogConfig) -> Self {
        Self {
            whatsapp: whatsapp_link(product, config),
            email: email_link(product, config),
        }
    }
}

/// `https://wa.me/<number>?text=<message>`
pub fn whatsapp_link(product: &Product, config: &CatalogConfig) -> String {
    let message = format!(
        "Hi, I'm interested in \"{}\" ({}{}/meter). Could you share more details?",
        product.name(),
        config.currency_label,
        product.price_per_meter(),
    );
    format!("https://wa.me/{}?text={}", config.whatsapp_number, encode(&message))
}

/// `mailto:<address>?subject=<subject>&body=<body>`
pub fn email_link(product: &Product, config: &CatalogConfig) -> String {
    let subject = format!("Inquiry: {}", product.name());
    let body = format!(
        "Hello,\n\nI'm interested in \"{}\" priced at {}{}/meter.\n\nPlease share availability and bulk pricing details.\n\nThank you.",
        product.name(),
        config.currency_label,
        product.price_per_meter(),
    );
    format!(
        "mailto:{}?subject={}&body={}",
        config.contact_email,
        encode(&subject),
        encode(&body)
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::product::{Category, Material, ProductFormData, StockPolicy};
    use chrono::Utc;
    use loomcraft_core::ProductId;

    fn product(name: &str, price: f64) -> Product {
        let form = ProductFormData::new(name, Category::Silk, Material::Natural, price, 10.0);
        Product::new(ProductId::new(), form, Utc::now(), &StockPolicy::default())
    }

    #[test]
    fn encodes_like_encode_uri_component() {
        assert_eq!(encode("a b&c=d/é"), "a%20b%26c%3Dd%2F%C3%A9");
        assert_eq!(encode("it's (fine)!~*"), "it's%20(fine)!~*");
    }

    #[test]
    fn whatsapp_link_embeds_name_and_price() {
        let link = whatsapp_link(&product("Red Silk", 1200.0), &CatalogConfig::default());
        assert_eq!(
            link,
            "https://wa.me/15552345678?text=Hi%2C%20I'm%20interested%20in%20%22Red%20Silk%22%20(Rs.1200%2Fmeter).%20Could%20you%20share%20more%20details%3F"
        );
    }

    #[test]
    fn email_link_has_subject_and_body() {
        let config = CatalogConfig::default();
        let link = email_link(&product("Red Silk", 1200.5), &config);

        assert!(link.starts_with("mailto:hello@loomcraft.com?subject=Inquiry%3A%20Red%20Silk&body="));
        assert!(link.contains("Hello%2C%0A%0AI'm%20interested%20in%20%22Red%20Silk%22%20priced%20at%20Rs.1200.5%2Fmeter."));
        assert!(!link.contains(' '));
    }

    #[test]
    fn links_follow_configured_contacts() {
        let config = CatalogConfig {
            whatsapp_number: "919800000000".to_string(),
            contact_email: "sales@example.com".to_string(),
            ..CatalogConfig::default()
        };
        let links = InquiryLinks::for_product(&product("Linen", 780.0), &config);
        assert!(links.whatsapp.starts_with("https://wa.me/919800000000?text="));
        assert!(links.email.starts_with("mailto:sales@example.com?"));
    }
}

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use loomcraft_core::{DomainError, Entity, ProductId};

/// Fabric category offered in the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    Silk,
    Cotton,
    Linen,
    Velvet,
    Chiffon,
    Wool,
    Satin,
    Denim,
    Synthetic,
}

impl Category {
    pub const ALL: [Category; 9] = [
        Category::Silk,
        Category::Cotton,
        Category::Linen,
        Category::Velvet,
        Category::Chiffon,
        Category::Wool,
        Category::Satin,
        Category::Denim,
        Category::Synthetic,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Category::Silk => "Silk",
            Category::Cotton => "Cotton",
            Category::Linen => "Linen",
            Category::Velvet => "Velvet",
            Category::Chiffon => "Chiffon",
            Category::Wool => "Wool",
            Category::Satin => "Satin",
            Category::Denim => "Denim",
            Category::Synthetic => "Synthetic",
        }
    }
}

/// Material grade of a fabric.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Material {
    #[serde(rename = "100% Natural")]
    Natural,
    Blended,
    Organic,
    Recycled,
    #[serde(rename = "Premium Grade")]
    PremiumGrade,
}

impl Material {
    pub const ALL: [Material; 5] = [
        Material::Natural,
        Material::Blended,
        Material::Organic,
        Material::Recycled,
        Material::PremiumGrade,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Material::Natural => "100% Natural",
            Material::Blended => "Blended",
            Material::Organic => "Organic",
            Material::Recycled => "Recycled",
            Material::PremiumGrade => "Premium Grade",
        }
    }
}

/// Stock level derived from quantity. Never stored independently of it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StockStatus {
    InStock,
    LowStock,
    OutOfStock,
}

impl StockStatus {
    pub const ALL: [StockStatus; 3] = [
        StockStatus::InStock,
        StockStatus::LowStock,
        StockStatus::OutOfStock,
    ];

    /// Wire label (`in_stock`, `low_stock`, `out_of_stock`).
    pub fn label(self) -> &'static str {
        match self {
            StockStatus::InStock => "in_stock",
            StockStatus::LowStock => "low_stock",
            StockStatus::OutOfStock => "out_of_stock",
        }
    }

    /// Human-facing badge text.
    pub fn display_name(self) -> &'static str {
        match self {
            StockStatus::InStock => "In Stock",
            StockStatus::LowStock => "Low Stock",
            StockStatus::OutOfStock => "Out of Stock",
        }
    }
}

macro_rules! impl_label_parsing {
    ($t:ty, $kind:literal) => {
        impl core::fmt::Display for $t {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                f.write_str(self.label())
            }
        }

        impl core::str::FromStr for $t {
            type Err = DomainError;

            /// Accepts the label in any letter case.
            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let wanted = s.trim();
                <$t>::ALL
                    .into_iter()
                    .find(|v| v.label().eq_ignore_ascii_case(wanted))
                    .ok_or_else(|| DomainError::unknown_variant($kind, s))
            }
        }
    };
}

impl_label_parsing!(Category, "category");
impl_label_parsing!(Material, "material");
impl_label_parsing!(StockStatus, "stock status");

/// Quantity thresholds that decide [`StockStatus`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StockPolicy {
    /// Quantities above zero but below this are "low stock".
    pub low_stock_below: f64,
}

impl StockPolicy {
    pub const DEFAULT_LOW_STOCK_BELOW: f64 = 20.0;

    pub fn new(low_stock_below: f64) -> Self {
        Self { low_stock_below }
    }

    /// The only place stock status is computed.
    ///
    /// A NaN quantity counts as out of stock.
    pub fn status_for(&self, quantity: f64) -> StockStatus {
        if quantity.is_nan() || quantity <= 0.0 {
            StockStatus::OutOfStock
        } else if quantity < self.low_stock_below {
            StockStatus::LowStock
        } else {
            StockStatus::InStock
        }
    }
}

impl Default for StockPolicy {
    fn default() -> Self {
        Self::new(Self::DEFAULT_LOW_STOCK_BELOW)
    }
}

fn default_unit() -> String {
    "meters".to_string()
}

/// Admin form input: every product field a caller may set.
///
/// No range checks are applied; negative prices and quantities are stored
/// as given.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductFormData {
    pub name: String,
    pub description: String,
    pub category: Category,
    pub material: Material,
    pub price_per_meter: f64,
    pub quantity: f64,
    #[serde(default = "default_unit")]
    pub unit: String,
    #[serde(default)]
    pub gsm: Option<u32>,
    #[serde(default)]
    pub width: Option<String>,
    #[serde(default)]
    pub image_url: String,
}

impl ProductFormData {
    /// Form with the admin defaults (`meters`, no GSM/width, no image).
    pub fn new(
        name: impl Into<String>,
        category: Category,
        material: Material,
        price_per_meter: f64,
        quantity: f64,
    ) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
            category,
            material,
            price_per_meter,
            quantity,
            unit: default_unit(),
            gsm: None,
            width: None,
            image_url: String::new(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_gsm(mut self, gsm: u32) -> Self {
        self.gsm = Some(gsm);
        self
    }

    pub fn with_width(mut self, width: impl Into<String>) -> Self {
        self.width = Some(width.into());
        self
    }

    pub fn with_image_url(mut self, image_url: impl Into<String>) -> Self {
        self.image_url = image_url.into();
        self
    }
}

/// Reads a present field (even `null`) as `Some`, so an explicit `null`
/// becomes `Some(None)` while an absent field stays `None`.
fn present<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// Partial update: `None` leaves the field untouched.
///
/// The optional attributes (`gsm`, `width`) take `Some(None)` to clear them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProductPatch {
    pub name: Option<String>,
    pub description: Option<String>,
    pub category: Option<Category>,
    pub material: Option<Material>,
    pub price_per_meter: Option<f64>,
    pub quantity: Option<f64>,
    pub unit: Option<String>,
    #[serde(deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub gsm: Option<Option<u32>>,
    #[serde(deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub width: Option<Option<String>>,
    pub image_url: Option<String>,
}

impl ProductPatch {
    pub fn quantity(quantity: f64) -> Self {
        Self {
            quantity: Some(quantity),
            ..Self::default()
        }
    }

    pub fn price_per_meter(price: f64) -> Self {
        Self {
            price_per_meter: Some(price),
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

impl From<ProductFormData> for ProductPatch {
    /// A full edit-form submission overwrites every field.
    fn from(form: ProductFormData) -> Self {
        Self {
            name: Some(form.name),
            description: Some(form.description),
            category: Some(form.category),
            material: Some(form.material),
            price_per_meter: Some(form.price_per_meter),
            quantity: Some(form.quantity),
            unit: Some(form.unit),
            gsm: Some(form.gsm),
            width: Some(form.width),
            image_url: Some(form.image_url),
        }
    }
}

/// A catalog entry: one fabric offering.
///
/// Fields are read-only from outside the crate; `status` always reflects
/// `quantity` under the policy the product was last stamped with.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Product {
    id: ProductId,
    name: String,
    description: String,
    category: Category,
    material: Material,
    price_per_meter: f64,
    quantity: f64,
    status: StockStatus,
    unit: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    gsm: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    width: Option<String>,
    image_url: String,
    created_at: DateTime<Utc>,
}

impl Product {
    pub fn new(
        id: ProductId,
        form: ProductFormData,
        created_at: DateTime<Utc>,
        policy: &StockPolicy,
    ) -> Self {
        let ProductFormData {
            name,
            description,
            category,
            material,
            price_per_meter,
            quantity,
            unit,
            gsm,
            width,
            image_url,
        } = form;

        Self {
            id,
            name,
            description,
            category,
            material,
            price_per_meter,
            quantity,
            status: policy.status_for(quantity),
            unit,
            gsm,
            width,
            image_url,
            created_at,
        }
    }

    pub fn id_typed(&self) -> ProductId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn category(&self) -> Category {
        self.category
    }

    pub fn material(&self) -> Material {
        self.material
    }

    pub fn price_per_meter(&self) -> f64 {
        self.price_per_meter
    }

    pub fn quantity(&self) -> f64 {
        self.quantity
    }

    pub fn status(&self) -> StockStatus {
        self.status
    }

    pub fn unit(&self) -> &str {
        &self.unit
    }

    pub fn gsm(&self) -> Option<u32> {
        self.gsm
    }

    pub fn width(&self) -> Option<&str> {
        self.width.as_deref()
    }

    pub fn image_url(&self) -> &str {
        &self.image_url
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Stock value at the listed price.
    pub fn stock_value(&self) -> f64 {
        self.price_per_meter * self.quantity
    }

    /// Form pre-filled with this product's editable fields.
    pub fn to_form(&self) -> ProductFormData {
        ProductFormData {
            name: self.name.clone(),
            description: self.description.clone(),
            category: self.category,
            material: self.material,
            price_per_meter: self.price_per_meter,
            quantity: self.quantity,
            unit: self.unit.clone(),
            gsm: self.gsm,
            width: self.width.clone(),
            image_url: self.image_url.clone(),
        }
    }

    /// Copy with `patch` merged in. Status is re-derived only when the patch
    /// carries a quantity.
    pub fn merged(&self, patch: &ProductPatch, policy: &StockPolicy) -> Self {
        let mut next = self.clone();
        if let Some(name) = &patch.name {
            next.name = name.clone();
        }
        if let Some(description) = &patch.description {
            next.description = description.clone();
        }
        if let Some(category) = patch.category {
            next.category = category;
        }
        if let Some(material) = patch.material {
            next.material = material;
        }
        if let Some(price) = patch.price_per_meter {
            next.price_per_meter = price;
        }
        if let Some(unit) = &patch.unit {
            next.unit = unit.clone();
        }
        if let Some(gsm) = patch.gsm {
            next.gsm = gsm;
        }
        if let Some(width) = &patch.width {
            next.width = width.clone();
        }
        if let Some(image_url) = &patch.image_url {
            next.image_url = image_url.clone();
        }
        if let Some(quantity) = patch.quantity {
            next.quantity = quantity;
            next.status = policy.status_for(quantity);
        }
        next
    }

    /// Re-derive status under `policy` (used when loading initial products).
    pub(crate) fn restamped(mut self, policy: &StockPolicy) -> Self {
        self.status = policy.status_for(self.quantity);
        self
    }
}

impl Entity for Product {
    type Id = ProductId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn policy() -> StockPolicy {
        StockPolicy::default()
    }

    fn silk(quantity: f64) -> Product {
        let form = ProductFormData::new("Royal Blue Silk", Category::Silk, Material::Natural, 1850.0, quantity)
            .with_gsm(60)
            .with_width("44 inches");
        Product::new(ProductId::new(), form, Utc::now(), &policy())
    }

    #[test]
    fn status_thresholds() {
        let p = policy();
        assert_eq!(p.status_for(50.0), StockStatus::InStock);
        assert_eq!(p.status_for(20.0), StockStatus::InStock);
        assert_eq!(p.status_for(19.5), StockStatus::LowStock);
        assert_eq!(p.status_for(3.0), StockStatus::LowStock);
        assert_eq!(p.status_for(0.0), StockStatus::OutOfStock);
        assert_eq!(p.status_for(-4.0), StockStatus::OutOfStock);
        assert_eq!(p.status_for(f64::NAN), StockStatus::OutOfStock);
    }

    #[test]
    fn new_product_derives_status_from_quantity() {
        assert_eq!(silk(50.0).status(), StockStatus::InStock);
        assert_eq!(silk(3.0).status(), StockStatus::LowStock);
        assert_eq!(silk(0.0).status(), StockStatus::OutOfStock);
    }

    #[test]
    fn merge_without_quantity_keeps_status() {
        let product = silk(3.0);
        let patch = ProductPatch {
            name: Some("Midnight Silk".to_string()),
            ..ProductPatch::default()
        };

        let merged = product.merged(&patch, &policy());
        assert_eq!(merged.name(), "Midnight Silk");
        assert_eq!(merged.status(), StockStatus::LowStock);
        assert_eq!(merged.id_typed(), product.id_typed());
        assert_eq!(merged.created_at(), product.created_at());
    }

    #[test]
    fn merge_with_quantity_rederives_status() {
        let product = silk(50.0);
        let merged = product.merged(&ProductPatch::quantity(0.0), &policy());
        assert_eq!(merged.quantity(), 0.0);
        assert_eq!(merged.status(), StockStatus::OutOfStock);
        assert_eq!(product.status(), StockStatus::InStock);
    }

    #[test]
    fn form_patch_overwrites_every_field() {
        let product = silk(50.0);
        let form = ProductFormData::new("Plain Cotton", Category::Cotton, Material::Organic, 320.0, 5.0)
            .with_description("Everyday weave");
        let merged = product.merged(&ProductPatch::from(form), &policy());

        assert_eq!(merged.name(), "Plain Cotton");
        assert_eq!(merged.category(), Category::Cotton);
        assert_eq!(merged.material(), Material::Organic);
        assert_eq!(merged.price_per_meter(), 320.0);
        assert_eq!(merged.status(), StockStatus::LowStock);
        // The form carries no GSM or width, so the submission clears them.
        assert_eq!(merged.gsm(), None);
        assert_eq!(merged.width(), None);
    }

    #[test]
    fn patch_distinguishes_absent_from_null_attributes() {
        let product = silk(50.0);

        let keep: ProductPatch = serde_json::from_str(r#"{"name": "Midnight Silk"}"#).unwrap();
        let kept = product.merged(&keep, &policy());
        assert_eq!(kept.gsm(), Some(60));
        assert_eq!(kept.width(), Some("44 inches"));

        let clear: ProductPatch = serde_json::from_str(r#"{"gsm": null, "width": "52 inches"}"#).unwrap();
        assert_eq!(clear.gsm, Some(None));
        let cleared = product.merged(&clear, &policy());
        assert_eq!(cleared.gsm(), None);
        assert_eq!(cleared.width(), Some("52 inches"));
    }

    #[test]
    fn to_form_round_trips_editable_fields() {
        let product = silk(12.0);
        let rebuilt = Product::new(product.id_typed(), product.to_form(), product.created_at(), &policy());
        assert_eq!(rebuilt, product);
    }

    #[test]
    fn labels_parse_case_insensitively() {
        assert_eq!("silk".parse::<Category>().unwrap(), Category::Silk);
        assert_eq!("premium grade".parse::<Material>().unwrap(), Material::PremiumGrade);
        assert_eq!("100% Natural".parse::<Material>().unwrap(), Material::Natural);
        assert_eq!("LOW_STOCK".parse::<StockStatus>().unwrap(), StockStatus::LowStock);
        assert!(matches!(
            "Hemp".parse::<Category>(),
            Err(DomainError::UnknownVariant { kind: "category", .. })
        ));
    }

    #[test]
    fn serializes_with_site_field_names() {
        let json = serde_json::to_value(silk(0.0)).unwrap();
        assert_eq!(json["category"], "Silk");
        assert_eq!(json["material"], "100% Natural");
        assert_eq!(json["status"], "out_of_stock");
        assert_eq!(json["price_per_meter"], 1850.0);
        assert_eq!(json["gsm"], 60);
    }

    #[test]
    fn form_deserializes_with_defaults() {
        let form: ProductFormData = serde_json::from_str(
            r#"{"name":"Red Silk","description":"","category":"Silk","material":"Blended","price_per_meter":1200,"quantity":10}"#,
        )
        .unwrap();
        assert_eq!(form.unit, "meters");
        assert_eq!(form.gsm, None);
        assert_eq!(form.material, Material::Blended);
    }
}

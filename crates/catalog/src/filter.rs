//! Catalog view: filtering and sorting of a product list.
//!
//! Everything here is a pure function of its inputs. Products are borrowed,
//! never modified, and the same inputs always produce the same sequence.

use core::cmp::Ordering;
use core::fmt;
use core::str::FromStr;

use serde::{Deserialize, Serialize};
use unicode_normalization::UnicodeNormalization;
use unicode_normalization::char::is_combining_mark;

use loomcraft_core::DomainError;

use crate::product::{Category, Material, Product, StockStatus};

/// Sentinel-aware selection: either no constraint (`all`) or one value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Choice<T> {
    All,
    Only(T),
}

impl<T> Default for Choice<T> {
    fn default() -> Self {
        Choice::All
    }
}

impl<T: PartialEq> Choice<T> {
    pub fn matches(&self, value: &T) -> bool {
        match self {
            Choice::All => true,
            Choice::Only(wanted) => wanted == value,
        }
    }

    pub fn is_all(&self) -> bool {
        matches!(self, Choice::All)
    }
}

impl<T> From<Option<T>> for Choice<T> {
    fn from(value: Option<T>) -> Self {
        value.map_or(Choice::All, Choice::Only)
    }
}

impl<T: fmt::Display> fmt::Display for Choice<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Choice::All => f.write_str("all"),
            Choice::Only(v) => v.fmt(f),
        }
    }
}

impl<T> FromStr for Choice<T>
where
    T: FromStr<Err = DomainError>,
{
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case("all") {
            Ok(Choice::All)
        } else {
            s.parse().map(Choice::Only)
        }
    }
}

/// Inclusive price bounds; a missing bound is unbounded on that side.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PriceRange {
    pub min: Option<f64>,
    pub max: Option<f64>,
}

impl PriceRange {
    pub const SLIDER_MIN: f64 = 0.0;
    pub const SLIDER_MAX: f64 = 5000.0;

    pub fn between(min: f64, max: f64) -> Self {
        Self {
            min: Some(min),
            max: Some(max),
        }
    }

    pub fn contains(&self, price: f64) -> bool {
        self.min.is_none_or(|min| price >= min) && self.max.is_none_or(|max| price <= max)
    }

    /// Whether the range is narrower than the catalog's price slider
    /// (`SLIDER_MIN..=SLIDER_MAX`).
    pub fn narrows_slider(&self) -> bool {
        self.min.is_some_and(|min| min > Self::SLIDER_MIN)
            || self.max.is_some_and(|max| max < Self::SLIDER_MAX)
    }
}

/// Display order of the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SortBy {
    #[default]
    #[serde(rename = "newest")]
    Newest,
    #[serde(rename = "price-asc")]
    PriceAsc,
    #[serde(rename = "price-desc")]
    PriceDesc,
    #[serde(rename = "name")]
    Name,
}

impl SortBy {
    pub const ALL: [SortBy; 4] = [SortBy::Newest, SortBy::PriceAsc, SortBy::PriceDesc, SortBy::Name];

    pub fn label(self) -> &'static str {
        match self {
            SortBy::Newest => "newest",
            SortBy::PriceAsc => "price-asc",
            SortBy::PriceDesc => "price-desc",
            SortBy::Name => "name",
        }
    }

    fn compare(self, a: &Product, b: &Product) -> Ordering {
        match self {
            SortBy::Newest => b.created_at().cmp(&a.created_at()),
            SortBy::PriceAsc => a.price_per_meter().total_cmp(&b.price_per_meter()),
            SortBy::PriceDesc => b.price_per_meter().total_cmp(&a.price_per_meter()),
            SortBy::Name => compare_names(a.name(), b.name()),
        }
    }
}

impl fmt::Display for SortBy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for SortBy {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        SortBy::ALL
            .into_iter()
            .find(|v| v.label().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| DomainError::unknown_variant("sort key", s))
    }
}

/// Collation-style name order: base letters first (accents and case
/// ignored), then accents, then case with lowercase first.
fn compare_names(a: &str, b: &str) -> Ordering {
    base_letters(a)
        .cmp(base_letters(b))
        .then_with(|| folded(a).cmp(folded(b)))
        .then_with(|| b.cmp(a))
}

fn base_letters(s: &str) -> impl Iterator<Item = char> + '_ {
    s.nfd().filter(|c| !is_combining_mark(*c)).flat_map(char::to_lowercase)
}

fn folded(s: &str) -> impl Iterator<Item = char> + '_ {
    s.nfd().flat_map(char::to_lowercase)
}

/// User-selected filter and sort options.
///
/// `Default` is the "clear all filters" state.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CatalogCriteria {
    pub search: String,
    pub category: Choice<Category>,
    pub status: Choice<StockStatus>,
    pub material: Choice<Material>,
    pub price_range: PriceRange,
    pub sort_by: SortBy,
}

impl CatalogCriteria {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn search(mut self, text: impl Into<String>) -> Self {
        self.search = text.into();
        self
    }

    pub fn category(mut self, category: Category) -> Self {
        self.category = Choice::Only(category);
        self
    }

    pub fn status(mut self, status: StockStatus) -> Self {
        self.status = Choice::Only(status);
        self
    }

    pub fn material(mut self, material: Material) -> Self {
        self.material = Choice::Only(material);
        self
    }

    pub fn price_range(mut self, range: PriceRange) -> Self {
        self.price_range = range;
        self
    }

    pub fn sort_by(mut self, sort_by: SortBy) -> Self {
        self.sort_by = sort_by;
        self
    }

    /// Whether `product` passes every active filter.
    pub fn matches(&self, product: &Product) -> bool {
        matches_search(product, &self.search)
            && self.category.matches(&product.category())
            && self.status.matches(&product.status())
            && self.material.matches(&product.material())
            && self.price_range.contains(product.price_per_meter())
    }

    /// Number of active side-panel filters (category, material, price).
    ///
    /// The price range only counts once it narrows the slider.
    pub fn active_filter_count(&self) -> usize {
        usize::from(!self.category.is_all())
            + usize::from(!self.material.is_all())
            + usize::from(self.price_range.narrows_slider())
    }
}

fn matches_search(product: &Product, text: &str) -> bool {
    if text.is_empty() {
        return true;
    }
    let needle = text.to_lowercase();
    product.name().to_lowercase().contains(&needle)
        || product.description().to_lowercase().contains(&needle)
        || product.category().label().to_lowercase().contains(&needle)
}

/// Products passing `criteria`, ordered by `criteria.sort_by`.
///
/// The sort is stable: products that compare equal keep their input order.
pub fn filter_products(products: &[Product], criteria: &CatalogCriteria) -> Vec<Product> {
    let mut view: Vec<Product> = products
        .iter()
        .filter(|p| criteria.matches(p))
        .cloned()
        .collect();
    view.sort_by(|a, b| criteria.sort_by.compare(a, b));
    view
}

/// Admin table quick search: name or category, case-insensitive.
pub fn admin_search(products: &[Product], text: &str) -> Vec<Product> {
    let needle = text.to_lowercase();
    products
        .iter()
        .filter(|p| {
            p.name().to_lowercase().contains(&needle)
                || p.category().label().to_lowercase().contains(&needle)
        })
        .cloned()
        .collect()
}

/// The first `limit` products that can still be ordered.
pub fn featured(products: &[Product], limit: usize) -> Vec<Product> {
    products
        .iter()
        .filter(|p| p.status() != StockStatus::OutOfStock)
        .take(limit)
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::product::{ProductFormData, StockPolicy};
    use chrono::{Duration, TimeZone, Utc};
    use loomcraft_core::ProductId;

    fn product(name: &str, category: Category, price: f64, quantity: f64, age_days: i64) -> Product {
        let created = Utc.with_ymd_and_hms(2025, 6, 1, 0, 0, 0).unwrap() - Duration::days(age_days);
        let form = ProductFormData::new(name, category, Material::Natural, price, quantity)
            .with_description(format!("{name} from certified mills"));
        Product::new(ProductId::new(), form, created, &StockPolicy::default())
    }

    fn sample() -> Vec<Product> {
        vec![
            product("Royal Blue Silk", Category::Silk, 1850.0, 120.0, 1),
            product("Egyptian Cotton", Category::Cotton, 450.0, 8.0, 3),
            product("belgian Linen", Category::Linen, 780.0, 0.0, 2),
            product("Crimson Velvet", Category::Velvet, 1450.0, 60.0, 5),
        ]
    }

    fn names(view: &[Product]) -> Vec<&str> {
        view.iter().map(Product::name).collect()
    }

    #[test]
    fn search_matches_name_only_where_present() {
        let view = filter_products(&sample(), &CatalogCriteria::new().search("silk"));
        assert_eq!(names(&view), vec!["Royal Blue Silk"]);
    }

    #[test]
    fn search_is_case_insensitive_and_covers_description_and_category() {
        let products = sample();
        let by_description = filter_products(&products, &CatalogCriteria::new().search("CERTIFIED"));
        assert_eq!(by_description.len(), products.len());

        let by_category = filter_products(&products, &CatalogCriteria::new().search("velv"));
        assert_eq!(names(&by_category), vec!["Crimson Velvet"]);
    }

    #[test]
    fn empty_criteria_keeps_everything_newest_first() {
        let view = filter_products(&sample(), &CatalogCriteria::default());
        assert_eq!(
            names(&view),
            vec!["Royal Blue Silk", "belgian Linen", "Egyptian Cotton", "Crimson Velvet"]
        );
    }

    #[test]
    fn filters_combine_with_and() {
        let criteria = CatalogCriteria::new()
            .status(StockStatus::InStock)
            .price_range(PriceRange::between(1000.0, 1500.0));
        let view = filter_products(&sample(), &criteria);
        assert_eq!(names(&view), vec!["Crimson Velvet"]);

        let none = filter_products(&sample(), &criteria.clone().category(Category::Silk));
        assert!(none.is_empty());
    }

    #[test]
    fn price_bounds_are_inclusive() {
        let range = PriceRange::between(450.0, 780.0);
        assert!(range.contains(450.0));
        assert!(range.contains(780.0));
        assert!(!range.contains(780.5));
        assert!(PriceRange::default().contains(-1.0));
    }

    #[test]
    fn sort_orders() {
        let products = sample();
        let asc = filter_products(&products, &CatalogCriteria::new().sort_by(SortBy::PriceAsc));
        assert_eq!(asc[0].name(), "Egyptian Cotton");
        let desc = filter_products(&products, &CatalogCriteria::new().sort_by(SortBy::PriceDesc));
        assert_eq!(desc[0].name(), "Royal Blue Silk");
        let by_name = filter_products(&products, &CatalogCriteria::new().sort_by(SortBy::Name));
        assert_eq!(
            names(&by_name),
            vec!["belgian Linen", "Crimson Velvet", "Egyptian Cotton", "Royal Blue Silk"]
        );
    }

    #[test]
    fn name_sort_places_accented_initials_with_their_base_letter() {
        let products = vec![
            product("Zari Brocade", Category::Synthetic, 900.0, 30.0, 1),
            product("Éponge Cotton", Category::Cotton, 300.0, 30.0, 2),
            product("Chiffon", Category::Chiffon, 400.0, 30.0, 3),
            product("Eponge Cotton", Category::Cotton, 300.0, 30.0, 4),
            product("chiffon", Category::Chiffon, 400.0, 30.0, 5),
        ];

        let by_name = filter_products(&products, &CatalogCriteria::new().sort_by(SortBy::Name));
        assert_eq!(
            names(&by_name),
            vec!["chiffon", "Chiffon", "Eponge Cotton", "Éponge Cotton", "Zari Brocade"]
        );
    }

    #[test]
    fn equal_prices_keep_input_order() {
        let products = vec![
            product("First", Category::Satin, 500.0, 30.0, 1),
            product("Second", Category::Satin, 500.0, 30.0, 2),
            product("Third", Category::Satin, 100.0, 30.0, 3),
        ];
        let view = filter_products(&products, &CatalogCriteria::new().sort_by(SortBy::PriceDesc));
        assert_eq!(names(&view), vec!["First", "Second", "Third"]);
    }

    #[test]
    fn input_is_left_untouched() {
        let products = sample();
        let before = products.clone();
        let _ = filter_products(&products, &CatalogCriteria::new().sort_by(SortBy::Name));
        assert_eq!(products, before);
    }

    #[test]
    fn active_filter_count_ignores_search_status_and_sort() {
        let mut criteria = CatalogCriteria::new()
            .search("silk")
            .status(StockStatus::LowStock)
            .sort_by(SortBy::Name);
        assert_eq!(criteria.active_filter_count(), 0);

        criteria = criteria
            .category(Category::Silk)
            .material(Material::Organic)
            .price_range(PriceRange { min: None, max: Some(4000.0) });
        assert_eq!(criteria.active_filter_count(), 3);
    }

    #[test]
    fn full_slider_range_is_not_an_active_filter() {
        let full = CatalogCriteria::new().price_range(PriceRange::between(0.0, 5000.0));
        assert_eq!(full.active_filter_count(), 0);

        let floor_raised = CatalogCriteria::new().price_range(PriceRange::between(500.0, 5000.0));
        assert_eq!(floor_raised.active_filter_count(), 1);
    }

    #[test]
    fn choice_and_sort_parse_site_option_values() {
        assert_eq!("all".parse::<Choice<Category>>().unwrap(), Choice::All);
        assert_eq!("Silk".parse::<Choice<Category>>().unwrap(), Choice::Only(Category::Silk));
        assert_eq!(
            "out_of_stock".parse::<Choice<StockStatus>>().unwrap(),
            Choice::Only(StockStatus::OutOfStock)
        );
        assert_eq!("price-desc".parse::<SortBy>().unwrap(), SortBy::PriceDesc);
        assert!("cheapest".parse::<SortBy>().is_err());
        assert_eq!(Choice::Only(Material::PremiumGrade).to_string(), "Premium Grade");
        assert_eq!(Choice::<Material>::All.to_string(), "all");
    }

    #[test]
    fn admin_search_matches_name_or_category() {
        let products = sample();
        assert_eq!(names(&admin_search(&products, "cotton")), vec!["Egyptian Cotton"]);
        assert_eq!(names(&admin_search(&products, "LINEN")), vec!["belgian Linen"]);
        assert!(admin_search(&products, "certified").is_empty());
        assert_eq!(admin_search(&products, "").len(), products.len());
    }

    #[test]
    fn featured_skips_out_of_stock() {
        let view = featured(&sample(), 2);
        assert_eq!(names(&view), vec!["Royal Blue Silk", "Egyptian Cotton"]);
        assert_eq!(featured(&sample(), 10).len(), 3);
    }

    mod proptest_tests {
        use super::*;
        use proptest::prelude::*;

        fn arb_category() -> impl Strategy<Value = Category> {
            proptest::sample::select(Category::ALL.to_vec())
        }

        fn arb_products() -> impl Strategy<Value = Vec<Product>> {
            proptest::collection::vec(
                ("[A-Za-z ]{1,16}", arb_category(), 0u32..5000, 0u32..200, 0i64..365),
                0..24,
            )
            .prop_map(|rows| {
                rows.into_iter()
                    .map(|(name, cat, price, qty, age)| product(&name, cat, f64::from(price), f64::from(qty), age))
                    .collect()
            })
        }

        fn arb_sort() -> impl Strategy<Value = SortBy> {
            proptest::sample::select(SortBy::ALL.to_vec())
        }

        proptest! {
            #![proptest_config(ProptestConfig {
                cases: 256,
                ..ProptestConfig::default()
            })]

            /// Property: applying the same criteria twice changes nothing.
            #[test]
            fn filtering_is_idempotent(products in arb_products(), search in "[a-z]{0,3}", sort in arb_sort()) {
                let criteria = CatalogCriteria::new().search(search).sort_by(sort);
                let once = filter_products(&products, &criteria);
                let twice = filter_products(&once, &criteria);
                prop_assert_eq!(once, twice);
            }

            /// Property: adding a constraint never grows the result.
            #[test]
            fn narrowing_is_monotonic(products in arb_products(), cat in arb_category(), max in 0u32..5000) {
                let broad = CatalogCriteria::new();
                let narrow = broad.clone().category(cat);
                let narrower = narrow.clone().price_range(PriceRange { min: None, max: Some(f64::from(max)) });

                let a = filter_products(&products, &broad);
                let b = filter_products(&products, &narrow);
                let c = filter_products(&products, &narrower);
                prop_assert!(b.len() <= a.len());
                prop_assert!(c.len() <= b.len());
                prop_assert!(c.iter().all(|p| b.contains(p)));
            }

            /// Property: price-asc output is non-decreasing.
            #[test]
            fn price_asc_is_sorted(products in arb_products()) {
                let view = filter_products(&products, &CatalogCriteria::new().sort_by(SortBy::PriceAsc));
                prop_assert!(view.windows(2).all(|w| w[0].price_per_meter() <= w[1].price_per_meter()));
            }

            /// Property: same inputs, same output.
            #[test]
            fn view_is_deterministic(products in arb_products(), sort in arb_sort()) {
                let criteria = CatalogCriteria::new().sort_by(sort);
                prop_assert_eq!(filter_products(&products, &criteria), filter_products(&products, &criteria));
            }
        }
    }
}

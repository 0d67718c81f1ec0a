use std::fs;
use std::path::Path;

use anyhow::{Context, bail};
use serde::Deserialize;
use serde_json::{Value, json};

use loomcraft_catalog::{
    CatalogConfig, CatalogCriteria, Event, InquiryLinks, InventoryStats, PriceRange, ProductFormData, ProductId,
    ProductPatch, ProductStore, featured, filter_products, format::format_price,
};

use crate::args::{Command, ListArgs};

/// One admin operation in an `apply` script.
#[derive(Debug, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
enum ScriptOp {
    Add { product: ProductFormData },
    Update { id: ProductId, patch: ProductPatch },
    Delete { id: ProductId },
}

pub fn run(command: Command, config: &CatalogConfig) -> anyhow::Result<Value> {
    let store = ProductStore::seeded(config);

    match command {
        Command::List(args) => list(&store, args),
        Command::Show { id } => show(&store, id, config),
        Command::Stats => Ok(json!(InventoryStats::from_products(&store.list()))),
        Command::Featured { limit } => Ok(json!(featured(&store.list(), limit))),
        Command::Apply { script } => apply(&store, &script),
    }
}

fn list(store: &ProductStore, args: ListArgs) -> anyhow::Result<Value> {
    let criteria = CatalogCriteria {
        search: args.search,
        category: args.category,
        status: args.status,
        material: args.material,
        price_range: PriceRange {
            min: args.min_price,
            max: args.max_price,
        },
        sort_by: args.sort,
    };

    let products = filter_products(&store.list(), &criteria);
    tracing::info!(
        matched = products.len(),
        active_filters = criteria.active_filter_count(),
        "catalog filtered"
    );

    Ok(json!({
        "count": products.len(),
        "products": products,
    }))
}

fn show(store: &ProductStore, id: ProductId, config: &CatalogConfig) -> anyhow::Result<Value> {
    let Some(product) = store.get(id) else {
        bail!("no product with id {id}");
    };

    Ok(json!({
        "product": product,
        "price_label": format_price(&config.currency_label, product.price_per_meter()),
        "status_label": product.status().display_name(),
        "inquiry": InquiryLinks::for_product(&product, config),
    }))
}

fn apply(store: &ProductStore, script: &Path) -> anyhow::Result<Value> {
    let raw = fs::read_to_string(script)
        .with_context(|| format!("failed to read script {}", script.display()))?;
    let ops: Vec<ScriptOp> = serde_json::from_str(&raw)
        .with_context(|| format!("failed to parse script {}", script.display()))?;

    let changes = store.watch();
    let mut ignored = Vec::new();

    for op in ops {
        match op {
            ScriptOp::Add { product } => {
                store.add(product);
            }
            ScriptOp::Update { id, patch } => {
                if store.update(id, patch).is_none() {
                    ignored.push(id);
                }
            }
            ScriptOp::Delete { id } => {
                if store.delete(id).is_none() {
                    ignored.push(id);
                }
            }
        }
    }

    let applied: Vec<Value> = changes
        .drain()
        .iter()
        .map(|change| {
            json!({
                "event": change.event_type(),
                "id": change.product_id(),
            })
        })
        .collect();

    Ok(json!({
        "applied": applied,
        "ignored": ignored,
        "products": &*store.list(),
    }))
}

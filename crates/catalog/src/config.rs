//! Catalog configuration (defaults + environment overrides).

use thiserror::Error;

use crate::product::StockPolicy;

pub const ENV_LOW_STOCK_THRESHOLD: &str = "LOOMCRAFT_LOW_STOCK_THRESHOLD";
pub const ENV_WHATSAPP_NUMBER: &str = "LOOMCRAFT_WHATSAPP_NUMBER";
pub const ENV_CONTACT_EMAIL: &str = "LOOMCRAFT_CONTACT_EMAIL";
pub const ENV_CURRENCY_LABEL: &str = "LOOMCRAFT_CURRENCY_LABEL";

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{key} must be a non-negative number, got {value:?}")]
    InvalidThreshold { key: &'static str, value: String },

    #[error("{key} must not be empty")]
    Empty { key: &'static str },
}

#[derive(Debug, Clone, PartialEq)]
pub struct CatalogConfig {
    pub stock: StockPolicy,
    /// Digits only, international format, as used in `wa.me` links.
    pub whatsapp_number: String,
    pub contact_email: String,
    /// Prefix for displayed prices.
    pub currency_label: String,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            stock: StockPolicy::default(),
            whatsapp_number: "15552345678".to_string(),
            contact_email: "hello@loomcraft.com".to_string(),
            currency_label: "Rs.".to_string(),
        }
    }
}

impl CatalogConfig {
    /// Defaults overridden by `LOOMCRAFT_*` process environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Defaults overridden by whatever `lookup` returns for each key.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(raw) = lookup(ENV_LOW_STOCK_THRESHOLD) {
            let threshold = raw
                .trim()
                .parse::<f64>()
                .ok()
                .filter(|v| v.is_finite() && *v >= 0.0)
                .ok_or(ConfigError::InvalidThreshold {
                    key: ENV_LOW_STOCK_THRESHOLD,
                    value: raw.clone(),
                })?;
            config.stock = StockPolicy::new(threshold);
        }
        if let Some(number) = lookup(ENV_WHATSAPP_NUMBER) {
            config.whatsapp_number = non_empty(ENV_WHATSAPP_NUMBER, number)?;
        }
        if let Some(email) = lookup(ENV_CONTACT_EMAIL) {
            config.contact_email = non_empty(ENV_CONTACT_EMAIL, email)?;
        }
        if let Some(label) = lookup(ENV_CURRENCY_LABEL) {
            config.currency_label = label;
        }

        tracing::debug!(
            low_stock_below = config.stock.low_stock_below,
            "catalog configuration loaded"
        );
        Ok(config)
    }
}

fn non_empty(key: &'static str, value: String) -> Result<String, ConfigError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ConfigError::Empty { key });
    }
    Ok(trimmed.to_string())
}

//! Storefront configuration.
//!
//! Passed explicitly into every component. Can be read from the environment
//! (`PACKCART_*` variables) or deserialized from the JSON settings blob a
//! theme embeds in the page.

use std::time::Duration;

use serde::{Deserialize, Deserializer};

pub const DEFAULT_STORE_URL: &str = "http://127.0.0.1:9292";
pub const DEFAULT_MOQ_DEBOUNCE: Duration = Duration::from_millis(200);
pub const DEFAULT_ERROR_FLASH: Duration = Duration::from_millis(500);

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StorefrontConfig {
    /// Pricing feed endpoint.
    #[serde(alias = "customPricingUrl")]
    pub pricing_url: Option<String>,
    /// Storefront origin serving `/cart/add.js` and `/cart/update.js`.
    pub store_url: String,
    /// Path sent as `sections_url` with cart requests.
    pub sections_url: String,
    /// Suppress the inline cart error message.
    pub hide_errors: bool,
    #[serde(rename = "moqDebounceMs", deserialize_with = "millis")]
    pub moq_debounce: Duration,
    #[serde(rename = "errorFlashMs", deserialize_with = "millis")]
    pub error_flash: Duration,
}

impl Default for StorefrontConfig {
    fn default() -> Self {
        Self {
            pricing_url: None,
            store_url: DEFAULT_STORE_URL.to_string(),
            sections_url: "/".to_string(),
            hide_errors: false,
            moq_debounce: DEFAULT_MOQ_DEBOUNCE,
            error_flash: DEFAULT_ERROR_FLASH,
        }
    }
}

impl StorefrontConfig {
    /// Read `PACKCART_*` environment variables over the defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Like [`StorefrontConfig::from_env`] with an arbitrary variable source.
    /// Unparsable values are logged and ignored.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        config.pricing_url = lookup("PACKCART_PRICING_URL").filter(|url| !url.trim().is_empty());
        if config.pricing_url.is_none() {
            tracing::warn!("PACKCART_PRICING_URL not set; pricing catalog fetches will fail");
        }
        if let Some(url) = lookup("PACKCART_STORE_URL") {
            config.store_url = url;
        }
        if let Some(path) = lookup("PACKCART_SECTIONS_URL") {
            config.sections_url = path;
        }
        if let Some(raw) = lookup("PACKCART_HIDE_ERRORS") {
            match raw.trim().parse::<bool>() {
                Ok(hide) => config.hide_errors = hide,
                Err(_) => tracing::warn!(value = %raw, "ignoring invalid PACKCART_HIDE_ERRORS"),
            }
        }
        if let Some(delay) = duration_var(&lookup, "PACKCART_MOQ_DEBOUNCE_MS") {
            config.moq_debounce = delay;
        }
        if let Some(delay) = duration_var(&lookup, "PACKCART_ERROR_FLASH_MS") {
            config.error_flash = delay;
        }

        config
    }

    /// `store_url` joined with an absolute path.
    pub fn store_endpoint(&self, path: &str) -> String {
        format!("{}{}", self.store_url.trim_end_matches('/'), path)
    }
}

fn duration_var(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Option<Duration> {
    let raw = lookup(key)?;
    match raw.trim().parse::<u64>() {
        Ok(ms) => Some(Duration::from_millis(ms)),
        Err(_) => {
            tracing::warn!(key, value = %raw, "ignoring invalid duration");
            None
        }
    }
}

fn millis<'de, D>(deserializer: D) -> Result<Duration, D::Error>
where
    D: Deserializer<'de>,
{
    u64::deserialize(deserializer).map(Duration::from_millis)
}

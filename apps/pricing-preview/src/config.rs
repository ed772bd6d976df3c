//! Preview configuration module.
//!
//! Configuration is loaded from `RESELLO_*` environment variables with
//! fallback to the `PricingConfig` defaults.
//!
//! | Variable                       | Default                          |
//! |--------------------------------|----------------------------------|
//! | `RESELLO_CURRENCY`             | `USD`                            |
//! | `RESELLO_DEFAULT_MARKUP`       | `20`                             |
//! | `RESELLO_PRORATION_CONVENTION` | `fixed` (`fixed` or `actual`)    |
//! | `RESELLO_PRORATION_DAYS`       | `30` (only for `fixed`)          |
//! | `RESELLO_POPULAR_KEYS`         | `.com,.net,.org,.io,.co,...`     |

use std::env;
use std::str::FromStr;

use resello_core::bulk::PopularList;
use resello_core::proration::ProrationConvention;
use resello_core::{PricingConfig, PRORATION_DAYS_PER_MONTH};
use rust_decimal::Decimal;

/// Loads configuration from the process environment.
pub fn load() -> Result<PricingConfig, ConfigError> {
    load_from(|key| env::var(key).ok())
}

/// Loads configuration through `lookup`, which returns the raw value of a
/// variable if it is set.
pub fn load_from<F>(lookup: F) -> Result<PricingConfig, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let defaults = PricingConfig::default();
    let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

    let currency = match get("RESELLO_CURRENCY") {
        Some(code) if is_currency_code(&code) => code.to_ascii_uppercase(),
        Some(_) => return Err(ConfigError::InvalidValue("RESELLO_CURRENCY".to_string())),
        None => defaults.currency,
    };

    let default_markup_percent = match get("RESELLO_DEFAULT_MARKUP") {
        Some(raw) => {
            let value: Decimal = parse("RESELLO_DEFAULT_MARKUP", &raw)?;
            if value < Decimal::ZERO {
                return Err(ConfigError::InvalidValue("RESELLO_DEFAULT_MARKUP".to_string()));
            }
            value
        }
        None => defaults.default_markup_percent,
    };

    let days = match get("RESELLO_PRORATION_DAYS") {
        Some(raw) => {
            let days: u32 = parse("RESELLO_PRORATION_DAYS", &raw)?;
            if days == 0 {
                return Err(ConfigError::InvalidValue("RESELLO_PRORATION_DAYS".to_string()));
            }
            days
        }
        None => PRORATION_DAYS_PER_MONTH,
    };

    let proration = match get("RESELLO_PRORATION_CONVENTION").as_deref() {
        None | Some("fixed") => ProrationConvention::FixedMonth { days },
        Some("actual") => ProrationConvention::ActualPeriod,
        Some(_) => {
            return Err(ConfigError::InvalidValue(
                "RESELLO_PRORATION_CONVENTION".to_string(),
            ))
        }
    };

    let popular = match get("RESELLO_POPULAR_KEYS") {
        Some(raw) => PopularList::new(
            raw.split(',')
                .map(str::trim)
                .filter(|key| !key.is_empty()),
        ),
        None => defaults.popular,
    };

    Ok(PricingConfig {
        currency,
        default_markup_percent,
        proration,
        popular,
    })
}

fn parse<T: FromStr>(key: &str, raw: &str) -> Result<T, ConfigError> {
    raw.parse()
        .map_err(|_| ConfigError::InvalidValue(key.to_string()))
}

fn is_currency_code(code: &str) -> bool {
    code.len() == 3 && code.chars().all(|c| c.is_ascii_alphabetic())
}

/// Configuration error types.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {0}")]
    InvalidValue(String),
}

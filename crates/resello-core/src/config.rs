//! # Pricing Configuration
//!
//! Settings that shape the calculators but are not part of any single request.
//!
//! ## Where values come from
//! The core never reads the environment. Host applications build a
//! `PricingConfig` (the preview app loads it from `RESELLO_*` variables) and
//! pass it in explicitly.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::bulk::PopularList;
use crate::proration::ProrationConvention;
use crate::{DEFAULT_CURRENCY, DEFAULT_MARKUP_PERCENT};

/// Calculator settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PricingConfig {
    /// ISO 4217 code stamped on every computed record.
    pub currency: String,

    /// Markup applied to calculated items that carry no stored percentage.
    pub default_markup_percent: Decimal,

    /// Divisor used to turn a period price into a daily rate.
    pub proration: ProrationConvention,

    /// Ranked keys used by the "popular" filter and sort.
    pub popular: PopularList,
}

impl Default for PricingConfig {
    /// ## Default Values
    /// - Currency: USD
    /// - Default markup: 20%
    /// - Proration: fixed 30-day month
    /// - Popular: .com .net .org .io .co .app .dev .ai
    fn default() -> Self {
        PricingConfig {
            currency: DEFAULT_CURRENCY.to_string(),
            default_markup_percent: DEFAULT_MARKUP_PERCENT,
            proration: ProrationConvention::default(),
            popular: PopularList::default(),
        }
    }
}

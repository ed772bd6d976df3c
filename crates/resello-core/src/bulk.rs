//! # Bulk Pricing Planner
//!
//! Applies one markup policy to a whole catalog (typically every TLD) and
//! produces the replacement price set the backend writes in one batch.
//!
//! ## Bulk Markup Workflow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  [PricedItem; n] + MarkupPolicy                                         │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  plan_markup() ── pure, items untouched ──► PricingPlan                │
//! │         │                                    entries (parallel, n)      │
//! │         │                                    count = n                  │
//! │         ▼                                                               │
//! │  "Apply 20% markup to 412 TLDs?"  ──confirm──► plan.updates()          │
//! │                                                     │                   │
//! │                                                     ▼                   │
//! │                                       backend writes ALL or NOTHING     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Filtering and sorting ([`view`]) are display helpers over a plan; they do
//! not change what gets priced.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use tracing::{debug, info};
use ts_rs::TS;

use crate::config::PricingConfig;
use crate::markup::{resolve_price, MarkupPolicy, PriceClass, PriceSource, PricedItem};
use crate::math::percent_change_exact;
use crate::money::Money;

// =============================================================================
// Plan
// =============================================================================

/// One row of a bulk pricing plan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct PlannedPrice {
    pub key: String,
    pub wholesale_price: Money,

    /// `None` when the item has no wholesale price to mark up.
    pub selling_price: Option<Money>,

    #[ts(as = "Option<String>")]
    pub markup_percent: Option<Decimal>,

    pub classification: PriceClass,
}

/// Result of applying a policy across a catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct PricingPlan {
    pub policy: MarkupPolicy,

    /// Same order and length as the input items.
    pub entries: Vec<PlannedPrice>,

    /// Number of input items (shown in the confirmation prompt).
    pub count: usize,

    /// Entries that received a selling price.
    pub priced_count: usize,

    pub currency: String,
}

/// A single write in the replacement batch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct PriceUpdate {
    pub key: String,

    /// Authoritative price to store.
    pub selling_price: Money,

    /// Source to store alongside the price. Custom items keep their custom
    /// price; calculated items record the unrounded markup ratio they were
    /// priced at, so resolving the stored source gives back `selling_price`.
    pub source: PriceSource,
}

/// Prices every item under `policy`.
///
/// Custom-priced items keep their custom price. Items without a wholesale
/// price stay in the plan with no selling price. The plan carries the
/// configured currency.
///
/// ## Example
/// ```rust
/// use resello_core::bulk::plan_markup;
/// use resello_core::markup::{MarkupPolicy, PricedItem};
/// use resello_core::{Money, PricingConfig};
/// use rust_decimal::Decimal;
///
/// let items = vec![
///     PricedItem::calculated(".com", Money::from_cents(1000), None),
///     PricedItem::custom(".io", Money::from_cents(500), Money::from_cents(750)),
/// ];
/// let policy = MarkupPolicy::percentage(Decimal::from(20)).unwrap();
///
/// let plan = plan_markup(&items, &policy, &PricingConfig::default());
/// assert_eq!(plan.count, 2);
/// assert_eq!(plan.entries[0].selling_price, Some(Money::from_cents(1200)));
/// assert_eq!(plan.entries[1].selling_price, Some(Money::from_cents(750)));
/// ```
pub fn plan_markup(items: &[PricedItem], policy: &MarkupPolicy, config: &PricingConfig) -> PricingPlan {
    let entries: Vec<PlannedPrice> = items
        .iter()
        .map(|item| match resolve_price(item, Some(policy), config.default_markup_percent) {
            Some(resolved) => PlannedPrice {
                key: resolved.key,
                wholesale_price: resolved.wholesale_price,
                selling_price: Some(resolved.selling_price),
                markup_percent: resolved.markup_percent,
                classification: resolved.classification,
            },
            None => PlannedPrice {
                key: item.key.clone(),
                wholesale_price: item.wholesale_price,
                selling_price: None,
                markup_percent: None,
                classification: item.classification(),
            },
        })
        .collect();

    let priced_count = entries.iter().filter(|e| e.selling_price.is_some()).count();

    info!(
        count = items.len(),
        priced_count,
        kind = ?policy.kind,
        value = %policy.value,
        "Planned bulk markup"
    );

    PricingPlan {
        policy: *policy,
        count: items.len(),
        priced_count,
        entries,
        currency: config.currency.clone(),
    }
}

impl PricingPlan {
    /// The full replacement batch. Unpriced entries are left out; see
    /// [`PricingPlan::unpriced_keys`].
    pub fn updates(&self) -> Vec<PriceUpdate> {
        self.entries
            .iter()
            .filter_map(|entry| {
                let selling_price = entry.selling_price?;
                let source = match entry.classification {
                    PriceClass::Custom => PriceSource::Custom {
                        price: selling_price,
                    },
                    PriceClass::Calculated => PriceSource::Calculated {
                        markup_percentage: percent_change_exact(entry.wholesale_price, selling_price),
                    },
                };
                Some(PriceUpdate {
                    key: entry.key.clone(),
                    selling_price,
                    source,
                })
            })
            .collect()
    }

    /// Keys that could not be priced (no wholesale price).
    pub fn unpriced_keys(&self) -> Vec<&str> {
        self.entries
            .iter()
            .filter(|entry| entry.selling_price.is_none())
            .map(|entry| entry.key.as_str())
            .collect()
    }
}

// =============================================================================
// Popular List
// =============================================================================

/// Ranked membership list for the "popular" filter (rank 0 is most popular).
///
/// Keys compare case-insensitively and with or without a leading dot, so
/// `"COM"`, `"com"` and `".com"` are the same TLD.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PopularList(Vec<String>);

impl PopularList {
    pub fn new<I, S>(keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        PopularList(keys.into_iter().map(Into::into).collect())
    }

    /// Position of `key` in the list.
    pub fn rank(&self, key: &str) -> Option<usize> {
        let key = normalize_key(key);
        self.0.iter().position(|k| normalize_key(k) == key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.rank(key).is_some()
    }

    pub fn keys(&self) -> &[String] {
        &self.0
    }
}

impl Default for PopularList {
    fn default() -> Self {
        PopularList::new([".com", ".net", ".org", ".io", ".co", ".app", ".dev", ".ai"])
    }
}

fn normalize_key(key: &str) -> String {
    key.trim().trim_start_matches('.').to_ascii_lowercase()
}

// =============================================================================
// View (filter + sort)
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum PriceFilter {
    #[default]
    All,
    Custom,
    Calculated,
    Popular,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum SortKey {
    Key,
    Wholesale,
    Selling,
    Markup,
    /// Popular first (by rank), then the rest alphabetically. Ignores direction.
    Popularity,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

/// Table display options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(default)]
pub struct ViewOptions {
    pub filter: PriceFilter,
    /// `None` keeps plan order. The popular filter always shows popularity
    /// order and ignores this column.
    pub sort: Option<SortKey>,
    pub direction: SortDirection,
}

/// Filters and sorts plan entries for display.
pub fn view<'a>(
    entries: &'a [PlannedPrice],
    options: &ViewOptions,
    popular: &PopularList,
) -> Vec<&'a PlannedPrice> {
    let mut rows: Vec<&PlannedPrice> = entries
        .iter()
        .filter(|entry| match options.filter {
            PriceFilter::All => true,
            PriceFilter::Custom => entry.classification == PriceClass::Custom,
            PriceFilter::Calculated => entry.classification == PriceClass::Calculated,
            PriceFilter::Popular => popular.contains(&entry.key),
        })
        .collect();

    let sort = if options.filter == PriceFilter::Popular {
        Some(SortKey::Popularity)
    } else {
        options.sort
    };

    if let Some(sort) = sort {
        rows.sort_by(|a, b| compare(a, b, sort, options.direction, popular));
    }

    debug!(
        total = entries.len(),
        shown = rows.len(),
        filter = ?options.filter,
        sort = ?sort,
        "Built pricing view"
    );
    rows
}

fn compare(
    a: &PlannedPrice,
    b: &PlannedPrice,
    sort: SortKey,
    direction: SortDirection,
    popular: &PopularList,
) -> Ordering {
    let by_key = || normalize_key(&a.key).cmp(&normalize_key(&b.key));

    let ordering = match sort {
        SortKey::Popularity => {
            return match (popular.rank(&a.key), popular.rank(&b.key)) {
                (Some(ra), Some(rb)) => ra.cmp(&rb),
                (Some(_), None) => Ordering::Less,
                (None, Some(_)) => Ordering::Greater,
                (None, None) => by_key(),
            };
        }
        SortKey::Key => by_key(),
        SortKey::Wholesale => a.wholesale_price.cmp(&b.wholesale_price),
        SortKey::Selling => a.selling_price.cmp(&b.selling_price),
        SortKey::Markup => a.markup_percent.cmp(&b.markup_percent),
    };

    let ordering = match direction {
        SortDirection::Asc => ordering,
        SortDirection::Desc => ordering.reverse(),
    };
    ordering.then_with(by_key)
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn catalog() -> Vec<PricedItem> {
        vec![
            PricedItem::calculated(".net", Money::from_cents(1100), Some(dec!(30))),
            PricedItem::custom(".io", Money::from_cents(500), Money::from_cents(750)),
            PricedItem::calculated(".xyz", Money::from_cents(200), None),
            PricedItem::calculated(".com", Money::from_cents(1000), None),
            PricedItem::calculated(".shop", Money::zero(), None),
            PricedItem::calculated(".blog", Money::from_cents(2500), None),
        ]
    }

    fn percent(value: Decimal) -> MarkupPolicy {
        MarkupPolicy::percentage(value).unwrap()
    }

    fn usd() -> PricingConfig {
        PricingConfig::default()
    }

    fn keys(rows: &[&PlannedPrice]) -> Vec<String> {
        rows.iter().map(|r| r.key.clone()).collect()
    }

    #[test]
    fn test_plan_is_parallel_and_counts_everything() {
        let items = catalog();
        let plan = plan_markup(&items, &percent(dec!(20)), &usd());

        assert_eq!(plan.count, items.len());
        assert_eq!(plan.entries.len(), items.len());
        assert_eq!(plan.priced_count, items.len() - 1);
        for (item, entry) in items.iter().zip(&plan.entries) {
            assert_eq!(item.key, entry.key);
        }
    }

    #[test]
    fn test_plan_does_not_touch_input() {
        let items = catalog();
        let before = items.clone();
        let _ = plan_markup(&items, &percent(dec!(50)), &usd());
        assert_eq!(items, before);
    }

    #[test]
    fn test_custom_item_survives_bulk_run() {
        let plan = plan_markup(&catalog(), &percent(dec!(80)), &usd());
        let io = plan.entries.iter().find(|e| e.key == ".io").unwrap();

        assert_eq!(io.selling_price, Some(Money::from_cents(750)));
        assert_eq!(io.classification, PriceClass::Custom);
    }

    #[test]
    fn test_policy_overrides_stored_markup_for_calculated_items() {
        let plan = plan_markup(&catalog(), &percent(dec!(20)), &usd());
        let net = plan.entries.iter().find(|e| e.key == ".net").unwrap();

        assert_eq!(net.selling_price, Some(Money::from_cents(1320)));
        assert_eq!(net.markup_percent, Some(dec!(20)));
    }

    #[test]
    fn test_updates_form_replacement_batch() {
        let plan = plan_markup(&catalog(), &MarkupPolicy::fixed(dec!(2)).unwrap(), &usd());
        let updates = plan.updates();

        assert_eq!(updates.len(), plan.priced_count);
        assert_eq!(plan.unpriced_keys(), vec![".shop"]);

        let com = updates.iter().find(|u| u.key == ".com").unwrap();
        assert_eq!(com.selling_price.cents(), 1200);
        assert_eq!(
            com.source,
            PriceSource::Calculated {
                markup_percentage: Some(dec!(20))
            }
        );

        let io = updates.iter().find(|u| u.key == ".io").unwrap();
        assert_eq!(
            io.source,
            PriceSource::Custom {
                price: Money::from_cents(750)
            }
        );
    }

    #[test]
    fn test_plan_uses_configured_currency() {
        let config = PricingConfig {
            currency: "EUR".to_string(),
            default_markup_percent: dec!(35),
            ..PricingConfig::default()
        };
        let plan = plan_markup(&catalog(), &percent(dec!(10)), &config);

        assert_eq!(plan.currency, "EUR");
        // the run's policy wins over the configured default
        let blog = plan.entries.iter().find(|e| e.key == ".blog").unwrap();
        assert_eq!(blog.selling_price, Some(Money::from_cents(2750)));
    }

    #[test]
    fn test_stored_markup_reproduces_selling_price() {
        let items = vec![
            PricedItem::calculated(".store", Money::from_cents(200000), None),
            PricedItem::calculated(".net", Money::from_cents(1100), None),
        ];
        let plan = plan_markup(&items, &MarkupPolicy::fixed(dec!(0.05)).unwrap(), &usd());
        let updates = plan.updates();

        let store = &updates[0];
        assert_eq!(store.selling_price.cents(), 200005);
        // the displayed markup rounds to 0.00%, the stored one must not
        assert_eq!(plan.entries[0].markup_percent, Some(dec!(0)));

        for (item, update) in items.iter().zip(&updates) {
            let PriceSource::Calculated { markup_percentage } = update.source else {
                panic!("expected calculated source for {}", update.key);
            };
            let stored = PricedItem::calculated(&update.key, item.wholesale_price, markup_percentage);
            let resolved = resolve_price(&stored, None, crate::DEFAULT_MARKUP_PERCENT).unwrap();
            assert_eq!(resolved.selling_price, update.selling_price);
        }
    }

    #[test]
    fn test_empty_catalog() {
        let plan = plan_markup(&[], &percent(dec!(20)), &usd());
        assert_eq!(plan.count, 0);
        assert!(plan.entries.is_empty());
        assert!(plan.updates().is_empty());
    }

    #[test]
    fn test_popular_list_matching() {
        let popular = PopularList::default();
        assert_eq!(popular.rank(".com"), Some(0));
        assert_eq!(popular.rank("COM"), Some(0));
        assert_eq!(popular.rank("io"), Some(3));
        assert!(!popular.contains(".xyz"));
    }

    #[test]
    fn test_filters() {
        let plan = plan_markup(&catalog(), &percent(dec!(20)), &usd());
        let popular = PopularList::default();

        let custom = view(
            &plan.entries,
            &ViewOptions {
                filter: PriceFilter::Custom,
                ..Default::default()
            },
            &popular,
        );
        assert_eq!(keys(&custom), vec![".io"]);

        let calculated = view(
            &plan.entries,
            &ViewOptions {
                filter: PriceFilter::Calculated,
                ..Default::default()
            },
            &popular,
        );
        assert_eq!(calculated.len(), 5);

        let all = view(&plan.entries, &ViewOptions::default(), &popular);
        assert_eq!(keys(&all), plan.entries.iter().map(|e| e.key.clone()).collect::<Vec<_>>());
    }

    #[test]
    fn test_popular_filter_orders_by_rank() {
        let plan = plan_markup(&catalog(), &percent(dec!(20)), &usd());
        let rows = view(
            &plan.entries,
            &ViewOptions {
                filter: PriceFilter::Popular,
                ..Default::default()
            },
            &PopularList::default(),
        );
        assert_eq!(keys(&rows), vec![".com", ".net", ".io"]);
    }

    #[test]
    fn test_popular_filter_ignores_sort_column() {
        let items = vec![
            PricedItem::calculated(".com", Money::from_cents(1000), None),
            PricedItem::calculated(".io", Money::from_cents(3000), None),
            PricedItem::calculated(".net", Money::from_cents(100), None),
        ];
        let plan = plan_markup(&items, &percent(dec!(20)), &usd());
        let rows = view(
            &plan.entries,
            &ViewOptions {
                filter: PriceFilter::Popular,
                sort: Some(SortKey::Wholesale),
                direction: SortDirection::Asc,
            },
            &PopularList::default(),
        );
        assert_eq!(keys(&rows), vec![".com", ".net", ".io"]);
    }

    #[test]
    fn test_popularity_sort_puts_popular_first_then_alphabetical() {
        let plan = plan_markup(&catalog(), &percent(dec!(20)), &usd());
        let rows = view(
            &plan.entries,
            &ViewOptions {
                sort: Some(SortKey::Popularity),
                direction: SortDirection::Desc,
                ..Default::default()
            },
            &PopularList::default(),
        );
        assert_eq!(
            keys(&rows),
            vec![".com", ".net", ".io", ".blog", ".shop", ".xyz"]
        );
    }

    #[test]
    fn test_sort_by_columns() {
        let plan = plan_markup(&catalog(), &percent(dec!(20)), &usd());
        let popular = PopularList::default();

        let by_wholesale = view(
            &plan.entries,
            &ViewOptions {
                sort: Some(SortKey::Wholesale),
                direction: SortDirection::Desc,
                ..Default::default()
            },
            &popular,
        );
        assert_eq!(
            keys(&by_wholesale),
            vec![".blog", ".net", ".com", ".io", ".xyz", ".shop"]
        );

        let by_key = view(
            &plan.entries,
            &ViewOptions {
                sort: Some(SortKey::Key),
                ..Default::default()
            },
            &popular,
        );
        assert_eq!(
            keys(&by_key),
            vec![".blog", ".com", ".io", ".net", ".shop", ".xyz"]
        );

        // .io is custom at 50%, everything calculated sits at 20%, .shop has none
        let by_markup = view(
            &plan.entries,
            &ViewOptions {
                sort: Some(SortKey::Markup),
                direction: SortDirection::Desc,
                ..Default::default()
            },
            &popular,
        );
        assert_eq!(by_markup.first().unwrap().key, ".io");
        assert_eq!(by_markup.last().unwrap().key, ".shop");
    }
}

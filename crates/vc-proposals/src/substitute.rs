//! Substitute proposals: when the requested item is unavailable, rank
//! alternative products and pause the command until the shopper
//! approves one.
//!
//! Candidates come from several sources and carry a source bias that
//! dominates lexical similarity: shopper preferences rank above
//! merchant-declared substitutes, which rank above plain lexical
//! neighbors, with a same-category fallback as the floor. The same
//! product reached through two sources keeps its higher score.

use std::collections::{BTreeMap, HashMap};

use chrono::Duration;
use uuid::Uuid;
use vc_catalog::{CatalogStore, QueryFilters, in_stock_query, pricing_snapshot};
use vc_nlp::normalize_term;
use vc_protocol::{
    ApplyMode, CatalogEntry, ParsedCommand, ProposalOption, RequestedItem, SubstituteConfirmation,
    SubstituteProposal, Unit, money_label,
};

use crate::confirmations::ConfirmationStore;

/// Most alternatives one proposal carries.
pub const MAX_SUBSTITUTE_OPTIONS: usize = 12;

/// Shopper preferences: item name mapped to ranked alternative names.
/// Sorted keys make the first-match lookup deterministic.
pub type SubstitutionPreferences = BTreeMap<String, Vec<String>>;

// Source biases. Candidate caps per source keep one noisy query from
// crowding out the rest.
const PREFERENCE_RANK: i32 = 90;
const DECLARED_RANK: i32 = 75;
const DIRECT_KNOWN_RANK: i32 = 85;
const DIRECT_UNKNOWN_RANK: i32 = 70;
const NAME_ONLY_RANK: i32 = 60;
const CATEGORY_RANK: i32 = 40;
const PER_SOURCE_CAP: usize = 4;
const DIRECT_CAP: usize = 8;

/// Build a substitute proposal for an add/update command.
///
/// `None` when no proposal is warranted: the requested item is in
/// stock, or nothing at all can stand in for it.
pub fn build_substitute_proposal(
    catalog: &CatalogStore,
    parsed: &ParsedCommand,
    mode: ApplyMode,
    preferences: &SubstitutionPreferences,
) -> Option<SubstituteProposal> {
    let requested = catalog.best_match(&parsed.item, &parsed.brand, &parsed.size);
    if let Some(entry) = &requested
        && entry.in_stock
    {
        return None;
    }

    let quantity = parsed.quantity.unwrap_or(1.0);
    let requested_name = requested
        .as_ref()
        .map(|entry| entry.name.clone())
        .filter(|name| !name.is_empty())
        .unwrap_or_else(|| parsed.item.clone());
    let requested_brand = requested
        .as_ref()
        .map(|entry| entry.brand.clone())
        .filter(|brand| !brand.is_empty())
        .unwrap_or_else(|| parsed.brand.clone());

    let mut ranking = Ranking {
        catalog,
        requested_name: normalize_term(&requested_name),
        requested_brand: normalize_term(&requested_brand),
        quantity,
        unit: parsed.unit,
        candidates: HashMap::new(),
    };

    for candidate in preferred_alternatives(preferences, &requested_name) {
        ranking.collect(&in_stock_query(candidate), PER_SOURCE_CAP, PREFERENCE_RANK);
    }
    if let Some(entry) = &requested {
        for candidate in &entry.substitutes {
            ranking.collect(&in_stock_query(candidate), PER_SOURCE_CAP, DECLARED_RANK);
        }
    }
    ranking.collect(
        &QueryFilters {
            query: requested_name.clone(),
            brand: parsed.brand.clone(),
            size: parsed.size.clone(),
            in_stock_only: true,
            ..Default::default()
        },
        DIRECT_CAP,
        if requested.is_some() { DIRECT_KNOWN_RANK } else { DIRECT_UNKNOWN_RANK },
    );
    if requested.is_none() {
        ranking.collect(&in_stock_query(&parsed.item), DIRECT_CAP, NAME_ONLY_RANK);
    }
    if let Some(fallback) = category_fallback(catalog, requested.as_ref()) {
        ranking.add(&fallback, CATEGORY_RANK);
    }

    let mut options = ranking.into_ranked();
    if options.is_empty() {
        // Last resort: the first in-stock lexical neighbor of the raw
        // item text.
        let neighbors = catalog.filter(&in_stock_query(parsed.item.as_str()));
        if let Some(entry) = neighbors.first()
            && let Some(option) = make_option(entry, quantity, parsed.unit)
        {
            options.push(option);
        }
    }
    if options.is_empty() {
        return None;
    }

    let suggested_alternative = options[0].clone();
    tracing::debug!(
        item = %parsed.item,
        suggested = %suggested_alternative.name,
        options = options.len(),
        "built substitute proposal"
    );
    Some(SubstituteProposal {
        requested_item: RequestedItem {
            name: requested_name,
            brand: if requested_brand.is_empty() { "Generic".to_string() } else { requested_brand },
            size: requested
                .as_ref()
                .map(|entry| entry.size.clone())
                .filter(|size| !size.is_empty())
                .unwrap_or_else(|| parsed.size.clone()),
            exists_in_catalog: requested.is_some(),
            in_stock: requested.as_ref().map(|entry| entry.in_stock).unwrap_or(false),
        },
        suggested_alternative,
        options,
        quantity,
        unit: parsed.unit,
        mode,
    })
}

/// First preference key matching the requested name (exact or either-way
/// containment, after normalization).
fn preferred_alternatives<'a>(
    preferences: &'a SubstitutionPreferences,
    requested_name: &str,
) -> &'a [String] {
    let requested = normalize_term(requested_name);
    preferences
        .iter()
        .find(|(key, _)| {
            let key = normalize_term(key);
            key == requested || key.contains(&requested) || requested.contains(&key)
        })
        .map(|(_, alternatives)| alternatives.as_slice())
        .unwrap_or(&[])
}

/// First in-stock entry sharing the requested product's category, under
/// a different name.
fn category_fallback(
    catalog: &CatalogStore,
    requested: Option<&CatalogEntry>,
) -> Option<CatalogEntry> {
    let requested = requested?;
    if requested.category.is_empty() {
        return None;
    }
    let requested_name = normalize_term(&requested.name);
    catalog
        .snapshot()
        .iter()
        .find(|entry| {
            entry.category == requested.category
                && entry.in_stock
                && normalize_term(&entry.name) != requested_name
        })
        .cloned()
}

struct Ranking<'a> {
    catalog: &'a CatalogStore,
    requested_name: String,
    requested_brand: String,
    quantity: f64,
    unit: Unit,
    candidates: HashMap<String, (i32, ProposalOption)>,
}

impl Ranking<'_> {
    fn collect(&mut self, filters: &QueryFilters, cap: usize, rank: i32) {
        for entry in self.catalog.filter(filters).iter().take(cap) {
            self.add(entry, rank);
        }
    }

    fn add(&mut self, entry: &CatalogEntry, rank: i32) {
        let Some(option) = make_option(entry, self.quantity, self.unit) else {
            return;
        };
        let score = self.score(entry, rank);
        match self.candidates.get(&option.sku) {
            Some((existing, _)) if *existing >= score => {}
            _ => {
                self.candidates.insert(option.sku.clone(), (score, option));
            }
        }
    }

    fn score(&self, entry: &CatalogEntry, rank: i32) -> i32 {
        let name = normalize_term(&entry.name);
        let brand = normalize_term(&entry.brand);
        let mut score = rank;
        if name == self.requested_name {
            score += 8;
        }
        if name.contains(&self.requested_name) {
            score += 5;
        }
        if self.requested_name.contains(&name) {
            score += 4;
        }
        if !self.requested_brand.is_empty() && brand == self.requested_brand {
            score += 3;
        }
        if entry.in_stock {
            score += 1;
        }
        score
    }

    /// Score descending, cheaper line total first within a score, name
    /// then brand as the final tie-break.
    fn into_ranked(self) -> Vec<ProposalOption> {
        let mut scored: Vec<(i32, ProposalOption)> = self.candidates.into_values().collect();
        scored.sort_by(|a, b| {
            b.0.cmp(&a.0)
                .then_with(|| {
                    let a_total =
                        a.1.line_total_price.filter(|v| v.is_finite()).unwrap_or(f64::INFINITY);
                    let b_total =
                        b.1.line_total_price.filter(|v| v.is_finite()).unwrap_or(f64::INFINITY);
                    a_total.total_cmp(&b_total)
                })
                .then_with(|| (&a.1.name, &a.1.brand).cmp(&(&b.1.name, &b.1.brand)))
        });
        scored.into_iter().take(MAX_SUBSTITUTE_OPTIONS).map(|(_, option)| option).collect()
    }
}

/// Flatten one in-stock entry into a priced option; out-of-stock
/// entries never become options.
fn make_option(entry: &CatalogEntry, quantity: f64, unit: Unit) -> Option<ProposalOption> {
    if !entry.in_stock {
        return None;
    }
    let unit_price = entry.effective_price();
    let has_price = unit_price.is_finite() && unit_price > 0.0;
    let pricing = pricing_snapshot(quantity, unit, &entry.size, unit_price);
    Some(ProposalOption {
        sku: entry.sku.clone(),
        name: entry.name.clone(),
        brand: if entry.brand.is_empty() { "Generic".to_string() } else { entry.brand.clone() },
        size: entry.size.clone(),
        category: if entry.category.is_empty() {
            "others".to_string()
        } else {
            entry.category.clone()
        },
        in_stock: entry.in_stock,
        price: entry.price,
        sale_price: entry.sale_price,
        on_sale: entry.on_sale,
        unit_price: has_price.then_some(unit_price),
        unit_price_label: if has_price { money_label(unit_price) } else { "-".to_string() },
        line_total_price: pricing.line_total_price,
        line_total_label: pricing.line_total_price.map(money_label).unwrap_or_default(),
        billable_quantity: pricing.billable_quantity,
        billable_unit: pricing.billable_unit,
        pricing_mode: pricing.pricing_mode,
    })
}

/// Pending substitute proposals, keyed by single-use token.
pub struct SubstituteService {
    store: ConfirmationStore<SubstituteProposal>,
}

impl SubstituteService {
    pub fn new() -> Self {
        Self { store: ConfirmationStore::new() }
    }

    pub fn with_ttl(ttl: Duration) -> Self {
        Self { store: ConfirmationStore::with_ttl(ttl) }
    }

    /// Park a proposal; returns the flattened confirmation view handed
    /// to the caller.
    pub fn create(&self, proposal: SubstituteProposal) -> SubstituteConfirmation {
        let (token, expires_at) = self.store.create(proposal.clone());
        SubstituteConfirmation {
            token,
            expires_at,
            requested_item: proposal.requested_item,
            suggested_alternative: proposal.suggested_alternative,
            options: proposal.options,
            quantity: proposal.quantity,
            unit: proposal.unit,
            mode: proposal.mode,
        }
    }

    pub fn consume(&self, token: Uuid) -> Option<SubstituteProposal> {
        self.store.consume(token)
    }

    pub fn reject(&self, token: Uuid) -> bool {
        self.store.reject(token)
    }

    pub fn pending_count(&self) -> usize {
        self.store.pending_count()
    }
}

impl Default for SubstituteService {
    fn default() -> Self {
        Self::new()
    }
}

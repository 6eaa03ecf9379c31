//! Brand selection: when a spoken item is carried by several brands and
//! the shopper named none, the command pauses until they pick one.

use std::collections::HashSet;

use chrono::Duration;
use uuid::Uuid;
use vc_catalog::{CatalogStore, QueryFilters, pricing_snapshot};
use vc_nlp::normalize_term;
use vc_protocol::{
    ApplyMode, BrandSelectionConfirmation, BrandSelectionProposal, CatalogEntry, ParsedCommand,
    ProposalOption, Unit, money_label,
};

use crate::confirmations::ConfirmationStore;

/// Most brand options one proposal carries.
pub const MAX_BRAND_OPTIONS: usize = 10;

/// Everything needed to resume the paused command once a brand is
/// picked.
#[derive(Debug, Clone)]
pub struct PendingBrandSelection {
    pub proposal: BrandSelectionProposal,
    pub parsed: ParsedCommand,
    pub mode: ApplyMode,
}

/// Build a brand-selection proposal for an add/update command.
///
/// `None` when no selection is needed: the shopper already named a
/// brand, or fewer than two distinct brands stock the item. Each option
/// is priced for the requested quantity against its own package size.
pub fn build_brand_selection(
    catalog: &CatalogStore,
    parsed: &ParsedCommand,
) -> Option<BrandSelectionProposal> {
    if parsed.item.is_empty() || !parsed.brand.is_empty() {
        return None;
    }

    let quantity = parsed.quantity.unwrap_or(1.0);
    let query = normalize_term(&parsed.item);
    let size = normalize_term(&parsed.size);

    let mut scored: Vec<(f64, ProposalOption)> = catalog
        .filter(&QueryFilters {
            query: parsed.item.clone(),
            size: parsed.size.clone(),
            in_stock_only: true,
            ..Default::default()
        })
        .iter()
        .map(|entry| {
            let option = brand_option(entry, quantity, parsed.unit);
            let score = score_option(&option, &query, &size);
            (score, option)
        })
        .collect();
    scored.sort_by(|a, b| b.0.total_cmp(&a.0));

    let options: Vec<ProposalOption> =
        scored.into_iter().take(MAX_BRAND_OPTIONS).map(|(_, option)| option).collect();

    let distinct_brands: HashSet<String> =
        options.iter().map(|option| normalize_term(&option.brand)).collect();
    if distinct_brands.len() <= 1 {
        return None;
    }

    tracing::debug!(item = %parsed.item, options = options.len(), "built brand selection proposal");
    Some(BrandSelectionProposal {
        action: parsed.action,
        requested_item: parsed.item.clone(),
        quantity,
        unit: parsed.unit,
        size: parsed.size.clone(),
        options,
    })
}

fn brand_option(entry: &CatalogEntry, quantity: f64, unit: Unit) -> ProposalOption {
    let unit_price = entry.effective_price();
    let pricing = pricing_snapshot(quantity, unit, &entry.size, unit_price);
    ProposalOption {
        sku: entry.sku.clone(),
        name: entry.name.clone(),
        brand: entry.brand.clone(),
        size: entry.size.clone(),
        category: entry.category.clone(),
        in_stock: entry.in_stock,
        price: entry.price,
        sale_price: entry.sale_price,
        on_sale: entry.on_sale,
        unit_price: Some(unit_price),
        unit_price_label: entry.price_label(),
        line_total_price: pricing.line_total_price,
        line_total_label: pricing.line_total_price.map(money_label).unwrap_or_default(),
        billable_quantity: pricing.billable_quantity,
        billable_unit: pricing.billable_unit,
        pricing_mode: pricing.pricing_mode,
    }
}

// Name similarity bonuses stack, so an exact name collects all three.
// The tiny brand-length term breaks exact-score ties toward shorter
// brand names.
fn score_option(option: &ProposalOption, query: &str, size: &str) -> f64 {
    let name = normalize_term(&option.name);
    let brand = normalize_term(&option.brand);
    let option_size = normalize_term(&option.size);

    let mut score = 0.0;
    if name == query {
        score += 6.0;
    }
    if name.contains(query) {
        score += 3.0;
    }
    if query.contains(&name) {
        score += 2.0;
    }
    if !size.is_empty() && option_size.contains(size) {
        score += 2.0;
    }
    if option.in_stock {
        score += 1.0;
    }
    score + (1.0 - brand.chars().count() as f64 / 1000.0).max(0.0)
}

/// Pending brand selections, keyed by single-use token.
pub struct BrandSelectionService {
    store: ConfirmationStore<PendingBrandSelection>,
}

impl BrandSelectionService {
    pub fn new() -> Self {
        Self { store: ConfirmationStore::new() }
    }

    pub fn with_ttl(ttl: Duration) -> Self {
        Self { store: ConfirmationStore::with_ttl(ttl) }
    }

    /// Park a proposal together with the command it paused; returns the
    /// flattened confirmation view handed to the caller.
    pub fn create(
        &self,
        proposal: BrandSelectionProposal,
        parsed: ParsedCommand,
        mode: ApplyMode,
    ) -> BrandSelectionConfirmation {
        let (token, expires_at) =
            self.store.create(PendingBrandSelection { proposal: proposal.clone(), parsed, mode });
        BrandSelectionConfirmation {
            token,
            expires_at,
            action: proposal.action,
            requested_item: proposal.requested_item,
            quantity: proposal.quantity,
            unit: proposal.unit,
            size: proposal.size,
            options: proposal.options,
        }
    }

    pub fn consume(&self, token: Uuid) -> Option<PendingBrandSelection> {
        self.store.consume(token)
    }

    pub fn reject(&self, token: Uuid) -> bool {
        self.store.reject(token)
    }

    pub fn pending_count(&self) -> usize {
        self.store.pending_count()
    }
}

impl Default for BrandSelectionService {
    fn default() -> Self {
        Self::new()
    }
}

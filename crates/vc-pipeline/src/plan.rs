//! Plans the pipeline hands back to its caller.

use serde::{Deserialize, Serialize};
use vc_protocol::{
    ApplyMode, BrandSelectionConfirmation, CatalogEntry, ParsedCommand, PricingSnapshot,
    SubstituteConfirmation, Unit,
};

/// Why an add/update was refused outright.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RejectReason {
    /// Nothing in the catalog resembles the spoken item.
    NotInCatalog,
    /// The item exists but is out of stock and nothing can stand in.
    OutOfStock,
}

/// One search hit: the catalog row plus its display price.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResult {
    #[serde(flatten)]
    pub entry: CatalogEntry,
    pub price_label: String,
}

impl From<CatalogEntry> for SearchResult {
    fn from(entry: CatalogEntry) -> Self {
        let price_label = entry.price_label();
        Self { entry, price_label }
    }
}

/// What the caller should do with a command. The pipeline never touches
/// the shopping list itself; `Apply` and `Remove` describe list edits
/// for the caller to make.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CommandPlan {
    /// Show these catalog rows; the list does not change.
    Search { results: Vec<SearchResult>, message: String },
    /// Take the item off the list. A `None` quantity removes the whole
    /// line; a spoken quantity removes only that much.
    Remove { item: String, brand: String, quantity: Option<f64>, unit: Unit, message: String },
    /// Paused: the shopper must pick a brand before anything changes.
    NeedsBrandSelection { confirmation: BrandSelectionConfirmation, message: String },
    /// Paused: the shopper must approve a substitute first.
    NeedsSubstitute { confirmation: SubstituteConfirmation, message: String },
    /// Put this entry on the list with this pricing.
    Apply {
        entry: CatalogEntry,
        item: String,
        brand: String,
        size: String,
        quantity: f64,
        unit: Unit,
        mode: ApplyMode,
        pricing: PricingSnapshot,
        message: String,
    },
    /// The command cannot proceed; nothing changes.
    Rejected { reason: RejectReason, message: String },
    /// The shopper turned a pending confirmation down; nothing changes.
    Declined { message: String },
}

/// A plan together with the parse that produced it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlannedCommand {
    pub parsed: ParsedCommand,
    pub plan: CommandPlan,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plans_serialize_with_a_kind_tag() {
        let plan = CommandPlan::Rejected {
            reason: RejectReason::OutOfStock,
            message: "\"Oranges\" is currently out of stock".to_string(),
        };
        let json = serde_json::to_string(&plan).unwrap();
        assert!(json.contains(r#""kind":"rejected""#));
        assert!(json.contains(r#""reason":"out_of_stock""#));
    }

    #[test]
    fn search_results_flatten_the_entry() {
        let entry = CatalogEntry::new("DRY-MLK-DP", "Milk", "DairyPure", "1l", 1.80, "dairy");
        let result = SearchResult::from(entry);
        let json = serde_json::to_string(&result).unwrap();
        assert!(json.contains(r#""sku":"DRY-MLK-DP""#));
        assert!(json.contains(r#""priceLabel":"$1.80""#));
    }
}

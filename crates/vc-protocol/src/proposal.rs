//! Payloads for the two confirmation machines: brand selection and
//! substitute proposals.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::catalog::CatalogEntry;
use crate::command::{ApplyMode, CommandAction};
use crate::pricing::{PricingMode, PricingSnapshot};
use crate::unit::Unit;

/// One selectable candidate inside a proposal: a catalog entry flattened
/// together with the pricing snapshot for the requested quantity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProposalOption {
    pub sku: String,
    pub name: String,
    pub brand: String,
    pub size: String,
    pub category: String,
    pub in_stock: bool,
    pub price: f64,
    pub sale_price: Option<f64>,
    pub on_sale: bool,
    /// Effective per-package price; `None` when the entry is unpriced.
    pub unit_price: Option<f64>,
    /// Display label for the unit price; `"-"` when unpriced.
    pub unit_price_label: String,
    pub line_total_price: Option<f64>,
    /// Display label for the line total; empty when it could not be priced.
    pub line_total_label: String,
    pub billable_quantity: Option<f64>,
    pub billable_unit: String,
    pub pricing_mode: PricingMode,
}

impl ProposalOption {
    /// The pricing snapshot this option was built with.
    pub fn pricing(&self) -> PricingSnapshot {
        PricingSnapshot {
            line_total_price: self.line_total_price,
            billable_quantity: self.billable_quantity,
            billable_unit: self.billable_unit.clone(),
            pricing_mode: self.pricing_mode,
        }
    }
}

/// Reconstruct the catalog view of an option, e.g. when a confirmed
/// substitute has to be applied from the stored proposal alone.
impl From<&ProposalOption> for CatalogEntry {
    fn from(option: &ProposalOption) -> Self {
        Self {
            sku: option.sku.clone(),
            name: option.name.clone(),
            brand: option.brand.clone(),
            size: option.size.clone(),
            price: option.price,
            sale_price: option.sale_price,
            on_sale: option.on_sale,
            category: option.category.clone(),
            in_stock: option.in_stock,
            season_months: Vec::new(),
            substitutes: Vec::new(),
        }
    }
}

/// A brand choice the shopper must make before an add/update proceeds.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BrandSelectionProposal {
    pub action: CommandAction,
    /// Item text the shopper spoke.
    pub requested_item: String,
    pub quantity: f64,
    pub unit: Unit,
    /// Spoken size constraint, if any.
    pub size: String,
    /// Candidate entries, best first, capped.
    pub options: Vec<ProposalOption>,
}

/// The view handed back to the caller when a brand selection is created:
/// the proposal plus the single-use token to confirm or reject it with.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BrandSelectionConfirmation {
    pub token: Uuid,
    pub expires_at: DateTime<Utc>,
    pub action: CommandAction,
    pub requested_item: String,
    pub quantity: f64,
    pub unit: Unit,
    pub size: String,
    pub options: Vec<ProposalOption>,
}

/// What the shopper originally asked for, as far as the catalog knows it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestedItem {
    pub name: String,
    /// Best-known brand; `"Generic"` when none was resolved.
    pub brand: String,
    pub size: String,
    pub exists_in_catalog: bool,
    pub in_stock: bool,
}

/// An out-of-stock resolution the shopper must approve before anything
/// lands on the list.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubstituteProposal {
    pub requested_item: RequestedItem,
    /// Highest-ranked alternative, applied when the shopper approves
    /// without picking a specific option.
    pub suggested_alternative: ProposalOption,
    /// All ranked alternatives, best first, capped.
    pub options: Vec<ProposalOption>,
    pub quantity: f64,
    pub unit: Unit,
    pub mode: ApplyMode,
}

/// The view handed back when a substitute proposal is created.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubstituteConfirmation {
    pub token: Uuid,
    pub expires_at: DateTime<Utc>,
    pub requested_item: RequestedItem,
    pub suggested_alternative: ProposalOption,
    pub options: Vec<ProposalOption>,
    pub quantity: f64,
    pub unit: Unit,
    pub mode: ApplyMode,
}

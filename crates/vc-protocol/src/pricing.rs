//! Pricing snapshots and merged quantities.

use serde::{Deserialize, Serialize};

use crate::unit::Unit;

/// How a line total was derived from the package size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PricingMode {
    /// Quantity and price could not be combined (invalid inputs).
    Unknown,
    /// Requested quantity priced per package as spoken.
    Direct,
    /// Requested measure divided by the package size; billed in packs.
    Prorated,
}

/// Billing outcome for one requested quantity against one catalog entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PricingSnapshot {
    /// Rounded line total in dollars; `None` when pricing was impossible.
    pub line_total_price: Option<f64>,
    /// Quantity the shopper is billed for, in `billable_unit`s.
    pub billable_quantity: Option<f64>,
    /// Unit the billable quantity is expressed in; empty when unknown.
    pub billable_unit: String,
    pub pricing_mode: PricingMode,
}

impl PricingSnapshot {
    /// The empty snapshot for inputs that cannot be priced.
    pub fn unknown() -> Self {
        Self {
            line_total_price: None,
            billable_quantity: None,
            billable_unit: String::new(),
            pricing_mode: PricingMode::Unknown,
        }
    }
}

/// Result of merging a quantity delta into an existing list line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MergedQuantity {
    pub quantity: f64,
    pub unit: Unit,
}

/// Dollar label for a computed amount, e.g. `"$12.40"`.
pub fn money_label(value: f64) -> String {
    format!("${value:.2}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_snapshot_is_empty() {
        let snapshot = PricingSnapshot::unknown();
        assert_eq!(snapshot.line_total_price, None);
        assert_eq!(snapshot.billable_quantity, None);
        assert_eq!(snapshot.billable_unit, "");
        assert_eq!(snapshot.pricing_mode, PricingMode::Unknown);
    }

    #[test]
    fn money_labels_use_two_decimals() {
        assert_eq!(money_label(3.5), "$3.50");
        assert_eq!(money_label(12.0), "$12.00");
        assert_eq!(money_label(0.075), "$0.07");
    }

    #[test]
    fn snapshot_serializes_camel_case() {
        let snapshot = PricingSnapshot {
            line_total_price: Some(9.0),
            billable_quantity: Some(2.0),
            billable_unit: "pack".to_string(),
            pricing_mode: PricingMode::Prorated,
        };
        let json = serde_json::to_string(&snapshot).unwrap();
        assert!(json.contains(r#""lineTotalPrice":9.0"#));
        assert!(json.contains(r#""pricingMode":"prorated""#));
    }
}

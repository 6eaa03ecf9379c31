//! Catalog entries as the upstream product feed delivers them.

use serde::{Deserialize, Serialize};

/// One sellable product in the catalog snapshot.
///
/// Field names follow the upstream feed's camelCase JSON, so a snapshot
/// file can be deserialized straight into `Vec<CatalogEntry>`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogEntry {
    /// Stable stock-keeping unit, unique within a snapshot.
    pub sku: String,
    /// Display name, e.g. "KitKat Chocolate".
    pub name: String,
    /// Brand name; may be empty for unbranded produce.
    #[serde(default)]
    pub brand: String,
    /// Package size label, e.g. "1kg", "6x1l", "4-finger". Free text;
    /// the pricing layer parses what it can and ignores the rest.
    #[serde(default)]
    pub size: String,
    /// List price per package in dollars.
    pub price: f64,
    /// Discounted price while `on_sale` is set.
    #[serde(default)]
    pub sale_price: Option<f64>,
    /// Whether the sale price currently applies.
    #[serde(default)]
    pub on_sale: bool,
    /// Merchandising category, e.g. "produce".
    #[serde(default)]
    pub category: String,
    /// Whether the entry can be added to a list right now.
    #[serde(default = "default_in_stock")]
    pub in_stock: bool,
    /// Months (1-12) the product is in season; empty for year-round.
    #[serde(default)]
    pub season_months: Vec<u32>,
    /// Names of catalog products the merchant declares as substitutes.
    #[serde(default)]
    pub substitutes: Vec<String>,
}

fn default_in_stock() -> bool {
    true
}

impl CatalogEntry {
    /// In-stock entry with no sale, seasons, or substitutes.
    pub fn new(
        sku: impl Into<String>,
        name: impl Into<String>,
        brand: impl Into<String>,
        size: impl Into<String>,
        price: f64,
        category: impl Into<String>,
    ) -> Self {
        Self {
            sku: sku.into(),
            name: name.into(),
            brand: brand.into(),
            size: size.into(),
            price,
            sale_price: None,
            on_sale: false,
            category: category.into(),
            in_stock: true,
            season_months: Vec::new(),
            substitutes: Vec::new(),
        }
    }

    /// Price the shopper actually pays: the sale price while a valid sale
    /// is active, the list price otherwise.
    pub fn effective_price(&self) -> f64 {
        match self.sale_price {
            Some(sale) if self.on_sale && sale > 0.0 => sale,
            _ => self.price,
        }
    }

    /// Human-readable price, annotated with the list price during a sale:
    /// `"$3.50 (sale, was $4.50)"`.
    pub fn price_label(&self) -> String {
        match self.sale_price {
            Some(sale) if self.on_sale && sale > 0.0 => {
                format!("${:.2} (sale, was ${:.2})", sale, self.price)
            }
            _ => format!("${:.2}", self.price),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn effective_price_prefers_active_sale() {
        let mut entry = CatalogEntry::new("APL-01", "Apples", "FreshFarm", "1kg", 4.50, "fruits");
        assert_eq!(entry.effective_price(), 4.50);

        entry.on_sale = true;
        entry.sale_price = Some(3.50);
        assert_eq!(entry.effective_price(), 3.50);

        entry.on_sale = false;
        assert_eq!(entry.effective_price(), 4.50);
    }

    #[test]
    fn price_label_annotates_sales() {
        let mut entry = CatalogEntry::new("MLK-01", "Milk", "DairyPure", "1l", 1.80, "dairy");
        assert_eq!(entry.price_label(), "$1.80");

        entry.on_sale = true;
        entry.sale_price = Some(1.50);
        assert_eq!(entry.price_label(), "$1.50 (sale, was $1.80)");
    }

    #[test]
    fn round_trips_the_upstream_feed_shape() {
        let json = r#"{
            "sku": "KIT-NES-4F",
            "name": "KitKat Chocolate",
            "brand": "Nestle",
            "size": "4-finger",
            "price": 1.5,
            "salePrice": null,
            "onSale": false,
            "category": "snacks",
            "inStock": true,
            "seasonMonths": [],
            "substitutes": ["Perk Chocolate"]
        }"#;
        let entry: CatalogEntry = serde_json::from_str(json).unwrap();
        assert_eq!(entry.sku, "KIT-NES-4F");
        assert_eq!(entry.substitutes, vec!["Perk Chocolate".to_string()]);

        let out = serde_json::to_string(&entry).unwrap();
        assert!(out.contains(r#""salePrice":null"#));
        assert!(out.contains(r#""inStock":true"#));
        assert!(out.contains(r#""seasonMonths":[]"#));
    }

    #[test]
    fn feed_defaults_apply_for_missing_fields() {
        let entry: CatalogEntry =
            serde_json::from_str(r#"{"sku": "EGG-01", "name": "Eggs", "price": 3.6}"#).unwrap();
        assert!(entry.in_stock);
        assert!(!entry.on_sale);
        assert!(entry.brand.is_empty());
        assert!(entry.substitutes.is_empty());
    }
}

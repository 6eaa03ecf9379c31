//! Atomically replaceable catalog snapshot.
//!
//! Feeds arrive as whole catalogs, never row deltas: `replace` swaps the
//! snapshot in one move so concurrent readers see either the old or the
//! new catalog, never a mix. Entries that violate the feed contract are
//! dropped (or repaired) with a warning instead of poisoning the store.

use std::collections::HashSet;
use std::sync::{Arc, RwLock};

use vc_nlp::BrandSource;
use vc_protocol::CatalogEntry;

pub struct CatalogStore {
    entries: RwLock<Arc<Vec<CatalogEntry>>>,
}

impl CatalogStore {
    pub fn new() -> Self {
        Self { entries: RwLock::new(Arc::new(Vec::new())) }
    }

    pub fn with_entries(entries: Vec<CatalogEntry>) -> Self {
        let store = Self::new();
        store.replace(entries);
        store
    }

    /// Seeded store for demos and tests.
    pub fn with_sample_data() -> Self {
        Self::with_entries(sample_catalog())
    }

    /// Swap in a new catalog wholesale. Returns how many entries were
    /// kept after sanitization.
    pub fn replace(&self, entries: Vec<CatalogEntry>) -> usize {
        let sanitized = sanitize(entries);
        let count = sanitized.len();
        *self.entries.write().unwrap() = Arc::new(sanitized);
        tracing::debug!(count, "catalog snapshot replaced");
        count
    }

    /// Cheap handle to the current snapshot; stays valid across later
    /// `replace` calls.
    pub fn snapshot(&self) -> Arc<Vec<CatalogEntry>> {
        Arc::clone(&self.entries.read().unwrap())
    }

    pub fn len(&self) -> usize {
        self.entries.read().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for CatalogStore {
    fn default() -> Self {
        Self::new()
    }
}

/// Brand names in first-seen order, deduplicated, for the parser's brand
/// extraction pass.
impl BrandSource for CatalogStore {
    fn known_brands(&self) -> Vec<String> {
        let snapshot = self.snapshot();
        let mut brands: Vec<String> = Vec::new();
        for entry in snapshot.iter() {
            if !entry.brand.is_empty() && !brands.contains(&entry.brand) {
                brands.push(entry.brand.clone());
            }
        }
        brands
    }
}

// Feed contract: sku present and unique, price positive, sale price
// below list price when the sale flag is set.
fn sanitize(entries: Vec<CatalogEntry>) -> Vec<CatalogEntry> {
    let mut seen: HashSet<String> = HashSet::new();
    let mut kept = Vec::with_capacity(entries.len());

    for mut entry in entries {
        if entry.sku.trim().is_empty() {
            tracing::warn!(name = %entry.name, "dropping catalog entry without sku");
            continue;
        }
        if !entry.price.is_finite() || entry.price <= 0.0 {
            tracing::warn!(
                sku = %entry.sku,
                price = entry.price,
                "dropping catalog entry with non-positive price"
            );
            continue;
        }
        if !seen.insert(entry.sku.clone()) {
            tracing::warn!(sku = %entry.sku, "dropping catalog entry with duplicate sku");
            continue;
        }
        if entry.on_sale {
            let sale_ok = entry
                .sale_price
                .map(|sale| sale.is_finite() && sale > 0.0 && sale < entry.price)
                .unwrap_or(false);
            if !sale_ok {
                tracing::warn!(
                    sku = %entry.sku,
                    sale_price = ?entry.sale_price,
                    "clearing sale flag with invalid sale price"
                );
                entry.on_sale = false;
                entry.sale_price = None;
            }
        }
        kept.push(entry);
    }

    kept
}

/// Small grocery catalog covering every pricing mode and both ambiguity
/// flows: multi-brand items, sale prices, out-of-stock items with
/// declared substitutes, and multi-pack size labels.
pub fn sample_catalog() -> Vec<CatalogEntry> {
    let mut entries = vec![
        CatalogEntry::new("PRD-APL-FF", "Apples", "FreshFarm", "1kg", 4.50, "produce"),
        CatalogEntry::new("PRD-APL-GO", "Apples", "GreenOrchard", "1kg", 3.90, "produce"),
        CatalogEntry::new("PRD-BAN-FF", "Bananas", "FreshFarm", "1kg", 2.20, "produce"),
        CatalogEntry::new("PRD-ORG-CC", "Oranges", "CitrusCo", "2kg", 5.40, "produce"),
        CatalogEntry::new("BEV-OJC-TF", "Orange Juice", "TropiFresh", "1l", 3.80, "beverages"),
        CatalogEntry::new("DRY-MLK-DP", "Milk", "DairyPure", "1l", 1.80, "dairy"),
        CatalogEntry::new("DRY-MLK-CM", "Milk", "CountryMoo", "500ml", 1.10, "dairy"),
        CatalogEntry::new("DRY-PNR-DP", "Paneer", "DairyPure", "200g", 2.75, "dairy"),
        CatalogEntry::new(
            "GRN-FLR-GH",
            "Whole Wheat Flour",
            "GoldenHarvest",
            "5kg",
            6.50,
            "grains",
        ),
        CatalogEntry::new("GRN-RCE-GH", "Rice", "GoldenHarvest", "5kg", 8.00, "grains"),
        CatalogEntry::new("PCR-TPS-BS", "Toothpaste", "BrightSmile", "150g", 3.20, "personal_care"),
        CatalogEntry::new("PCR-TPS-PW", "Toothpaste", "PearlWhite", "100g", 6.80, "personal_care"),
        CatalogEntry::new("PCR-TPS-MF", "Toothpaste", "MintyFresh", "75g", 2.50, "personal_care"),
        CatalogEntry::new("SNK-KKT-NS", "KitKat Chocolate", "Nestle", "4-finger", 1.50, "snacks"),
        CatalogEntry::new("SNK-PRK-CB", "Perk Chocolate", "Cadbury", "3 pack", 1.20, "snacks"),
        CatalogEntry::new("HSD-OIL-SG", "Cooking Oil", "SunGold", "1l", 9.99, "household"),
        CatalogEntry::new("PCR-SHP-SW", "Shampoo", "SilkWave", "200ml", 5.60, "personal_care"),
        CatalogEntry::new("PCR-SOP-PG", "Soap", "PureGlow", "4x100g", 4.25, "personal_care"),
        CatalogEntry::new("BEV-WTR-AP", "Water", "AquaPure", "6x1l", 3.00, "beverages"),
        CatalogEntry::new("PRT-EGG-HH", "Eggs", "HappyHen", "12 pieces", 3.60, "protein"),
        CatalogEntry::new("BEV-CLA-FU", "Cola", "FizzUp", "2l", 1.99, "beverages"),
    ];

    for entry in &mut entries {
        match entry.sku.as_str() {
            "PRD-APL-FF" => {
                entry.season_months = vec![9, 10, 11];
                entry.substitutes = vec!["Bananas".into(), "Oranges".into()];
            }
            "PRD-APL-GO" => {
                entry.on_sale = true;
                entry.sale_price = Some(3.50);
            }
            "PRD-ORG-CC" => {
                entry.in_stock = false;
                entry.season_months = vec![11, 12, 1, 2];
                entry.substitutes = vec!["Apples".into(), "Orange Juice".into()];
            }
            "PCR-TPS-MF" => {
                entry.on_sale = true;
                entry.sale_price = Some(1.90);
            }
            "PCR-SHP-SW" => {
                entry.in_stock = false;
                entry.substitutes = vec!["Soap".into()];
            }
            _ => {}
        }
    }

    entries
}

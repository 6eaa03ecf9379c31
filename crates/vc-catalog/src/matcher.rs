//! Lexical catalog matching: a predicate filter and a scored best-match.
//!
//! Matching is plain stemmed-token substring containment. Transcripts
//! already went through the normalizer and the catalog is small, so no
//! fuzzy matching is needed. The best-match scorer requires real name
//! evidence, so brand or size overlap alone can never claim an
//! unrelated product.

use vc_nlp::{normalize_term, query_tokens};
use vc_protocol::CatalogEntry;

use crate::store::CatalogStore;

/// Filter criteria; all fields optional, all ANDed together.
#[derive(Debug, Clone, Default)]
pub struct QueryFilters {
    pub query: String,
    pub brand: String,
    pub size: String,
    pub max_price: Option<f64>,
    pub min_price: Option<f64>,
    pub in_stock_only: bool,
}

/// In-stock filter on a bare query string.
pub fn in_stock_query(query: impl Into<String>) -> QueryFilters {
    QueryFilters { query: query.into(), in_stock_only: true, ..Default::default() }
}

impl CatalogStore {
    /// Every entry passing all filters, in catalog order.
    pub fn filter(&self, filters: &QueryFilters) -> Vec<CatalogEntry> {
        let brand_text = normalize_term(&filters.brand);
        let size_text = normalize_term(&filters.size);

        self.snapshot()
            .iter()
            .filter(|entry| {
                let price = entry.effective_price();
                matches_query(entry, &filters.query)
                    && (brand_text.is_empty() || entry.brand.to_lowercase().contains(&brand_text))
                    && (size_text.is_empty() || entry.size.to_lowercase().contains(&size_text))
                    && filters.max_price.is_none_or(|max| price <= max)
                    && filters.min_price.is_none_or(|min| price >= min)
                    && (!filters.in_stock_only || entry.in_stock)
            })
            .cloned()
            .collect()
    }

    /// Highest-scoring entry for a requested name (+ optional brand and
    /// size hints), or `None` when nothing clears the relevance floor.
    pub fn best_match(&self, name: &str, brand: &str, size: &str) -> Option<CatalogEntry> {
        let name_text = normalize_term(name);
        if name_text.is_empty() {
            return None;
        }

        let name_tokens: Vec<String> = query_tokens(&name_text)
            .into_iter()
            .filter(|token| token.chars().count() >= 2)
            .collect();
        let brand_text = normalize_term(brand);
        let size_text = normalize_term(size);

        let snapshot = self.snapshot();
        let mut scored: Vec<(f64, i32, &CatalogEntry)> = snapshot
            .iter()
            .map(|entry| {
                let entry_name = entry.name.to_lowercase();
                let entry_brand = entry.brand.to_lowercase();
                let entry_size = entry.size.to_lowercase();
                let exact = entry_name == name_text;

                let mut relevance = 0;
                if exact {
                    relevance += 12;
                }

                let mut token_hits = 0;
                for token in &name_tokens {
                    if entry_name.contains(token.as_str()) {
                        token_hits += 1;
                        relevance += 3;
                    }
                }

                let loose = !exact
                    && (entry_name.contains(&name_text) || name_text.contains(&entry_name));
                if loose {
                    relevance += 2;
                }

                if !brand_text.is_empty() && entry_brand.contains(&brand_text) {
                    relevance += 4;
                }
                if !size_text.is_empty() && entry_size.contains(&size_text) {
                    relevance += 3;
                }

                // Brand/size overlap without any name evidence is a
                // coincidence, not a match.
                if !(exact || token_hits > 0 || loose) {
                    relevance = 0;
                }

                let score = f64::from(relevance) + if entry.in_stock { 0.5 } else { 0.0 };
                (score, relevance, entry)
            })
            .collect();

        scored.sort_by(|a, b| {
            b.0.total_cmp(&a.0)
                .then_with(|| b.1.cmp(&a.1))
                .then_with(|| b.2.in_stock.cmp(&a.2.in_stock))
                .then_with(|| a.2.name.cmp(&b.2.name))
        });

        match scored.first() {
            Some(&(_, relevance, entry)) if relevance >= 3 => Some(entry.clone()),
            _ => None,
        }
    }
}

// Every stemmed query token must appear somewhere in "name brand size".
fn matches_query(entry: &CatalogEntry, query: &str) -> bool {
    let tokens = query_tokens(query);
    if tokens.is_empty() {
        return true;
    }
    let haystack = format!("{} {} {}", entry.name, entry.brand, entry.size).to_lowercase();
    tokens.iter().all(|token| haystack.contains(token.as_str()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> CatalogStore {
        CatalogStore::with_sample_data()
    }

    // ── filter ───────────────────────────────────────────────────────

    #[test]
    fn filter_stems_plural_queries() {
        let results =
            store().filter(&QueryFilters { query: "apples".into(), ..Default::default() });
        assert_eq!(results.len(), 2);
        assert!(results.iter().all(|e| e.name == "Apples"));
    }

    #[test]
    fn filter_max_price_uses_effective_price() {
        // MintyFresh toothpaste lists at 2.50 but sells at 1.90;
        // PearlWhite lists at 6.80.
        let results = store().filter(&QueryFilters {
            query: "toothpaste".into(),
            max_price: Some(5.0),
            ..Default::default()
        });
        let brands: Vec<&str> = results.iter().map(|e| e.brand.as_str()).collect();
        assert!(brands.contains(&"BrightSmile"));
        assert!(brands.contains(&"MintyFresh"));
        assert!(!brands.contains(&"PearlWhite"));
    }

    #[test]
    fn filter_min_price_bound_is_inclusive() {
        let results = store().filter(&QueryFilters {
            query: "milk".into(),
            min_price: Some(1.80),
            ..Default::default()
        });
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].brand, "DairyPure");
    }

    #[test]
    fn filter_brand_and_size_are_substring_matches() {
        let results = store().filter(&QueryFilters {
            query: "milk".into(),
            brand: "country".into(),
            ..Default::default()
        });
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].brand, "CountryMoo");

        let results = store().filter(&QueryFilters {
            query: "cola".into(),
            size: "2l".into(),
            ..Default::default()
        });
        assert_eq!(results.len(), 1);
    }

    #[test]
    fn filter_in_stock_only_excludes_out_of_stock() {
        let all = store().filter(&QueryFilters { query: "oranges".into(), ..Default::default() });
        // "Oranges" and "Orange Juice" both contain the stemmed token.
        assert!(all.iter().any(|e| !e.in_stock));

        let stocked = store().filter(&in_stock_query("oranges"));
        assert!(stocked.iter().all(|e| e.in_stock));
    }

    #[test]
    fn filter_empty_query_matches_everything() {
        let store = store();
        let results = store.filter(&QueryFilters::default());
        assert_eq!(results.len(), store.len());
    }

    // ── best match ───────────────────────────────────────────────────

    #[test]
    fn best_match_prefers_exact_name() {
        let entry = store().best_match("milk", "", "").unwrap();
        assert_eq!(entry.name, "Milk");
        // Exact-name tie between two in-stock brands: the stable sort
        // keeps catalog order.
        assert_eq!(entry.brand, "DairyPure");
    }

    #[test]
    fn best_match_uses_brand_hint() {
        let entry = store().best_match("milk", "CountryMoo", "").unwrap();
        assert_eq!(entry.brand, "CountryMoo");
    }

    #[test]
    fn best_match_uses_size_hint() {
        let entry = store().best_match("toothpaste", "", "75g").unwrap();
        assert_eq!(entry.brand, "MintyFresh");
    }

    #[test]
    fn best_match_rejects_unrelated_queries() {
        // No token overlap with a grocery catalog, so the relevance
        // floor keeps it unmatched.
        assert!(store().best_match("Samsung Galaxy Phone", "", "").is_none());
    }

    #[test]
    fn brand_and_size_overlap_alone_never_match() {
        // "FreshFarm" and "1kg" both exist in the catalog, but the name
        // has no lexical evidence.
        assert!(store().best_match("lawnmower", "FreshFarm", "1kg").is_none());
    }

    #[test]
    fn best_match_empty_name_is_none() {
        assert!(store().best_match("", "FreshFarm", "").is_none());
    }

    #[test]
    fn best_match_finds_out_of_stock_entries() {
        // Out-of-stock products still match; stock is a tie-break, not a
        // filter.
        let entry = store().best_match("oranges", "", "").unwrap();
        assert_eq!(entry.name, "Oranges");
        assert!(!entry.in_stock);
    }

    #[test]
    fn best_match_speech_variant_chocolate() {
        let entry = store().best_match("kitkat chocholate", "", "").unwrap();
        assert_eq!(entry.name, "KitKat Chocolate");
    }
}

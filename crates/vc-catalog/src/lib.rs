//! Catalog snapshot store, lexical matcher, and the pricing engine.
//!
//! The store holds an atomically replaceable snapshot of catalog entries;
//! matching, size parsing, pricing, and quantity merging are pure
//! functions over that snapshot.

pub mod matcher;
pub mod merge;
pub mod pricing;
pub mod size;
pub mod store;

pub use matcher::{QueryFilters, in_stock_query};
pub use merge::merge_quantities;
pub use pricing::{convert_quantity, pricing_snapshot, round_money, round_quantity};
pub use size::{SizeDescriptor, parse_size_label};
pub use store::CatalogStore;

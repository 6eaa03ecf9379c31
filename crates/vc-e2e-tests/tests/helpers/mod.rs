//! Shared test harness for E2E integration tests.
//!
//! Builds a planner over the sample catalog and exercises real code
//! paths across every crate boundary: normalization, parsing, catalog
//! matching, pricing, and the confirmation machines.

use std::sync::Arc;

use vc_catalog::CatalogStore;
use vc_nlp::GenerativeConfig;
use vc_pipeline::{CommandPlan, CommandPlanner, PlannedCommand};
use vc_proposals::SubstitutionPreferences;
use vc_protocol::{BrandSelectionConfirmation, CoreResult, SubstituteConfirmation};

/// End-to-end harness: a planner over the sample grocery catalog plus
/// the substitution preferences handed to every plan call.
pub struct TestHarness {
    /// Live catalog handle, for swapping snapshots mid-test.
    pub catalog: Arc<CatalogStore>,
    pub planner: CommandPlanner,
    pub preferences: SubstitutionPreferences,
}

impl TestHarness {
    /// Harness over the sample catalog, rule parser only.
    pub fn with_sample_data() -> Self {
        let catalog = Arc::new(CatalogStore::with_sample_data());
        let planner = CommandPlanner::new(Arc::clone(&catalog));
        Self { catalog, planner, preferences: SubstitutionPreferences::new() }
    }

    /// Harness whose planner consults a generative endpoint at `host`
    /// for locales the lexicon does not claim.
    pub fn with_generative_host(host: &str) -> Self {
        let catalog = Arc::new(CatalogStore::with_sample_data());
        let config = GenerativeConfig {
            host: host.to_string(),
            timeout_secs: 2,
            ..GenerativeConfig::default()
        };
        let planner = CommandPlanner::from_config(Arc::clone(&catalog), &config);
        Self { catalog, planner, preferences: SubstitutionPreferences::new() }
    }

    /// Register a shopper preference: when `item` is unavailable,
    /// propose these alternatives first.
    pub fn prefer(&mut self, item: &str, alternatives: &[&str]) {
        self.preferences
            .insert(item.to_string(), alternatives.iter().map(|s| s.to_string()).collect());
    }

    /// Plan an English transcript.
    pub async fn say(&self, transcript: &str) -> CoreResult<PlannedCommand> {
        self.planner.plan(transcript, "en-US", &self.preferences).await
    }

    /// Plan a transcript in a specific locale.
    pub async fn say_in(&self, transcript: &str, locale: &str) -> CoreResult<PlannedCommand> {
        self.planner.plan(transcript, locale, &self.preferences).await
    }

    /// Unwrap a plan into its brand-selection confirmation.
    pub fn expect_brand_selection(planned: PlannedCommand) -> BrandSelectionConfirmation {
        match planned.plan {
            CommandPlan::NeedsBrandSelection { confirmation, .. } => confirmation,
            other => panic!("expected brand selection, got {other:?}"),
        }
    }

    /// Unwrap a plan into its substitute confirmation.
    pub fn expect_substitute(planned: PlannedCommand) -> SubstituteConfirmation {
        match planned.plan {
            CommandPlan::NeedsSubstitute { confirmation, .. } => confirmation,
            other => panic!("expected substitute proposal, got {other:?}"),
        }
    }
}

//! The command planner: one transcript in, one [`CommandPlan`] out.
//!
//! Wires the parser, the catalog, and both confirmation services
//! together. Multi-brand adds pause on a brand selection; out-of-stock
//! adds pause on a substitute proposal; both resume here when the
//! shopper answers with the token they were handed.

use std::sync::Arc;

use uuid::Uuid;

use vc_catalog::{CatalogStore, QueryFilters, pricing_snapshot};
use vc_nlp::{BrandSource, GenerativeConfig, RuleParser, SmartParser};
use vc_proposals::{
    BrandSelectionService, SubstituteService, SubstitutionPreferences, build_brand_selection,
    build_substitute_proposal,
};
use vc_protocol::{ApplyMode, CatalogEntry, CommandAction, CoreError, CoreResult, ParsedCommand};

use crate::plan::{CommandPlan, PlannedCommand, RejectReason, SearchResult};

/// Plans voice commands against a shared catalog snapshot.
///
/// The planner owns the pending-confirmation stores, so one instance
/// must outlive every token it hands out.
pub struct CommandPlanner {
    parser: SmartParser,
    catalog: Arc<CatalogStore>,
    brand_selections: BrandSelectionService,
    substitutes: SubstituteService,
}

impl CommandPlanner {
    /// Rule-only planner, no generative fallback.
    pub fn new(catalog: Arc<CatalogStore>) -> Self {
        let rule = RuleParser::new(Arc::clone(&catalog) as Arc<dyn BrandSource>);
        Self::with_parser(catalog, SmartParser::new(rule))
    }

    /// Planner with the generative fallback the config describes.
    pub fn from_config(catalog: Arc<CatalogStore>, config: &GenerativeConfig) -> Self {
        let rule = RuleParser::new(Arc::clone(&catalog) as Arc<dyn BrandSource>);
        let parser = SmartParser::from_config(rule, config);
        Self::with_parser(catalog, parser)
    }

    pub fn with_parser(catalog: Arc<CatalogStore>, parser: SmartParser) -> Self {
        Self {
            parser,
            catalog,
            brand_selections: BrandSelectionService::new(),
            substitutes: SubstituteService::new(),
        }
    }

    /// Parser mode for health reporting.
    pub fn parser_mode(&self) -> &'static str {
        self.parser.mode()
    }

    /// Parse a transcript and plan it in one step.
    pub async fn plan(
        &self,
        transcript: &str,
        locale: &str,
        preferences: &SubstitutionPreferences,
    ) -> CoreResult<PlannedCommand> {
        if transcript.is_empty() {
            return Err(CoreError::InputValidation("a transcript is required".to_string()));
        }
        let locale = if locale.is_empty() { "en-US" } else { locale };

        let parsed = self.parser.parse_smart(transcript, locale).await;
        tracing::debug!(
            action = ?parsed.action,
            item = %parsed.item,
            source = ?parsed.source,
            "voice command parsed"
        );
        self.plan_parsed(parsed, preferences)
    }

    /// Plan an already-parsed command, e.g. one replayed from storage.
    pub fn plan_parsed(
        &self,
        parsed: ParsedCommand,
        preferences: &SubstitutionPreferences,
    ) -> CoreResult<PlannedCommand> {
        if parsed.item.is_empty() && parsed.action != CommandAction::Search {
            return Err(CoreError::InputValidation(
                "could not detect an item in the voice command".to_string(),
            ));
        }

        let plan = match parsed.action {
            CommandAction::Search => self.plan_search(&parsed),
            CommandAction::Remove => CommandPlan::Remove {
                item: parsed.item.clone(),
                brand: parsed.brand.clone(),
                quantity: if parsed.quantity_provided { parsed.quantity } else { None },
                unit: parsed.unit,
                message: format!("Removing {} from your list.", parsed.item),
            },
            CommandAction::Add => {
                self.plan_add_or_update(&parsed, ApplyMode::Increment, preferences)
            }
            CommandAction::Update => self.plan_add_or_update(&parsed, ApplyMode::Set, preferences),
            CommandAction::Unknown => {
                return Err(CoreError::InputValidation(format!(
                    "could not understand the command \"{}\"",
                    parsed.raw
                )));
            }
        };
        Ok(PlannedCommand { parsed, plan })
    }

    /// Resume a paused brand selection with the shopper's pick. The
    /// token is single-use: an unknown SKU still burns it.
    pub fn confirm_brand_selection(
        &self,
        token: Uuid,
        selected_sku: &str,
        preferences: &SubstitutionPreferences,
    ) -> CoreResult<PlannedCommand> {
        if selected_sku.is_empty() {
            return Err(CoreError::InputValidation(
                "a selected SKU is required to confirm a brand".to_string(),
            ));
        }
        let Some(pending) = self.brand_selections.consume(token) else {
            return Err(CoreError::NotFound(
                "brand selection request expired or not found".to_string(),
            ));
        };
        let Some(picked) = pending.proposal.options.iter().find(|o| o.sku == selected_sku) else {
            return Err(CoreError::InputValidation(
                "selected brand option is not part of the proposal".to_string(),
            ));
        };

        // Re-plan the paused command as if the shopper had spoken the
        // picked brand in the first place.
        let mut next = pending.parsed.clone();
        next.item = picked.name.clone();
        next.brand = picked.brand.clone();
        next.size =
            if picked.size.is_empty() { pending.parsed.size.clone() } else { picked.size.clone() };
        next.filters.query = picked.name.clone();
        next.filters.brand = picked.brand.clone();
        next.filters.size = picked.size.clone();

        let plan = self.resolve_add_or_update(&next, pending.mode, preferences);
        Ok(PlannedCommand { parsed: next, plan })
    }

    /// Walk away from a paused brand selection.
    pub fn reject_brand_selection(&self, token: Uuid) -> CoreResult<CommandPlan> {
        if !self.brand_selections.reject(token) {
            return Err(CoreError::NotFound(
                "brand selection request expired or not found".to_string(),
            ));
        }
        Ok(CommandPlan::Declined {
            message: "No brand was selected. Nothing was added.".to_string(),
        })
    }

    /// Answer a pending substitute proposal. Approving without a SKU
    /// takes the suggested alternative; a SKU picks a specific option.
    pub fn confirm_substitute(
        &self,
        token: Uuid,
        approved: bool,
        selected_sku: Option<&str>,
    ) -> CoreResult<CommandPlan> {
        if !approved {
            if !self.substitutes.reject(token) {
                return Err(CoreError::NotFound(
                    "confirmation request expired or not found".to_string(),
                ));
            }
            return Ok(CommandPlan::Declined {
                message: "No problem, I did not add the alternative item.".to_string(),
            });
        }

        let Some(proposal) = self.substitutes.consume(token) else {
            return Err(CoreError::NotFound(
                "confirmation request expired or not found".to_string(),
            ));
        };

        let picked = match selected_sku.filter(|sku| !sku.is_empty()) {
            Some(sku) => match proposal.options.iter().find(|o| o.sku == sku) {
                Some(option) => option.clone(),
                None => {
                    return Err(CoreError::InputValidation(
                        "selected substitute option is not part of the proposal".to_string(),
                    ));
                }
            },
            None => proposal.suggested_alternative.clone(),
        };

        tracing::debug!(sku = %picked.sku, name = %picked.name, "substitute confirmed");
        Ok(CommandPlan::Apply {
            entry: CatalogEntry::from(&picked),
            item: picked.name.clone(),
            brand: picked.brand.clone(),
            size: picked.size.clone(),
            quantity: proposal.quantity,
            unit: proposal.unit,
            mode: proposal.mode,
            pricing: picked.pricing(),
            message: format!("Added alternative {} by {}.", picked.name, picked.brand),
        })
    }

    fn plan_search(&self, parsed: &ParsedCommand) -> CommandPlan {
        // Searches show out-of-stock rows too; only adds require stock.
        let filters = QueryFilters {
            query: parsed.filters.query.clone(),
            brand: parsed.filters.brand.clone(),
            size: parsed.filters.size.clone(),
            max_price: parsed.filters.max_price,
            min_price: parsed.filters.min_price,
            in_stock_only: false,
        };
        let results: Vec<SearchResult> =
            self.catalog.filter(&filters).into_iter().map(SearchResult::from).collect();
        let message = if results.is_empty() {
            format!("No products found for \"{}\".", search_query_text(parsed))
        } else {
            format!("Found {} matching product(s).", results.len())
        };
        CommandPlan::Search { results, message }
    }

    fn plan_add_or_update(
        &self,
        parsed: &ParsedCommand,
        mode: ApplyMode,
        preferences: &SubstitutionPreferences,
    ) -> CommandPlan {
        // Brand ambiguity is resolved before any stock check.
        if let Some(proposal) = build_brand_selection(&self.catalog, parsed) {
            let message = format!(
                "Multiple brands are available for {}. \
                 Please select a brand and price to continue.",
                parsed.item
            );
            let confirmation = self.brand_selections.create(proposal, parsed.clone(), mode);
            return CommandPlan::NeedsBrandSelection { confirmation, message };
        }
        self.resolve_add_or_update(parsed, mode, preferences)
    }

    /// The add/update path past brand selection: match, stock check,
    /// substitutes, then the apply plan.
    fn resolve_add_or_update(
        &self,
        parsed: &ParsedCommand,
        mode: ApplyMode,
        preferences: &SubstitutionPreferences,
    ) -> CommandPlan {
        let best = self.catalog.best_match(&parsed.item, &parsed.brand, &parsed.size);
        if let Some(entry) = &best
            && entry.in_stock
        {
            return apply_plan(entry, parsed, mode);
        }

        if let Some(proposal) = build_substitute_proposal(&self.catalog, parsed, mode, preferences)
        {
            let message = format!(
                "{} is currently unavailable. I found {} alternative option(s). \
                 Do you want to add {} by {}, or pick another alternative?",
                proposal.requested_item.name,
                proposal.options.len(),
                proposal.suggested_alternative.name,
                proposal.suggested_alternative.brand,
            );
            let confirmation = self.substitutes.create(proposal);
            return CommandPlan::NeedsSubstitute { confirmation, message };
        }

        match best {
            None => {
                tracing::debug!(item = %parsed.item, "no catalog match for add/update");
                CommandPlan::Rejected {
                    reason: RejectReason::NotInCatalog,
                    message: format!(
                        "Item \"{}\" was not found in catalog stock. Try another item or brand.",
                        parsed.item
                    ),
                }
            }
            Some(entry) => CommandPlan::Rejected {
                reason: RejectReason::OutOfStock,
                message: format!(
                    "\"{}\" is currently out of stock and no suitable alternatives were found.",
                    entry.name
                ),
            },
        }
    }
}

/// Plan a direct add/update of an in-stock catalog entry.
fn apply_plan(entry: &CatalogEntry, parsed: &ParsedCommand, mode: ApplyMode) -> CommandPlan {
    let quantity = parsed.quantity.unwrap_or(1.0);
    let pricing = pricing_snapshot(quantity, parsed.unit, &entry.size, entry.effective_price());
    let item = if entry.name.is_empty() { parsed.item.clone() } else { entry.name.clone() };
    let brand = if entry.brand.is_empty() { parsed.brand.clone() } else { entry.brand.clone() };
    let brand_tag = if brand.is_empty() { String::new() } else { format!(" ({brand})") };
    let message = match mode {
        ApplyMode::Set => format!("Updated {item}{brand_tag} quantity to {quantity}"),
        ApplyMode::Increment => {
            format!("Added {quantity} {} of {item}{brand_tag}", parsed.unit)
        }
    };
    CommandPlan::Apply {
        entry: entry.clone(),
        item,
        brand,
        size: entry.size.clone(),
        quantity,
        unit: parsed.unit,
        mode,
        pricing,
        message,
    }
}

/// Human-readable query text for the empty-search message: the filter
/// query when one was extracted, otherwise the spoken fragments.
fn search_query_text(parsed: &ParsedCommand) -> String {
    if !parsed.filters.query.is_empty() {
        return parsed.filters.query.clone();
    }
    let joined = [parsed.brand.as_str(), parsed.item.as_str(), parsed.size.as_str()]
        .iter()
        .filter(|part| !part.is_empty())
        .copied()
        .collect::<Vec<_>>()
        .join(" ");
    if joined.is_empty() { "your query".to_string() } else { joined }
}
